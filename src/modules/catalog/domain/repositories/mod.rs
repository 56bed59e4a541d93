mod title_source;

pub use title_source::{GenreSource, TitleSource};

#[cfg(test)]
pub use title_source::{MockGenreSource, MockTitleSource};
