mod entities;
mod repository;

pub use entities::{Genre, GenreTable};
pub use repository::GenreRepository;

#[cfg(test)]
pub use repository::MockGenreRepository;
