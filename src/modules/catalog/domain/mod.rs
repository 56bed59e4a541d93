pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::{TitleItem, TitlePage};
pub use repositories::{GenreSource, TitleSource};
pub use value_objects::{DiscoverFilter, RequestCategory, RequestParams, SortOrder};
