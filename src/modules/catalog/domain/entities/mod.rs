mod title_item;

pub use title_item::{TitleItem, TitlePage};
