pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::{CachedTitle, PageCommit, PageKeys, RemoteKey};
pub use repositories::TitleCacheRepository;
pub use value_objects::{
    InitializeAction, LoadError, LoadType, LoadedPage, MediatorResult, PagingState,
};

#[cfg(test)]
pub use repositories::MockTitleCacheRepository;
