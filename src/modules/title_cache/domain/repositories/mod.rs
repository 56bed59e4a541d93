mod title_cache_repository;

pub use title_cache_repository::TitleCacheRepository;

#[cfg(test)]
pub use title_cache_repository::MockTitleCacheRepository;
