pub mod clock;
pub mod coordinator;
pub mod page_stream;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use coordinator::CacheCoordinator;
pub use page_stream::{page_stream, snapshot};
pub use service::TitleCacheService;
