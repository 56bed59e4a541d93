mod cached_title;
mod remote_key;

pub use cached_title::CachedTitle;
pub use remote_key::{PageCommit, PageKeys, RemoteKey};
