use crate::modules::catalog::TitleItem;
use serde::{Deserialize, Serialize};

/// A title as stored in one category's cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTitle {
    /// Locally assigned row id; stable until the row is replaced or cleared
    pub id: i64,
    /// 1-based remote page the row was fetched as part of
    pub page: u32,
    pub title: TitleItem,
}
