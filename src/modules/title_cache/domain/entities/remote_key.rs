use crate::modules::catalog::TitleItem;
use serde::{Deserialize, Serialize};

/// Page linkage of one cached row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteKey {
    pub title_id: i64,
    /// Page to fetch when prepending; `None` on the first page
    pub prev_key: Option<u32>,
    /// Page to fetch when appending; `None` on the last page
    pub next_key: Option<u32>,
    pub current_page: u32,
    /// Cache write time in milliseconds since the Unix epoch
    pub created_on: i64,
}

/// Linkage computed once per fetched page and shared by all of its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageKeys {
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
    pub current_page: u32,
    pub created_on: i64,
}

impl PageKeys {
    pub fn for_page(page: u32, end_of_pagination: bool, created_on: i64) -> Self {
        Self {
            prev_key: if page > 1 { Some(page - 1) } else { None },
            next_key: if end_of_pagination {
                None
            } else {
                Some(page + 1)
            },
            current_page: page,
            created_on,
        }
    }

    pub fn for_title(&self, title_id: i64) -> RemoteKey {
        RemoteKey {
            title_id,
            prev_key: self.prev_key,
            next_key: self.next_key,
            current_page: self.current_page,
            created_on: self.created_on,
        }
    }
}

/// One page worth of writes, applied in a single transaction
#[derive(Debug, Clone, PartialEq)]
pub struct PageCommit {
    pub items: Vec<TitleItem>,
    pub keys: PageKeys,
    /// Drop every cached row and key of the category before inserting
    pub clear_existing: bool,
}

impl PageCommit {
    pub fn page(&self) -> u32 {
        self.keys.current_page
    }
}
