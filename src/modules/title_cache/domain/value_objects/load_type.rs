use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of load the paging consumer asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// First load or pull-to-refresh; replaces the category's cache
    Refresh,
    /// Load the page before the first loaded row
    Prepend,
    /// Load the page after the last loaded row
    Append,
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadType::Refresh => "refresh",
            LoadType::Prepend => "prepend",
            LoadType::Append => "append",
        };
        write!(f, "{}", name)
    }
}
