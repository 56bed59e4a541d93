mod request_category;
mod request_params;

pub use request_category::RequestCategory;
pub use request_params::{DiscoverFilter, RequestParams, SortOrder};
