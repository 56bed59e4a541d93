mod app_error;
mod fetch_error;

pub use app_error::{AppError, AppResult};
pub use fetch_error::{FetchContext, FetchError, FetchErrorKind, FetchResult};
