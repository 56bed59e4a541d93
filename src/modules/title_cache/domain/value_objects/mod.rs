mod load_type;
mod mediator_result;
mod paging_state;

pub use load_type::LoadType;
pub use mediator_result::{InitializeAction, LoadError, MediatorResult};
pub use paging_state::{LoadedPage, PagingState};
