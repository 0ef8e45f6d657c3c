//! Framework-independent state machines for API-backed views.
//!
//! Each machine owns its state and changes it only by dispatching its own
//! actions. Hosts read snapshots, subscribe to be told about changes and call
//! `unmount` when the view goes away, after which late responses are
//! discarded.

pub mod call;
pub mod form;
pub mod list;
pub mod pagination;
mod store;

pub use call::{ApiCall, CallOptions, CallState};
pub use form::{ApiForm, FormOptions, FormState, FormValues, SubmitResult};
pub use list::{ApiList, ListOptions, ListState};
pub use pagination::{
    ApiPagination, PagedResult, PaginationOptions, PaginationState,
};
pub use store::Reducer;
