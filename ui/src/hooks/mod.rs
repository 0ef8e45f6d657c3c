pub mod use_api_call;
pub mod use_api_form;
pub mod use_api_list;
pub mod use_api_pagination;
pub mod use_authentication;
pub mod use_logout;
pub mod use_require_auth;
pub mod use_session_expired;
pub mod use_title;

pub use use_api_call::{UseApiCallHandle, use_api_call};
pub use use_api_form::{UseApiFormHandle, use_api_form};
pub use use_api_list::{UseApiListHandle, use_api_list};
pub use use_api_pagination::{UseApiPaginationHandle, use_api_pagination};
pub use use_authentication::use_authentication;
pub use use_logout::use_logout;
pub use use_require_auth::use_require_auth;
pub use use_session_expired::use_session_expired;
pub use use_title::use_title;
