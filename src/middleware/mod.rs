pub mod auth;
pub mod guard;
pub mod json;
pub mod logging;
pub mod response;

pub use auth::{require_admin_session, AuthAdmin, SessionGuard};
pub use guard::admin_page_guard;
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};
