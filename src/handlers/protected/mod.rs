// handlers/protected/mod.rs - Admin JSON API
//
// Everything here is mounted behind require_admin_session, so handlers can
// take `Extension<AuthAdmin>` without checking for it.
//
// auth.rs        GET  /api/admin/auth/session
// works.rs       /api/admin/works[/:id]
// categories.rs  /api/admin/categories[/:id]
// history.rs     /api/admin/history[/:id]
// upload.rs      POST /api/admin/upload/{thumbnail,content}
// dashboard.rs   GET  /api/admin/dashboard, /api/admin/login-logs

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod history;
pub mod upload;
pub mod works;

pub use auth::session_get;
pub use categories::{categories_get, categories_post, category_delete, category_put};
pub use dashboard::{dashboard_get, login_logs_get};
pub use history::{history_delete, history_get, history_post, history_put};
pub use upload::{upload_content_post, upload_thumbnail_post};
pub use works::{work_delete, work_get, work_put, works_get, works_post};
