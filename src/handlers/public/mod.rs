// handlers/public/mod.rs - Routes reachable without an admin session
//
// works.rs       GET /api/works, /api/works/recents, /api/works/:id
// categories.rs  GET /api/categories
// history.rs     GET /api/history
// auth.rs        POST /api/admin/auth/login, /api/admin/auth/logout
// pages.rs       built-in admin shell, served behind the page guard

pub mod auth;
pub mod categories;
pub mod history;
pub mod pages;
pub mod works;

pub use auth::{login_post, logout_post};
pub use categories::categories_get;
pub use history::history_get;
pub use pages::admin_shell;
pub use works::{work_get, works_get, works_recents_get};
