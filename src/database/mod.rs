pub mod admins;
pub mod categories;
pub mod history;
pub mod login_logs;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod schema;
pub mod works;

pub use admins::AdminRepository;
pub use categories::CategoryRepository;
pub use history::HistoryRepository;
pub use login_logs::LoginLogRepository;
pub use manager::{DatabaseError, DatabaseManager};
pub use works::WorkRepository;
