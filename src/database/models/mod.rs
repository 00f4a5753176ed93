pub mod admin;
pub mod category;
pub mod history;
pub mod login_log;
pub mod work;

pub use admin::{Admin, AdminRow};
pub use category::{Category, CategoryInput, CategorySummary, CategoryWithCount};
pub use history::{HistoryEntry, HistoryInput, HistoryYear, ValidatedHistory};
pub use login_log::{LoginLog, LoginStatus};
pub use work::{
    NewWork, ValidatedWork, Work, WorkChanges, WorkDetail, WorkNavItem, WorkNavigation, WorkPatch,
    WorkRow,
};
