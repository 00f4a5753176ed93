pub mod auth_service;
pub mod storage;
pub mod upload;

pub use auth_service::{AuthService, LoginContext, LoginOutcome, LoginRequest};
pub use storage::{image_store, ImageStore};
pub use upload::{ImageKind, UploadError, UploadKind, UploadedImage};
