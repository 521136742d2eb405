pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod services;
pub mod session;
pub mod view;

pub use api::ApiClient;
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use model::*;
pub use services::{LoadTicket, TaskBoard};
pub use session::{Session, SessionStore};
