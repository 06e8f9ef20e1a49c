pub mod booking;
pub mod catalog;
pub mod config;
pub mod content;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod locale;
pub mod middleware;
pub mod routes;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use crate::storage::FileStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
    pub storage: Arc<dyn FileStorage>,
}
