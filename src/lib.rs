//! Journal Lending Portal
//!
//! A typed client for the college Journal Borrowing API: journal and teacher
//! administration, the borrow/return workflow, overdue tracking with notices,
//! statistics and exports.

use std::sync::Arc;

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod session;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult, FailureKind};

/// Application state shared by every screen
#[derive(Clone)]
pub struct Portal {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl Portal {
    /// Build the client, repositories and services for `config`
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let client = client::ApiClient::new(&config.api)?;
        let repository = repository::Repository::new(client);
        let services = services::Services::new(repository, &config);
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }

    /// Build and attach the saved session's credentials
    pub async fn connect(config: AppConfig) -> AppResult<Self> {
        let portal = Self::new(config)?;
        portal.services.auth.restore().await?;
        Ok(portal)
    }
}
