//! Gateways to the Journal Borrowing API, one per resource

pub mod auth;
pub mod borrows;
pub mod journals;
pub mod settings;
pub mod stats;
pub mod teachers;

use std::sync::Arc;

use crate::client::ApiClient;

pub use borrows::BorrowGateway;

/// Main repository struct holding the shared API client
#[derive(Clone)]
pub struct Repository {
    pub client: ApiClient,
    pub auth: auth::AuthRepository,
    pub journals: journals::JournalsRepository,
    pub teachers: teachers::TeachersRepository,
    pub borrows: Arc<dyn BorrowGateway>,
    pub settings: settings::SettingsRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository on top of the given client
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: auth::AuthRepository::new(client.clone()),
            journals: journals::JournalsRepository::new(client.clone()),
            teachers: teachers::TeachersRepository::new(client.clone()),
            borrows: Arc::new(borrows::BorrowsRepository::new(client.clone())),
            settings: settings::SettingsRepository::new(client.clone()),
            stats: stats::StatsRepository::new(client.clone()),
            client,
        }
    }
}
