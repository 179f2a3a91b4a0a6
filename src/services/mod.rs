//! Screen controllers and workflows

pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod overdue;
pub mod reports;
pub mod settings;
pub mod stats;
pub mod status;
pub mod teachers;

use crate::{
    config::AppConfig, repository::Repository, session::SessionStore,
    services::status::StatusClassifier,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub teachers: teachers::TeachersService,
    pub borrows: borrows::BorrowService,
    pub overdue: overdue::OverdueService,
    pub stats: stats::StatsService,
    pub settings: settings::SettingsService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let classifier = StatusClassifier::new(config.borrow.due_soon_days);
        let page_size = config.pagination.page_size;
        let auth = auth::AuthService::new(
            repository.clone(),
            SessionStore::new(config.session.path.clone()),
        );
        Self {
            settings: settings::SettingsService::new(repository.clone(), auth.clone()),
            auth,
            catalog: catalog::CatalogService::new(repository.clone(), page_size),
            teachers: teachers::TeachersService::new(repository.clone(), page_size),
            borrows: borrows::BorrowService::new(repository.borrows.clone(), classifier, page_size),
            overdue: overdue::OverdueService::new(repository.borrows.clone(), classifier, page_size),
            stats: stats::StatsService::new(repository.clone()),
            reports: reports::ReportsService::new(repository, config.export.dir.clone()),
        }
    }
}
