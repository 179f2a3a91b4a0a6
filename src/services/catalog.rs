//! Journal catalog service

use std::sync::Arc;

use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::journal::{Journal, JournalForm, JournalQuery},
    repository::Repository,
    views::{catalog_table::render_journals, ListState, LoadSequencer, Table},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    state: Arc<RwLock<ListState<Journal>>>,
    sequencer: Arc<LoadSequencer>,
}

impl CatalogService {
    pub fn new(repository: Repository, page_size: u32) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(ListState::new(page_size))),
            sequencer: Arc::new(LoadSequencer::new()),
        }
    }

    /// Search journals with filters; results land in the list state
    pub async fn search(&self, mut query: JournalQuery) -> AppResult<Vec<Journal>> {
        let page_size = self.state.read().await.pager.page_size();
        query.page = query.page.max(1);
        if query.page_size == 0 {
            query.page_size = page_size;
        }
        query.keyword = query.keyword.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        let ticket = self.sequencer.issue();
        let result = self.repository.journals.search(&query).await;

        let mut state = self.state.write().await;
        if !self.sequencer.is_current(ticket) {
            tracing::warn!(page = query.page, "Discarding stale journal search response");
            return Ok(state.records().to_vec());
        }
        match result {
            Ok(page) => {
                for journal in &page.list {
                    for violation in journal.invariant_violations() {
                        tracing::warn!(journal_id = journal.id, "{}", violation);
                    }
                }
                state.apply_page(query.page, page);
                Ok(state.records().to_vec())
            }
            Err(e) => {
                tracing::error!(error = %e, "Journal search failed");
                state.fail(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn render(&self) -> Table {
        render_journals(&*self.state.read().await)
    }

    pub async fn pagination(&self, max_buttons: u32) -> String {
        self.state.read().await.pager.render(max_buttons)
    }

    /// Get journal by ID
    pub async fn get_journal(&self, id: i64) -> AppResult<Journal> {
        if id <= 0 {
            return Err(AppError::Validation("Journal ID must be a number greater than 0".to_string()));
        }
        self.repository.journals.get_by_id(id).await
    }

    /// Create a new journal
    pub async fn create_journal(&self, form: JournalForm) -> AppResult<()> {
        let form = JournalForm { id: None, ..form }.normalized();
        form.validate()?;
        self.repository.journals.create(&form).await?;
        tracing::info!(name = %form.name, issn = %form.issn, "Journal created");
        Ok(())
    }

    /// Update an existing journal
    pub async fn update_journal(&self, form: JournalForm) -> AppResult<()> {
        let form = form.normalized();
        if form.id.is_none() {
            return Err(AppError::Validation("Journal ID is required for an update".to_string()));
        }
        form.validate()?;
        self.repository.journals.update(&form).await?;
        tracing::info!(journal_id = ?form.id, "Journal updated");
        Ok(())
    }

    pub async fn delete_journal(&self, id: i64) -> AppResult<()> {
        if id <= 0 {
            return Err(AppError::Validation("Journal ID must be a number greater than 0".to_string()));
        }
        self.repository.journals.delete(id).await?;
        tracing::info!(journal_id = id, "Journal deleted");
        Ok(())
    }
}
