//! Borrow desk: create, return and renew, plus the teacher's borrow lists

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowRecord, CreateBorrowRequest},
        enums::BorrowStatus,
        journal::Journal,
        teacher::Teacher,
    },
    repository::BorrowGateway,
    services::status::StatusClassifier,
    views::{
        borrow_table::{render_borrows, BorrowView},
        ListState, LoadSequencer, Pager, Table,
    },
};

/// Statuses that count as "still out"
const ACTIVE_STATUSES: [BorrowStatus; 2] = [BorrowStatus::Borrowed, BorrowStatus::Overdue];

/// Reject a borrow the backend would refuse anyway
pub fn check_eligibility(teacher: &Teacher, journal: &Journal) -> AppResult<()> {
    if teacher.current_borrow() >= teacher.max_borrow() {
        return Err(AppError::Validation(format!(
            "{} has reached the borrow limit ({}/{})",
            teacher.name,
            teacher.current_borrow(),
            teacher.max_borrow()
        )));
    }
    if journal.available_quantity.unwrap_or(0) == 0 {
        return Err(AppError::Validation(format!(
            "{} has no copies available",
            journal.name
        )));
    }
    Ok(())
}

pub(crate) fn log_violations(records: &[BorrowRecord]) {
    for record in records {
        for violation in record.invariant_violations() {
            tracing::warn!(borrow_id = record.id, "{}", violation);
        }
    }
}

#[derive(Clone)]
pub struct BorrowService {
    gateway: Arc<dyn BorrowGateway>,
    classifier: StatusClassifier,
    current: Arc<RwLock<ListState<BorrowRecord>>>,
    current_seq: Arc<LoadSequencer>,
    history: Arc<RwLock<ListState<BorrowRecord>>>,
    history_seq: Arc<LoadSequencer>,
}

impl BorrowService {
    pub fn new(gateway: Arc<dyn BorrowGateway>, classifier: StatusClassifier, page_size: u32) -> Self {
        Self {
            gateway,
            classifier,
            current: Arc::new(RwLock::new(ListState::new(page_size))),
            current_seq: Arc::new(LoadSequencer::new()),
            history: Arc::new(RwLock::new(ListState::new(page_size))),
            history_seq: Arc::new(LoadSequencer::new()),
        }
    }

    pub fn classifier(&self) -> &StatusClassifier {
        &self.classifier
    }

    // -----------------------------------------------------------------------
    // Teacher lists
    // -----------------------------------------------------------------------

    /// Load the teacher's records still out on loan
    pub async fn load_current(&self, teacher_id: i64) -> AppResult<()> {
        let ticket = self.current_seq.issue();
        let result = self.gateway.list_for_teacher(teacher_id, &ACTIVE_STATUSES).await;

        let mut state = self.current.write().await;
        if !self.current_seq.is_current(ticket) {
            tracing::warn!(teacher_id, "Discarding stale current-borrow response");
            return Ok(());
        }
        match result {
            Ok(records) => {
                log_violations(&records);
                let records = records.into_iter().filter(|r| !r.is_returned()).collect();
                state.apply_list(records);
                Ok(())
            }
            Err(e) => {
                tracing::error!(teacher_id, error = %e, "Failed to load current borrows");
                state.fail(e.user_message());
                Err(e)
            }
        }
    }

    /// Load the teacher's full history, returned records included
    pub async fn load_history(&self, teacher_id: i64) -> AppResult<()> {
        let ticket = self.history_seq.issue();
        let result = self.gateway.list_for_teacher(teacher_id, &[]).await;

        let mut state = self.history.write().await;
        if !self.history_seq.is_current(ticket) {
            tracing::warn!(teacher_id, "Discarding stale borrow-history response");
            return Ok(());
        }
        match result {
            Ok(records) => {
                log_violations(&records);
                state.apply_list(records);
                Ok(())
            }
            Err(e) => {
                tracing::error!(teacher_id, error = %e, "Failed to load borrow history");
                state.fail(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn current_records(&self) -> Vec<BorrowRecord> {
        self.current.read().await.records().to_vec()
    }

    pub async fn render_current(&self, today: NaiveDate) -> Table {
        let state = self.current.read().await;
        render_borrows(&state, BorrowView::Current, &self.classifier, today)
    }

    pub async fn render_history(&self, today: NaiveDate) -> Table {
        let state = self.history.read().await;
        render_borrows(&state, BorrowView::History, &self.classifier, today)
    }

    /// Show another page of the loaded current list; no request is made
    pub async fn go_to_current_page(&self, page: u32) -> bool {
        self.current.write().await.show_page(page)
    }

    pub async fn go_to_history_page(&self, page: u32) -> bool {
        self.history.write().await.show_page(page)
    }

    pub async fn current_pagination(&self, max_buttons: u32) -> String {
        self.current.read().await.pager.render(max_buttons)
    }

    pub async fn history_pagination(&self, max_buttons: u32) -> String {
        self.history.read().await.pager.render(max_buttons)
    }

    // -----------------------------------------------------------------------
    // Mutations; each refetches the teacher's current list once on success
    // -----------------------------------------------------------------------

    pub async fn create(&self, request: CreateBorrowRequest) -> AppResult<()> {
        self.gateway.create(&request).await?;
        tracing::info!(
            teacher_id = request.teacher_id,
            journal_id = request.journal_id,
            borrow_days = request.borrow_days,
            "Borrow created"
        );
        self.refresh(request.teacher_id).await;
        Ok(())
    }

    /// Check quota and availability before creating
    pub async fn create_for(&self, teacher: &Teacher, journal: &Journal, borrow_days: u32) -> AppResult<()> {
        check_eligibility(teacher, journal)?;
        self.create(CreateBorrowRequest::new(teacher.id, journal.id, borrow_days)?)
            .await
    }

    pub async fn return_borrow(&self, teacher_id: i64, borrow_id: i64) -> AppResult<()> {
        if borrow_id <= 0 {
            return Err(AppError::Validation("Invalid borrow ID".to_string()));
        }
        self.gateway.return_borrow(borrow_id).await?;
        tracing::info!(teacher_id, borrow_id, "Borrow returned");
        self.refresh(teacher_id).await;
        Ok(())
    }

    pub async fn renew(&self, teacher_id: i64, borrow_id: i64, extra_days: u32) -> AppResult<()> {
        if borrow_id <= 0 {
            return Err(AppError::Validation("Invalid borrow ID".to_string()));
        }
        if extra_days == 0 {
            return Err(AppError::Validation("Renewal must extend the loan by at least one day".to_string()));
        }
        let returned = self
            .history
            .read()
            .await
            .find(borrow_id)
            .is_some_and(BorrowRecord::is_returned);
        if returned {
            return Err(AppError::Validation("A returned borrow cannot be renewed".to_string()));
        }
        self.gateway.renew(borrow_id, extra_days).await?;
        tracing::info!(teacher_id, borrow_id, extra_days, "Borrow renewed");
        self.refresh(teacher_id).await;
        Ok(())
    }

    /// Refetch after a mutation; a failed refetch shows up as the list's error row
    async fn refresh(&self, teacher_id: i64) {
        if let Err(e) = self.load_current(teacher_id).await {
            tracing::warn!(teacher_id, error = %e, "Refetch after mutation failed");
        }
    }

    // -----------------------------------------------------------------------
    // Admin listings
    // -----------------------------------------------------------------------

    pub async fn list_by_status(&self, statuses: &[BorrowStatus], limit: Option<u32>) -> AppResult<Vec<BorrowRecord>> {
        let records = self.gateway.list_by_status(statuses, limit).await?;
        log_violations(&records);
        Ok(records)
    }

    pub async fn list_for_journal(&self, journal_id: i64, statuses: &[BorrowStatus]) -> AppResult<Vec<BorrowRecord>> {
        let records = self.gateway.list_for_journal(journal_id, statuses).await?;
        log_violations(&records);
        Ok(records)
    }

    /// Admin table over one page of an already fetched list.
    ///
    /// An out-of-range `page` shows the first page.
    pub fn render_admin(&self, records: Vec<BorrowRecord>, page_size: u32, page: u32, today: NaiveDate) -> (Table, Pager) {
        let mut state = ListState::new(page_size);
        state.apply_list(records);
        state.show_page(page);
        (
            render_borrows(&state, BorrowView::Admin, &self.classifier, today),
            state.pager,
        )
    }
}
