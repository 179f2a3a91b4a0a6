//! Overdue list and notice batching

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::BorrowRecord,
        notice::{BatchNoticeOutcome, NoticeReceipt},
    },
    repository::BorrowGateway,
    services::{borrows::log_violations, status::StatusClassifier},
    views::{overdue_table::render_overdue, ListState, LoadSequencer, Table},
};

/// Failure reasons listed in a batch summary
const SUMMARY_REASONS: usize = 3;

/// Held while a notice request is outstanding
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> AppResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| AppError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Result of one batch notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub requested: Vec<i64>,
    pub outcome: BatchNoticeOutcome,
}

impl BatchReport {
    /// Multi-line message: counts first, then up to three failure reasons
    pub fn summary(&self) -> String {
        let outcome = &self.outcome;
        let mut msg = format!("Batch notice finished.\nSent: {}", outcome.success);
        if outcome.failed > 0 || !outcome.fail_list.is_empty() {
            msg.push_str(&format!("\nFailed: {}", outcome.failed.max(outcome.fail_list.len() as u32)));
            for failure in outcome.fail_list.iter().take(SUMMARY_REASONS) {
                msg.push_str(&format!(
                    "\n{}: {}",
                    failure.borrow_id.as_deref().unwrap_or("?"),
                    failure.reason
                ));
            }
            if outcome.fail_list.len() > SUMMARY_REASONS {
                msg.push_str(&format!("\n... {} failures in total", outcome.fail_list.len()));
            }
        }
        msg
    }
}

#[derive(Clone)]
pub struct OverdueService {
    gateway: Arc<dyn BorrowGateway>,
    classifier: StatusClassifier,
    state: Arc<RwLock<ListState<BorrowRecord>>>,
    sequencer: Arc<LoadSequencer>,
    sending: Arc<AtomicBool>,
}

impl OverdueService {
    pub fn new(gateway: Arc<dyn BorrowGateway>, classifier: StatusClassifier, page_size: u32) -> Self {
        Self {
            gateway,
            classifier,
            state: Arc::new(RwLock::new(ListState::new(page_size))),
            sequencer: Arc::new(LoadSequencer::new()),
            sending: Arc::new(AtomicBool::new(false)),
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load one page of overdue records
    pub async fn load_page(&self, page_num: u32) -> AppResult<()> {
        if page_num == 0 {
            return Err(AppError::Validation("Page numbers start at 1".to_string()));
        }
        let page_size = self.state.read().await.pager.page_size();
        let ticket = self.sequencer.issue();
        let result = self.gateway.overdue_page(page_num, page_size).await;

        let mut state = self.state.write().await;
        if !self.sequencer.is_current(ticket) {
            tracing::warn!(page_num, "Discarding stale overdue-list response");
            return Ok(());
        }
        match result {
            Ok(page) => {
                log_violations(&page.list);
                tracing::debug!(page_num, total = page.total, "Overdue page loaded");
                state.apply_page(page_num, page);
                Ok(())
            }
            Err(e) => {
                tracing::error!(page_num, error = %e, "Failed to load overdue list");
                state.fail(e.user_message());
                Err(e)
            }
        }
    }

    /// Navigate; out-of-range pages and the current page are ignored
    pub async fn go_to_page(&self, page_num: u32) -> AppResult<bool> {
        if !self.state.read().await.pager.can_go_to(page_num) {
            return Ok(false);
        }
        self.load_page(page_num).await?;
        Ok(true)
    }

    pub async fn reload(&self) -> AppResult<()> {
        let current = self.state.read().await.pager.current();
        self.load_page(current).await
    }

    pub async fn records(&self) -> Vec<BorrowRecord> {
        self.state.read().await.records().to_vec()
    }

    pub async fn render(&self, today: NaiveDate) -> Table {
        let state = self.state.read().await;
        render_overdue(&state, &self.classifier, today)
    }

    pub async fn pagination(&self, max_buttons: u32) -> String {
        self.state.read().await.pager.render(max_buttons)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub async fn toggle(&self, borrow_id: i64) -> bool {
        self.state.write().await.toggle(borrow_id)
    }

    /// Select the given ids, returning those not on the current page
    pub async fn select_ids(&self, ids: &[i64]) -> Vec<i64> {
        let mut state = self.state.write().await;
        ids.iter().copied().filter(|id| !state.select(*id)).collect()
    }

    pub async fn select_all(&self) {
        self.state.write().await.select_all();
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.clear_selection();
    }

    pub async fn selected_ids(&self) -> Vec<i64> {
        self.state.read().await.selected_ids()
    }

    // -----------------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------------

    /// Send one notice for every selected record in a single request.
    ///
    /// On success the selection is cleared and the current page reloaded.
    pub async fn send_batch(&self) -> AppResult<BatchReport> {
        let ids = self.selected_ids().await;
        if ids.is_empty() {
            return Err(AppError::Validation(
                "Please select at least one overdue record".to_string(),
            ));
        }
        let outcome = {
            let _guard = InFlight::acquire(&self.sending)?;
            tracing::info!(count = ids.len(), "Sending batch overdue notice");
            self.gateway.send_batch_notice(&ids).await?
        };

        let report = BatchReport {
            requested: ids,
            outcome,
        };
        tracing::info!(
            success = report.outcome.success,
            failed = report.outcome.failed,
            "Batch overdue notice finished"
        );
        for failure in &report.outcome.fail_list {
            tracing::warn!(borrow_id = ?failure.borrow_id, reason = %failure.reason, "Notice not delivered");
        }

        self.clear_selection().await;
        if let Err(e) = self.reload().await {
            tracing::warn!(error = %e, "Reload after batch notice failed");
        }
        Ok(report)
    }

    /// Notify a single record
    pub async fn send_notice(&self, borrow_id: i64) -> AppResult<NoticeReceipt> {
        if borrow_id <= 0 {
            return Err(AppError::Validation("Invalid borrow ID".to_string()));
        }
        let _guard = InFlight::acquire(&self.sending)?;
        let receipt = self.gateway.send_notice(borrow_id).await?;
        tracing::info!(borrow_id, channels = ?receipt.channels, "Overdue notice sent");
        Ok(receipt)
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }
}
