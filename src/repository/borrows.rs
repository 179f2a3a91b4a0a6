//! Borrow records gateway

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::Serialize;

use crate::{
    client::ApiClient,
    error::AppResult,
    models::{
        borrow::{BorrowListQuery, BorrowRecord, CreateBorrowRequest, RenewBorrowRequest, ReturnBorrowRequest},
        enums::{status_filter, BorrowStatus},
        notice::{BatchNoticeOutcome, BatchNoticeRequest, NoticeReceipt, NoticeRequest},
        page::Page,
    },
};

/// Borrow and overdue endpoints used by the lending workflows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowGateway: Send + Sync {
    async fn create(&self, request: &CreateBorrowRequest) -> AppResult<()>;

    async fn return_borrow(&self, borrow_id: i64) -> AppResult<()>;

    async fn renew(&self, borrow_id: i64, extra_days: u32) -> AppResult<()>;

    /// Records of one teacher, restricted to `statuses` when not empty
    async fn list_for_teacher(
        &self,
        teacher_id: i64,
        statuses: &[BorrowStatus],
    ) -> AppResult<Vec<BorrowRecord>>;

    async fn list_by_status(
        &self,
        statuses: &[BorrowStatus],
        limit: Option<u32>,
    ) -> AppResult<Vec<BorrowRecord>>;

    async fn list_for_journal(
        &self,
        journal_id: i64,
        statuses: &[BorrowStatus],
    ) -> AppResult<Vec<BorrowRecord>>;

    async fn overdue_page(&self, page_num: u32, page_size: u32) -> AppResult<Page<BorrowRecord>>;

    async fn send_notice(&self, borrow_id: i64) -> AppResult<NoticeReceipt>;

    async fn send_batch_notice(&self, borrow_ids: &[i64]) -> AppResult<BatchNoticeOutcome>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverdueListQuery {
    page_num: u32,
    page_size: u32,
}

fn optional_filter(statuses: &[BorrowStatus]) -> Option<String> {
    if statuses.is_empty() {
        None
    } else {
        Some(status_filter(statuses))
    }
}

#[derive(Clone)]
pub struct BorrowsRepository {
    client: ApiClient,
}

impl BorrowsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BorrowGateway for BorrowsRepository {
    async fn create(&self, request: &CreateBorrowRequest) -> AppResult<()> {
        self.client
            .post::<IgnoredAny, _>("/borrow/teacher/create", request)
            .await?;
        Ok(())
    }

    async fn return_borrow(&self, borrow_id: i64) -> AppResult<()> {
        self.client
            .put::<IgnoredAny, _>("/borrow/teacher/return", &ReturnBorrowRequest { borrow_id })
            .await?;
        Ok(())
    }

    async fn renew(&self, borrow_id: i64, extra_days: u32) -> AppResult<()> {
        self.client
            .put::<IgnoredAny, _>(
                "/borrow/teacher/renew",
                &RenewBorrowRequest {
                    borrow_id,
                    extra_days,
                },
            )
            .await?;
        Ok(())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: i64,
        statuses: &[BorrowStatus],
    ) -> AppResult<Vec<BorrowRecord>> {
        let query = BorrowListQuery {
            teacher_id: Some(teacher_id),
            status: optional_filter(statuses),
            limit: None,
        };
        let page: Page<BorrowRecord> = self.client.get_query("/borrow/teacher/list", &query).await?;
        Ok(page.list)
    }

    async fn list_by_status(
        &self,
        statuses: &[BorrowStatus],
        limit: Option<u32>,
    ) -> AppResult<Vec<BorrowRecord>> {
        let query = BorrowListQuery {
            teacher_id: None,
            status: optional_filter(statuses),
            limit,
        };
        let page: Page<BorrowRecord> = self.client.get_query("/borrow/admin/list", &query).await?;
        Ok(page.list)
    }

    async fn list_for_journal(
        &self,
        journal_id: i64,
        statuses: &[BorrowStatus],
    ) -> AppResult<Vec<BorrowRecord>> {
        let query = BorrowListQuery {
            status: optional_filter(statuses),
            ..Default::default()
        };
        let page: Page<BorrowRecord> = self
            .client
            .get_query(&format!("/borrow/admin/journal/{}", journal_id), &query)
            .await?;
        Ok(page.list)
    }

    async fn overdue_page(&self, page_num: u32, page_size: u32) -> AppResult<Page<BorrowRecord>> {
        self.client
            .get_query(
                "/borrow/admin/overdue/list",
                &OverdueListQuery { page_num, page_size },
            )
            .await
    }

    async fn send_notice(&self, borrow_id: i64) -> AppResult<NoticeReceipt> {
        let receipt: Option<NoticeReceipt> = self
            .client
            .post("/borrow/admin/overdue/notice", &NoticeRequest { borrow_id })
            .await?;
        Ok(receipt.unwrap_or_default())
    }

    async fn send_batch_notice(&self, borrow_ids: &[i64]) -> AppResult<BatchNoticeOutcome> {
        let body = BatchNoticeRequest {
            borrow_ids: borrow_ids.to_vec(),
        };
        let outcome: Option<BatchNoticeOutcome> = self
            .client
            .post("/borrow/admin/overdue/batch-notice", &body)
            .await?;
        Ok(outcome.unwrap_or_default())
    }
}
