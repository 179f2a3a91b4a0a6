//! Overdue notice requests and outcomes

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Single notice request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeRequest {
    pub borrow_id: i64,
}

/// Batch notice request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchNoticeRequest {
    pub borrow_ids: Vec<i64>,
}

/// What the backend did with a single notice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeReceipt {
    #[serde(default)]
    pub send_time: Option<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub journal_name: Option<String>,
}

/// One record the backend could not notify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeFailure {
    /// Echoed back as sent, sometimes with a `BRW` prefix
    #[serde(default, deserialize_with = "super::lenient_string")]
    pub borrow_id: Option<String>,
    #[serde(default)]
    pub reason: String,
}

/// Aggregated result of a batch notice
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchNoticeOutcome {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default, alias = "successCount")]
    pub success: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default, alias = "failedCount")]
    pub failed: u32,
    #[serde(default, alias = "list")]
    pub fail_list: Vec<NoticeFailure>,
}
