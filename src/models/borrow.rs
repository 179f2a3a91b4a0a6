//! Borrow record model and related requests

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use super::date::{self, DateField};
use super::enums::BorrowStatus;
use crate::error::{AppError, AppResult};

/// One lending transaction linking a teacher and a journal issue.
///
/// Joined display fields (`teacher_name`, `journal_name`, ...) are only present
/// on the listing endpoints that perform the join server-side.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(alias = "borrowId", alias = "borrow_id")]
    pub id: i64,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "borrowerId", alias = "teacher_id")]
    pub teacher_id: Option<i64>,
    #[serde(default, alias = "borrowerName", alias = "teacher_name", alias = "name")]
    pub teacher_name: Option<String>,
    #[serde(default, alias = "borrowerDepartment")]
    pub department: Option<String>,
    #[serde(default, alias = "borrowerPhone")]
    pub phone: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "journal_id")]
    pub journal_id: Option<i64>,
    #[serde(default, alias = "journal_name", alias = "journal")]
    pub journal_name: Option<String>,
    #[serde(
        default,
        alias = "start_date",
        alias = "borrowDate",
        alias = "borrow_date",
        deserialize_with = "date::deserialize_opt"
    )]
    pub start_date: Option<DateField>,
    #[serde(
        default,
        alias = "end_date",
        alias = "dueDate",
        alias = "due_date",
        deserialize_with = "date::deserialize_opt"
    )]
    pub end_date: Option<DateField>,
    #[serde(default, alias = "return_date", deserialize_with = "date::deserialize_opt")]
    pub return_date: Option<DateField>,
    #[serde(default)]
    pub status: BorrowStatus,
}

impl BorrowRecord {
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.end_date.as_ref().and_then(DateField::date)
    }

    pub fn is_returned(&self) -> bool {
        self.status == BorrowStatus::Returned
    }

    /// Data-model invariants this record breaks, if any.
    ///
    /// Records from the backend are displayed regardless; violations are only logged.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        match (self.is_returned(), self.return_date.is_some()) {
            (true, false) => violations.push(format!("borrow {} is returned without a return date", self.id)),
            (false, true) => violations.push(format!(
                "borrow {} has a return date but status {}",
                self.id, self.status
            )),
            _ => {}
        }
        let start = self.start_date.as_ref().and_then(DateField::date);
        if let (Some(start), Some(end)) = (start, self.due_date()) {
            if end <= start {
                violations.push(format!("borrow {} is due on or before its start date", self.id));
            }
        }
        violations
    }
}

/// Create borrow request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowRequest {
    pub teacher_id: i64,
    pub journal_id: i64,
    pub borrow_days: u32,
}

impl CreateBorrowRequest {
    pub fn new(teacher_id: i64, journal_id: i64, borrow_days: u32) -> AppResult<Self> {
        if teacher_id <= 0 {
            return Err(AppError::Validation("Teacher ID must be a positive number".to_string()));
        }
        if journal_id <= 0 {
            return Err(AppError::Validation("Journal ID must be a positive number".to_string()));
        }
        if borrow_days == 0 {
            return Err(AppError::Validation("Borrow period must be at least one day".to_string()));
        }
        Ok(Self {
            teacher_id,
            journal_id,
            borrow_days,
        })
    }

    /// Derive the borrow period from a start/due date pair picked on the form
    pub fn from_dates(
        teacher_id: i64,
        journal_id: i64,
        start: NaiveDate,
        due: NaiveDate,
    ) -> AppResult<Self> {
        if due <= start {
            return Err(AppError::Validation(
                "Due date must be later than the borrow date".to_string(),
            ));
        }
        let days = (due - start).num_days();
        let days = u32::try_from(days)
            .map_err(|_| AppError::Validation("Borrow period is too long".to_string()))?;
        Self::new(teacher_id, journal_id, days)
    }
}

/// Return request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnBorrowRequest {
    pub borrow_id: i64,
}

/// Renew request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewBorrowRequest {
    pub borrow_id: i64,
    pub extra_days: u32,
}

/// Filter for the per-teacher and per-journal borrow listings
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<i64>,
    /// Comma-separated statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
