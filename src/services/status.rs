//! Borrow status classification

use chrono::NaiveDate;

use crate::models::{borrow::BorrowRecord, enums::BorrowStatus};

/// Overdue records up to this many days late are styled as a warning
pub const WARNING_OVERDUE_DAYS: i64 = 7;

/// Display status derived from the due date and the server's status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Normal { days_remaining: i64 },
    DueSoon { days_remaining: i64 },
    Overdue { overdue_days: i64 },
    Returned,
    DateInvalid,
}

/// Visual emphasis for a status cell or row, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Neutral,
    Success,
    Warning,
    Critical,
}

impl DisplayStatus {
    pub fn label(&self) -> String {
        match self {
            DisplayStatus::Normal { .. } => "Normal".to_string(),
            DisplayStatus::DueSoon { days_remaining: 0 } => "Due today".to_string(),
            DisplayStatus::DueSoon { days_remaining } => format!("Due in {} days", days_remaining),
            DisplayStatus::Overdue { overdue_days } => format!("Overdue {} days", overdue_days),
            DisplayStatus::Returned => "Returned".to_string(),
            DisplayStatus::DateInvalid => "Invalid date".to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DisplayStatus::Normal { .. } => Severity::Success,
            DisplayStatus::DueSoon { .. } => Severity::Warning,
            DisplayStatus::Overdue { overdue_days } => overdue_severity(*overdue_days),
            DisplayStatus::Returned | DisplayStatus::DateInvalid => Severity::Neutral,
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DisplayStatus::Overdue { .. })
    }
}

pub fn overdue_severity(overdue_days: i64) -> Severity {
    if overdue_days <= WARNING_OVERDUE_DAYS {
        Severity::Warning
    } else {
        Severity::Critical
    }
}

/// Classifies records against a calendar day
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier {
    due_soon_days: i64,
}

impl StatusClassifier {
    pub fn new(due_soon_days: i64) -> Self {
        Self {
            due_soon_days: due_soon_days.max(0),
        }
    }

    pub fn due_soon_days(&self) -> i64 {
        self.due_soon_days
    }

    /// Whole days from `today` until `due`; negative once past due
    pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
        (due - today).num_days()
    }

    /// Classify from a due date alone
    pub fn classify_date(&self, due: Option<NaiveDate>, today: NaiveDate) -> DisplayStatus {
        let Some(due) = due else {
            return DisplayStatus::DateInvalid;
        };
        let diff = Self::days_until(due, today);
        if diff < 0 {
            DisplayStatus::Overdue { overdue_days: -diff }
        } else if diff <= self.due_soon_days {
            DisplayStatus::DueSoon {
                days_remaining: diff,
            }
        } else {
            DisplayStatus::Normal {
                days_remaining: diff,
            }
        }
    }

    /// Classify a record; the server's `returned` and `overdue` win over the local date math
    pub fn classify(&self, record: &BorrowRecord, today: NaiveDate) -> DisplayStatus {
        match record.status {
            BorrowStatus::Returned => DisplayStatus::Returned,
            BorrowStatus::Overdue => {
                let overdue_days = record
                    .due_date()
                    .map(|due| (-Self::days_until(due, today)).max(0))
                    .unwrap_or(0);
                DisplayStatus::Overdue { overdue_days }
            }
            BorrowStatus::Borrowed | BorrowStatus::Unknown => {
                self.classify_date(record.due_date(), today)
            }
        }
    }

    /// Overdue day count for an overdue-list row, never negative
    pub fn overdue_days(&self, record: &BorrowRecord, today: NaiveDate) -> i64 {
        record
            .due_date()
            .map(|due| (-Self::days_until(due, today)).max(0))
            .unwrap_or(0)
    }
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new(7)
    }
}
