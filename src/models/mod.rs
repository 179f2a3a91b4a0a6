//! Data models for the journal portal

pub mod borrow;
pub mod date;
pub mod enums;
pub mod journal;
pub mod notice;
pub mod page;
pub mod session;
pub mod settings;
pub mod stats;
pub mod teacher;

// Re-export commonly used types
pub use borrow::{BorrowRecord, CreateBorrowRequest};
pub use date::DateField;
pub use enums::{BorrowStatus, JournalStatus, Role, TeacherStatus};
pub use journal::{Journal, JournalForm, JournalQuery};
pub use notice::{BatchNoticeOutcome, NoticeFailure, NoticeReceipt};
pub use page::Page;
pub use session::Session;
pub use settings::{SettingsUpdate, SystemSettings, TeacherInfo};
pub use teacher::{Teacher, TeacherForm};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string, a number or null for a free-text field.
///
/// The backend sends issue numbers and some identifiers sometimes as text and
/// sometimes as numbers.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
