//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BorrowStatus
// ---------------------------------------------------------------------------

/// Borrow record status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    #[serde(alias = "BORROWED", alias = "NORMAL", alias = "normal")]
    Borrowed,
    #[serde(alias = "OVERDUE")]
    Overdue,
    #[serde(alias = "RETURNED")]
    Returned,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Overdue => "overdue",
            BorrowStatus::Returned => "returned",
            BorrowStatus::Unknown => "unknown",
        }
    }

    /// Still out on loan
    pub fn is_active(&self) -> bool {
        !matches!(self, BorrowStatus::Returned)
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "borrowed" | "normal" => Ok(BorrowStatus::Borrowed),
            "overdue" => Ok(BorrowStatus::Overdue),
            "returned" => Ok(BorrowStatus::Returned),
            _ => Err(format!("Invalid borrow status: {}", s)),
        }
    }
}

/// Comma-separated status filter, e.g. `borrowed,overdue`
pub fn status_filter(statuses: &[BorrowStatus]) -> String {
    statuses
        .iter()
        .map(BorrowStatus::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// TeacherStatus
// ---------------------------------------------------------------------------

/// Teacher account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeacherStatus {
    #[default]
    #[serde(alias = "ACTIVE")]
    Active,
    #[serde(alias = "INACTIVE")]
    Inactive,
    #[serde(other)]
    Unknown,
}

impl TeacherStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeacherStatus::Active => "active",
            TeacherStatus::Inactive => "inactive",
            TeacherStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TeacherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TeacherStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TeacherStatus::Active),
            "inactive" => Ok(TeacherStatus::Inactive),
            _ => Err(format!("Invalid teacher status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// JournalStatus
// ---------------------------------------------------------------------------

/// Journal availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    #[default]
    #[serde(alias = "AVAILABLE")]
    Available,
    #[serde(alias = "UNAVAILABLE")]
    Unavailable,
    #[serde(other)]
    Unknown,
}

impl JournalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalStatus::Available => "available",
            JournalStatus::Unavailable => "unavailable",
            JournalStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for JournalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(JournalStatus::Available),
            "unavailable" => Ok(JournalStatus::Unavailable),
            _ => Err(format!("Invalid journal status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Who is logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Teacher => write!(f, "teacher"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrow_status_wire_values() {
        let s: BorrowStatus = serde_json::from_str(r#""overdue""#).unwrap();
        assert_eq!(s, BorrowStatus::Overdue);
        let s: BorrowStatus = serde_json::from_str(r#""NORMAL""#).unwrap();
        assert_eq!(s, BorrowStatus::Borrowed);
        let s: BorrowStatus = serde_json::from_str(r#""lost""#).unwrap();
        assert_eq!(s, BorrowStatus::Unknown);
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(
            status_filter(&[BorrowStatus::Borrowed, BorrowStatus::Overdue]),
            "borrowed,overdue"
        );
    }
}
