//! Dashboard statistics

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Admin dashboard counters
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default, alias = "total_journals")]
    pub total_journals: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default, alias = "total_teachers")]
    pub total_teachers: u64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default, alias = "overdue_items", alias = "overdueCount")]
    pub overdue_items: u64,
}

/// Teachers per department
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentCount {
    #[serde(alias = "department")]
    pub name: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default, alias = "value")]
    pub count: u64,
}

/// Teacher dashboard counters; the backend sends every value as a string
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherBorrowStats {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub current_borrow_count: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub overdue_count: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub upcoming_expire_count: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub renewable_count: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub max_borrow_count: u32,
}

impl TeacherBorrowStats {
    pub fn remaining_quota(&self) -> u32 {
        self.max_borrow_count.saturating_sub(self.current_borrow_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_teacher_stats_from_strings() {
        let stats: TeacherBorrowStats = serde_json::from_value(json!({
            "currentBorrowCount": "2",
            "overdueCount": "1",
            "upcomingExpireCount": "0",
            "renewableCount": "1",
            "maxBorrowCount": "5"
        }))
        .unwrap();
        assert_eq!(stats.current_borrow_count, 2);
        assert_eq!(stats.remaining_quota(), 3);
    }

    #[test]
    fn test_admin_summary_partial() {
        let summary: AdminSummary =
            serde_json::from_value(json!({"totalJournals": 120, "overdueItems": "4"})).unwrap();
        assert_eq!(summary.total_journals, 120);
        assert_eq!(summary.total_teachers, 0);
        assert_eq!(summary.overdue_items, 4);
    }

    #[test]
    fn test_department_count() {
        let rows: Vec<DepartmentCount> =
            serde_json::from_value(json!([{"name": "Physics", "count": 12}, {"department": "Math", "count": "3"}]))
                .unwrap();
        assert_eq!(rows[1].name, "Math");
        assert_eq!(rows[1].count, 3);
    }
}
