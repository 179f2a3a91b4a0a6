//! Statistics and report download gateway

use crate::{
    client::ApiClient,
    error::AppResult,
    models::stats::{AdminSummary, DepartmentCount, TeacherBorrowStats},
};

/// Server-generated spreadsheet reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Overdue,
    Borrow,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Overdue => "overdue",
            ReportKind::Borrow => "borrow",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overdue" => Ok(ReportKind::Overdue),
            "borrow" => Ok(ReportKind::Borrow),
            _ => Err(format!("Invalid report kind: {}", s)),
        }
    }
}

#[derive(Clone)]
pub struct StatsRepository {
    client: ApiClient,
}

impl StatsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn admin_summary(&self) -> AppResult<AdminSummary> {
        self.client.get("/admin/statistics/summary").await
    }

    pub async fn department_teachers(&self) -> AppResult<Vec<DepartmentCount>> {
        self.client.get("/admin/statistics/department-teachers").await
    }

    pub async fn teacher_stats(&self, teacher_id: i64) -> AppResult<TeacherBorrowStats> {
        self.client
            .get_query("/teacher/borrow/statistics", &[("teacherId", teacher_id)])
            .await
    }

    /// Raw xlsx bytes
    pub async fn download_report(&self, kind: ReportKind) -> AppResult<Vec<u8>> {
        self.client
            .download(&format!("/report/export/{}", kind.as_str()))
            .await
    }
}
