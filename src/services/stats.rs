//! Dashboard statistics service

use crate::{
    error::{AppError, AppResult},
    models::stats::{AdminSummary, DepartmentCount, TeacherBorrowStats},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Journal, teacher and overdue totals for the admin dashboard
    pub async fn admin_summary(&self) -> AppResult<AdminSummary> {
        self.repository.stats.admin_summary().await
    }

    /// Teachers per department, largest first
    pub async fn department_teachers(&self) -> AppResult<Vec<DepartmentCount>> {
        let mut rows = self.repository.stats.department_teachers().await?;
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    /// Counters shown on the teacher dashboard
    pub async fn teacher_stats(&self, teacher_id: i64) -> AppResult<TeacherBorrowStats> {
        if teacher_id <= 0 {
            return Err(AppError::Validation("Invalid teacher ID".to_string()));
        }
        self.repository.stats.teacher_stats(teacher_id).await
    }
}
