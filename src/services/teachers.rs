//! Teacher administration service

use std::sync::Arc;

use tokio::sync::RwLock;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::teacher::{Teacher, TeacherForm, PHONE_REGEX},
    repository::Repository,
    views::{catalog_table::render_teachers, ListState, LoadSequencer, Table},
};

#[derive(Clone)]
pub struct TeachersService {
    repository: Repository,
    state: Arc<RwLock<ListState<Teacher>>>,
    sequencer: Arc<LoadSequencer>,
}

impl TeachersService {
    pub fn new(repository: Repository, page_size: u32) -> Self {
        Self {
            repository,
            state: Arc::new(RwLock::new(ListState::new(page_size))),
            sequencer: Arc::new(LoadSequencer::new()),
        }
    }

    /// Load one page of teachers into the list state
    pub async fn list(&self, page_num: u32) -> AppResult<Vec<Teacher>> {
        let page_num = page_num.max(1);
        let page_size = self.state.read().await.pager.page_size();
        let ticket = self.sequencer.issue();
        let result = self.repository.teachers.list(page_num, page_size).await;

        let mut state = self.state.write().await;
        if !self.sequencer.is_current(ticket) {
            tracing::warn!(page_num, "Discarding stale teacher list response");
            return Ok(state.records().to_vec());
        }
        match result {
            Ok(page) => {
                for teacher in &page.list {
                    for violation in teacher.invariant_violations() {
                        tracing::warn!(teacher_id = teacher.id, "{}", violation);
                    }
                }
                state.apply_page(page_num, page);
                Ok(state.records().to_vec())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load teachers");
                state.fail(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn render(&self) -> Table {
        render_teachers(&*self.state.read().await)
    }

    pub async fn pagination(&self, max_buttons: u32) -> String {
        self.state.read().await.pager.render(max_buttons)
    }

    pub async fn get_teacher(&self, id: i64) -> AppResult<Teacher> {
        if id <= 0 {
            return Err(AppError::Validation("Invalid teacher ID".to_string()));
        }
        self.repository.teachers.get_by_id(id).await
    }

    /// Search by mobile number
    pub async fn search_by_phone(&self, phone: &str) -> AppResult<Vec<Teacher>> {
        let phone = phone.trim();
        if !PHONE_REGEX.is_match(phone) {
            return Err(AppError::Validation("Please enter a valid mobile phone number".to_string()));
        }
        self.repository.teachers.search_by_phone(phone).await
    }

    pub async fn create_teacher(&self, form: TeacherForm) -> AppResult<()> {
        let form = TeacherForm { id: None, ..form }.normalized();
        form.validate()?;
        self.repository.teachers.create(&form).await?;
        tracing::info!(name = %form.name, department = %form.department, "Teacher created");
        Ok(())
    }

    pub async fn update_teacher(&self, form: TeacherForm) -> AppResult<()> {
        let form = form.normalized();
        if form.id.is_none() {
            return Err(AppError::Validation("Teacher ID is required for an update".to_string()));
        }
        form.validate()?;
        self.repository.teachers.update(&form).await?;
        tracing::info!(teacher_id = ?form.id, "Teacher updated");
        Ok(())
    }

    pub async fn delete_teacher(&self, id: i64) -> AppResult<()> {
        if id <= 0 {
            return Err(AppError::Validation("Invalid teacher ID".to_string()));
        }
        self.repository.teachers.delete(id).await?;
        tracing::info!(teacher_id = id, "Teacher deleted");
        Ok(())
    }

    /// Every teacher across all pages, for export
    pub async fn list_all(&self) -> AppResult<Vec<Teacher>> {
        const EXPORT_PAGE_SIZE: u32 = 100;
        let mut teachers = Vec::new();
        let mut page_num = 1;
        loop {
            let page = self.repository.teachers.list(page_num, EXPORT_PAGE_SIZE).await?;
            let pages = page.total_pages(EXPORT_PAGE_SIZE);
            let fetched = page.list.len();
            teachers.extend(page.list);
            if fetched == 0 || page_num >= pages {
                break;
            }
            page_num += 1;
        }
        Ok(teachers)
    }
}
