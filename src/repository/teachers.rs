//! Teachers gateway

use serde::de::IgnoredAny;

use crate::{
    client::ApiClient,
    error::AppResult,
    models::{
        page::Page,
        teacher::{Teacher, TeacherForm, TeacherListQuery},
    },
};

#[derive(Clone)]
pub struct TeachersRepository {
    client: ApiClient,
}

impl TeachersRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List teachers with pagination
    pub async fn list(&self, page_num: u32, page_size: u32) -> AppResult<Page<Teacher>> {
        self.client
            .get_query("/teacher/admin/list", &TeacherListQuery { page_num, page_size })
            .await
    }

    /// Get teacher by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Teacher> {
        self.client.get(&format!("/teacher/admin/{}", id)).await
    }

    /// Find teachers by phone number
    pub async fn search_by_phone(&self, phone: &str) -> AppResult<Vec<Teacher>> {
        let found: Page<Teacher> = self
            .client
            .get_query("/teacher/admin/search", &[("phone", phone)])
            .await?;
        Ok(found.list)
    }

    pub async fn create(&self, form: &TeacherForm) -> AppResult<()> {
        self.client
            .post::<IgnoredAny, _>("/teacher/admin/add", form)
            .await?;
        Ok(())
    }

    pub async fn update(&self, form: &TeacherForm) -> AppResult<()> {
        self.client
            .put::<IgnoredAny, _>("/teacher/admin/update", form)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client
            .delete::<IgnoredAny>(&format!("/teacher/admin/delete/{}", id))
            .await?;
        Ok(())
    }
}
