//! Journals gateway

use serde::de::IgnoredAny;

use crate::{
    client::ApiClient,
    error::AppResult,
    models::{
        journal::{Journal, JournalForm, JournalQuery},
        page::Page,
    },
};

#[derive(Clone)]
pub struct JournalsRepository {
    client: ApiClient,
}

impl JournalsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search journals
    pub async fn search(&self, query: &JournalQuery) -> AppResult<Page<Journal>> {
        self.client.get_query("/journal/journals", query).await
    }

    /// Get journal by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Journal> {
        self.client.get(&format!("/journal/{}", id)).await
    }

    pub async fn create(&self, form: &JournalForm) -> AppResult<()> {
        self.client
            .post::<IgnoredAny, _>("/journal/admin/add", form)
            .await?;
        Ok(())
    }

    pub async fn update(&self, form: &JournalForm) -> AppResult<()> {
        self.client
            .put::<IgnoredAny, _>("/journal/admin/update", form)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.client
            .delete::<IgnoredAny>(&format!("/journal/admin/delete/{}", id))
            .await?;
        Ok(())
    }
}
