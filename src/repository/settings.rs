//! System settings and teacher profile gateway

use serde::de::IgnoredAny;
use serde_json::Value;

use crate::{
    client::ApiClient,
    error::AppResult,
    models::settings::{
        OperationResult, PasswordChange, ProfileForm, SettingsUpdate, SystemSettings, TeacherInfo,
    },
};

#[derive(Clone)]
pub struct SettingsRepository {
    client: ApiClient,
}

impl SettingsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn system_settings(&self) -> AppResult<SystemSettings> {
        let settings: Option<SystemSettings> = self.client.get("/settings").await?;
        Ok(settings.unwrap_or_default())
    }

    pub async fn update_system_settings(&self, update: &SettingsUpdate) -> AppResult<()> {
        self.client.put::<IgnoredAny, _>("/settings", update).await?;
        Ok(())
    }

    pub async fn teacher_info(&self, id: i64) -> AppResult<TeacherInfo> {
        self.client.get_query("/teacher/info", &[("id", id)]).await
    }

    /// Returns the stored profile when the backend echoes it
    pub async fn update_profile(&self, form: &ProfileForm) -> AppResult<Option<TeacherInfo>> {
        let echoed: Option<Value> = self.client.post("/teacher/update", form).await?;
        Ok(echoed.and_then(|v| serde_json::from_value(v).ok()))
    }

    pub async fn change_password(&self, change: &PasswordChange) -> AppResult<OperationResult> {
        let result: Option<OperationResult> = self
            .client
            .post("/teacher/change-password", change)
            .await?;
        Ok(result.unwrap_or_default())
    }
}
