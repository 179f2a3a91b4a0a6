//! Authentication gateway

use serde::de::IgnoredAny;

use crate::{
    client::ApiClient,
    error::AppResult,
    models::{
        session::{AdminLogin, AdminProfile, TeacherLogin, TeacherProfile},
        teacher::RegistrationForm,
    },
};

#[derive(Clone)]
pub struct AuthRepository {
    client: ApiClient,
}

impl AuthRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn admin_login(&self, login: &AdminLogin) -> AppResult<AdminProfile> {
        self.client.post("/auth/admin/login", login).await
    }

    pub async fn teacher_login(&self, login: &TeacherLogin) -> AppResult<TeacherProfile> {
        self.client.post("/auth/teacher/login", login).await
    }

    pub async fn register(&self, form: &RegistrationForm) -> AppResult<()> {
        self.client
            .post::<IgnoredAny, _>("/auth/teacher/register", form)
            .await?;
        Ok(())
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.client
            .post::<IgnoredAny, _>("/auth/logout", &serde_json::json!({}))
            .await?;
        Ok(())
    }
}
