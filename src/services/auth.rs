//! Login, registration and session persistence

use validator::Validate;

use crate::{
    client::{ApiClient, Credentials},
    error::{AppError, AppResult},
    models::{
        session::{AdminLogin, AdminProfile, Session, TeacherLogin, TeacherProfile},
        settings::TeacherInfo,
        teacher::RegistrationForm,
    },
    repository::Repository,
    session::SessionStore,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    store: SessionStore,
}

impl AuthService {
    pub fn new(repository: Repository, store: SessionStore) -> Self {
        Self { repository, store }
    }

    fn client(&self) -> &ApiClient {
        &self.repository.client
    }

    /// Load the saved session and attach its credentials to the client
    pub async fn restore(&self) -> AppResult<Session> {
        let session = self.store.load().await?;
        self.client()
            .set_credentials(Credentials {
                bearer: session.bearer().map(str::to_string),
                cookie: session.cookie.clone(),
            })
            .await;
        if let Some(role) = session.role() {
            tracing::debug!(%role, "Session restored");
        }
        Ok(session)
    }

    pub async fn current(&self) -> AppResult<Session> {
        self.store.load().await
    }

    /// Session of the given role or a `Session` error telling the user to log in
    pub async fn require_teacher(&self) -> AppResult<TeacherProfile> {
        self.current()
            .await?
            .teacher_info
            .ok_or_else(|| AppError::Session("Please log in as a teacher first".to_string()))
    }

    pub async fn require_admin(&self) -> AppResult<AdminProfile> {
        self.current()
            .await?
            .admin_user_info
            .ok_or_else(|| AppError::Session("Please log in as an administrator first".to_string()))
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> AppResult<AdminProfile> {
        let login = AdminLogin::new(username, password);
        login.validate()?;

        self.client().clear_credentials().await;
        let profile = self.repository.auth.admin_login(&login).await?;
        let cookie = self.client().credentials().await.cookie;

        let session = Session {
            admin_token: profile.token.clone(),
            admin_user_info: Some(AdminProfile {
                token: None,
                ..profile.clone()
            }),
            cookie,
            ..Default::default()
        };
        self.persist(&session).await?;
        tracing::info!(username = %profile.username, "Administrator logged in");
        Ok(profile)
    }

    pub async fn login_teacher(&self, id: &str, name: &str, phone: &str) -> AppResult<TeacherProfile> {
        let login = TeacherLogin::new(id, name, phone);
        login.validate()?;

        self.client().clear_credentials().await;
        let profile = self.repository.auth.teacher_login(&login).await?;
        let cookie = self.client().credentials().await.cookie;

        let session = Session {
            token: profile.token.clone(),
            teacher_info: Some(TeacherProfile {
                token: None,
                ..profile.clone()
            }),
            cookie,
            ..Default::default()
        };
        self.persist(&session).await?;
        tracing::info!(teacher_id = profile.id, "Teacher logged in");
        Ok(profile)
    }

    pub async fn register(&self, form: RegistrationForm) -> AppResult<()> {
        let form = form.normalized();
        form.validate()?;
        self.repository.auth.register(&form).await?;
        tracing::info!(teacher_id = %form.id, "Teacher registered");
        Ok(())
    }

    /// End the session locally even when the backend call fails
    pub async fn logout(&self) -> AppResult<()> {
        if let Err(e) = self.repository.auth.logout().await {
            tracing::warn!(error = %e, "Backend logout failed");
        }
        self.client().clear_credentials().await;
        self.store.clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Copy an edited profile into the saved teacher identity
    pub async fn remember_teacher_info(&self, info: &TeacherInfo) -> AppResult<()> {
        let mut session = self.store.load().await?;
        let Some(profile) = session.teacher_info.as_mut() else {
            return Ok(());
        };
        profile.name = info.name.clone();
        profile.email = info.email.clone();
        profile.phone = info.phone.clone();
        profile.department = info.department.clone();
        self.store.save(&session).await
    }

    async fn persist(&self, session: &Session) -> AppResult<()> {
        self.client()
            .set_credentials(Credentials {
                bearer: session.bearer().map(str::to_string),
                cookie: session.cookie.clone(),
            })
            .await;
        self.store.save(session).await
    }
}
