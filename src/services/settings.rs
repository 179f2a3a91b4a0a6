//! System settings (admin) and the teacher's own profile and password

use validator::Validate;

use crate::{
    client::envelope::CODE_OK,
    error::{AppError, AppResult},
    models::settings::{PasswordChange, ProfileForm, SettingsUpdate, SystemSettings, TeacherInfo},
    repository::Repository,
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    auth: AuthService,
}

impl SettingsService {
    pub fn new(repository: Repository, auth: AuthService) -> Self {
        Self { repository, auth }
    }

    pub async fn system_settings(&self) -> AppResult<SystemSettings> {
        self.repository.settings.system_settings().await
    }

    /// Save one section and return the settings as the server now has them
    pub async fn update_system_settings(&self, update: SettingsUpdate) -> AppResult<SystemSettings> {
        let update = update.normalized();
        update.validate()?;
        self.repository.settings.update_system_settings(&update).await?;
        tracing::info!(section = update.section(), "System settings updated");
        self.system_settings().await
    }

    /// Profile of the logged-in teacher
    pub async fn teacher_info(&self) -> AppResult<TeacherInfo> {
        let teacher = self.auth.require_teacher().await?;
        self.repository.settings.teacher_info(teacher.id).await
    }

    /// Update the logged-in teacher's profile and the saved identity with it
    pub async fn update_profile(&self, form: ProfileForm) -> AppResult<TeacherInfo> {
        let teacher = self.auth.require_teacher().await?;
        let form = ProfileForm { id: teacher.id, ..form }.normalized();
        form.validate()?;

        let info = match self.repository.settings.update_profile(&form).await? {
            Some(info) if !info.name.is_empty() => info,
            _ => form.into_info(),
        };
        self.auth.remember_teacher_info(&info).await?;
        tracing::info!(teacher_id = info.id, "Profile updated");
        Ok(info)
    }

    /// Change the password; the session ends so the teacher logs in again
    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> AppResult<()> {
        let teacher = self.auth.require_teacher().await?;
        let change = PasswordChange::new(teacher.id, current, new, confirm);
        change.validate()?;

        let result = self.repository.settings.change_password(&change).await?;
        if result.success == Some(false) {
            return Err(AppError::Business {
                code: CODE_OK,
                message: result
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Password change failed".to_string()),
            });
        }
        tracing::info!(teacher_id = teacher.id, "Password changed");
        self.auth.logout().await
    }
}
