//! System settings and teacher self-service forms

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use validator::{Validate, ValidationError, ValidationErrors};

use super::teacher::{EMAIL_REGEX, PHONE_REGEX};

/// `HH:MM`, 24-hour clock
pub static NOTICE_TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid notice time regex"));

// ---------------------------------------------------------------------------
// System settings (admin)
// ---------------------------------------------------------------------------

/// System-wide settings; fields the server omits keep their defaults
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub system_name: String,
    pub system_version: String,
    pub contact_email: String,
    pub contact_phone: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub borrow_duration: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub max_borrow_count: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub overdue_fine: f64,
    pub enable_overdue_notice: bool,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub notice_before_days: u32,
    pub notice_time: String,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            system_name: "College Journal Management System".to_string(),
            system_version: "1.0.0".to_string(),
            contact_email: "admin@example.com".to_string(),
            contact_phone: "010-12345678".to_string(),
            borrow_duration: 30,
            max_borrow_count: 5,
            overdue_fine: 0.5,
            enable_overdue_notice: true,
            notice_before_days: 3,
            notice_time: "09:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BasicSettings {
    #[validate(length(min = 1, message = "Please enter the system name"))]
    pub system_name: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    pub contact_email: String,
    #[validate(length(min = 1, message = "Please enter the contact phone"))]
    pub contact_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BorrowSettings {
    #[validate(range(min = 1, max = 365, message = "Borrow duration must be between 1 and 365 days"))]
    pub borrow_duration: u32,
    #[validate(range(min = 1, max = 20, message = "Max borrow count must be between 1 and 20"))]
    pub max_borrow_count: u32,
    #[validate(range(min = 0.0, max = 100.0, message = "Overdue fine must be between 0 and 100"))]
    pub overdue_fine: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enable_overdue_notice: bool,
    #[validate(range(max = 30, message = "Notice lead time must be at most 30 days"))]
    pub notice_before_days: u32,
    #[validate(regex(path = *NOTICE_TIME_REGEX, message = "Notice time must be HH:MM"))]
    pub notice_time: String,
}

/// One section of the settings page; each is saved on its own
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingsUpdate {
    Basic(BasicSettings),
    Borrow(BorrowSettings),
    Notification(NotificationSettings),
}

impl SettingsUpdate {
    pub fn section(&self) -> &'static str {
        match self {
            SettingsUpdate::Basic(_) => "basic",
            SettingsUpdate::Borrow(_) => "borrow",
            SettingsUpdate::Notification(_) => "notification",
        }
    }

    pub fn normalized(self) -> Self {
        match self {
            SettingsUpdate::Basic(basic) => SettingsUpdate::Basic(BasicSettings {
                system_name: basic.system_name.trim().to_string(),
                contact_email: basic.contact_email.trim().to_string(),
                contact_phone: basic.contact_phone.trim().to_string(),
            }),
            SettingsUpdate::Notification(notice) => SettingsUpdate::Notification(NotificationSettings {
                notice_time: notice.notice_time.trim().to_string(),
                ..notice
            }),
            other => other,
        }
    }
}

impl Validate for SettingsUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            SettingsUpdate::Basic(s) => s.validate(),
            SettingsUpdate::Borrow(s) => s.validate(),
            SettingsUpdate::Notification(s) => s.validate(),
        }
    }
}

// ---------------------------------------------------------------------------
// Teacher profile
// ---------------------------------------------------------------------------

/// Personal information as shown on the teacher settings page
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInfo {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(alias = "teacherId")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Teacher's own profile update
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub id: i64,
    #[validate(length(min = 1, message = "Please enter your name"))]
    pub name: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Please enter a valid mobile phone number"))]
    pub phone: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ProfileForm {
    pub fn from_info(info: &TeacherInfo) -> Self {
        Self {
            id: info.id,
            name: info.name.clone(),
            email: info.email.clone().unwrap_or_default(),
            phone: info.phone.clone(),
            department: info.department.clone(),
            title: info.title.clone(),
        }
    }

    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = trimmed(self.phone);
        self.department = trimmed(self.department);
        self.title = trimmed(self.title);
        self
    }

    /// What the profile looks like once the server accepted this form
    pub fn into_info(self) -> TeacherInfo {
        TeacherInfo {
            id: self.id,
            name: self.name,
            email: Some(self.email),
            phone: self.phone,
            department: self.department,
            title: self.title,
        }
    }
}

/// Password change; the confirmation never leaves the client
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_confirmation", skip_on_field_errors = false))]
pub struct PasswordChange {
    pub id: i64,
    #[validate(length(min = 1, message = "Please enter the current password"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

fn validate_confirmation(form: &PasswordChange) -> Result<(), ValidationError> {
    if form.new_password != form.confirm_password {
        let mut err = ValidationError::new("password_mismatch");
        err.message = Some("The two passwords do not match".into());
        return Err(err);
    }
    Ok(())
}

impl PasswordChange {
    pub fn new(id: i64, current: &str, new: &str, confirm: &str) -> Self {
        Self {
            id,
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }
}

/// `{success, message}` result of the password endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OperationResult {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: SystemSettings = serde_json::from_value(json!({
            "systemName": "Library",
            "borrowDuration": "45",
            "overdueFine": 1.5
        }))
        .unwrap();
        assert_eq!(settings.system_name, "Library");
        assert_eq!(settings.borrow_duration, 45);
        assert_eq!(settings.overdue_fine, 1.5);
        assert_eq!(settings.max_borrow_count, 5);
        assert_eq!(settings.notice_time, "09:00");
        assert!(settings.enable_overdue_notice);
    }

    #[test]
    fn test_borrow_section_body() {
        let update = SettingsUpdate::Borrow(BorrowSettings {
            borrow_duration: 60,
            max_borrow_count: 8,
            overdue_fine: 0.2,
        });
        assert_eq!(update.section(), "borrow");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"borrowDuration": 60, "maxBorrowCount": 8, "overdueFine": 0.2})
        );
    }

    #[test]
    fn test_section_rules() {
        let borrow = SettingsUpdate::Borrow(BorrowSettings {
            borrow_duration: 0,
            max_borrow_count: 21,
            overdue_fine: 0.5,
        });
        let errors = borrow.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("borrow_duration"));
        assert!(fields.contains_key("max_borrow_count"));

        let notice = SettingsUpdate::Notification(NotificationSettings {
            enable_overdue_notice: true,
            notice_before_days: 3,
            notice_time: " 24:00 ".to_string(),
        })
        .normalized();
        assert!(notice.validate().is_err());

        let basic = SettingsUpdate::Basic(BasicSettings {
            system_name: " Library ".to_string(),
            contact_email: "office@school.edu".to_string(),
            contact_phone: "010-1234".to_string(),
        })
        .normalized();
        assert!(basic.validate().is_ok());
    }

    #[test]
    fn test_profile_form_drops_blank_optionals() {
        let form = ProfileForm {
            id: 3,
            name: " Li Lei ".to_string(),
            email: "li@school.edu".to_string(),
            phone: Some("  ".to_string()),
            department: Some("Physics".to_string()),
            title: None,
        }
        .normalized();
        assert!(form.validate().is_ok());
        assert_eq!(form.name, "Li Lei");
        assert!(form.phone.is_none());

        let bad = ProfileForm {
            phone: Some("12345".to_string()),
            ..form
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_password_confirmation() {
        let change = PasswordChange::new(3, "old-secret", "new-secret", "new-secrex");
        let errors = change.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));

        let short = PasswordChange::new(3, "old-secret", "12345", "12345");
        assert!(short.validate().is_err());

        let good = PasswordChange::new(3, "old-secret", "new-secret", "new-secret");
        assert!(good.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&good).unwrap(),
            json!({"id": 3, "currentPassword": "old-secret", "newPassword": "new-secret"})
        );
    }
}
