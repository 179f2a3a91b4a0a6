//! Login requests, profiles and the persisted session

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use validator::Validate;

use super::enums::Role;
use super::teacher::PHONE_REGEX;

/// Admin login form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct AdminLogin {
    #[validate(length(min = 1, message = "Please enter the username"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl AdminLogin {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.trim().to_string(),
        }
    }
}

/// Teacher login form
#[derive(Debug, Clone, Serialize, Validate)]
pub struct TeacherLogin {
    #[validate(length(min = 1, message = "Please enter your teacher ID"))]
    pub id: String,
    #[validate(length(min = 1, message = "Please enter your name"))]
    pub name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Please enter a valid mobile phone number"))]
    pub phone: String,
}

impl TeacherLogin {
    pub fn new(id: &str, name: &str, phone: &str) -> Self {
        Self {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
            phone: phone.trim().to_string(),
        }
    }
}

/// Admin identity returned by the login endpoint
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "adminId", alias = "admin_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Teacher identity returned by the login endpoint
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(alias = "teacherId", alias = "teacher_id")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Client state persisted between runs.
///
/// Key names match what the web portal kept in local storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    #[serde(default, rename = "teacherInfo", skip_serializing_if = "Option::is_none")]
    pub teacher_info: Option<TeacherProfile>,
    #[serde(default, rename = "adminUserInfo", skip_serializing_if = "Option::is_none")]
    pub admin_user_info: Option<AdminProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        if self.admin_user_info.is_some() {
            Some(Role::Admin)
        } else if self.teacher_info.is_some() {
            Some(Role::Teacher)
        } else {
            None
        }
    }

    /// Bearer token for the active role
    pub fn bearer(&self) -> Option<&str> {
        match self.role() {
            Some(Role::Admin) => self.admin_token.as_deref().or(self.token.as_deref()),
            _ => self.token.as_deref(),
        }
    }

    pub fn teacher_id(&self) -> Option<i64> {
        self.teacher_info.as_ref().map(|t| t.id)
    }

    pub fn is_logged_in(&self) -> bool {
        self.role().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_keys() {
        let session = Session {
            admin_token: Some("abc".into()),
            admin_user_info: Some(AdminProfile {
                id: Some(1),
                username: "root".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["admin_token"], json!("abc"));
        assert_eq!(value["adminUserInfo"]["username"], json!("root"));
        assert!(value.get("teacherInfo").is_none());
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.bearer(), Some("abc"));
    }

    #[test]
    fn test_teacher_session() {
        let session: Session = serde_json::from_value(json!({
            "token": "t-1",
            "teacherInfo": {"id": "1001", "name": "Zhang"}
        }))
        .unwrap();
        assert_eq!(session.role(), Some(Role::Teacher));
        assert_eq!(session.teacher_id(), Some(1001));
        assert_eq!(session.bearer(), Some("t-1"));
    }

    #[test]
    fn test_login_validation() {
        assert!(AdminLogin::new("admin", "123").validate().is_err());
        assert!(AdminLogin::new(" admin ", "secret1").validate().is_ok());
        assert!(TeacherLogin::new("1001", "Zhang", "13800000000").validate().is_ok());
        assert!(TeacherLogin::new("", "Zhang", "13800000000").validate().is_err());
    }
}
