//! Teacher model, admin form and self-registration form

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use validator::Validate;

use super::enums::TeacherStatus;

/// Mainland mobile number
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid phone regex"));

pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Teacher IDs chosen at registration: 6-12 letters or digits
pub static TEACHER_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6,12}$").expect("valid teacher id regex"));

/// Borrow quota applied when the form leaves it empty
pub const DEFAULT_MAX_BORROW: u32 = 5;

/// Teacher as returned by the backend
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
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
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "max_borrow")]
    pub max_borrow: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "current_borrow")]
    pub current_borrow: Option<u32>,
    #[serde(default)]
    pub status: TeacherStatus,
}

impl Teacher {
    pub fn max_borrow(&self) -> u32 {
        self.max_borrow.unwrap_or(DEFAULT_MAX_BORROW)
    }

    pub fn current_borrow(&self) -> u32 {
        self.current_borrow.unwrap_or(0)
    }

    /// How many more journals this teacher may borrow
    pub fn remaining_quota(&self) -> u32 {
        self.max_borrow().saturating_sub(self.current_borrow())
    }

    pub fn invariant_violations(&self) -> Vec<String> {
        if self.current_borrow() > self.max_borrow() {
            vec![format!(
                "teacher {} has {} borrows over a quota of {}",
                self.id,
                self.current_borrow(),
                self.max_borrow()
            )]
        } else {
            Vec::new()
        }
    }
}

/// Admin create/update teacher form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeacherForm {
    /// Present on update only
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Invalid teacher ID"))]
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Please enter a valid mobile phone number"))]
    pub phone: String,
    #[validate(range(min = 1, max = 20, message = "Max borrow must be between 1 and 20"))]
    pub max_borrow: u32,
    pub status: TeacherStatus,
}

impl TeacherForm {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.department = self.department.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self
    }

    /// Pre-fill an edit form from an existing teacher
    pub fn from_teacher(teacher: &Teacher) -> Self {
        Self {
            id: Some(teacher.id),
            name: teacher.name.clone(),
            department: teacher.department.clone().unwrap_or_default(),
            email: teacher.email.clone().unwrap_or_default(),
            phone: teacher.phone.clone().unwrap_or_default(),
            max_borrow: teacher.max_borrow(),
            status: teacher.status,
        }
    }
}

/// Teacher self-registration form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[validate(regex(path = *TEACHER_ID_REGEX, message = "Teacher ID must be 6-12 letters or digits"))]
    pub id: String,
    #[validate(length(min = 1, message = "Please enter your real name"))]
    pub name: String,
    #[validate(length(min = 1, message = "Please select a department"))]
    pub department: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Please enter a valid mobile phone number"))]
    pub phone: String,
}

impl RegistrationForm {
    pub fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.name = self.name.trim().to_string();
        self.department = self.department.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self
    }
}

/// Teacher list paging parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherListQuery {
    pub page_num: u32,
    pub page_size: u32,
}
