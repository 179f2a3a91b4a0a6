//! Journal (periodical) model, form and search query

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use validator::{Validate, ValidationError};

use super::date::{self, DateField};
use super::enums::JournalStatus;

/// Journal as returned by the backend
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(alias = "journalId")]
    pub id: i64,
    #[serde(default, alias = "journalName")]
    pub name: String,
    #[serde(default, alias = "ssbn")]
    pub issn: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default, alias = "publish_date", deserialize_with = "date::deserialize_opt")]
    pub publish_date: Option<DateField>,
    #[serde(default, alias = "issue_number", deserialize_with = "super::lenient_string")]
    pub issue_number: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "total_quantity")]
    pub total_quantity: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(alias = "available_quantity")]
    pub available_quantity: Option<u32>,
    #[serde(default)]
    pub status: JournalStatus,
    #[serde(default)]
    pub description: Option<String>,
}

impl Journal {
    /// At least one copy can be lent right now
    pub fn is_borrowable(&self) -> bool {
        self.available_quantity.unwrap_or(0) > 0 && self.status != JournalStatus::Unavailable
    }

    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if let (Some(total), Some(available)) = (self.total_quantity, self.available_quantity) {
            if available > total {
                violations.push(format!(
                    "journal {} has {} available copies out of {}",
                    self.id, available, total
                ));
            }
        }
        if self.available_quantity == Some(0) && self.status == JournalStatus::Available {
            violations.push(format!("journal {} has no copies but is marked available", self.id));
        }
        violations
    }
}

/// Create/update journal form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_quantities", skip_on_field_errors = false))]
pub struct JournalForm {
    /// Present on update only
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Journal ID must be a number greater than 0"))]
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "Journal name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "ISSN is required"))]
    pub issn: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Publisher is required"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "Publish date is required"))]
    pub publish_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<String>,
    pub total_quantity: u32,
    pub available_quantity: u32,
    pub status: JournalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn validate_quantities(form: &JournalForm) -> Result<(), ValidationError> {
    if form.available_quantity > form.total_quantity {
        let mut err = ValidationError::new("available_exceeds_total");
        err.message = Some("Available quantity cannot exceed total quantity".into());
        return Err(err);
    }
    Ok(())
}

impl JournalForm {
    /// Trim text fields and derive the status from the copy count
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.issn = self.issn.trim().to_string();
        self.category = self.category.trim().to_string();
        self.publisher = self.publisher.trim().to_string();
        self.publish_date = self.publish_date.trim().to_string();
        self.issue_number = self
            .issue_number
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.description = self
            .description
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if self.available_quantity == 0 {
            self.status = JournalStatus::Unavailable;
        }
        self
    }

    /// Pre-fill an edit form from an existing journal
    pub fn from_journal(journal: &Journal) -> Self {
        Self {
            id: Some(journal.id),
            name: journal.name.clone(),
            issn: journal.issn.clone().unwrap_or_default(),
            category: journal.category.clone().unwrap_or_default(),
            publisher: journal.publisher.clone().unwrap_or_default(),
            publish_date: journal
                .publish_date
                .as_ref()
                .and_then(DateField::date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            issue_number: journal.issue_number.clone(),
            total_quantity: journal.total_quantity.unwrap_or(0),
            available_quantity: journal.available_quantity.unwrap_or(0),
            status: journal.status,
            description: journal.description.clone(),
        }
    }
}

/// Journal search parameters
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JournalStatus>,
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> JournalForm {
        JournalForm {
            id: None,
            name: "Journal of Applied Mathematics".into(),
            issn: "1234-5678".into(),
            category: "Mathematics".into(),
            publisher: "College Press".into(),
            publish_date: "2024-01-01".into(),
            issue_number: Some("12".into()),
            total_quantity: 5,
            available_quantity: 3,
            status: JournalStatus::Available,
            description: None,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_available_cannot_exceed_total() {
        let mut f = form();
        f.available_quantity = 6;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_required_fields() {
        let mut f = form();
        f.name = "   ".into();
        let f = f.normalized();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_update_requires_positive_id() {
        let mut f = form();
        f.id = Some(0);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_zero_available_is_unavailable() {
        let mut f = form();
        f.available_quantity = 0;
        let f = f.normalized();
        assert_eq!(f.status, JournalStatus::Unavailable);
    }

    #[test]
    fn test_decode_snake_case_journal() {
        let journal: Journal = serde_json::from_value(json!({
            "id": "12",
            "name": "Acta",
            "total_quantity": "10",
            "available_quantity": 0,
            "issueNumber": 4,
            "status": "unavailable"
        }))
        .unwrap();
        assert_eq!(journal.id, 12);
        assert_eq!(journal.total_quantity, Some(10));
        assert_eq!(journal.issue_number.as_deref(), Some("4"));
        assert!(!journal.is_borrowable());
        assert!(journal.invariant_violations().is_empty());
    }

    #[test]
    fn test_query_serialization_skips_empty_filters() {
        let q = JournalQuery {
            keyword: Some("physics".into()),
            page: 2,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            json!({"keyword": "physics", "page": 2, "pageSize": 10})
        );
    }
}
