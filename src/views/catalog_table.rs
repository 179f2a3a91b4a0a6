//! Journal and teacher list tables

use super::list_state::ListState;
use super::table::{RowAction, Table, TableCell, TableRow};
use crate::models::{
    date::display_date,
    enums::{JournalStatus, TeacherStatus},
    journal::Journal,
    teacher::Teacher,
};
use crate::services::status::Severity;

fn text(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

fn count(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn render_journals(state: &ListState<Journal>) -> Table {
    let table = Table::new([
        "ID", "Name", "ISSN", "Category", "Publisher", "Published", "Issue", "Available", "Status",
    ]);
    if let Some(message) = state.error() {
        return table.error(message);
    }
    if state.page_records().is_empty() {
        return table.placeholder();
    }

    let mut table = table.with_footer(state.pager.caption());
    for journal in state.page_records() {
        let status_severity = match journal.status {
            JournalStatus::Available if journal.is_borrowable() => Severity::Success,
            _ => Severity::Warning,
        };
        let cells = vec![
            TableCell::plain(journal.id.to_string()),
            TableCell::plain(journal.name.clone()),
            TableCell::plain(text(&journal.issn)),
            TableCell::plain(text(&journal.category)),
            TableCell::plain(text(&journal.publisher)),
            TableCell::plain(display_date(journal.publish_date.as_ref())),
            TableCell::plain(text(&journal.issue_number)),
            TableCell::plain(format!(
                "{}/{}",
                count(journal.available_quantity),
                count(journal.total_quantity)
            )),
            TableCell::styled(journal.status.as_str(), status_severity),
        ];
        table.push(TableRow::data(journal.id, cells).with_actions(vec![RowAction::Edit, RowAction::Delete]));
    }
    table
}

pub fn render_teachers(state: &ListState<Teacher>) -> Table {
    let table = Table::new([
        "ID", "Name", "Department", "Email", "Phone", "Borrowed", "Status",
    ]);
    if let Some(message) = state.error() {
        return table.error(message);
    }
    if state.page_records().is_empty() {
        return table.placeholder();
    }

    let mut table = table.with_footer(state.pager.caption());
    for teacher in state.page_records() {
        let quota_severity = if teacher.remaining_quota() == 0 {
            Severity::Warning
        } else {
            Severity::Neutral
        };
        let status_severity = match teacher.status {
            TeacherStatus::Active => Severity::Success,
            _ => Severity::Neutral,
        };
        let cells = vec![
            TableCell::plain(teacher.id.to_string()),
            TableCell::plain(teacher.name.clone()),
            TableCell::plain(text(&teacher.department)),
            TableCell::plain(text(&teacher.email)),
            TableCell::plain(text(&teacher.phone)),
            TableCell::styled(
                format!("{}/{}", teacher.current_borrow(), teacher.max_borrow()),
                quota_severity,
            ),
            TableCell::styled(teacher.status.as_str(), status_severity),
        ];
        table.push(TableRow::data(teacher.id, cells).with_actions(vec![RowAction::Edit, RowAction::Delete]));
    }
    table
}
