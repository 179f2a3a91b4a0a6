//! Admin overdue list with selection column

use chrono::NaiveDate;

use super::list_state::ListState;
use super::table::{RowAction, Table, TableCell, TableRow};
use crate::models::{borrow::BorrowRecord, date::display_date};
use crate::services::status::{overdue_severity, Severity, StatusClassifier};

const COLUMNS: [&str; 9] = [
    "Sel", "ID", "Teacher", "Department", "Phone", "Journal", "Borrowed", "Due", "Overdue days",
];

fn text(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

pub fn render_overdue(
    state: &ListState<BorrowRecord>,
    classifier: &StatusClassifier,
    today: NaiveDate,
) -> Table {
    let table = Table::new(COLUMNS);
    if let Some(message) = state.error() {
        return table.error(message);
    }
    if state.page_records().is_empty() {
        return table.placeholder();
    }

    let mut table = table.with_footer(format!(
        "{} selected, {}",
        state.selected_ids().len(),
        state.pager.caption()
    ));
    for record in state.page_records() {
        let (days, severity) = match record.due_date() {
            Some(_) => {
                let days = classifier.overdue_days(record, today);
                (days.to_string(), overdue_severity(days))
            }
            None => ("-".to_string(), Severity::Neutral),
        };
        let cells = vec![
            TableCell::plain(if state.is_selected(record.id) { "[x]" } else { "[ ]" }),
            TableCell::plain(record.id.to_string()),
            TableCell::plain(text(&record.teacher_name)),
            TableCell::plain(text(&record.department)),
            TableCell::plain(text(&record.phone)),
            TableCell::plain(text(&record.journal_name)),
            TableCell::plain(display_date(record.start_date.as_ref())),
            TableCell::plain(display_date(record.end_date.as_ref())),
            TableCell::styled(days, severity),
        ];
        table.push(
            TableRow::data(record.id, cells)
                .with_actions(vec![RowAction::Notice, RowAction::PrintNotice])
                .with_severity(severity),
        );
    }
    table
}
