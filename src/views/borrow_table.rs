//! Borrow record tables: teacher current/history lists and admin listings

use chrono::NaiveDate;

use super::list_state::ListState;
use super::table::{RowAction, Table, TableCell, TableRow};
use crate::models::{borrow::BorrowRecord, date::display_date};
use crate::services::status::{DisplayStatus, StatusClassifier};

/// Which borrow list is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowView {
    /// A teacher's records still out on loan
    Current,
    /// A teacher's full history
    History,
    /// Admin listing across teachers
    Admin,
}

impl BorrowView {
    fn columns(&self) -> &'static [&'static str] {
        match self {
            BorrowView::Current => &["ID", "Journal", "Borrowed", "Due", "Status"],
            BorrowView::History => &["ID", "Journal", "Borrowed", "Due", "Returned", "Status"],
            BorrowView::Admin => &["ID", "Teacher", "Department", "Journal", "Borrowed", "Due", "Status"],
        }
    }
}

fn text(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Render one page of borrow records.
///
/// A load error replaces the body with a single error row; an empty list
/// yields a single placeholder row.
pub fn render_borrows(
    state: &ListState<BorrowRecord>,
    view: BorrowView,
    classifier: &StatusClassifier,
    today: NaiveDate,
) -> Table {
    let table = Table::new(view.columns().iter().copied());
    if let Some(message) = state.error() {
        return table.error(message);
    }
    let records: Vec<&BorrowRecord> = state
        .page_records()
        .iter()
        .filter(|r| view != BorrowView::Current || !r.is_returned())
        .collect();
    if records.is_empty() {
        return table.placeholder();
    }

    let mut table = table.with_footer(state.pager.caption());
    for record in records {
        table.push(borrow_row(record, view, classifier.classify(record, today)));
    }
    table
}

fn borrow_row(record: &BorrowRecord, view: BorrowView, status: DisplayStatus) -> TableRow {
    let status_cell = TableCell::styled(status.label(), status.severity());
    let mut cells = vec![TableCell::plain(record.id.to_string())];
    match view {
        BorrowView::Current => cells.extend([
            TableCell::plain(text(&record.journal_name)),
            TableCell::plain(display_date(record.start_date.as_ref())),
            TableCell::plain(display_date(record.end_date.as_ref())),
            status_cell,
        ]),
        BorrowView::History => cells.extend([
            TableCell::plain(text(&record.journal_name)),
            TableCell::plain(display_date(record.start_date.as_ref())),
            TableCell::plain(display_date(record.end_date.as_ref())),
            TableCell::plain(display_date(record.return_date.as_ref())),
            status_cell,
        ]),
        BorrowView::Admin => cells.extend([
            TableCell::plain(text(&record.teacher_name)),
            TableCell::plain(text(&record.department)),
            TableCell::plain(text(&record.journal_name)),
            TableCell::plain(display_date(record.start_date.as_ref())),
            TableCell::plain(display_date(record.end_date.as_ref())),
            status_cell,
        ]),
    }

    let actions = if record.is_returned() {
        Vec::new()
    } else {
        vec![RowAction::Return, RowAction::Renew]
    };
    TableRow::data(record.id, cells).with_actions(actions)
}
