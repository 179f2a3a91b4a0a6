//! In-memory table model printed by the CLI

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement};

use crate::services::status::Severity;

/// Text shown when a list is empty
pub const NO_DATA: &str = "No data";

/// Action offered on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Return,
    Renew,
    Notice,
    PrintNotice,
    Edit,
    Delete,
}

impl RowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowAction::Return => "return",
            RowAction::Renew => "renew",
            RowAction::Notice => "notice",
            RowAction::PrintNotice => "print",
            RowAction::Edit => "edit",
            RowAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Data,
    /// Single "no data" row for an empty list
    Placeholder,
    /// Single row carrying a load failure
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub severity: Severity,
}

impl TableCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Neutral,
        }
    }

    pub fn styled(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub kind: RowKind,
    /// Record the row was built from
    pub record_id: Option<i64>,
    pub cells: Vec<TableCell>,
    pub actions: Vec<RowAction>,
    pub severity: Severity,
}

impl TableRow {
    pub fn data(record_id: i64, cells: Vec<TableCell>) -> Self {
        Self {
            kind: RowKind::Data,
            record_id: Some(record_id),
            cells,
            actions: Vec::new(),
            severity: Severity::Neutral,
        }
    }

    pub fn with_actions(mut self, actions: Vec<RowAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn message(kind: RowKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            record_id: None,
            cells: vec![TableCell::plain(text)],
            actions: Vec::new(),
            severity: if kind == RowKind::Error {
                Severity::Critical
            } else {
                Severity::Neutral
            },
        }
    }
}

/// Rendered table: header plus rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    pub footer: Option<String>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn push(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Exactly one placeholder row
    pub fn placeholder(mut self) -> Self {
        self.rows = vec![TableRow::message(RowKind::Placeholder, NO_DATA)];
        self
    }

    /// Exactly one inline error row
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.rows = vec![TableRow::message(RowKind::Error, message)];
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Data)
    }

    pub fn is_placeholder(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].kind == RowKind::Placeholder
    }

    /// Terminal rendering
    pub fn to_comfy(&self) -> comfy_table::Table {
        let mut table = comfy_table::Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let has_actions = self.rows.iter().any(|r| !r.actions.is_empty());
        let mut header: Vec<Cell> = self.columns.iter().map(Cell::new).collect();
        if has_actions {
            header.push(Cell::new("Actions"));
        }
        table.set_header(header);

        let width = self.columns.len() + usize::from(has_actions);
        for row in &self.rows {
            let mut cells: Vec<Cell> = match row.kind {
                RowKind::Data => row
                    .cells
                    .iter()
                    .map(|c| colored(Cell::new(&c.text), c.severity.max(row.severity)))
                    .collect(),
                RowKind::Placeholder | RowKind::Error => {
                    let text = row.cells.first().map(|c| c.text.as_str()).unwrap_or_default();
                    let mut cells = vec![colored(
                        Cell::new(text).set_alignment(CellAlignment::Center),
                        row.severity,
                    )];
                    cells.resize_with(width, || Cell::new(""));
                    cells
                }
            };
            if has_actions && row.kind == RowKind::Data {
                let actions: Vec<&str> = row.actions.iter().map(RowAction::as_str).collect();
                cells.push(Cell::new(actions.join(" ")));
            }
            table.add_row(cells);
        }
        table
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_comfy())?;
        if let Some(footer) = &self.footer {
            write!(f, "\n{}", footer)?;
        }
        Ok(())
    }
}

fn colored(cell: Cell, severity: Severity) -> Cell {
    match severity {
        Severity::Neutral => cell,
        Severity::Success => cell.fg(Color::Green),
        Severity::Warning => cell.fg(Color::Yellow),
        Severity::Critical => cell.fg(Color::Red),
    }
}
