//! Report downloads, CSV exports and printable notice slips

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::{borrow::BorrowRecord, date::display_date, teacher::Teacher},
    repository::{stats::ReportKind, Repository},
    services::status::StatusClassifier,
};

/// Lets spreadsheet tools detect UTF-8
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TEACHER_HEADER: [&str; 8] = [
    "Teacher ID",
    "Name",
    "Department",
    "Email",
    "Phone",
    "Max borrow",
    "Current borrow",
    "Status",
];

const OVERDUE_HEADER: [&str; 9] = [
    "Borrow ID",
    "Teacher",
    "Department",
    "Phone",
    "Journal",
    "Borrowed",
    "Due",
    "Overdue days",
    "Status",
];

fn or_empty(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    writer.into_inner().map_err(|e| AppError::Io(e.into_error()))
}

/// Teacher list as CSV, BOM first
pub fn teachers_csv(teachers: &[Teacher]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(TEACHER_HEADER)?;
    for t in teachers {
        writer.write_record([
            t.id.to_string(),
            t.name.clone(),
            or_empty(&t.department).to_string(),
            or_empty(&t.email).to_string(),
            or_empty(&t.phone).to_string(),
            t.max_borrow().to_string(),
            t.current_borrow().to_string(),
            t.status.as_str().to_string(),
        ])?;
    }
    finish(writer)
}

/// Overdue list as CSV, BOM first
pub fn overdue_csv(records: &[BorrowRecord], classifier: &StatusClassifier, today: NaiveDate) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(OVERDUE_HEADER)?;
    for r in records {
        writer.write_record([
            r.id.to_string(),
            or_empty(&r.teacher_name).to_string(),
            or_empty(&r.department).to_string(),
            or_empty(&r.phone).to_string(),
            or_empty(&r.journal_name).to_string(),
            display_date(r.start_date.as_ref()),
            display_date(r.end_date.as_ref()),
            classifier.overdue_days(r, today).to_string(),
            r.status.as_str().to_string(),
        ])?;
    }
    finish(writer)
}

/// Plain-text overdue notice for one record
pub fn notice_slip(record: &BorrowRecord, classifier: &StatusClassifier, today: NaiveDate, serial: &str) -> String {
    let dash = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).unwrap_or("-").to_string();
    let borrowed = display_date(record.start_date.as_ref());
    let lines = [
        "OVERDUE JOURNAL RETURN NOTICE".to_string(),
        String::new(),
        format!("No.: {}", serial),
        format!("Date: {}", today.format("%Y-%m-%d")),
        String::new(),
        format!("Dear {} ({}),", dash(&record.teacher_name), dash(&record.department)),
        format!("The journal you borrowed on {} is overdue. Please return it as soon as possible.", borrowed),
        String::new(),
        format!("Journal:      {}", dash(&record.journal_name)),
        format!("Borrowed:     {}", borrowed),
        format!("Due:          {}", display_date(record.end_date.as_ref())),
        format!("Overdue days: {}", classifier.overdue_days(record, today)),
        String::new(),
        format!("Contact: {}", dash(&record.phone)),
        "Note: please return the journal to the library promptly to keep your borrowing record in good standing.".to_string(),
        String::new(),
        "Library administrator".to_string(),
    ];
    lines.join("\n")
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    export_dir: PathBuf,
}

impl ReportsService {
    pub fn new(repository: Repository, export_dir: PathBuf) -> Self {
        Self {
            repository,
            export_dir,
        }
    }

    fn target(&self, explicit: Option<&Path>, default_name: String) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.export_dir.join(default_name))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
        Ok(())
    }

    /// Download a server-generated xlsx report
    pub async fn download_report(&self, kind: ReportKind, today: NaiveDate, output: Option<&Path>) -> AppResult<PathBuf> {
        let bytes = self.repository.stats.download_report(kind).await?;
        if bytes.is_empty() {
            return Err(AppError::Decode(format!("the {} report is empty", kind)));
        }
        let path = self.target(output, format!("{}-report-{}.xlsx", kind, today.format("%Y%m%d")));
        self.write(&path, &bytes).await?;
        Ok(path)
    }

    pub async fn export_teachers(&self, teachers: &[Teacher], today: NaiveDate, output: Option<&Path>) -> AppResult<PathBuf> {
        let bytes = teachers_csv(teachers)?;
        let path = self.target(output, format!("teachers-{}.csv", today.format("%Y%m%d")));
        self.write(&path, &bytes).await?;
        Ok(path)
    }

    pub async fn export_overdue(
        &self,
        records: &[BorrowRecord],
        classifier: &StatusClassifier,
        today: NaiveDate,
        output: Option<&Path>,
    ) -> AppResult<PathBuf> {
        let bytes = overdue_csv(records, classifier, today)?;
        let path = self.target(output, format!("overdue-{}.csv", today.format("%Y%m%d")));
        self.write(&path, &bytes).await?;
        Ok(path)
    }
}
