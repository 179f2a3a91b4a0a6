//! Per-screen list state: page, records, selection and load tickets

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;

use super::pagination::Pager;
use crate::models::{borrow::BorrowRecord, journal::Journal, page::Page, teacher::Teacher};

/// Records addressable by a numeric id
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for BorrowRecord {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Journal {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for Teacher {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Load ticket; only the most recently issued one may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Issues load tickets in increasing order
#[derive(Debug, Default)]
pub struct LoadSequencer {
    latest: AtomicU64,
}

impl LoadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Page, typed records, selection and last error of one list screen
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub pager: Pager,
    records: Vec<T>,
    selection: IndexSet<i64>,
    error: Option<String>,
    loaded: bool,
    /// Whole list held in memory and paged locally
    local: bool,
}

impl<T: Keyed> ListState<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            pager: Pager::new(page_size),
            records: Vec::new(),
            selection: IndexSet::new(),
            error: None,
            loaded: false,
            local: false,
        }
    }

    /// Every record held, across pages for a locally paged list
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Records on the current page
    pub fn page_records(&self) -> &[T] {
        if !self.local {
            return &self.records;
        }
        let size = self.pager.page_size() as usize;
        let start = (self.pager.current() as usize - 1) * size;
        let end = (start + size).min(self.records.len());
        self.records.get(start..end).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: i64) -> Option<&T> {
        self.records.iter().find(|r| r.key() == id)
    }

    /// Replace records with a page the server returned for `page_num`
    pub fn apply_page(&mut self, page_num: u32, page: Page<T>) {
        self.pager.set_total(page.total);
        self.pager.set_current(page_num);
        self.local = false;
        self.replace(page.list);
    }

    /// Replace records with a complete list, paged locally.
    ///
    /// The current page is kept when it still exists.
    pub fn apply_list(&mut self, records: Vec<T>) {
        self.pager.set_total(records.len() as u64);
        self.local = true;
        self.replace(records);
    }

    /// Move to another page of a locally paged list.
    ///
    /// Returns `false` for out-of-range pages, the current page and
    /// server-paged lists, which have to be reloaded instead.
    pub fn show_page(&mut self, page: u32) -> bool {
        self.local && self.pager.go_to(page)
    }

    /// Record a load failure; the previous records stay as they were
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn replace(&mut self, records: Vec<T>) {
        self.records = records;
        self.error = None;
        self.loaded = true;
        let present: IndexSet<i64> = self.records.iter().map(Keyed::key).collect();
        self.selection.retain(|id| present.contains(id));
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Toggle `id`; ids not on the current page are ignored
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        if !self.selection.shift_remove(&id) {
            self.selection.insert(id);
        }
        true
    }

    pub fn select(&mut self, id: i64) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.selection.insert(id);
        true
    }

    /// Select every record on the current page
    pub fn select_all(&mut self) {
        let ids: Vec<i64> = self.page_records().iter().map(Keyed::key).collect();
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(&id)
    }

    /// Selected ids in the order they were picked
    pub fn selected_ids(&self) -> Vec<i64> {
        self.selection.iter().copied().collect()
    }

    pub fn all_selected(&self) -> bool {
        let page = self.page_records();
        !page.is_empty() && page.iter().all(|r| self.is_selected(r.key()))
    }
}
