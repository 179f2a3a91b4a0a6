//! Page navigation state

use crate::models::page::total_pages;

/// One entry of the page-button bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page { number: u32, current: bool },
    Ellipsis,
}

/// Current page plus the server-side total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: u32,
    page_size: u32,
    total: u64,
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    /// Record a new total; the current page is pulled back if it no longer exists
    pub fn set_total(&mut self, total: u64) {
        self.total = total;
        self.current = self.current.min(self.total_pages());
    }

    /// Accept a page the server actually answered for
    pub fn set_current(&mut self, page: u32) {
        self.current = page.clamp(1, self.total_pages());
    }

    /// Whether `page` is a valid move; out of range or the current page is a no-op
    pub fn can_go_to(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages() && page != self.current
    }

    /// Move to `page`, returning `false` when nothing changed
    pub fn go_to(&mut self, page: u32) -> bool {
        if !self.can_go_to(page) {
            return false;
        }
        self.current = page;
        true
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    pub fn prev_page(&self) -> Option<u32> {
        self.has_prev().then(|| self.current - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    /// Button window of at most `max_buttons` numbered pages centred on the
    /// current one, plus first/last page and ellipses when cut off
    pub fn buttons(&self, max_buttons: u32) -> Vec<PageButton> {
        let max_buttons = max_buttons.max(1);
        let total_pages = self.total_pages();
        let mut start = self.current.saturating_sub(max_buttons / 2).max(1);
        let end = (start + max_buttons - 1).min(total_pages);
        if end - start + 1 < max_buttons {
            start = (end + 1).saturating_sub(max_buttons).max(1);
        }

        let page = |number: u32| PageButton::Page {
            number,
            current: number == self.current,
        };

        let mut buttons = Vec::new();
        if start > 1 {
            buttons.push(page(1));
            if start > 2 {
                buttons.push(PageButton::Ellipsis);
            }
        }
        buttons.extend((start..=end).map(page));
        if end < total_pages {
            if end < total_pages - 1 {
                buttons.push(PageButton::Ellipsis);
            }
            buttons.push(page(total_pages));
        }
        buttons
    }

    pub fn caption(&self) -> String {
        format!("total {}", self.total)
    }

    /// Render the button bar as text, e.g. `< 1 … 4 [5] 6 … 12 >`
    pub fn render(&self, max_buttons: u32) -> String {
        let mut parts = vec![if self.has_prev() { "<" } else { " " }.to_string()];
        for button in self.buttons(max_buttons) {
            parts.push(match button {
                PageButton::Page { number, current: true } => format!("[{}]", number),
                PageButton::Page { number, .. } => number.to_string(),
                PageButton::Ellipsis => "…".to_string(),
            });
        }
        parts.push(if self.has_next() { ">" } else { " " }.to_string());
        format!("{}  ({})", parts.join(" "), self.caption())
    }
}
