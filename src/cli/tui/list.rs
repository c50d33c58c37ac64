use std::ops::Range;

use crate::services::{ConnectionResult, ConnectionStatus};

use super::data::ProviderEntry;

/// Cursor, scroll window and live filter over the provider entries.
///
/// `filtered` holds indices into `items` and is always recomputed from the
/// full item set, so narrowing and widening the query behave the same way.
#[derive(Debug, Clone, Default)]
pub struct ProviderList {
    items: Vec<ProviderEntry>,
    filtered: Vec<usize>,
    cursor: usize,
    offset: usize,
    query: String,
    viewport: usize,
}

impl ProviderList {
    pub fn new(items: Vec<ProviderEntry>) -> Self {
        let mut list = Self {
            items,
            viewport: 1,
            ..Self::default()
        };
        list.refilter();
        list
    }

    pub fn items(&self) -> &[ProviderEntry] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn filtered(&self) -> impl Iterator<Item = &ProviderEntry> + '_ {
        self.filtered.iter().map(move |&idx| &self.items[idx])
    }

    pub fn selected(&self) -> Option<&ProviderEntry> {
        self.filtered
            .get(self.cursor)
            .and_then(|&idx| self.items.get(idx))
    }

    pub fn entry(&self, name: &str) -> Option<&ProviderEntry> {
        self.items.iter().find(|e| e.name() == name)
    }

    pub fn configured_count(&self) -> usize {
        self.items.iter().filter(|e| e.summary.is_configured).count()
    }

    /// Replace the items (after a reload) keeping the current query.
    pub fn set_items(&mut self, items: Vec<ProviderEntry>) {
        self.items = items;
        self.refilter();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, e)| needle.is_empty() || e.matches(&needle))
            .map(|(idx, _)| idx)
            .collect();
        self.clamp();
    }

    fn clamp(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.offset = 0;
            return;
        }
        self.cursor = self.cursor.min(self.filtered.len() - 1);
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        let height = self.viewport.max(1);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
        let max_offset = self.filtered.len().saturating_sub(height);
        self.offset = self.offset.min(max_offset);
    }

    pub fn set_viewport(&mut self, height: usize) {
        self.viewport = height.max(1);
        self.clamp();
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    /// Indices into the filtered sequence that fit in the viewport.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.viewport).min(self.filtered.len());
        self.offset.min(end)..end
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.ensure_visible();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.filtered.len() {
            self.cursor += 1;
            self.ensure_visible();
        }
    }

    pub fn jump_first(&mut self) {
        self.cursor = 0;
        self.ensure_visible();
    }

    pub fn jump_last(&mut self) {
        self.cursor = self.filtered.len().saturating_sub(1);
        self.ensure_visible();
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.viewport.max(1));
        self.ensure_visible();
    }

    pub fn page_down(&mut self) {
        let last = self.filtered.len().saturating_sub(1);
        self.cursor = (self.cursor + self.viewport.max(1)).min(last);
        self.ensure_visible();
    }

    pub fn mark_testing(&mut self, name: &str) {
        if let Some(entry) = self.items.iter_mut().find(|e| e.name() == name) {
            entry.status = ConnectionStatus::Testing;
            entry.detail = None;
        }
    }

    /// Applies to the stored item whether or not it is filtered or selected.
    pub fn apply_result(&mut self, result: &ConnectionResult) -> bool {
        match self.items.iter_mut().find(|e| e.name() == result.name) {
            Some(entry) => {
                entry.apply_result(result);
                true
            }
            None => false,
        }
    }
}
