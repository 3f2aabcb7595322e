//! Page-local fixture stores.
//!
//! Every page owns a [`RecordStore`] seeded from its fixture array. Search is
//! a case-insensitive substring match over the record's search fields,
//! filters are plain predicates, and tables page through the result with an
//! offset/limit window. Mutations only touch the page's own copy.

pub mod appointments;
pub mod dashboard;
pub mod emergencies;
pub mod hospitals;
pub mod patients;
pub mod staff;

use crate::delay::Delay;
use crate::error::RecordError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub trait Record: Clone {
    /// Fixture label used in logs.
    const KIND: &'static str;

    fn id(&self) -> u32;
    fn set_id(&mut self, id: u32);
    fn search_fields(&self) -> Vec<&str>;

    fn matches_term(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: usize,
    pub rows_per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, rows_per_page: usize) -> Self {
        Self {
            page,
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// A single page large enough for any fixture.
    pub fn everything() -> Self {
        Self::new(0, usize::MAX)
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.rows_per_page)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<R> {
    pub items: Vec<R>,
    /// Matches before pagination.
    pub total: usize,
    pub page: usize,
    pub rows_per_page: usize,
}

impl<R> Page<R> {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.rows_per_page.max(1))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn all(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Records whose search fields contain `term`. An empty term matches all.
    pub fn search(&self, term: &str) -> Vec<R> {
        self.records
            .iter()
            .filter(|r| r.matches_term(term))
            .cloned()
            .collect()
    }

    pub fn query(&self, term: &str, filter: impl Fn(&R) -> bool, page: PageRequest) -> Page<R> {
        let matched: Vec<&R> = self
            .records
            .iter()
            .filter(|r| r.matches_term(term) && filter(r))
            .collect();
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(page.offset())
            .take(page.rows_per_page)
            .cloned()
            .collect();
        Page {
            items,
            total,
            page: page.page,
            rows_per_page: page.rows_per_page,
        }
    }

    /// Assigns the next free id and appends. Returns the stored record.
    pub fn create(&mut self, mut record: R) -> R {
        let next = self.records.iter().map(Record::id).max().unwrap_or(0) + 1;
        record.set_id(next);
        self.records.push(record.clone());
        debug!(kind = R::KIND, id = next, "record created");
        record
    }

    /// Replaces the record with `id`; the stored id is kept.
    pub fn update(&mut self, id: u32, mut record: R) -> Result<R, RecordError> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(RecordError::NotFound(id))?;
        record.set_id(id);
        *slot = record.clone();
        Ok(record)
    }

    pub fn delete(&mut self, id: u32) -> Result<R, RecordError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or(RecordError::NotFound(id))?;
        Ok(self.records.remove(index))
    }
}

/// Hands a fixture to a page after the simulated network delay.
pub async fn load_fixture<R: Record>(
    delay: &impl Delay,
    duration: Duration,
    fixture: impl FnOnce() -> Vec<R>,
) -> RecordStore<R> {
    delay.sleep(duration).await;
    let records = fixture();
    debug!(kind = R::KIND, count = records.len(), "fixture loaded");
    RecordStore::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use crate::records::emergencies::{fixture as emergencies, EmergencyStatus};
    use futures::executor::block_on;

    #[test]
    fn search_twice_equals_search_once() {
        let store = RecordStore::new(emergencies());
        for term in ["", "street", "CARDIAC", "unit", "zzz"] {
            let once = store.search(term);
            let twice = RecordStore::new(once.clone()).search(term);
            assert_eq!(once, twice, "{term}");
        }
    }

    #[test]
    fn query_paginates_after_filtering() {
        let store = RecordStore::new(emergencies());
        let page = store.query("", |_| true, PageRequest::new(1, 2));
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page_count(), 2);

        let critical = store.query(
            "",
            |e| e.status == EmergencyStatus::Critical,
            PageRequest::everything(),
        );
        assert_eq!(critical.total, 1);
    }

    #[test]
    fn crud_by_id() {
        let mut store = RecordStore::new(emergencies());
        let mut draft = store.get(1).cloned().expect("fixture");
        draft.location = "Exit 12".into();
        let created = store.create(draft.clone());
        assert_eq!(created.id, 4);

        draft.description = "updated".into();
        let updated = store.update(4, draft).expect("update");
        assert_eq!(updated.id, 4);
        assert_eq!(store.get(4).map(|e| e.description.as_str()), Some("updated"));

        assert!(store.delete(4).is_ok());
        assert_eq!(store.delete(4), Err(RecordError::NotFound(4)));
        assert_eq!(store.update(99, created), Err(RecordError::NotFound(99)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn load_fixture_builds_store() {
        let store = block_on(load_fixture(&NoDelay, Duration::from_millis(800), emergencies));
        assert_eq!(store.len(), 3);
    }
}
