//! Pagination accumulator
//!
//! Fetches one or more pages from an [`EntrySource`] and merges them into a
//! single [`Accumulation`]. Included assets and included entries are
//! deduplicated by id across pages, each collection against its own seen
//! set, and the first occurrence of an id wins.

use crate::client::EntrySource;
use crate::error::Error;
use crate::query::Query;
use crate::types::{Asset, Entry, Page};
use std::collections::HashSet;
use tracing::debug;

/// Everything fetched for one query, merged across pages
#[derive(Debug, Clone, Default)]
pub struct Accumulation {
    /// Entries matching the query, in fetch order
    pub entries: Vec<Entry>,
    /// Included assets, deduplicated by id
    pub assets: Vec<Asset>,
    /// Included referenced entries, deduplicated by id
    pub linked_entries: Vec<Entry>,
    /// Total matching entries as reported with the first page
    pub total: u32,
}

/// Ids already merged, one set per included collection
#[derive(Debug, Default)]
struct SeenIds {
    assets: HashSet<String>,
    entries: HashSet<String>,
}

impl Accumulation {
    fn merge_page(&mut self, page: Page, seen: &mut SeenIds) {
        self.entries.extend(page.items);
        for asset in page.includes.assets {
            if seen.assets.insert(asset.sys.id.clone()) {
                self.assets.push(asset);
            }
        }
        for entry in page.includes.entries {
            if seen.entries.insert(entry.sys.id.clone()) {
                self.linked_entries.push(entry);
            }
        }
    }
}

/// Fetch all pages for `query` and merge them
///
/// Always fetches the page at `query.skip`. When `query.recursive` is set,
/// keeps fetching at `skip + limit` increments until a page comes back with
/// fewer items than the page size. The total reported with the first page
/// is consulted once, to decide whether a second fetch is needed at all; a
/// short page is otherwise the only terminator, so a total that drifts
/// while paging cannot loop forever.
pub async fn fetch_entries<S>(source: &S, query: &Query) -> Result<Accumulation, Error>
where
    S: EntrySource + ?Sized,
{
    // A hand-deserialized query may carry limit 0; treat it as the builder
    // minimum so the window always advances.
    let limit = query.limit.max(1);
    let mut skip = query.skip;

    let first = source.entries(query, skip).await?;
    let fetched = first.items.len();

    let mut seen = SeenIds::default();
    let mut acc = Accumulation {
        total: first.total,
        ..Default::default()
    };
    acc.merge_page(first, &mut seen);

    if query.recursive && fetched >= limit as usize && acc.total as usize > fetched {
        loop {
            skip += limit;
            let page = source.entries(query, skip).await?;
            let page_len = page.items.len();
            acc.merge_page(page, &mut seen);
            if page_len < limit as usize {
                break;
            }
        }
    }

    debug!(
        entries = acc.entries.len(),
        assets = acc.assets.len(),
        linked = acc.linked_entries.len(),
        total = acc.total,
        "Accumulated entries"
    );
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;
    use crate::types::{Includes, Sys};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Serves a fixed script of pages, recording the skip of each request
    struct ScriptedSource {
        pages: Mutex<VecDeque<Page>>,
        skips: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Page>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                skips: Mutex::new(Vec::new()),
            }
        }

        fn recorded_skips(&self) -> Vec<u32> {
            self.skips.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EntrySource for ScriptedSource {
        async fn entries(&self, _query: &Query, skip: u32) -> Result<Page, Error> {
            self.skips.lock().unwrap().push(skip);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Request("script exhausted".to_string()))
        }
    }

    fn entry(id: &str) -> Entry {
        Entry {
            sys: Sys {
                id: id.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn asset(id: &str) -> Asset {
        Asset {
            sys: Sys {
                id: id.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn page(ids: &[&str], total: u32) -> Page {
        Page {
            total,
            items: ids.iter().map(|id| entry(id)).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_non_recursive_fetches_once() {
        let source = ScriptedSource::new(vec![page(&["a", "b"], 100)]);
        let query = QueryBuilder::new().limit(2).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.entries.len(), 2);
        assert_eq!(acc.total, 100);
        assert_eq!(source.recorded_skips(), vec![0]);
    }

    #[tokio::test]
    async fn test_short_first_page_stops_despite_total() {
        // The remote system claims more matches than it returns; the short
        // page wins and no second request goes out.
        let source = ScriptedSource::new(vec![page(&["a", "b", "c"], 100)]);
        let query = QueryBuilder::new().limit(6).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.entries.len(), 3);
        assert_eq!(source.recorded_skips(), vec![0]);
    }

    #[tokio::test]
    async fn test_total_within_first_full_page_stops() {
        let source = ScriptedSource::new(vec![page(&["a", "b", "c", "d", "e", "f"], 6)]);
        let query = QueryBuilder::new().limit(6).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.entries.len(), 6);
        assert_eq!(source.recorded_skips(), vec![0]);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_trailing_empty_page() {
        // 24 entries at limit 6 arrive as four full pages; a fifth, empty
        // page is what terminates the loop.
        let pages = vec![
            page(&["a1", "a2", "a3", "a4", "a5", "a6"], 24),
            page(&["b1", "b2", "b3", "b4", "b5", "b6"], 24),
            page(&["c1", "c2", "c3", "c4", "c5", "c6"], 24),
            page(&["d1", "d2", "d3", "d4", "d5", "d6"], 24),
            page(&[], 24),
        ];
        let source = ScriptedSource::new(pages);
        let query = QueryBuilder::new().limit(6).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.entries.len(), 24);
        assert_eq!(acc.total, 24);
        assert_eq!(source.recorded_skips(), vec![0, 6, 12, 18, 24]);
    }

    #[tokio::test]
    async fn test_partial_last_page_terminates() {
        let pages = vec![
            page(&["a1", "a2", "a3", "a4", "a5", "a6"], 10),
            page(&["b1", "b2", "b3", "b4"], 10),
        ];
        let source = ScriptedSource::new(pages);
        let query = QueryBuilder::new().limit(6).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.entries.len(), 10);
        assert_eq!(source.recorded_skips(), vec![0, 6]);
    }

    #[tokio::test]
    async fn test_initial_skip_offsets_every_request() {
        let pages = vec![page(&["k", "l"], 20), page(&["m"], 20)];
        let source = ScriptedSource::new(pages);
        let query = QueryBuilder::new().limit(2).skip(10).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.entries.len(), 3);
        assert_eq!(source.recorded_skips(), vec![10, 12]);
    }

    #[tokio::test]
    async fn test_includes_deduplicated_across_pages() {
        let mut p1 = page(&["a"], 4);
        p1.includes = Includes {
            assets: vec![asset("img-1"), asset("img-2")],
            entries: vec![entry("ref-1")],
        };
        let mut p2 = page(&["b"], 4);
        p2.includes = Includes {
            assets: vec![asset("img-2"), asset("img-3")],
            entries: vec![entry("ref-1"), entry("ref-2")],
        };
        let source = ScriptedSource::new(vec![p1, p2, page(&[], 4)]);
        let query = QueryBuilder::new().limit(1).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        let asset_ids: Vec<&str> = acc.assets.iter().map(|a| a.id()).collect();
        let linked_ids: Vec<&str> = acc.linked_entries.iter().map(|e| e.id()).collect();
        assert_eq!(asset_ids, vec!["img-1", "img-2", "img-3"]);
        assert_eq!(linked_ids, vec!["ref-1", "ref-2"]);
    }

    #[tokio::test]
    async fn test_asset_and_entry_seen_sets_are_independent() {
        // An asset and a referenced entry may share an id; neither dedup
        // set may shadow the other collection.
        let mut p1 = page(&["a"], 1);
        p1.includes = Includes {
            assets: vec![asset("shared-id")],
            entries: vec![entry("shared-id")],
        };
        let source = ScriptedSource::new(vec![p1]);
        let query = QueryBuilder::new().limit(2).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.assets.len(), 1);
        assert_eq!(acc.linked_entries.len(), 1);
    }

    #[tokio::test]
    async fn test_first_occurrence_wins() {
        let mut first = asset("img-1");
        first.fields.title.insert("en-US".to_string(), "first".to_string());
        let mut second = asset("img-1");
        second
            .fields
            .title
            .insert("en-US".to_string(), "second".to_string());

        let mut p1 = page(&["a"], 3);
        p1.includes.assets = vec![first];
        let mut p2 = page(&["b"], 3);
        p2.includes.assets = vec![second];
        let source = ScriptedSource::new(vec![p1, p2, page(&[], 3)]);
        let query = QueryBuilder::new().limit(1).recursive(true).build();

        let acc = fetch_entries(&source, &query).await.unwrap();
        assert_eq!(acc.assets.len(), 1);
        assert_eq!(acc.assets[0].title("en-US"), Some("first"));
    }

    #[tokio::test]
    async fn test_error_aborts_accumulation() {
        let source = ScriptedSource::new(vec![page(&["a", "b"], 10)]);
        let query = QueryBuilder::new().limit(2).recursive(true).build();

        // Second request finds the script exhausted and fails.
        let result = fetch_entries(&source, &query).await;
        assert!(matches!(result, Err(Error::Request(_))));
    }
}
