//! Per-page spatial indexing of drawing threads.
//!
//! Each page gets its own [`rstar::RTree`], created on first insert. The
//! index also remembers where every thread was filed, so a thread lives in at
//! most one page at a time and removal never depends on the thread's current
//! bounds.

mod tiebreak;

use std::collections::{BTreeMap, HashMap};

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};

pub use tiebreak::{FirstCandidate, NewestFirst, RandomTieBreak, TieBreak, tie_break_for};

use crate::model::{Bounds, ThreadId};

/// Tree entry: a thread's box tagged with its id.
pub type PageEntry = GeomWithData<Rectangle<[f32; 2]>, ThreadId>;

fn entry(bounds: &Bounds, id: ThreadId) -> PageEntry {
    GeomWithData::new(
        Rectangle::from_corners([bounds.min_x, bounds.min_y], [bounds.max_x, bounds.max_y]),
        id,
    )
}

fn envelope(bounds: &Bounds) -> AABB<[f32; 2]> {
    AABB::from_corners([bounds.min_x, bounds.min_y], [bounds.max_x, bounds.max_y])
}

/// One hit-test result.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub id: ThreadId,
    pub bounds: Bounds,
    /// Insertion order, higher is newer
    pub seq: u64,
    pub value: T,
}

#[derive(Debug, Clone)]
struct Placement<T> {
    page: u32,
    bounds: Bounds,
    seq: u64,
    value: T,
}

/// Page number → R-tree map with a reverse thread lookup.
#[derive(Debug, Clone)]
pub struct PagedIndex<T> {
    pages: BTreeMap<u32, RTree<PageEntry>>,
    placements: HashMap<ThreadId, Placement<T>>,
    next_seq: u64,
}

impl<T> Default for PagedIndex<T> {
    fn default() -> Self {
        Self {
            pages: BTreeMap::new(),
            placements: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Clone> PagedIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// File `id` under `page`. An existing entry for `id` is replaced,
    /// whichever page it was on. Returns `true` if an entry was replaced.
    pub fn insert(&mut self, page: u32, id: ThreadId, bounds: Bounds, value: T) -> bool {
        let replaced = self.remove(id).is_some();

        self.pages.entry(page).or_default().insert(entry(&bounds, id));
        self.placements.insert(
            id,
            Placement {
                page,
                bounds,
                seq: self.next_seq,
                value,
            },
        );
        self.next_seq += 1;
        replaced
    }

    /// Drop `id` from its page, returning the page it was on.
    pub fn remove(&mut self, id: ThreadId) -> Option<u32> {
        let placement = self.placements.remove(&id)?;
        if let Some(tree) = self.pages.get_mut(&placement.page) {
            tree.remove(&entry(&placement.bounds, id));
        }
        Some(placement.page)
    }

    /// Threads on `page` whose bounds intersect `area`. A page that never
    /// had an index yields nothing.
    pub fn search(&self, page: u32, area: &Bounds) -> Vec<Candidate<T>> {
        let Some(tree) = self.pages.get(&page) else {
            return Vec::new();
        };
        let mut hits: Vec<Candidate<T>> = tree
            .locate_in_envelope_intersecting(&envelope(area))
            .filter_map(|hit| self.candidate(hit.data))
            .collect();
        hits.sort_by_key(|c| c.seq);
        hits
    }

    /// Every thread on `page`, oldest first.
    pub fn threads_on_page(&self, page: u32) -> Vec<Candidate<T>> {
        let Some(tree) = self.pages.get(&page) else {
            return Vec::new();
        };
        let mut all: Vec<Candidate<T>> = tree
            .iter()
            .filter_map(|hit| self.candidate(hit.data))
            .collect();
        all.sort_by_key(|c| c.seq);
        all
    }

    fn candidate(&self, id: ThreadId) -> Option<Candidate<T>> {
        self.placements.get(&id).map(|p| Candidate {
            id,
            bounds: p.bounds,
            seq: p.seq,
            value: p.value.clone(),
        })
    }

    pub fn page_of(&self, id: ThreadId) -> Option<u32> {
        self.placements.get(&id).map(|p| p.page)
    }

    pub fn bounds_of(&self, id: ThreadId) -> Option<Bounds> {
        self.placements.get(&id).map(|p| p.bounds)
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Whether `page` has had an index created.
    pub fn has_page(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Number of indexed threads across all pages.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_created_lazily() {
        let mut index = PagedIndex::new();
        assert!(!index.has_page(2));
        index.insert(2, ThreadId(1), Bounds::new(0.0, 0.0, 5.0, 5.0), ());
        assert!(index.has_page(2));
        assert!(!index.has_page(1));
        assert!(index.search(1, &Bounds::new(0.0, 0.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_reinsert_moves_thread_between_pages() {
        let mut index = PagedIndex::new();
        let id = ThreadId(7);
        let first = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let second = Bounds::new(50.0, 50.0, 60.0, 60.0);

        assert!(!index.insert(1, id, first, "a"));
        assert!(index.insert(3, id, second, "a"));

        assert_eq!(index.len(), 1);
        assert_eq!(index.page_of(id), Some(3));
        assert!(index.search(1, &first).is_empty());
        assert_eq!(index.search(3, &second).len(), 1);
    }

    #[test]
    fn test_remove_uses_recorded_bounds() {
        let mut index = PagedIndex::new();
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        index.insert(1, ThreadId(1), bounds, ());
        index.insert(1, ThreadId(2), bounds, ());

        assert_eq!(index.remove(ThreadId(1)), Some(1));
        assert_eq!(index.remove(ThreadId(1)), None);

        let left: Vec<ThreadId> = index.threads_on_page(1).iter().map(|c| c.id).collect();
        assert_eq!(left, vec![ThreadId(2)]);
    }

    fn cell(i: u64) -> Bounds {
        let x = (i % 10) as f32 * 20.0;
        let y = (i / 10) as f32 * 20.0;
        Bounds::new(x, y, x + 10.0, y + 10.0)
    }

    #[test]
    fn test_search_matches_brute_force() {
        let mut index = PagedIndex::new();
        for i in 0..100 {
            index.insert(1, ThreadId(i), cell(i), ());
        }
        for i in (0..100).step_by(3) {
            index.remove(ThreadId(i));
        }

        let area = Bounds::new(35.0, 35.0, 85.0, 65.0);
        let mut found: Vec<u64> = index.search(1, &area).iter().map(|c| c.id.0).collect();
        found.sort_unstable();
        let expected: Vec<u64> = (0..100)
            .filter(|i| i % 3 != 0 && cell(*i).intersects(&area))
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_touching_boxes_are_hits() {
        let mut index = PagedIndex::new();
        index.insert(1, ThreadId(1), Bounds::new(0.0, 0.0, 10.0, 10.0), ());
        let hits = index.search(1, &Bounds::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_candidates_are_ordered_by_insertion() {
        let mut index = PagedIndex::new();
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0);
        for id in [5, 3, 9] {
            index.insert(1, ThreadId(id), bounds, id);
        }
        let order: Vec<u64> = index.search(1, &bounds).iter().map(|c| c.value).collect();
        assert_eq!(order, vec![5, 3, 9]);
    }
}
