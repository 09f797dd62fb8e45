//! Distance-first page eviction planning.
//!
//! Pure: takes a snapshot of resident pages and returns which to drop. The
//! window applies the plan under its own lock.

use std::collections::BTreeSet;

/// Bookkeeping snapshot for one resident page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAccess {
    pub page: usize,
    /// Logical access tick; larger is more recent
    pub last_access: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvictionPlan {
    /// Pages to drop, in eviction order
    pub evict: Vec<usize>,
    pub resident_before: usize,
    pub resident_after: usize,
}

impl EvictionPlan {
    pub fn is_empty(&self) -> bool {
        self.evict.is_empty()
    }
}

/// Rank resident pages and select the overflow above `max_pages`.
///
/// Farthest from `anchor` (the page that was just installed) goes first;
/// equal distances fall back to the oldest access, then the lower page
/// number. Pages in `protected` (the viewport being served) are only taken
/// once every other page is gone, and an unprotected anchor goes just
/// before them. A protected anchor is never selected.
pub fn plan_evictions(
    resident: impl IntoIterator<Item = PageAccess>,
    anchor: usize,
    protected: &BTreeSet<usize>,
    max_pages: usize,
) -> EvictionPlan {
    let resident: Vec<PageAccess> = resident.into_iter().collect();
    let mut plan = EvictionPlan {
        resident_before: resident.len(),
        resident_after: resident.len(),
        ..EvictionPlan::default()
    };

    if resident.len() <= max_pages {
        return plan;
    }
    let excess = resident.len() - max_pages;

    let tier = |page: usize| match (page == anchor, protected.contains(&page)) {
        (false, false) => Tier::Free,
        (true, false) => Tier::Anchor,
        (_, true) => Tier::Protected,
    };
    let mut candidates: Vec<PageAccess> = resident
        .into_iter()
        .filter(|p| !(p.page == anchor && protected.contains(&p.page)))
        .collect();
    candidates.sort_by(|a, b| {
        tier(a.page)
            .cmp(&tier(b.page))
            .then(b.page.abs_diff(anchor).cmp(&a.page.abs_diff(anchor)))
            .then(a.last_access.cmp(&b.last_access))
            .then(a.page.cmp(&b.page))
    });

    plan.evict = candidates
        .into_iter()
        .take(excess)
        .map(|p| p.page)
        .collect();
    plan.resident_after = plan.resident_before - plan.evict.len();
    plan
}

/// Eviction order between groups of pages; lower goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Free,
    Anchor,
    Protected,
}
