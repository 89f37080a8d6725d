//! Post-navigation scroll policy.
//!
//! After a navigation commits, the router asks a [`ScrollBehavior`] where the
//! page should scroll. The callback sees the new route, the previous one and
//! the position the host saved for the target history entry (only present
//! for back/forward navigations). Returning `None` leaves the scroll
//! position alone.
//!
//! ```
//! use route_navigator::scroll::{restore_or_top, ScrollPosition};
//!
//! let saved = Some(ScrollPosition::new(480.0, 0.0));
//! assert_eq!(restore_or_top(saved), Some(ScrollPosition::new(480.0, 0.0)));
//! assert_eq!(restore_or_top(None), Some(ScrollPosition::TOP));
//! ```

use crate::resolve::ResolvedRoute;
use std::collections::HashMap;
use std::sync::Arc;

/// A scroll offset in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub top: f64,
    pub left: f64,
}

impl ScrollPosition {
    /// `{ top: 0, left: 0 }`.
    pub const TOP: ScrollPosition = ScrollPosition { top: 0.0, left: 0.0 };

    pub const fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Callback deciding the scroll target: `(to, from, saved) -> position`.
pub type ScrollBehavior = Arc<
    dyn Fn(&ResolvedRoute, Option<&ResolvedRoute>, Option<ScrollPosition>) -> Option<ScrollPosition>
        + Send
        + Sync,
>;

/// The default policy: reset to the top on every navigation.
pub fn scroll_to_top() -> ScrollBehavior {
    Arc::new(|_to, _from, _saved| Some(ScrollPosition::TOP))
}

/// Saved position when there is one, otherwise the top.
pub fn restore_or_top(saved: Option<ScrollPosition>) -> Option<ScrollPosition> {
    Some(saved.unwrap_or(ScrollPosition::TOP))
}

/// Scroll positions recorded by the host, keyed by history entry index.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScrollPositionStore {
    positions: HashMap<usize, ScrollPosition>,
}

impl ScrollPositionStore {
    pub(crate) fn save(&mut self, entry: usize, position: ScrollPosition) {
        self.positions.insert(entry, position);
    }

    pub(crate) fn get(&self, entry: usize) -> Option<ScrollPosition> {
        self.positions.get(&entry).copied()
    }

    /// Forget the position of an entry whose location was overwritten.
    pub(crate) fn forget(&mut self, entry: usize) {
        self.positions.remove(&entry);
    }

    /// Forget entries at or past `entry` (they were cut off by a push).
    pub(crate) fn truncate_from(&mut self, entry: usize) {
        self.positions.retain(|&index, _| index < entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_truncate() {
        let mut store = ScrollPositionStore::default();
        store.save(0, ScrollPosition::new(10.0, 0.0));
        store.save(1, ScrollPosition::new(20.0, 0.0));
        store.save(2, ScrollPosition::new(30.0, 0.0));

        store.truncate_from(1);
        assert_eq!(store.get(0), Some(ScrollPosition::new(10.0, 0.0)));
        assert_eq!(store.get(1), None);
        assert_eq!(store.get(2), None);
    }

    #[test]
    fn test_store_forget() {
        let mut store = ScrollPositionStore::default();
        store.save(0, ScrollPosition::new(10.0, 0.0));
        store.save(1, ScrollPosition::new(20.0, 0.0));

        store.forget(1);
        assert_eq!(store.get(0), Some(ScrollPosition::new(10.0, 0.0)));
        assert_eq!(store.get(1), None);
    }

    #[test]
    fn test_restore_or_top() {
        assert_eq!(restore_or_top(None), Some(ScrollPosition::TOP));
        let saved = ScrollPosition::new(5.0, 1.0);
        assert_eq!(restore_or_top(Some(saved)), Some(saved));
    }
}
