//! # Incremental Disclosure Controller
//!
//! ## Purpose
//! Owns how much of the filtered result list is exposed to the view at a
//! time. The window only ever grows via "load more" and snaps back to one
//! page whenever the filtered set changes underneath it.
//!
//! ## Input/Output Specification
//! - **Input**: `load_more` requests, resets triggered by facet or query changes
//! - **Output**: The visible prefix length for a given filtered length
//! - **Invariant**: `visible_in(n) == min(visible_count, n)`

/// Number of results disclosed per page
pub const PAGE_SIZE: usize = 10;

/// Visible-count window over the filtered result list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    visible: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    /// A window exposing the first page
    pub fn new() -> Self {
        Self { visible: PAGE_SIZE }
    }

    /// Snap back to the initial window
    pub fn reset(&mut self) {
        self.visible = PAGE_SIZE;
    }

    /// Grow the window by one page.
    ///
    /// A no-op when the window already covers the filtered list; returns
    /// whether the window grew.
    pub fn load_more(&mut self, filtered_len: usize) -> bool {
        if self.visible >= filtered_len {
            return false;
        }
        self.visible += PAGE_SIZE;
        true
    }

    /// The raw visible count, unclamped
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Length of the exposed prefix for a filtered list of `filtered_len`
    pub fn visible_in(&self, filtered_len: usize) -> usize {
        self.visible.min(filtered_len)
    }

    /// Whether a "load more" affordance should be offered
    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.visible < filtered_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_window_is_one_page() {
        let pager = Pager::new();
        assert_eq!(pager.visible_in(25), 10);
        assert_eq!(pager.visible_in(4), 4);
        assert!(pager.has_more(25));
        assert!(!pager.has_more(10));
    }

    #[test]
    fn test_load_more_law() {
        let mut pager = Pager::new();
        let filtered = 25;
        for k in 1..=3 {
            let grew = pager.load_more(filtered);
            assert_eq!(grew, k <= 2, "call {} past the end must be a no-op", k);
            assert_eq!(
                pager.visible_in(filtered),
                (10 + 10 * k).min(filtered).min(pager.visible_count())
            );
        }
        assert_eq!(pager.visible_in(filtered), 25);
        assert!(!pager.has_more(filtered));
    }

    #[test]
    fn test_load_more_noop_when_everything_visible() {
        let mut pager = Pager::new();
        assert!(!pager.load_more(7));
        assert_eq!(pager.visible_count(), 10);
    }

    #[test]
    fn test_reset_snaps_back() {
        let mut pager = Pager::new();
        pager.load_more(50);
        pager.load_more(50);
        assert_eq!(pager.visible_count(), 30);
        pager.reset();
        assert_eq!(pager.visible_count(), 10);
    }
}
