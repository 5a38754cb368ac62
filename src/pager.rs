use std::time::{Duration, Instant};

/// Tiles shown per grid page.
pub const ITEMS_PER_PAGE: usize = 36;

/// Minimum gap between wheel-driven page flips, so one gesture advances at
/// most one page.
pub const SCROLL_COOLDOWN: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Zero-based window over the collection. No wraparound; out-of-range
/// requests clamp or are ignored rather than erroring.
pub struct Pager {
    current_page: usize,
    items_per_page: usize,
    last_scroll: Option<Instant>,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(ITEMS_PER_PAGE)
    }
}

impl Pager {
    pub fn new(items_per_page: usize) -> Self {
        Self { current_page: 0, items_per_page, last_scroll: None }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.items_per_page)
    }

    /// Clamp the current page into range for `count` items, e.g. after
    /// deletions shrank the collection.
    pub fn clamp(&mut self, count: usize) {
        let last = self.total_pages(count).saturating_sub(1);
        self.current_page = self.current_page.min(last);
    }

    pub fn set_page(&mut self, page: usize, count: usize) {
        self.current_page = page;
        self.clamp(count);
    }

    /// Advance one page. No-op on the last page.
    pub fn next(&mut self, count: usize) -> bool {
        if self.current_page + 1 < self.total_pages(count) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on page zero.
    pub fn prev(&mut self) -> bool {
        if self.current_page > 0 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Wheel-driven transition: applies at most one flip per cooldown
    /// window, dropping events that arrive while the window is open.
    pub fn scroll(
        &mut self,
        direction: ScrollDirection,
        count: usize,
        now: Instant,
    ) -> bool {
        if let Some(last) = self.last_scroll {
            if now.duration_since(last) < SCROLL_COOLDOWN {
                return false;
            }
        }
        self.last_scroll = Some(now);
        match direction {
            ScrollDirection::Down => self.next(count),
            ScrollDirection::Up => self.prev(),
        }
    }

    /// Visible slice of `items` for the current page.
    pub fn page_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.current_page * self.items_per_page;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.items_per_page).min(items.len());
        &items[start..end]
    }
}
