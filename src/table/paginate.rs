pub const PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
}

impl PageState {
    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self { current_page: 1 }
    }
}

pub fn total_pages(filtered_len: usize) -> usize {
    filtered_len.div_ceil(PAGE_SIZE)
}

/// Slice for the current page, clipped to the sequence bounds. Callers are
/// responsible for keeping `current_page` inside `[1, total_pages]`; this
/// function only clips, it does not clamp the page number.
pub fn page_slice<'a, T>(items: &'a [T], page: &PageState) -> &'a [T] {
    let start = (page.current_page.saturating_sub(1)) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(items.len());
    if start >= items.len() {
        return &[];
    }
    &items[start..end]
}
