use crate::mcp::pagination::DEFAULT_MAX_PAGES;

pub fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}
