//! Cursor-based pagination shared by every list endpoint

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorDirection {
    #[default]
    Next,
    Prev,
}

/// `cursor`, `limit` and `direction` query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorInput {
    pub cursor: Option<String>,
    pub limit: Option<u64>,
    pub direction: Option<CursorDirection>,
}

impl CursorInput {
    pub fn first(limit: u64) -> Self {
        Self {
            cursor: None,
            limit: Some(limit),
            direction: None,
        }
    }

    pub fn after(cursor: impl Into<String>, limit: u64) -> Self {
        Self {
            cursor: Some(cursor.into()),
            limit: Some(limit),
            direction: Some(CursorDirection::Next),
        }
    }

    pub fn before(cursor: impl Into<String>, limit: u64) -> Self {
        Self {
            cursor: Some(cursor.into()),
            limit: Some(limit),
            direction: Some(CursorDirection::Prev),
        }
    }

    /// Page size clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn direction(&self) -> CursorDirection {
        self.direction.unwrap_or_default()
    }

    /// Cursor with empty strings treated as absent
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub cursor: Option<String>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> CursorPage<T> {
    /// Build a page from a window fetched with `limit + 1` rows.
    ///
    /// For `Next` the window must be ascending by ID after the cursor; for
    /// `Prev` it must be descending before the cursor. The returned items are
    /// always ascending.
    pub fn from_window<F>(mut rows: Vec<T>, input: &CursorInput, total: u64, id_of: F) -> Self
    where
        F: Fn(&T) -> String,
    {
        let limit = input.limit();
        let has_more = rows.len() as u64 > limit;
        rows.truncate(limit as usize);

        let has_cursor = input.cursor().is_some();
        let (has_next_page, has_prev_page) = match input.direction() {
            CursorDirection::Next => (has_more, has_cursor),
            CursorDirection::Prev => {
                rows.reverse();
                (has_cursor, has_more)
            }
        };

        let next_cursor = if has_next_page { rows.last().map(&id_of) } else { None };
        let prev_cursor = if has_prev_page { rows.first().map(&id_of) } else { None };

        Self {
            items: rows,
            total,
            limit,
            cursor: input.cursor().map(str::to_string),
            next_cursor,
            prev_cursor,
            has_next_page,
            has_prev_page,
        }
    }

    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            cursor: self.cursor,
            next_cursor: self.next_cursor,
            prev_cursor: self.prev_cursor,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::Range<u32>) -> Vec<String> {
        range.map(|i| format!("{:03}", i)).collect()
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(CursorInput::default().limit(), DEFAULT_LIMIT);
        assert_eq!(CursorInput::first(0).limit(), 1);
        assert_eq!(CursorInput::first(1000).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_first_page_with_more() {
        let input = CursorInput::first(3);
        let page = CursorPage::from_window(ids(0..4), &input, 10, |s| s.clone());
        assert_eq!(page.items, ids(0..3));
        assert!(page.has_next_page);
        assert!(!page.has_prev_page);
        assert_eq!(page.next_cursor.as_deref(), Some("002"));
        assert_eq!(page.prev_cursor, None);
    }

    #[test]
    fn test_last_page_after_cursor() {
        let input = CursorInput::after("006", 3);
        let page = CursorPage::from_window(ids(7..10), &input, 10, |s| s.clone());
        assert_eq!(page.items, ids(7..10));
        assert!(!page.has_next_page);
        assert!(page.has_prev_page);
        assert_eq!(page.prev_cursor.as_deref(), Some("007"));
    }

    #[test]
    fn test_prev_window_is_reversed() {
        let input = CursorInput::before("005", 2);
        // descending window of limit + 1 rows before the cursor
        let window = vec!["004".to_string(), "003".to_string(), "002".to_string()];
        let page = CursorPage::from_window(window, &input, 10, |s| s.clone());
        assert_eq!(page.items, vec!["003".to_string(), "004".to_string()]);
        assert!(page.has_prev_page);
        assert!(page.has_next_page);
        assert_eq!(page.prev_cursor.as_deref(), Some("003"));
        assert_eq!(page.next_cursor.as_deref(), Some("004"));
    }

    #[test]
    fn test_empty_cursor_is_absent() {
        let input = CursorInput {
            cursor: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(input.cursor(), None);
    }
}
