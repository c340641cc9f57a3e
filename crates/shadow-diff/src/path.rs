//! Path buffer used while walking the compared values
//!
//! A single `String` is grown and truncated as the walk descends and returns,
//! so a path is only allocated when a difference is actually recorded.

use std::fmt::Write;

/// Locator reported for differences at the top of the compared values
pub const ROOT_PATH: &str = "(root)";

/// Growable dotted/bracketed path
#[derive(Debug, Default)]
pub(crate) struct PathBuffer {
    buf: String,
}

impl PathBuffer {
    #[inline]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append `.key` (bare `key` at root); returns the length to restore
    #[inline]
    pub(crate) fn push_key(&mut self, key: &str) -> usize {
        let mark = self.buf.len();
        if !self.buf.is_empty() {
            self.buf.push('.');
        }
        self.buf.push_str(key);
        mark
    }

    /// Append `[index]`; returns the length to restore
    #[inline]
    pub(crate) fn push_index(&mut self, index: usize) -> usize {
        let mark = self.buf.len();
        // Writing to a String cannot fail.
        let _ = write!(self.buf, "[{index}]");
        mark
    }

    #[inline]
    pub(crate) fn restore(&mut self, mark: usize) {
        self.buf.truncate(mark);
    }

    /// Owned locator for a recorded difference
    #[inline]
    pub(crate) fn to_locator(&self) -> String {
        if self.buf.is_empty() {
            ROOT_PATH.to_string()
        } else {
            self.buf.clone()
        }
    }
}
