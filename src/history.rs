//! Session history.
//!
//! The router never touches a browser directly. It drives a [`History`]
//! implementation: an ordered list of entries with a cursor, plus href
//! formatting for the configured [`HistoryMode`]. [`MemoryHistory`] is the
//! built-in implementation; a host binding to a real platform history
//! implements the trait over it.
//!
//! Locations handed to and returned by a history are router-relative full
//! paths (`/posts/42?tab=comments#top`); the base path only appears in
//! hrefs.
//!
//! ```
//! use route_navigator::history::{History, HistoryMode, MemoryHistory};
//!
//! let mut history = MemoryHistory::new(HistoryMode::web("/app/"));
//! history.push("/about");
//!
//! assert_eq!(history.location(), "/about");
//! assert_eq!(history.create_href("/about"), "/app/about");
//! assert_eq!(history.peek(-1), Some("/"));
//! ```

use std::fmt;

/// Entry list with a cursor, driven by the router.
pub trait History: Send + 'static {
    /// Location of the current entry.
    fn location(&self) -> &str;

    /// Index of the current entry.
    fn position(&self) -> usize;

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry after the cursor and append `location`.
    fn push(&mut self, location: &str);

    /// Overwrite the current entry.
    fn replace(&mut self, location: &str);

    /// Location `delta` entries away from the cursor, if it exists.
    fn peek(&self, delta: isize) -> Option<&str>;

    /// Move the cursor by `delta`. Returns `false` (and stays put) if the
    /// target entry does not exist.
    fn go(&mut self, delta: isize) -> bool;

    /// Href a link to `location` should carry.
    fn create_href(&self, location: &str) -> String;
}

/// How locations are rendered into hrefs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMode {
    /// `base + location`, e.g. `/app/about`.
    Web { base: String },
    /// `base + "#" + location`, e.g. `/app#/about`.
    Hash { base: String },
    /// No URL at all; hrefs are formatted like [`Web`](Self::Web).
    Memory { base: String },
}

impl HistoryMode {
    pub fn web(base: impl AsRef<str>) -> Self {
        Self::Web {
            base: normalize_base(base.as_ref()),
        }
    }

    pub fn hash(base: impl AsRef<str>) -> Self {
        Self::Hash {
            base: normalize_base(base.as_ref()),
        }
    }

    pub fn memory() -> Self {
        Self::Memory {
            base: String::new(),
        }
    }

    /// Base path, normalized to `""` or `/segment...` without a trailing slash.
    pub fn base(&self) -> &str {
        match self {
            Self::Web { base } | Self::Hash { base } | Self::Memory { base } => base,
        }
    }

    /// Format `location` as an href.
    pub fn href(&self, location: &str) -> String {
        match self {
            Self::Web { base } | Self::Memory { base } => format!("{base}{location}"),
            Self::Hash { base } => format!("{base}#{location}"),
        }
    }

    /// Turn an href back into a location.
    ///
    /// Returns `None` if `href` does not live under the base.
    ///
    /// ```
    /// use route_navigator::history::HistoryMode;
    ///
    /// assert_eq!(HistoryMode::web("/app").strip_href("/app/about?x=1").as_deref(), Some("/about?x=1"));
    /// assert_eq!(HistoryMode::hash("").strip_href("/#/contact").as_deref(), Some("/contact"));
    /// assert_eq!(HistoryMode::web("/app").strip_href("/other"), None);
    /// ```
    pub fn strip_href(&self, href: &str) -> Option<String> {
        match self {
            Self::Web { base } | Self::Memory { base } => {
                let rest = href.strip_prefix(base.as_str())?;
                if rest.is_empty() {
                    Some("/".to_string())
                } else if rest.starts_with(['/', '?', '#']) {
                    Some(ensure_leading_slash(rest))
                } else {
                    None
                }
            }
            Self::Hash { base } => {
                let rest = href.strip_prefix(base.as_str())?;
                let rest = rest.strip_prefix('/').unwrap_or(rest);
                match rest.strip_prefix('#') {
                    Some(location) if !location.is_empty() => Some(ensure_leading_slash(location)),
                    _ => Some("/".to_string()),
                }
            }
        }
    }
}

impl Default for HistoryMode {
    fn default() -> Self {
        Self::web("")
    }
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web { base } => write!(f, "web({base})"),
            Self::Hash { base } => write!(f, "hash({base})"),
            Self::Memory { .. } => f.write_str("memory"),
        }
    }
}

fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn ensure_leading_slash(location: &str) -> String {
    if location.starts_with('/') {
        location.to_string()
    } else {
        format!("/{location}")
    }
}

/// In-process [`History`].
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    mode: HistoryMode,
    entries: Vec<String>,
    current: usize,
}

impl MemoryHistory {
    /// A history with a single `/` entry.
    pub fn new(mode: HistoryMode) -> Self {
        Self::starting_at(mode, "/")
    }

    /// A history whose single entry is `location`.
    pub fn starting_at(mode: HistoryMode, location: impl Into<String>) -> Self {
        Self {
            mode,
            entries: vec![location.into()],
            current: 0,
        }
    }

    pub fn mode(&self) -> &HistoryMode {
        &self.mode
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn target(&self, delta: isize) -> Option<usize> {
        let target = self.current.checked_add_signed(delta)?;
        (target < self.entries.len()).then_some(target)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(HistoryMode::memory())
    }
}

impl History for MemoryHistory {
    fn location(&self) -> &str {
        &self.entries[self.current]
    }

    fn position(&self) -> usize {
        self.current
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, location: &str) {
        self.entries.truncate(self.current + 1);
        self.entries.push(location.to_string());
        self.current += 1;
    }

    fn replace(&mut self, location: &str) {
        self.entries[self.current] = location.to_string();
    }

    fn peek(&self, delta: isize) -> Option<&str> {
        self.target(delta).map(|index| self.entries[index].as_str())
    }

    fn go(&mut self, delta: isize) -> bool {
        match self.target(delta) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    fn create_href(&self, location: &str) -> String {
        self.mode.href(location)
    }
}
