//! The router seam.
//!
//! Synchronizers never own the location. They read it through a
//! [`Navigator`] and write it back with exactly one [`NavigateRequest`] per
//! table change. [`MemoryNavigator`] is an in-process history for tests and
//! headless use.

use crate::params::UrlParams;

/// One navigation effect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct NavigateRequest {
    /// Target route path, without query.
    pub to: String,
    /// Complete query parameters of the target location.
    pub search: UrlParams,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateRequest {
    /// Navigation that replaces the current history entry.
    pub fn replace(to: impl Into<String>, search: UrlParams) -> Self {
        Self {
            to: to.into(),
            search,
            replace: true,
        }
    }

    /// Navigation that pushes a new history entry.
    pub fn push(to: impl Into<String>, search: UrlParams) -> Self {
        Self {
            to: to.into(),
            search,
            replace: false,
        }
    }

    /// Target as `path?query`, or just `path` when there is no query.
    #[must_use]
    pub fn href(&self) -> String {
        join_href(&self.to, &self.search)
    }
}

/// Read and write access to the current location.
pub trait Navigator {
    /// Query parameters of the current location.
    ///
    /// Called fresh for every change so updates never work on a stale copy.
    fn current_search(&self) -> UrlParams;

    /// Move to a new location.
    fn navigate(&mut self, request: NavigateRequest);
}

impl<N: Navigator + ?Sized> Navigator for &mut N {
    fn current_search(&self) -> UrlParams {
        (**self).current_search()
    }

    fn navigate(&mut self, request: NavigateRequest) {
        (**self).navigate(request);
    }
}

/// Split `href` into its path and parsed query. A `#fragment` is dropped.
///
/// ```
/// use tabla_sync::split_href;
///
/// let (path, search) = split_href("/tramites?estado=ABIERTO&page=2#top");
/// assert_eq!(path, "/tramites");
/// assert_eq!(search.first("page"), Some("2"));
/// ```
pub fn split_href(href: &str) -> (&str, UrlParams) {
    let href = href.split_once('#').map_or(href, |(h, _)| h);
    match href.split_once('?') {
        Some((path, query)) => (path, UrlParams::parse(query)),
        None => (href, UrlParams::new()),
    }
}

fn join_href(path: &str, search: &UrlParams) -> String {
    if search.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{search}")
    }
}

/// A location in [`MemoryNavigator`]'s history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    search: UrlParams,
}

impl Location {
    /// Route path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters.
    pub const fn search(&self) -> &UrlParams {
        &self.search
    }

    /// `path?query`.
    pub fn href(&self) -> String {
        join_href(&self.path, &self.search)
    }
}

/// In-memory browser history.
///
/// ```
/// use tabla_sync::{MemoryNavigator, NavigateRequest, Navigator, UrlParams};
///
/// let mut nav = MemoryNavigator::new("/tramites?page=2");
/// nav.navigate(NavigateRequest::replace("/tramites", UrlParams::parse("page=3")));
/// assert_eq!(nav.href(), "/tramites?page=3");
/// assert_eq!(nav.history_len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    back: Vec<Location>,
    current: Location,
    forward: Vec<Location>,
    navigations: usize,
}

impl MemoryNavigator {
    /// History with a single entry at `href`.
    pub fn new(href: &str) -> Self {
        let (path, search) = split_href(href);
        Self {
            back: Vec::new(),
            current: Location {
                path: path.to_string(),
                search,
            },
            forward: Vec::new(),
            navigations: 0,
        }
    }

    /// Current location.
    pub const fn location(&self) -> &Location {
        &self.current
    }

    /// Current location as `path?query`.
    pub fn href(&self) -> String {
        self.current.href()
    }

    /// Number of history entries, including entries ahead of the cursor.
    pub fn history_len(&self) -> usize {
        self.back.len() + 1 + self.forward.len()
    }

    /// Number of [`Navigator::navigate`] calls received.
    pub const fn navigations(&self) -> usize {
        self.navigations
    }

    /// Step back. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        let Some(prev) = self.back.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, prev);
        self.forward.push(current);
        true
    }

    /// Step forward. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        let Some(next) = self.forward.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.back.push(current);
        true
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_search(&self) -> UrlParams {
        self.current.search.clone()
    }

    fn navigate(&mut self, request: NavigateRequest) {
        self.navigations += 1;
        let location = Location {
            path: request.to,
            search: request.search,
        };
        if request.replace {
            self.current = location;
        } else {
            let previous = std::mem::replace(&mut self.current, location);
            self.back.push(previous);
            self.forward.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_href() {
        let (path, search) = split_href("/usuarios");
        assert_eq!(path, "/usuarios");
        assert!(search.is_empty());

        let (path, search) = split_href("/usuarios?");
        assert_eq!(path, "/usuarios");
        assert!(search.is_empty());

        let (path, search) = split_href("/oficinas?q=Partes#x");
        assert_eq!(path, "/oficinas");
        assert_eq!(search.first("q"), Some("Partes"));
    }

    #[test]
    fn test_request_href() {
        let req = NavigateRequest::replace("/tramites", UrlParams::parse("sortBy=numero:asc"));
        assert!(req.replace);
        assert_eq!(req.href(), "/tramites?sortBy=numero:asc");
        assert_eq!(NavigateRequest::push("/tramites", UrlParams::new()).href(), "/tramites");
    }

    #[test]
    fn test_replace_keeps_history_length() {
        let mut nav = MemoryNavigator::new("/tramites");
        nav.navigate(NavigateRequest::replace("/tramites", UrlParams::parse("page=2")));
        nav.navigate(NavigateRequest::replace("/tramites", UrlParams::parse("page=3")));
        assert_eq!(nav.history_len(), 1);
        assert_eq!(nav.navigations(), 2);
        assert!(!nav.back());
        assert_eq!(nav.href(), "/tramites?page=3");
    }

    #[test]
    fn test_push_back_forward() {
        let mut nav = MemoryNavigator::new("/tramites?page=1");
        nav.navigate(NavigateRequest::push("/usuarios", UrlParams::new()));
        assert_eq!(nav.history_len(), 2);
        assert_eq!(nav.location().path(), "/usuarios");

        assert!(nav.back());
        assert_eq!(nav.href(), "/tramites?page=1");
        assert_eq!(nav.current_search().first("page"), Some("1"));

        assert!(nav.forward());
        assert_eq!(nav.href(), "/usuarios");
        assert!(!nav.forward());
    }

    #[test]
    fn test_push_clears_forward() {
        let mut nav = MemoryNavigator::default();
        nav.navigate(NavigateRequest::push("/a", UrlParams::new()));
        assert!(nav.back());
        nav.navigate(NavigateRequest::push("/b", UrlParams::new()));
        assert!(!nav.forward());
        assert_eq!(nav.history_len(), 2);
    }

    #[test]
    fn test_navigator_through_mut_ref() {
        fn bump(mut nav: impl Navigator) {
            nav.navigate(NavigateRequest::replace("/x", UrlParams::parse("page=9")));
        }
        let mut nav = MemoryNavigator::default();
        bump(&mut nav);
        assert_eq!(nav.href(), "/x?page=9");
    }
}
