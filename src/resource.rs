//! Load / mutate / reload bookkeeping shared by every list screen.

use std::time::{Duration, Instant};
use tracing::error;

use crate::error::ApiResult;

/// How long a success message stays visible.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

#[derive(Debug)]
struct Banner {
    message: String,
    shown_at: Instant,
}

#[derive(Debug)]
pub struct ResourceList<T> {
    label: &'static str,
    items: Vec<T>,
    loading: bool,
    loaded_once: bool,
    error: Option<String>,
    banner: Option<Banner>,
    banner_ttl: Duration,
}

impl<T> ResourceList<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            items: Vec::new(),
            loading: false,
            loaded_once: false,
            error: None,
            banner: None,
            banner_ttl: SUCCESS_BANNER_TTL,
        }
    }

    #[cfg(test)]
    pub fn with_banner_ttl(mut self, ttl: Duration) -> Self {
        self.banner_ttl = ttl;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_loaded(&self) -> bool {
        self.loaded_once
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success_at(Instant::now())
    }

    pub fn success_at(&self, now: Instant) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| now.saturating_duration_since(b.shown_at) < self.banner_ttl)
            .map(|b| b.message.as_str())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Flag a fetch as in flight so a frame can be drawn before it blocks.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Replace the items with a fresh fetch. On failure the previous items
    /// stay in place and the error is recorded. Returns whether it worked.
    pub fn load<F>(&mut self, fetch: F) -> bool
    where
        F: FnOnce() -> ApiResult<Vec<T>>,
    {
        self.begin_load();
        let ok = match fetch() {
            Ok(items) => {
                self.items = items;
                self.error = None;
                self.loaded_once = true;
                true
            }
            Err(e) => {
                error!(resource = self.label, error = %e, "load failed");
                self.error = Some(format!("Failed to load {}: {}", self.label, e));
                false
            }
        };
        self.loading = false;
        ok
    }

    /// Run a create/update/delete, then reload and show `success`.
    pub fn mutate<R, M, F>(&mut self, op: M, success: impl Into<String>, fetch: F) -> ApiResult<R>
    where
        M: FnOnce() -> ApiResult<R>,
        F: FnOnce() -> ApiResult<Vec<T>>,
    {
        match op() {
            Ok(result) => {
                self.error = None;
                self.banner = Some(Banner {
                    message: success.into(),
                    shown_at: Instant::now(),
                });
                self.load(fetch);
                Ok(result)
            }
            Err(e) => {
                error!(resource = self.label, error = %e, "mutation failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn not_found() -> ApiError {
        ApiError::NotFound("gone".into())
    }

    #[test]
    fn test_load_success_and_failure_keeps_items() {
        let mut list: ResourceList<u32> = ResourceList::new("offices");
        assert!(!list.has_loaded());

        assert!(list.load(|| Ok(vec![1, 2, 3])));
        assert_eq!(list.items(), &[1, 2, 3]);
        assert!(!list.is_loading());

        assert!(!list.load(|| Err(not_found())));
        assert_eq!(list.len(), 3);
        assert_eq!(list.error(), Some("Failed to load offices: not found: gone"));

        assert!(list.load(|| Ok(vec![4])));
        assert!(list.error().is_none());
    }

    #[test]
    fn test_loading_flag_spans_the_fetch() {
        let mut list: ResourceList<u32> = ResourceList::new("offices");
        list.begin_load();
        assert!(list.is_loading());
        assert!(!list.has_loaded());

        let mut seen_loading = false;
        list.load(|| {
            seen_loading = true;
            Ok(vec![7])
        });
        assert!(seen_loading);
        assert!(!list.is_loading());
        assert!(list.has_loaded());
    }

    #[test]
    fn test_mutate_reloads_and_sets_banner() {
        let mut list: ResourceList<&str> = ResourceList::new("jobs");
        list.load(|| Ok(vec!["a"]));

        let created = list
            .mutate(|| Ok(42), "Job created", || Ok(vec!["a", "b"]))
            .unwrap();
        assert_eq!(created, 42);
        assert_eq!(list.items(), &["a", "b"]);
        assert_eq!(list.success(), Some("Job created"));
    }

    #[test]
    fn test_failed_mutation_does_not_reload() {
        let mut list: ResourceList<&str> = ResourceList::new("jobs");
        list.load(|| Ok(vec!["a"]));

        let mut reloaded = false;
        let result: ApiResult<()> = list.mutate(
            || Err(not_found()),
            "never shown",
            || {
                reloaded = true;
                Ok(vec![])
            },
        );
        assert!(result.is_err());
        assert!(!reloaded);
        assert_eq!(list.items(), &["a"]);
        assert!(list.success().is_none());
        assert_eq!(list.error(), Some("not found: gone"));
    }

    #[test]
    fn test_banner_expires() {
        let mut list: ResourceList<u8> =
            ResourceList::new("boards").with_banner_ttl(Duration::from_millis(50));
        list.mutate(|| Ok(()), "Board deleted", || Ok(vec![])).unwrap();

        let now = Instant::now();
        assert_eq!(list.success_at(now), Some("Board deleted"));
        assert!(list.success_at(now + Duration::from_millis(60)).is_none());
    }
}
