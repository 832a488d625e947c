//! Race-guarded view enhancement.
//!
//! A UI switches between views faster than schema documents arrive. The
//! session remembers which view is current and drops every enhancement
//! result computed for a view that is no longer selected.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Mutex, MutexGuard},
};

use anyhow::Context;

use crate::{
    schema::{SchemaDocument, enhance},
    view::ViewConfig,
};

/// Identifies the view an enhancement is computed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    pub domain: String,
    pub dataset_path: String,
    pub view_key: String,
}

impl ViewKey {
    pub fn new(domain: &str, dataset_path: &str, view_key: &str) -> Self {
        Self {
            domain: domain.to_string(),
            dataset_path: dataset_path.to_string(),
            view_key: view_key.to_string(),
        }
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.domain, self.dataset_path, self.view_key)
    }
}

#[derive(Default)]
struct State {
    current: Option<ViewKey>,
    documents: HashMap<String, SchemaDocument>,
}

/// Tracks the selected view and caches one schema document per domain.
#[derive(Default)]
pub struct EnhanceSession {
    state: Mutex<State>,
}

impl EnhanceSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `key` the current view.
    pub fn select(&self, key: ViewKey) {
        debug!("select view {key}");
        self.state().current = Some(key);
    }

    pub fn current(&self) -> Option<ViewKey> {
        self.state().current.clone()
    }

    pub fn cached(&self, domain: &str) -> Option<SchemaDocument> {
        self.state().documents.get(domain).cloned()
    }

    /// Forget the cached document of `domain`.
    pub fn invalidate(&self, domain: &str) -> bool {
        self.state().documents.remove(domain).is_some()
    }

    /// Enhance `view` for `key`, fetching the domain document if needed.
    ///
    /// A view must be [selected](Self::select) first; calling this on a
    /// session without a current view is an error and nothing is fetched.
    /// Returns `Ok(None)` when another view was selected while the
    /// document was being fetched.
    pub async fn enhance_with<F, Fut>(
        &self,
        key: &ViewKey,
        view: &ViewConfig,
        fetch: F,
    ) -> anyhow::Result<Option<ViewConfig>>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = anyhow::Result<SchemaDocument>>,
    {
        if self.current().is_none() {
            anyhow::bail!("no view selected, cannot enhance {key}");
        }

        let document = match self.cached(&key.domain) {
            Some(document) => {
                debug!("schema cache hit for domain `{}`", key.domain);
                document
            }
            None => {
                let document = fetch(key.domain.clone())
                    .await
                    .with_context(|| format!("failed to fetch schema for domain `{}`", key.domain))?;
                self.state()
                    .documents
                    .entry(key.domain.clone())
                    .or_insert(document)
                    .clone()
            }
        };

        let enhanced = enhance(&document, &key.domain, &key.dataset_path, view);

        if self.state().current.as_ref() != Some(key) {
            debug!("discard stale enhancement for {key}");
            return Ok(None);
        }
        Ok(Some(enhanced))
    }
}
