//! Multi-scale geography store.
//!
//! # Merge model
//!
//! Documents are merged **in load order, macro → micro**: load the world
//! file first, then regional files.  Continents and nodes *replace* earlier
//! entries with the same key, so a finer-scale document can refine a node it
//! re-declares.  Routes *union*: a route id that has been seen before is
//! skipped, never overwritten, so the macro network stays authoritative and
//! regional files can only add connections.
//!
//! The merged data is read-only afterwards; a geography change means loading
//! a fresh store and rebuilding the navigation graph from it whole.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::model::{Continent, GeoNode, GeographyData};

/// Owns the merged geography dataset.
///
/// Built once at startup via [`load_files`](GeographyStore::load_files), or
/// incrementally by a host that fetches documents itself and calls
/// [`merge`](GeographyStore::merge).
#[derive(Debug, Default)]
pub struct GeographyStore {
    data:          GeographyData,
    route_ids:     BTreeSet<String>,
    used_fallback: bool,
}

impl GeographyStore {
    /// An empty store with no continents, nodes, or routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and merge a sequence of JSON document files, macro first.
    ///
    /// Unreadable or malformed files are logged and skipped rather than
    /// failing the whole load.  If *no* file yields a document, the built-in
    /// [`GeographyData::fallback`] dataset is substituted, so the returned
    /// store is always usable.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut store = Self::new();
        let mut loaded = 0usize;

        for path in paths {
            let path = path.as_ref();
            match GeographyData::from_json_file(path) {
                Ok(doc) => {
                    store.merge(doc);
                    loaded += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping geography file");
                }
            }
        }

        if loaded == 0 {
            warn!("no geography documents loaded; using built-in fallback");
            store.merge(GeographyData::fallback());
            store.used_fallback = true;
        }

        info!(
            files      = loaded,
            continents = store.data.continents.len(),
            nodes      = store.data.nodes.len(),
            routes     = store.data.routes.len(),
            "geography loaded"
        );
        store
    }

    /// Merge one document into the store (continents/nodes replace by key,
    /// routes union by id, first occurrence wins).
    pub fn merge(&mut self, doc: GeographyData) {
        let continents = doc.continents.len();
        let nodes = doc.nodes.len();

        self.data.continents.extend(doc.continents);
        self.data.nodes.extend(doc.nodes);

        let mut routes_added = 0usize;
        let mut routes_skipped = 0usize;
        for route in doc.routes {
            if self.route_ids.insert(route.id.clone()) {
                self.data.routes.push(route);
                routes_added += 1;
            } else {
                routes_skipped += 1;
            }
        }

        debug!(continents, nodes, routes_added, routes_skipped, "geography document merged");
    }

    /// The merged dataset.  Hand this to the navigation-graph builder.
    pub fn data(&self) -> &GeographyData {
        &self.data
    }

    /// Look up a node by its document key.
    pub fn node(&self, key: &str) -> Option<&GeoNode> {
        self.data.nodes.get(key)
    }

    /// Look up a continent by its document key.
    pub fn continent(&self, key: &str) -> Option<&Continent> {
        self.data.continents.get(key)
    }

    /// `true` when [`load_files`](GeographyStore::load_files) found nothing
    /// and substituted the built-in dataset.
    pub fn is_fallback(&self) -> bool {
        self.used_fallback
    }
}
