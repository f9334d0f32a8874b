//! Cache of stylesheet services across the workspace
//!
//! One service per tracked stylesheet, rebuilt lazily: a document's service
//! is only (re)parsed when a query actually touches it and the stored
//! version no longer matches the document's. Queries that run over the whole
//! family visit documents in URI order, so result ordering is deterministic.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use tower_lsp::lsp_types::{Location, Url};

use crate::config::LanguageFamily;
use crate::css::service::CssService;
use crate::error::NavResult;
use crate::language::document::Document;
use crate::language::part::{Part, QueryOrigin};
use crate::workspace::documents::DocumentStore;

#[derive(Debug, Default)]
pub struct CssServiceMap {
    services: HashMap<Url, CssService>,
}

impl CssServiceMap {
    pub fn new() -> Self {
        CssServiceMap {
            services: HashMap::new(),
        }
    }

    /// The part under `offset` in `uri`, cloned out of the cached parse so
    /// the caller holds no borrow into the cache.
    pub async fn part_at(
        &mut self,
        store: &mut DocumentStore,
        uri: &Url,
        offset: usize,
    ) -> NavResult<Option<Part>> {
        let document = store.get(uri).await?;
        let service = Self::ensure(&mut self.services, document);
        Ok(service.part_at(offset).cloned())
    }

    /// Locations of every part matching `from` across all tracked
    /// stylesheets, excluding the origin occurrence.
    pub async fn find_references(
        &mut self,
        store: &mut DocumentStore,
        from: &Part,
        origin: Option<QueryOrigin<'_>>,
    ) -> NavResult<Vec<Location>> {
        self.collect(store, from, origin, false).await
    }

    /// Locations of definition-mode parts matching `from` across all
    /// tracked stylesheets.
    pub async fn find_definitions(
        &mut self,
        store: &mut DocumentStore,
        from: &Part,
        origin: Option<QueryOrigin<'_>>,
    ) -> NavResult<Vec<Location>> {
        self.collect(store, from, origin, true).await
    }

    async fn collect(
        &mut self,
        store: &mut DocumentStore,
        from: &Part,
        origin: Option<QueryOrigin<'_>>,
        definitions_only: bool,
    ) -> NavResult<Vec<Location>> {
        let uris = store.family_documents(LanguageFamily::Css)?;
        let mut results = Vec::new();
        for uri in uris {
            let document = store.get(&uri).await?;
            let service = Self::ensure(&mut self.services, document);
            let exclude = origin.and_then(|o| o.range_in(&uri));
            if definitions_only {
                service.collect_definitions(document, from, exclude, &mut results);
            } else {
                service.collect_references(document, from, exclude, &mut results);
            }
        }
        Ok(results)
    }

    /// Collect candidate texts for completion. `pick` maps each part to the
    /// text it contributes, or `None` to skip it; the set keeps candidates
    /// unique and sorted.
    pub async fn collect_texts(
        &mut self,
        store: &mut DocumentStore,
        pick: impl Fn(&Part) -> Option<String>,
        results: &mut BTreeSet<String>,
    ) -> NavResult<()> {
        let uris = store.family_documents(LanguageFamily::Css)?;
        for uri in uris {
            let document = store.get(&uri).await?;
            let service = Self::ensure(&mut self.services, document);
            results.extend(service.parts().iter().filter_map(&pick));
        }
        Ok(())
    }

    /// Drop the cached service of a document that stopped being tracked.
    pub fn evict(&mut self, uri: &Url) {
        self.services.remove(uri);
    }

    /// Drop every cached service, used when configuration changes invalidate
    /// all parses at once.
    pub fn clear(&mut self) {
        self.services.clear();
    }

    /// Get the up-to-date service for `document`, rebuilding when the
    /// version moved. Never hands out a stale snapshot.
    fn ensure<'s>(
        services: &'s mut HashMap<Url, CssService>,
        document: &Document,
    ) -> &'s CssService {
        match services.entry(document.uri().clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().version() != document.version() {
                    occupied.insert(CssService::build(document));
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(CssService::build(document)),
        }
    }
}
