//! Cache of markup services across the workspace
//!
//! One service per tracked markup document, rebuilt lazily on version
//! mismatch, mirroring the stylesheet map. The map owns the parse options
//! derived from configuration; changing them drops every cached parse.
//!
//! Besides the family-wide queries, markup has own-document variants: class
//! and id definitions inside `<style>` blocks only ever resolve within the
//! document that holds them.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use tower_lsp::lsp_types::{Location, Url};

use crate::config::LanguageFamily;
use crate::error::NavResult;
use crate::html::parser::HtmlParseOptions;
use crate::html::service::HtmlService;
use crate::language::document::Document;
use crate::language::part::{Part, QueryOrigin};
use crate::workspace::documents::DocumentStore;

#[derive(Debug, Default)]
pub struct HtmlServiceMap {
    options: HtmlParseOptions,
    services: HashMap<Url, HtmlService>,
}

impl HtmlServiceMap {
    pub fn new(options: HtmlParseOptions) -> Self {
        HtmlServiceMap {
            options,
            services: HashMap::new(),
        }
    }

    /// Replace the parse options and invalidate every cached parse.
    pub fn set_options(&mut self, options: HtmlParseOptions) {
        self.options = options;
        self.services.clear();
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
        let service = Self::ensure(&mut self.services, self.options, document);
        Ok(service.part_at(offset).cloned())
    }

    /// Locations of every part matching `from` across all tracked markup
    /// documents, excluding the origin occurrence.
    pub async fn find_references(
        &mut self,
        store: &mut DocumentStore,
        from: &Part,
        origin: Option<QueryOrigin<'_>>,
    ) -> NavResult<Vec<Location>> {
        let uris = store.family_documents(LanguageFamily::Html)?;
        let mut results = Vec::new();
        for uri in uris {
            let document = store.get(&uri).await?;
            let service = Self::ensure(&mut self.services, self.options, document);
            let exclude = origin.and_then(|o| o.range_in(&uri));
            service.collect_references(document, from, exclude, &mut results);
        }
        Ok(results)
    }

    /// Locations of parts matching `from` within `uri` only.
    pub async fn find_references_in(
        &mut self,
        store: &mut DocumentStore,
        uri: &Url,
        from: &Part,
        exclude_range: Option<(usize, usize)>,
    ) -> NavResult<Vec<Location>> {
        let document = store.get(uri).await?;
        let service = Self::ensure(&mut self.services, self.options, document);
        let mut results = Vec::new();
        service.collect_references(document, from, exclude_range, &mut results);
        Ok(results)
    }

    /// Locations of definition-mode parts matching `from` within `uri`,
    /// which in markup means `<style>` block content.
    pub async fn find_definitions_in(
        &mut self,
        store: &mut DocumentStore,
        uri: &Url,
        from: &Part,
        exclude_range: Option<(usize, usize)>,
    ) -> NavResult<Vec<Location>> {
        let document = store.get(uri).await?;
        let service = Self::ensure(&mut self.services, self.options, document);
        let mut results = Vec::new();
        service.collect_definitions(document, from, exclude_range, &mut results);
        Ok(results)
    }

    /// Collect candidate texts for completion from `uri` only.
    pub async fn collect_texts_in(
        &mut self,
        store: &mut DocumentStore,
        uri: &Url,
        pick: impl Fn(&Part) -> Option<String>,
        results: &mut BTreeSet<String>,
    ) -> NavResult<()> {
        let document = store.get(uri).await?;
        let service = Self::ensure(&mut self.services, self.options, document);
        results.extend(service.parts().iter().filter_map(&pick));
        Ok(())
    }

    /// Drop the cached service of a document that stopped being tracked.
    pub fn evict(&mut self, uri: &Url) {
        self.services.remove(uri);
    }

    /// Get the up-to-date service for `document`, rebuilding when the
    /// version moved. Never hands out a stale snapshot.
    fn ensure<'s>(
        services: &'s mut HashMap<Url, HtmlService>,
        options: HtmlParseOptions,
        document: &Document,
    ) -> &'s HtmlService {
        match services.entry(document.uri().clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().version() != document.version() {
                    occupied.insert(HtmlService::build(document, options));
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(HtmlService::build(document, options)),
        }
    }
}
