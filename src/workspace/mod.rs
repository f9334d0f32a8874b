//! Workspace state and navigation queries
//!
//! [`Workspace`] owns everything the server knows about one workspace root:
//! the document store, the per-family service maps and the active
//! configuration. Navigation queries (references, definition, hover,
//! completion) are implemented in their own submodules as methods on it.
//!
//! All methods take `&mut self` because queries drive the lazy machinery
//! underneath: scanning the root, reading files and (re)parsing documents
//! all happen on first touch.

pub mod completion;
pub mod definition;
pub mod documents;
pub mod hover;
pub mod references;
pub mod watcher;

use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};

use crate::config::{Configuration, LanguageFamily};
use crate::css::service_map::CssServiceMap;
use crate::html::parser::HtmlParseOptions;
use crate::html::service_map::HtmlServiceMap;
use crate::language::part::Part;
use crate::workspace::documents::DocumentStore;
use crate::workspace::watcher::FileEvent;

pub struct Workspace {
    config: Arc<Configuration>,
    store: DocumentStore,
    html_map: HtmlServiceMap,
    css_map: CssServiceMap,
}

impl Workspace {
    pub fn new(root: PathBuf, config: Configuration) -> Self {
        let config = Arc::new(config);
        Workspace {
            store: DocumentStore::new(root, config.clone()),
            html_map: HtmlServiceMap::new(html_options(&config)),
            css_map: CssServiceMap::new(),
            config,
        }
    }

    /// Swap in a new configuration. Tracked closed documents and every
    /// cached parse are dropped; the next query rescans and reparses.
    pub fn update_config(&mut self, config: Configuration) {
        let config = Arc::new(config);
        self.store.set_config(config.clone());
        self.html_map.set_options(html_options(&config));
        self.css_map.clear();
        self.config = config;
    }

    /// The editor opened `uri`. Only documents of a configured family are
    /// tracked; anything else is ignored.
    pub fn open_document(&mut self, uri: Url, text: String, editor_version: i32) {
        if self.config.family_of_url(&uri).is_none() {
            return;
        }
        self.store.open_document(uri, text, editor_version);
    }

    /// The editor edited `uri`.
    pub fn change_document(
        &mut self,
        uri: &Url,
        changes: &[TextDocumentContentChangeEvent],
        editor_version: i32,
    ) {
        if self.config.family_of_url(uri).is_none() {
            return;
        }
        self.store.change_document(uri, changes, editor_version);
    }

    /// The editor closed `uri`. A document whose file is gone leaves the
    /// store entirely, and its cached parses are dropped with it.
    pub fn close_document(&mut self, uri: &Url) {
        if self.config.family_of_url(uri).is_none() {
            return;
        }
        if let Some(uri) = self.store.close_document(uri) {
            self.html_map.evict(&uri);
            self.css_map.evict(&uri);
        }
    }

    /// Fold one filesystem transition into the store and caches.
    pub fn handle_file_event(&mut self, event: FileEvent) {
        match event {
            FileEvent::Created(path) | FileEvent::Changed(path) => {
                self.store.mark_disk_changed(&path);
            }
            FileEvent::Removed(path) => {
                if let Some(uri) = self.store.remove_file(&path) {
                    self.html_map.evict(&uri);
                    self.css_map.evict(&uri);
                }
            }
        }
    }

    /// The part under the cursor, along with the family of its document.
    /// `Ok(None)` when the document belongs to no family or no part covers
    /// the position.
    pub(crate) async fn part_at_position(
        &mut self,
        uri: &Url,
        position: Position,
    ) -> crate::error::NavResult<Option<(LanguageFamily, Part)>> {
        let Some(family) = self.config.family_of_url(uri) else {
            return Ok(None);
        };
        let offset = {
            let document = self.store.get(uri).await?;
            document.position_to_offset(position)
        };
        let part = match family {
            LanguageFamily::Html => self.html_map.part_at(&mut self.store, uri, offset).await?,
            LanguageFamily::Css => self.css_map.part_at(&mut self.store, uri, offset).await?,
        };
        Ok(part.map(|part| (family, part)))
    }
}

fn html_options(config: &Configuration) -> HtmlParseOptions {
    HtmlParseOptions {
        ignore_custom_element: config.ignore_custom_element,
    }
}
