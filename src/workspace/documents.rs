//! Tracked documents and their text
//!
//! One entry per file the workspace cares about, discovered by scanning the
//! root directory and kept honest by editor notifications and the file
//! watcher. Text is loaded lazily: scanning only records that a file exists,
//! the first query against it reads it from disk. Open editor buffers
//! override the filesystem until they close.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use crate::config::{Configuration, LanguageFamily};
use crate::error::{IoContext, NavError, NavResult};
use crate::language::document::{Document, DocumentVersion};

#[derive(Debug)]
struct DocumentEntry {
    version: DocumentVersion,
    /// Whether the editor currently owns this document's content
    open: bool,
    /// Materialized text; `None` until first use and after invalidation
    document: Option<Document>,
}

impl DocumentEntry {
    fn tracked_from_disk() -> Self {
        DocumentEntry {
            version: DocumentVersion::initial(),
            open: false,
            document: None,
        }
    }
}

#[derive(Debug)]
pub struct DocumentStore {
    root: PathBuf,
    config: Arc<Configuration>,
    entries: HashMap<Url, DocumentEntry>,
    scanned: bool,
}

impl DocumentStore {
    pub fn new(root: PathBuf, config: Arc<Configuration>) -> Self {
        DocumentStore {
            root,
            config,
            entries: HashMap::new(),
            scanned: false,
        }
    }

    /// Swap in a new configuration. Closed entries are dropped so the next
    /// scan re-applies extension lists and glob filters; open editors keep
    /// their documents.
    pub fn set_config(&mut self, config: Arc<Configuration>) {
        self.config = config;
        self.scanned = false;
        self.entries.retain(|_, entry| entry.open);
    }

    /// The editor opened `uri`; its buffer text is authoritative now.
    pub fn open_document(&mut self, uri: Url, text: String, editor_version: i32) {
        let entry = self
            .entries
            .entry(uri.clone())
            .or_insert_with(DocumentEntry::tracked_from_disk);
        entry.version.major += 1;
        entry.version.minor = editor_version;
        entry.open = true;
        entry.document = Some(Document::new(uri, text, entry.version));
    }

    /// Apply editor edits to an open document.
    pub fn change_document(
        &mut self,
        uri: &Url,
        changes: &[TextDocumentContentChangeEvent],
        editor_version: i32,
    ) {
        let Some(entry) = self.entries.get_mut(uri) else {
            log::warn!("change for untracked document {uri}");
            return;
        };
        if !entry.open {
            log::warn!("change for document that is not open {uri}");
            return;
        }
        entry.version.minor = editor_version;
        if let Some(document) = entry.document.as_mut() {
            document.apply_changes(changes);
            document.set_version(entry.version);
        }
    }

    /// The editor closed `uri`; the filesystem owns the content again. A
    /// document whose file never existed (or no longer exists) is dropped
    /// entirely; its URI is returned so cached services can be evicted.
    pub fn close_document(&mut self, uri: &Url) -> Option<Url> {
        let entry = self.entries.get_mut(uri)?;
        entry.open = false;
        entry.version.major += 1;
        entry.version.minor = 0;
        entry.document = None;
        let on_disk = uri
            .to_file_path()
            .map(|path| path.is_file())
            .unwrap_or(false);
        if on_disk {
            return None;
        }
        self.entries.remove(uri);
        Some(uri.clone())
    }

    /// A file changed or appeared on disk. Editor-open documents ignore it;
    /// closed ones drop their text and move their version forward. Unknown
    /// paths that pass the scan filters start being tracked.
    pub fn mark_disk_changed(&mut self, path: &Path) {
        let Ok(uri) = Url::from_file_path(path) else {
            return;
        };
        if let Some(entry) = self.entries.get_mut(&uri) {
            if !entry.open {
                entry.version.minor += 1;
                entry.document = None;
            }
            return;
        }
        if self.admits(path) {
            self.entries.insert(uri, DocumentEntry::tracked_from_disk());
        }
    }

    /// A file disappeared from disk. Open documents survive until the
    /// editor closes them. Returns the untracked URI so cached services can
    /// be evicted.
    pub fn remove_file(&mut self, path: &Path) -> Option<Url> {
        let uri = Url::from_file_path(path).ok()?;
        let open = self.entries.get(&uri).map(|entry| entry.open)?;
        if open {
            return None;
        }
        self.entries.remove(&uri);
        Some(uri)
    }

    /// The current document for `uri`, reading it from disk when no text is
    /// materialized yet. Fails for untracked URIs and on read errors.
    pub async fn get(&mut self, uri: &Url) -> NavResult<&Document> {
        self.ensure_scanned()?;
        let needs_load = match self.entries.get(uri) {
            Some(entry) => entry.document.is_none(),
            None => {
                return Err(NavError::UntrackedDocument { uri: uri.clone() });
            }
        };
        if needs_load {
            let path = uri
                .to_file_path()
                .map_err(|()| NavError::UntrackedDocument { uri: uri.clone() })?;
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_io_context(&format!("failed to read {}", path.display()))?;
            if let Some(entry) = self.entries.get_mut(uri) {
                entry.document = Some(Document::new(uri.clone(), text, entry.version));
            }
        }
        self.entries
            .get(uri)
            .and_then(|entry| entry.document.as_ref())
            .ok_or_else(|| NavError::UntrackedDocument { uri: uri.clone() })
    }

    /// All tracked documents of one family, sorted by URI for deterministic
    /// result ordering. For the stylesheet family the same-name rule applies:
    /// `x.css` is dropped when a sibling `x.scss`/`x.sass`/`x.less` is
    /// tracked, since the compiled file would double every result.
    pub fn family_documents(&mut self, family: LanguageFamily) -> NavResult<Vec<Url>> {
        self.ensure_scanned()?;
        let mut uris: Vec<Url> = self
            .entries
            .keys()
            .filter(|uri| self.config.family_of_url(uri) == Some(family))
            .cloned()
            .collect();
        if family == LanguageFamily::Css && self.config.ignore_same_name_css_file {
            uris.retain(|uri| !self.has_preprocessor_sibling(uri));
        }
        uris.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(uris)
    }

    fn has_preprocessor_sibling(&self, uri: &Url) -> bool {
        let Ok(path) = uri.to_file_path() else {
            return false;
        };
        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_none_or(|e| !e.eq_ignore_ascii_case("css"))
        {
            return false;
        }
        ["scss", "sass", "less"].iter().any(|extension| {
            Url::from_file_path(path.with_extension(extension))
                .is_ok_and(|sibling| self.entries.contains_key(&sibling))
        })
    }

    /// Whether `path` belongs in the store per the current configuration.
    pub fn admits(&self, path: &Path) -> bool {
        if self.config.family_of_path(path).is_none() {
            return false;
        }
        let Some(relative) = self.relative_path(path) else {
            return false;
        };
        !self.config.is_excluded(&relative)
    }

    fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let text = relative.to_string_lossy().replace('\\', "/");
        Some(text)
    }

    /// Walk the workspace root once, recording every admissible file. A
    /// missing or unreadable root fails the query that triggered the scan;
    /// unreadable subdirectories are logged and skipped.
    fn ensure_scanned(&mut self) -> NavResult<()> {
        if self.scanned {
            return Ok(());
        }
        let root = self.root.clone();
        let entries = std::fs::read_dir(&root)
            .with_io_context(&format!("failed to scan workspace root {}", root.display()))?;
        // only mark scanned once the root opened; a missing root stays an
        // error on every query instead of turning into silent emptiness
        self.scanned = true;
        self.scan_entries(entries);
        log::info!(
            "workspace scan found {} documents under {}",
            self.entries.len(),
            root.display()
        );
        Ok(())
    }

    fn scan_entries(&mut self, entries: std::fs::ReadDir) {
        let mut pending = vec![entries];
        while let Some(current) = pending.pop() {
            for entry in current {
                let Ok(entry) = entry else { continue };
                let path = entry.path();
                let file_type = match entry.file_type() {
                    Ok(file_type) => file_type,
                    Err(e) => {
                        log::warn!("skipping {}: {e}", path.display());
                        continue;
                    }
                };
                if file_type.is_dir() {
                    if self.should_descend(&path) {
                        match std::fs::read_dir(&path) {
                            Ok(children) => pending.push(children),
                            Err(e) => log::warn!("skipping directory {}: {e}", path.display()),
                        }
                    }
                } else if file_type.is_file() && self.admits(&path) {
                    if let Ok(uri) = Url::from_file_path(&path) {
                        self.entries
                            .entry(uri)
                            .or_insert_with(DocumentEntry::tracked_from_disk);
                    }
                }
            }
        }
    }

    fn should_descend(&self, dir: &Path) -> bool {
        // with always-include patterns in play an excluded directory can
        // still contain admitted files, so it can't be pruned
        if !self.config.can_prune_directories() {
            return true;
        }
        match self.relative_path(dir) {
            Some(mut relative) => {
                relative.push('/');
                !self.config.is_excluded(&relative)
            }
            None => true,
        }
    }
}
