//! Language server implementation
//!
//! Wires the workspace into the Language Server Protocol using tower-lsp:
//! document lifecycle notifications feed the store, navigation requests
//! (references, definition, hover, completion) resolve through the service
//! maps, and configuration can be replaced at runtime. A native file watcher
//! keeps closed documents in sync with the disk; watched-file notifications
//! from the client fold into the same event handling.

use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use crate::config::Configuration;
use crate::error::NavError;
use crate::workspace::watcher::{self, FileEvent};
use crate::workspace::Workspace;

pub struct CssNavigationServer {
    client: Client,
    /// Workspace root the server was started for
    root: PathBuf,
    /// tokio's Mutex rather than std's: every request holds the lock across
    /// the await points of lazy scanning, file reads and reparsing, and
    /// tower-lsp requires the handler futures to be Send.
    workspace: Arc<tokio::sync::Mutex<Workspace>>,
    /// Keeps the native watcher alive; dropping it stops event delivery
    watcher: std::sync::Mutex<Option<notify::RecommendedWatcher>>,
}

impl CssNavigationServer {
    pub fn new(client: Client, root: PathBuf) -> Self {
        let workspace = Workspace::new(root.clone(), Configuration::default());
        Self {
            client,
            root,
            workspace: Arc::new(tokio::sync::Mutex::new(workspace)),
            watcher: std::sync::Mutex::new(None),
        }
    }

    /// Apply a configuration value sent by the client. Invalid settings are
    /// logged and the previous configuration stays active.
    async fn apply_configuration(&self, value: serde_json::Value) {
        // the client may wrap our section under its own key
        let section = value
            .get("cssNavigation")
            .cloned()
            .unwrap_or(value);
        if section.is_null() {
            return;
        }
        match Configuration::from_json(section) {
            Ok(configuration) => {
                self.workspace.lock().await.update_config(configuration);
                log::info!("configuration updated");
            }
            Err(e) => {
                log::warn!("ignoring invalid configuration: {e}");
            }
        }
    }

    /// Start the native file watcher and the task that drains its events
    /// into the workspace.
    fn start_watching(&self) {
        let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
        match watcher::watch_workspace(&self.root, sender) {
            Ok(active) => {
                if let Ok(mut slot) = self.watcher.lock() {
                    *slot = Some(active);
                }
            }
            Err(e) => {
                log::warn!(
                    "file watching unavailable for {}: {e}; relying on client notifications",
                    self.root.display()
                );
                return;
            }
        }
        let workspace = self.workspace.clone();
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                workspace.lock().await.handle_file_event(event);
            }
        });
    }
}

/// Log a failed request and convert it into a protocol error, so the client
/// can tell "query failed" apart from "no result".
fn request_failed(operation: &str, error: NavError) -> tower_lsp::jsonrpc::Error {
    log::error!("{operation} failed: {error}");
    tower_lsp::jsonrpc::Error::internal_error()
}

#[tower_lsp::async_trait]
impl LanguageServer for CssNavigationServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            self.apply_configuration(options).await;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                references_provider: Some(OneOf::Left(true)),
                definition_provider: Some(OneOf::Left(true)),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(false),
                    trigger_characters: Some(vec![
                        "\"".to_string(), // entering an attribute value
                        "'".to_string(),
                        "-".to_string(), // custom property names
                        "(".to_string(), // right after var(
                    ]),
                    all_commit_characters: None,
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    completion_item: None,
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.start_watching();
        self.client
            .log_message(
                MessageType::INFO,
                format!("CSS navigation server ready for {}", self.root.display()),
            )
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        self.workspace
            .lock()
            .await
            .open_document(document.uri, document.text, document.version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        self.workspace.lock().await.change_document(
            &params.text_document.uri,
            &params.content_changes,
            params.text_document.version,
        );
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.workspace
            .lock()
            .await
            .close_document(&params.text_document.uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_configuration(params.settings).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        let mut workspace = self.workspace.lock().await;
        for change in params.changes {
            let Ok(path) = change.uri.to_file_path() else {
                continue;
            };
            let event = match change.typ {
                FileChangeType::CREATED => FileEvent::Created(path),
                FileChangeType::CHANGED => FileEvent::Changed(path),
                FileChangeType::DELETED => FileEvent::Removed(path),
                _ => continue,
            };
            workspace.handle_file_event(event);
        }
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        self.workspace
            .lock()
            .await
            .find_references(&uri, position)
            .await
            .map_err(|e| request_failed("references", e))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        let locations = self
            .workspace
            .lock()
            .await
            .find_definitions(&uri, position)
            .await
            .map_err(|e| request_failed("definition", e))?;
        Ok(locations.map(GotoDefinitionResponse::Array))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;
        self.workspace
            .lock()
            .await
            .hover(&uri, position)
            .await
            .map_err(|e| request_failed("hover", e))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;
        let items = self
            .workspace
            .lock()
            .await
            .completion(&uri, position)
            .await
            .map_err(|e| request_failed("completion", e))?;
        match items {
            Some(items) if !items.is_empty() => Ok(Some(CompletionResponse::Array(items))),
            _ => Ok(None),
        }
    }
}

/// Create and start the language server over stdio.
pub async fn start_server(root: PathBuf) -> Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| CssNavigationServer::new(client, root));
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
