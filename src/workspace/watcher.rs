//! Workspace file watching
//!
//! Watches the workspace root recursively and reduces raw filesystem
//! notifications to the three transitions the document store cares about.
//! Renames count as a removal of the old path plus a creation of the new
//! one. The returned watcher must be kept alive for events to keep flowing.

use std::path::{Path, PathBuf};

use notify::event::{Event, EventKind, ModifyKind, RenameMode};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::NavResult;

/// A filesystem transition relevant to document tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Created(PathBuf),
    Changed(PathBuf),
    Removed(PathBuf),
}

/// Start watching `root` recursively, forwarding classified events through
/// `sender`. Watch errors are logged; a closed receiver silently drops
/// events, which only happens during shutdown.
pub fn watch_workspace(
    root: &Path,
    sender: UnboundedSender<FileEvent>,
) -> NavResult<notify::RecommendedWatcher> {
    let mut watcher =
        notify::recommended_watcher(move |result: Result<Event, notify::Error>| match result {
            Ok(event) => {
                for file_event in classify(&event) {
                    let _ = sender.send(file_event);
                }
            }
            Err(e) => {
                log::warn!("file watch error: {e}");
            }
        })?;
    watcher.watch(root, RecursiveMode::Recursive)?;
    Ok(watcher)
}

/// Reduce one notification to document store transitions. Rename events
/// carry the old path, the new path, or both, depending on the platform.
fn classify(event: &Event) -> Vec<FileEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.iter().cloned().map(FileEvent::Created).collect(),
        EventKind::Remove(_) => event.paths.iter().cloned().map(FileEvent::Removed).collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            event.paths.iter().cloned().map(FileEvent::Removed).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            event.paths.iter().cloned().map(FileEvent::Created).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut events = Vec::new();
            if let Some(from) = event.paths.first() {
                events.push(FileEvent::Removed(from.clone()));
            }
            if let Some(to) = event.paths.get(1) {
                events.push(FileEvent::Created(to.clone()));
            }
            events
        }
        // a rename with unknown direction: existence decides
        EventKind::Modify(ModifyKind::Name(_)) => event
            .paths
            .iter()
            .map(|path| {
                if path.exists() {
                    FileEvent::Created(path.clone())
                } else {
                    FileEvent::Removed(path.clone())
                }
            })
            .collect(),
        EventKind::Modify(_) => event.paths.iter().cloned().map(FileEvent::Changed).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut event = Event::new(kind);
        for path in paths {
            event = event.add_path(PathBuf::from(path));
        }
        event
    }

    #[test]
    fn test_create_and_remove_map_directly() {
        let created = classify(&event(EventKind::Create(CreateKind::File), &["/w/a.css"]));
        assert_eq!(created, vec![FileEvent::Created(PathBuf::from("/w/a.css"))]);
        let removed = classify(&event(EventKind::Remove(RemoveKind::File), &["/w/a.css"]));
        assert_eq!(removed, vec![FileEvent::Removed(PathBuf::from("/w/a.css"))]);
    }

    #[test]
    fn test_content_change_maps_to_changed() {
        let changed = classify(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/w/a.css"],
        ));
        assert_eq!(changed, vec![FileEvent::Changed(PathBuf::from("/w/a.css"))]);
    }

    #[test]
    fn test_metadata_change_maps_to_changed() {
        let changed = classify(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            &["/w/a.css"],
        ));
        assert_eq!(changed, vec![FileEvent::Changed(PathBuf::from("/w/a.css"))]);
    }

    #[test]
    fn test_rename_both_splits_into_remove_and_create() {
        let events = classify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/w/old.css", "/w/new.css"],
        ));
        assert_eq!(
            events,
            vec![
                FileEvent::Removed(PathBuf::from("/w/old.css")),
                FileEvent::Created(PathBuf::from("/w/new.css")),
            ]
        );
    }

    #[test]
    fn test_rename_halves_map_by_direction() {
        let from = classify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/w/old.css"],
        ));
        assert_eq!(from, vec![FileEvent::Removed(PathBuf::from("/w/old.css"))]);
        let to = classify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/w/new.css"],
        ));
        assert_eq!(to, vec![FileEvent::Created(PathBuf::from("/w/new.css"))]);
    }

    #[test]
    fn test_access_events_ignored() {
        let events = classify(&event(
            EventKind::Access(notify::event::AccessKind::Open(
                notify::event::AccessMode::Read,
            )),
            &["/w/a.css"],
        ));
        assert!(events.is_empty());
    }
}
