//! Portfolio directory watching.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use dreamcraft_manifest::is_image_file;

/// Quiet period after the last filesystem event before changes are reported.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Changes under the portfolio root that can affect the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// File or category directory appeared
    Added(PathBuf),

    /// File or category directory disappeared
    Removed(PathBuf),

    /// Image rewritten or something renamed
    Changed(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Added(p) | WatchEvent::Removed(p) | WatchEvent::Changed(p) => p,
        }
    }
}

/// File watcher for the portfolio tree.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `paths` recursively; paths that do not exist are skipped.
    ///
    /// Returns the watcher and a channel that receives batches of events,
    /// one batch per burst of filesystem activity.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<Vec<WatchEvent>>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::warn!("Not watching missing directory: {}", path.display());
            }
        }

        std::thread::spawn(move || {
            while let Ok(first) = sync_rx.recv() {
                let mut batch = Vec::new();
                collect(&first, &mut batch);

                // Coalesce the rest of the burst.
                while let Ok(event) = sync_rx.recv_timeout(DEBOUNCE) {
                    collect(&event, &mut batch);
                }

                if !batch.is_empty() && async_tx.blocking_send(batch).is_err() {
                    break;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn collect(event: &notify::Event, batch: &mut Vec<WatchEvent>) {
    for path in &event.paths {
        if let Some(e) = classify_event(path, &event.kind) {
            if !batch.contains(&e) {
                batch.push(e);
            }
        }
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Added(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        EventKind::Modify(ModifyKind::Name(_)) => Some(WatchEvent::Changed(path.to_path_buf())),
        EventKind::Modify(_) if is_image_file(path) => {
            Some(WatchEvent::Changed(path.to_path_buf()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};
    use notify::EventKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_relevant_events() {
        let image = Path::new("kitchens/a.jpg");
        let notes = Path::new("kitchens/notes.txt");

        assert_eq!(
            classify_event(image, &EventKind::Create(CreateKind::File)),
            Some(WatchEvent::Added(image.to_path_buf()))
        );
        assert_eq!(
            classify_event(notes, &EventKind::Remove(RemoveKind::File)),
            Some(WatchEvent::Removed(notes.to_path_buf()))
        );
        assert_eq!(
            classify_event(image, &EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(WatchEvent::Changed(image.to_path_buf()))
        );
        assert_eq!(
            classify_event(notes, &EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            None
        );
    }

    #[tokio::test]
    async fn reports_new_images() {
        let temp = tempdir().unwrap();
        let category = temp.path().join("kitchens");
        fs::create_dir_all(&category).unwrap();

        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(category.join("a.jpg"), b"img").unwrap();

        let batch = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(batch.is_ok(), "timeout waiting for file watch event");
        let batch = batch.unwrap().expect("channel should not be closed");
        assert!(batch.iter().any(|e| e.path().ends_with("a.jpg")));
    }
}
