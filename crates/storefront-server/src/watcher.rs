//! Watching the site configuration for changes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the config watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The file was written or replaced
    Changed(PathBuf),

    /// The file was removed
    Removed(PathBuf),
}

/// Watches one configuration file.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by replacing the file are still seen.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Start watching `config_path`.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        config_path: &Path,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let file_name = config_path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("Not a file path: {}", config_path.display()),
                )
            })?;

        let dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(std::io::Error::other)?;

        std::thread::spawn(move || {
            let mut last_event_time: Option<Instant> = None;
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                for path in &event.paths {
                    let Some(watch_event) = classify_event(path, &event.kind, &file_name) else {
                        continue;
                    };

                    // Debounce the bursts editors produce on save
                    let now = Instant::now();
                    if matches!(watch_event, WatchEvent::Changed(_))
                        && last_event_time.is_some_and(|t| now.duration_since(t) < debounce_duration)
                    {
                        continue;
                    }
                    last_event_time = Some(now);

                    if async_tx.blocking_send(watch_event).is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Classify a notify event for the watched file.
fn classify_event(path: &Path, kind: &notify::EventKind, file_name: &OsString) -> Option<WatchEvent> {
    use notify::EventKind;

    if path.file_name() != Some(file_name.as_os_str()) {
        return None;
    }

    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn classifies_only_the_config_file() {
        use notify::event::{CreateKind, ModifyKind, RemoveKind};
        use notify::EventKind;

        let name = OsString::from("site.toml");

        assert_eq!(
            classify_event(Path::new("/x/site.toml"), &EventKind::Modify(ModifyKind::Any), &name),
            Some(WatchEvent::Changed(PathBuf::from("/x/site.toml")))
        );
        assert_eq!(
            classify_event(Path::new("/x/site.toml"), &EventKind::Create(CreateKind::File), &name),
            Some(WatchEvent::Changed(PathBuf::from("/x/site.toml")))
        );
        assert_eq!(
            classify_event(Path::new("/x/site.toml"), &EventKind::Remove(RemoveKind::File), &name),
            Some(WatchEvent::Removed(PathBuf::from("/x/site.toml")))
        );
        assert_eq!(
            classify_event(Path::new("/x/other.toml"), &EventKind::Modify(ModifyKind::Any), &name),
            None
        );
    }

    #[tokio::test]
    async fn watches_config_changes() {
        let temp = tempdir().unwrap();
        let config = temp.path().join("site.toml");
        fs::write(&config, "").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&config).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();
        fs::write(&config, "[identity]\nname = \"Lamp Shop\"\n").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        let event = event.expect("timeout waiting for config watch event");
        assert!(matches!(event, Some(WatchEvent::Changed(path)) if path.ends_with("site.toml")));
    }
}
