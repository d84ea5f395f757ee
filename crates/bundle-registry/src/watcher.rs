//! Directory watching service
//!
//! A single background task drains filesystem notifications and feeds them
//! to the [`EventProcessor`] one at a time. The processor's file I/O runs on
//! the blocking pool, each call awaited before the next event is taken.
//! Files that are still locked by a writer get a per-path timer that
//! re-enqueues a check after the retry delay; a newer event for the same
//! path cancels that timer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bundle_fs::NormalizedPath;
use notify::event::{AccessKind, AccessMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::processor::{EventOutcome, EventProcessor};

/// What happened to a path, reduced to what the processor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Created, written, renamed or otherwise possibly changed
    Change,
    Remove,
}

impl ChangeKind {
    /// Map a notify event kind; `None` for kinds that cannot alter content.
    pub fn from_event_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any => Some(Self::Change),
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => Some(Self::Change),
            EventKind::Remove(_) => Some(Self::Remove),
            EventKind::Access(_) | EventKind::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileEvent {
    path: PathBuf,
    kind: ChangeKind,
}

/// Watches one directory (non-recursively) and keeps a registry in step
/// with the archives in it.
pub struct DirectoryWatcher {
    dir: PathBuf,
    processor: Arc<EventProcessor>,
    retry_delay: Duration,
}

impl DirectoryWatcher {
    pub fn new(
        dir: impl Into<PathBuf>,
        processor: Arc<EventProcessor>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            dir: dir.into(),
            processor,
            retry_delay,
        }
    }

    /// Subscribe to the directory and start the background task.
    ///
    /// The subscription is in place before the initial scan starts, so no
    /// change made during the scan is missed; live events are processed
    /// only once the scan has finished. A shutdown during the scan stops it
    /// after the file in progress. Must be called from within a tokio
    /// runtime.
    pub fn spawn(self) -> Result<WatcherHandle> {
        if !self.dir.is_dir() {
            return Err(Error::NotADirectory { path: self.dir });
        }
        let dir = NormalizedPath::new(&self.dir).canonicalize()?.to_native();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let notify_tx = event_tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let Some(kind) = ChangeKind::from_event_kind(&event.kind) else {
                        return;
                    };
                    for path in event.paths {
                        let _ = notify_tx.send(FileEvent { path, kind });
                    }
                }
                Err(e) => tracing::error!(error = %e, "watch backend error"),
            },
            Config::default(),
        )
        .map_err(|source| Error::Watch {
            path: dir.clone(),
            source,
        })?;
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|source| Error::Watch {
                path: dir.clone(),
                source,
            })?;
        tracing::info!(dir = %dir.display(), "watching directory");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let event_loop = EventLoop {
            dir,
            processor: self.processor,
            retry_delay: self.retry_delay,
            retry_tx: event_tx,
            timers: HashMap::new(),
        };
        let task = tokio::spawn(event_loop.run(watcher, event_rx, shutdown_rx));

        Ok(WatcherHandle {
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Controls a running [`DirectoryWatcher`].
///
/// Dropping the handle also stops the watcher.
pub struct WatcherHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Ask the watcher to stop. Pending retry waits are abandoned.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Wait for the background task to finish.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "watcher task failed");
        }
    }

    /// Shut down and wait.
    pub async fn stop(self) {
        self.shutdown();
        self.join().await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

struct EventLoop {
    dir: PathBuf,
    processor: Arc<EventProcessor>,
    retry_delay: Duration,
    retry_tx: mpsc::UnboundedSender<FileEvent>,
    timers: HashMap<PathBuf, JoinHandle<()>>,
}

impl EventLoop {
    async fn run(
        mut self,
        _watcher: RecommendedWatcher,
        mut events: mpsc::UnboundedReceiver<FileEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        if self.initial_scan(&mut shutdown).await {
            loop {
                tokio::select! {
                    _ = shutdown.changed() => break,
                    event = events.recv() => match event {
                        Some(event) => self.dispatch(event).await,
                        None => break,
                    },
                }
            }
        }

        for (path, timer) in self.timers.drain() {
            tracing::debug!(path = %path.display(), "abandoning retry wait");
            timer.abort();
        }
        tracing::info!(dir = %self.dir.display(), "watcher stopped");
    }

    /// Returns `false` when shutdown arrived before the scan completed.
    async fn initial_scan(&mut self, shutdown: &mut watch::Receiver<bool>) -> bool {
        let cancel = Arc::new(AtomicBool::new(false));
        let mut scan = {
            let processor = Arc::clone(&self.processor);
            let dir = self.dir.clone();
            let cancel = Arc::clone(&cancel);
            tokio::task::spawn_blocking(move || processor.scan_until(&dir, &cancel))
        };

        let scanned = tokio::select! {
            scanned = &mut scan => scanned,
            _ = shutdown.changed() => {
                cancel.store(true, Ordering::Relaxed);
                let _ = scan.await;
                return false;
            }
        };

        match scanned {
            Ok(Ok(report)) => {
                for path in report.pending {
                    self.schedule_retry(path);
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "initial scan failed")
            }
            Err(e) => {
                tracing::error!(dir = %self.dir.display(), error = %e, "initial scan task failed")
            }
        }
        true
    }

    async fn dispatch(&mut self, event: FileEvent) {
        if let Some(timer) = self.timers.remove(&event.path) {
            timer.abort();
        }
        if !is_direct_child(&self.dir, &event.path) {
            return;
        }

        let processor = Arc::clone(&self.processor);
        let path = event.path.clone();
        let kind = event.kind;
        let handled = tokio::task::spawn_blocking(move || match kind {
            ChangeKind::Change => processor.handle_change(&path),
            ChangeKind::Remove => processor.handle_remove(&path),
        })
        .await;

        match handled {
            Ok(EventOutcome::RetryWait) => self.schedule_retry(event.path),
            Ok(_) => {}
            Err(e) => {
                tracing::error!(path = %event.path.display(), error = %e, "event task failed")
            }
        }
    }

    fn schedule_retry(&mut self, path: PathBuf) {
        tracing::debug!(
            path = %path.display(),
            delay_ms = self.retry_delay.as_millis() as u64,
            "retry scheduled"
        );
        let tx = self.retry_tx.clone();
        let delay = self.retry_delay;
        let event = FileEvent {
            path: path.clone(),
            kind: ChangeKind::Change,
        };
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
        self.timers.insert(path, timer);
    }
}

fn is_direct_child(dir: &Path, path: &Path) -> bool {
    path.parent() == Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};

    #[test]
    fn test_event_kind_mapping() {
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Create(CreateKind::File)),
            Some(ChangeKind::Change)
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(ChangeKind::Change)
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Remove(RemoveKind::File)),
            Some(ChangeKind::Remove)
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Access(AccessKind::Close(AccessMode::Write))),
            Some(ChangeKind::Change)
        );
        assert_eq!(
            ChangeKind::from_event_kind(&EventKind::Access(AccessKind::Open(AccessMode::Read))),
            None
        );
    }

    #[test]
    fn test_direct_child() {
        let dir = Path::new("/srv/bundles");
        assert!(is_direct_child(dir, Path::new("/srv/bundles/a.jar")));
        assert!(!is_direct_child(dir, Path::new("/srv/bundles/sub/a.jar")));
        assert!(!is_direct_child(dir, Path::new("/srv/other/a.jar")));
    }
}
