//! Dev-mode template cache invalidation.
//!
//! A `notify` watcher observes the template root. Its events are forwarded to
//! a tokio task which evicts the template namespace from the module cache
//! whenever a template file is added, changed or removed.

use std::path::PathBuf;
use std::sync::Arc;

use globset::{Glob, GlobMatcher};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{ModuleCache, TEMPLATE_NAMESPACE};
use crate::error::Result;
use crate::paths::{TemplatePaths, WATCH_GLOB};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Change,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Watch registration finished. Earlier events are part of the initial scan.
    Ready,
    Changed { kind: ChangeKind, path: PathBuf },
}

impl WatchEvent {
    pub fn from_notify(event: Event) -> Vec<WatchEvent> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Add,
            EventKind::Modify(_) => ChangeKind::Change,
            EventKind::Remove(_) => ChangeKind::Remove,
            _ => return Vec::new(),
        };

        event
            .paths
            .into_iter()
            .map(|path| WatchEvent::Changed { kind, path })
            .collect()
    }
}

/// Turns watch events into cache evictions.
pub struct Invalidator {
    cache: Arc<dyn ModuleCache>,
    namespace: String,
    matcher: GlobMatcher,
    ready: bool,
}

impl Invalidator {
    pub fn new(cache: Arc<dyn ModuleCache>, namespace: impl Into<String>) -> Result<Self> {
        Ok(Self {
            cache,
            namespace: namespace.into(),
            matcher: Glob::new(WATCH_GLOB)?.compile_matcher(),
            ready: false,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns the number of evicted modules, or `None` if the event was ignored.
    pub fn handle(&mut self, event: WatchEvent) -> Option<usize> {
        match event {
            WatchEvent::Ready => {
                self.ready = true;
                debug!("template watcher ready");
                None
            }
            WatchEvent::Changed { .. } if !self.ready => None,
            WatchEvent::Changed { kind, path } => {
                if !self.matcher.is_match(&path) {
                    return None;
                }

                let evicted = self.cache.invalidate(&self.namespace);
                info!(
                    ?kind,
                    path = %path.display(),
                    evicted,
                    "template changed, cache invalidated"
                );
                Some(evicted)
            }
        }
    }

    pub async fn run(mut self, mut events: UnboundedReceiver<WatchEvent>, cancel_token: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(event);
                    }
                    None => break,
                },
            }
        }

        debug!("template watcher stopped");
    }
}

/// Keeps the file-system watcher alive alongside its invalidation task.
pub struct TemplateWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl TemplateWatcher {
    /// Starts watching the template root. Must be called inside a tokio runtime.
    pub fn spawn(
        paths: &TemplatePaths,
        cache: Arc<dyn ModuleCache>,
        cancel_token: CancellationToken,
    ) -> Result<Self> {
        let invalidator = Invalidator::new(cache, TEMPLATE_NAMESPACE)?;
        let (tx, rx) = unbounded_channel();

        let event_tx = tx.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for event in WatchEvent::from_notify(event) {
                    let _ = event_tx.send(event);
                }
            }
            Err(e) => warn!("template watcher error: {}", e),
        })?;

        watcher.watch(paths.watch_root(), RecursiveMode::Recursive)?;
        let _ = tx.send(WatchEvent::Ready);

        info!(root = %paths.watch_root().display(), "watching templates");

        let task = tokio::spawn(invalidator.run(rx, cancel_token));

        Ok(Self {
            _watcher: watcher,
            task,
        })
    }

    /// Waits for the invalidation task to finish after its token was cancelled.
    pub async fn join(self) {
        let TemplateWatcher { _watcher, task } = self;
        let _ = task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{TemplateCache, TemplateModule, module_id};

    fn cache_with_module() -> Arc<TemplateCache> {
        let cache = Arc::new(TemplateCache::new());
        cache.insert(
            TemplateModule {
                id: module_id(TEMPLATE_NAMESPACE, "containers/mystique.html"),
                name: "containers/mystique.html".to_string(),
                path: PathBuf::from("containers/mystique.html"),
                source: String::new(),
            },
            cache.generation(),
        );
        cache
    }

    fn changed(path: &str) -> WatchEvent {
        WatchEvent::Changed {
            kind: ChangeKind::Change,
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_events_before_ready_are_ignored() {
        let cache = cache_with_module();
        let mut invalidator = Invalidator::new(cache.clone(), TEMPLATE_NAMESPACE).unwrap();

        assert_eq!(invalidator.handle(changed("/t/containers/mystique.html")), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(invalidator.handle(WatchEvent::Ready), None);
        assert!(invalidator.is_ready());
        assert_eq!(invalidator.handle(changed("/t/containers/mystique.html")), Some(1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_non_template_paths_are_ignored() {
        let cache = cache_with_module();
        let mut invalidator = Invalidator::new(cache.clone(), TEMPLATE_NAMESPACE).unwrap();
        invalidator.handle(WatchEvent::Ready);

        assert_eq!(invalidator.handle(changed("/t/containers/.mystique.html.swp")), None);
        assert_eq!(invalidator.handle(changed("/t/notes.txt")), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_add_and_remove_evict() {
        let cache = cache_with_module();
        let mut invalidator = Invalidator::new(cache.clone(), TEMPLATE_NAMESPACE).unwrap();
        invalidator.handle(WatchEvent::Ready);

        let added = WatchEvent::Changed {
            kind: ChangeKind::Add,
            path: PathBuf::from("/t/partials/new.html"),
        };
        assert_eq!(invalidator.handle(added), Some(1));

        let removed = WatchEvent::Changed {
            kind: ChangeKind::Remove,
            path: PathBuf::from("/t/partials/new.html"),
        };
        assert_eq!(invalidator.handle(removed), Some(0));
    }

    #[test]
    fn test_from_notify_skips_access_events() {
        let event = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/t/a.html"));
        assert!(WatchEvent::from_notify(event).is_empty());

        let event = Event::new(EventKind::Create(notify::event::CreateKind::File))
            .add_path(PathBuf::from("/t/a.html"))
            .add_path(PathBuf::from("/t/b.html"));
        assert_eq!(WatchEvent::from_notify(event).len(), 2);
    }
}
