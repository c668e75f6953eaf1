//! Drives the dev watcher against a real directory

use std::sync::Arc;
use std::time::Duration;

use mqe_template::{FsTemplateLoader, TemplateCache, TemplateLoader, TemplatePaths, TemplateWatcher};
use tokio_util::sync::CancellationToken;

async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..50 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    condition()
}

#[tokio::test]
async fn test_template_change_evicts_cache() {
    let _ = tracing_subscriber::fmt::try_init();

    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("containers")).unwrap();
    std::fs::write(dir.path().join("containers/mystique.html"), "v1").unwrap();

    let paths = TemplatePaths::new(dir.path());
    let cache = Arc::new(TemplateCache::new());
    let loader = FsTemplateLoader::new(paths.clone(), cache.clone());

    let cancel_token = CancellationToken::new();
    let watcher = TemplateWatcher::spawn(&paths, cache.clone(), cancel_token.clone()).unwrap();

    assert_eq!(loader.load("mystique").unwrap().source, "v1");
    assert_eq!(cache.len(), 1);

    std::fs::write(dir.path().join("containers/mystique.html"), "v2").unwrap();

    assert!(wait_until(|| cache.is_empty()).await, "cache was not invalidated");
    assert_eq!(loader.load("mystique").unwrap().source, "v2");

    cancel_token.cancel();
    watcher.join().await;
}

#[tokio::test]
async fn test_watcher_stops_on_cancel() {
    let dir = tempfile::tempdir().unwrap();
    let paths = TemplatePaths::new(dir.path());
    let cache = Arc::new(TemplateCache::new());

    let cancel_token = CancellationToken::new();
    let watcher = TemplateWatcher::spawn(&paths, cache, cancel_token.clone()).unwrap();

    cancel_token.cancel();
    tokio::time::timeout(Duration::from_secs(5), watcher.join())
        .await
        .expect("watcher task did not stop");
}
