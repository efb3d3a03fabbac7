use resolver::IndexResolver;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Periodically reads the app's current pointer and records whether the
/// store answered. Runs until the task is dropped.
pub async fn probe_store(resolver: IndexResolver, app_name: String, ready: Arc<AtomicBool>) {
    let mut interval = tokio::time::interval(PROBE_INTERVAL);

    loop {
        // The first tick completes immediately
        interval.tick().await;

        let is_ready = match resolver.probe(&app_name).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store probe failed");
                false
            }
        };

        if ready.swap(is_ready, Ordering::Relaxed) != is_ready {
            tracing::info!(ready = is_ready, "Readiness changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolver::config::ResolverOptions;
    use resolver::store::MemoryStore;

    #[tokio::test]
    async fn test_probe_marks_ready() {
        let resolver = IndexResolver::new(
            Arc::new(MemoryStore::default()),
            ResolverOptions::default(),
        );
        let ready = Arc::new(AtomicBool::new(false));

        let handle = tokio::spawn(probe_store(resolver, "myapp".into(), ready.clone()));

        for _ in 0..10 {
            if ready.load(Ordering::Relaxed) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(ready.load(Ordering::Relaxed));

        handle.abort();
    }
}
