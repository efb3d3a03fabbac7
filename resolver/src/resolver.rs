use crate::config::ResolverOptions;
use crate::errors::{IndexError, StoreError};
use crate::key::LookupKey;
use crate::metrics_defs::{RESOLVE_DURATION, RESOLVE_ERROR, RESOLVE_SUCCESS};
use crate::store::IndexStore;
use shared::{counter, histogram};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Query-string parameters of an incoming request.
pub trait QueryParams {
    fn query_param(&self, name: &str) -> Option<&str>;
}

impl QueryParams for HashMap<String, String> {
    fn query_param(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl QueryParams for HashMap<&str, &str> {
    fn query_param(&self, name: &str) -> Option<&str> {
        self.get(name).copied()
    }
}

/// Resolves the index document to serve for an app.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct IndexResolver {
    store: Arc<dyn IndexStore>,
    options: ResolverOptions,
}

impl IndexResolver {
    pub fn new(store: Arc<dyn IndexStore>, options: ResolverOptions) -> Self {
        IndexResolver { store, options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub async fn resolve<Q>(&self, app_name: &str, query: &Q) -> Result<String, IndexError>
    where
        Q: QueryParams + ?Sized,
    {
        resolve(app_name, query, self.store.as_ref(), &self.options).await
    }

    /// Reads the app's current pointer to check that the store answers.
    /// A missing pointer still counts as reachable.
    pub async fn probe(&self, app_name: &str) -> Result<(), StoreError> {
        self.store
            .get(LookupKey::current(app_name).as_str())
            .await
            .map(|_| ())
    }
}

/// Resolves the index document for `app_name`.
///
/// If the request names a revision through `options.revision_query_param`,
/// that revision is read directly and a miss is a non-critical error.
/// Otherwise the `<app>:current` pointer is followed and any miss along the
/// way is critical.
pub async fn resolve<Q>(
    app_name: &str,
    query: &Q,
    store: &dyn IndexStore,
    options: &ResolverOptions,
) -> Result<String, IndexError>
where
    Q: QueryParams + ?Sized,
{
    let start = Instant::now();
    let result = resolve_document(app_name, query, store, options).await;
    histogram!(RESOLVE_DURATION).record(start.elapsed().as_secs_f64());

    match &result {
        Ok(_) => counter!(RESOLVE_SUCCESS).increment(1),
        Err(err) if err.is_critical() => {
            tracing::error!(app = app_name, error = %err, "Index resolution failed");
            counter!(RESOLVE_ERROR, "critical" => "true").increment(1);
        }
        Err(err) => {
            tracing::debug!(app = app_name, error = %err, "Requested revision unavailable");
            counter!(RESOLVE_ERROR, "critical" => "false").increment(1);
        }
    }

    result
}

async fn resolve_document<Q>(
    app_name: &str,
    query: &Q,
    store: &dyn IndexStore,
    options: &ResolverOptions,
) -> Result<String, IndexError>
where
    Q: QueryParams + ?Sized,
{
    let requested = query
        .query_param(&options.revision_query_param)
        .filter(|token| !token.is_empty());

    let (key, custom_revision) = match requested {
        Some(token) => (LookupKey::revision(app_name, token), true),
        None => (current_revision_key(app_name, store).await?, false),
    };

    tracing::debug!(app = app_name, key = %key, custom_revision, "Fetching index");

    match store.get(key.as_str()).await {
        Ok(Some(html)) if !html.is_empty() => Ok(html),
        Ok(_) => Err(missing_revision(key, custom_revision)),
        Err(StoreError::Timeout(_)) => Err(IndexError::StoreTimeout {
            key,
            critical: !custom_revision,
        }),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "Store read failed");
            Err(missing_revision(key, custom_revision))
        }
    }
}

/// Follows the `<app>:current` pointer to the key of the current revision.
async fn current_revision_key(
    app_name: &str,
    store: &dyn IndexStore,
) -> Result<LookupKey, IndexError> {
    let pointer = LookupKey::current(app_name);
    let no_current = || IndexError::NoCurrentRevision {
        app: app_name.to_string(),
    };

    match store.get(pointer.as_str()).await {
        Ok(Some(target)) if !target.is_empty() => Ok(LookupKey::from_pointer(target)),
        Ok(_) => Err(no_current()),
        Err(StoreError::Timeout(_)) => Err(IndexError::StoreTimeout {
            key: pointer,
            critical: true,
        }),
        Err(err) => {
            tracing::warn!(key = %pointer, error = %err, "Store read failed");
            Err(no_current())
        }
    }
}

fn missing_revision(key: LookupKey, custom_revision: bool) -> IndexError {
    if custom_revision {
        IndexError::RevisionNotFound { key }
    } else {
        IndexError::CurrentRevisionMissing { key }
    }
}
