pub mod config;
pub mod errors;
mod readiness;
pub mod service;

use errors::ServerError;
use resolver::{IndexResolver, get_store};
use service::IndexService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub async fn run(config: config::Config) -> Result<(), ServerError> {
    config.validate()?;

    let store = get_store(config.store).await?;
    let resolver = IndexResolver::new(store, config.resolver);

    // Not ready until the store has answered a probe
    let ready = Arc::new(AtomicBool::new(false));
    tokio::spawn(readiness::probe_store(
        resolver.clone(),
        config.app_name.clone(),
        ready.clone(),
    ));

    tracing::info!(app = %config.app_name, "Starting index server");

    let index_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        IndexService::new(resolver, &config.app_name),
    );
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<_, ServerError>::new(move || ready.load(Ordering::Relaxed)),
    );

    tokio::try_join!(index_task, admin_task)?;
    Ok(())
}
