//! Bookshelf application library
//!
//! Wires the books module onto the HTTP facade and drives the module lifecycle.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::Services;

/// Build a registry holding every application module.
pub fn build_registry(services: &Services) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, services);
    registry
}

/// Run the service until Ctrl-C, then stop modules in reverse order.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let services = Services::from_settings(&settings)?;
    let registry = build_registry(&services);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry
        .stop_modules()
        .await
        .with_context(|| "failed to stop modules")?;

    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
