use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Build a registry holding every application module for `settings`.
pub fn registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    crate::modules::register_all(&mut registry, settings)
        .context("failed to register modules")?;
    Ok(registry)
}

/// Run the full lifecycle: init and start modules, serve HTTP until shutdown,
/// then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry(&settings)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;
    tracing::info!("shelf-app bootstrap complete");

    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    served
}
