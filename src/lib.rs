//! venuehub application library: the marketplace modules and the bootstrap
//! that wires them to the kernel and HTTP server.

pub mod modules;

use venuehub_kernel::{AppContext, ModuleRegistry};

/// Build a registry holding every marketplace module.
pub fn build_registry(ctx: &AppContext) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, ctx);
    registry
}

/// Run the full application: module lifecycle plus the HTTP server.
/// Returns when the server stops; modules are shut down on the way out.
pub async fn run(settings: venuehub_kernel::settings::Settings) -> anyhow::Result<()> {
    let ctx = AppContext::new(settings);
    let registry = build_registry(&ctx);

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = venuehub_http::start_server(&registry, &ctx).await;

    registry.stop_all().await?;
    served
}
