pub mod accounts;
pub mod bookings;
pub mod dashboard;
pub mod favorites;
pub mod notifications;
pub mod venues;

use venuehub_kernel::{AppContext, ModuleRegistry};

/// Register every marketplace module. Order matters only for lifecycle
/// logging; routes are mounted side by side under `/api/{name}`.
pub fn register_all(registry: &mut ModuleRegistry, ctx: &AppContext) {
    registry.register(accounts::create_module(ctx.clone()));
    registry.register(venues::create_module(ctx.clone()));
    registry.register(bookings::create_module(ctx.clone()));
    registry.register(favorites::create_module(ctx.clone()));
    registry.register(notifications::create_module(ctx.clone()));
    registry.register(dashboard::create_module(ctx.clone()));
}
