//! Core traits and shared context for the venuehub modular service.

pub mod context;
pub mod module;
pub mod registry;
pub mod settings;

pub use context::AppContext;
pub use module::Module;
pub use registry::ModuleRegistry;
