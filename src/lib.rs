//! # Sketchem Core
//!
//! Core crate for the Sketchem chemical structure editor: the molecular
//! graph model and the reversible action system behind undo/redo.

pub mod editor;
pub mod graph;
pub mod math;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Placeholder for future application bootstrap
pub fn init() {
    log::info!("Sketchem Core v{} initialized", VERSION);
}
