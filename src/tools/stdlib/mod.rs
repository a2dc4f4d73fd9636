//! Standard library tools a host may inject into the global environment

pub mod io_basic;

use crate::tools::ToolRegistry;

/// Register all standard library tools
pub fn register_all(registry: &mut ToolRegistry) {
    io_basic::register(registry);
}
