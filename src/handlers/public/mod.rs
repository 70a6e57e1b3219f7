// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service info and health checks for load balancers and the CLI.

pub mod system;

pub use system::{health, root};
