// handlers/mod.rs - HTTP handlers split by security tier
//
// Public (no auth) → Protected (JWT auth, /api/*)

pub mod protected;
pub mod public;
