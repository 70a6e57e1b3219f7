// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, which puts an
// `AuthUser` into the request extensions. Posts are always scoped to that user.

pub mod media;
pub mod posts;
pub mod profile;
