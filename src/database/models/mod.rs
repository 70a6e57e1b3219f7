pub mod post;
pub mod profile;

pub use post::{Post, PostDraft};
pub use profile::Profile;
