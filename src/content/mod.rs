// Post content processing: embedded image extraction, cleanup and rewriting

pub mod images;

pub use images::{
    find_orphans, image_sources, is_hosted, remove_images, replace_images, scan_images,
    ImageRefs, UploadPair,
};
