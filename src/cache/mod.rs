//! Local badge image cache.
//!
//! Badge images are downloaded once and reused forever. Files are named by
//! a hash of their source URL, so the same badge is never fetched twice
//! and re-polling costs no image traffic.

pub mod images;

pub use images::ImageCache;
