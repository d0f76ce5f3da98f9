//! Video source resolution
//!
//! Turns the configured storage mode into an ordered list of reels:
//! - `local`: a directory on disk
//! - `bucket`: objects under an S3 key prefix, with presigned or public URLs
//!   and a fallback to the local directory
//! - `catalog`: the legacy reels table

pub mod bucket;
pub mod listing;
pub mod local;
pub mod resolver;
pub mod s3;

pub use bucket::{BucketSource, ObjectPage, ObjectStore, StoredObject, UrlStrategy};
pub use listing::{VIDEO_EXTENSIONS, is_video_file, title_from_filename};
pub use local::LocalSource;
pub use resolver::VideoSource;
pub use s3::S3ObjectStore;
