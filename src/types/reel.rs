//! Reel type definitions
//!
//! A reel is recomputed from the storage listing on every request. For
//! directory and bucket listings its `id` is a position in that listing, not a
//! stable identity; catalog reels carry their row id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a single reel was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelOrigin {
    /// File in the local video directory
    #[serde(rename = "local")]
    Local,
    /// Object in the configured bucket
    #[serde(rename = "s3")]
    Bucket,
    /// Row in the legacy reels table
    #[serde(rename = "catalog")]
    Catalog,
}

/// Which source produced a whole listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingSource {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "s3")]
    Bucket,
    /// Bucket mode was configured but yielded nothing usable
    #[serde(rename = "local_fallback")]
    LocalFallback,
    #[serde(rename = "catalog")]
    Catalog,
}

impl ListingSource {
    /// Wire tag as it appears in the `source` field
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingSource::Local => "local",
            ListingSource::Bucket => "s3",
            ListingSource::LocalFallback => "local_fallback",
            ListingSource::Catalog => "catalog",
        }
    }
}

/// A short video entry exposed by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    /// Position in the listing starting at 1, or the catalog row id
    pub id: i64,
    pub filename: String,
    /// Display title derived from the filename
    pub title: String,
    pub description: String,
    /// Retrieval URL (relative path, public URL or presigned URL)
    pub url: String,
    pub source: ReelOrigin,
    pub created_at: Option<DateTime<Utc>>,
}

/// Ordered reels together with the source that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct ReelListing {
    pub reels: Vec<Reel>,
    pub source: ListingSource,
}

impl ReelListing {
    pub fn new(reels: Vec<Reel>, source: ListingSource) -> Self {
        Self { reels, source }
    }

    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }
}
