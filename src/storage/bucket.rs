//! Bucket listing
//!
//! Objects are enumerated page by page under a key prefix through the
//! [`ObjectStore`] trait, filtered by the video allow-list and given either a
//! presigned or a stable public URL. Objects whose URL cannot be produced are
//! left out of the listing.

use crate::config::settings::BucketSettings;
use crate::storage::listing::{PendingReel, filename_from_key, is_video_file, number_reels};
use crate::types::{Reel, ReelOrigin};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// One object returned by a listing call
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One page of a listing; `next_token` is set while more pages remain
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    pub objects: Vec<StoredObject>,
    pub next_token: Option<String>,
}

/// Minimal object-store surface needed to list reels
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// List one page of keys under `prefix`
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
        max_keys: i32,
    ) -> Result<ObjectPage>;

    /// Time-limited GET URL for `key`
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String>;
}

/// How retrieval URLs are produced
#[derive(Debug, Clone)]
pub enum UrlStrategy {
    Signed { expires_in: Duration },
    Public { base: Url },
}

#[derive(Debug, Clone)]
pub struct BucketSource {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    urls: UrlStrategy,
    max_keys: i32,
}

impl BucketSource {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>, urls: UrlStrategy) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            urls,
            max_keys: 1000,
        }
    }

    pub fn with_max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn from_settings(store: Arc<dyn ObjectStore>, settings: &BucketSettings) -> Result<Self> {
        let urls = if settings.signed_urls {
            UrlStrategy::Signed {
                expires_in: Duration::from_secs(settings.signed_url_expiry_secs),
            }
        } else {
            let base = match &settings.public_base_url {
                Some(base) => base.clone(),
                None => format!(
                    "https://{}.s3.{}.amazonaws.com",
                    settings.name, settings.region
                ),
            };
            let base = Url::parse(&base)
                .map_err(|e| Error::config(format!("Invalid public base URL {}: {}", base, e)))?;
            UrlStrategy::Public { base }
        };

        Ok(Self::new(store, settings.prefix.clone(), urls).with_max_keys(settings.max_keys_per_page))
    }

    /// Every object under the prefix, following continuation tokens
    pub async fn list_objects(&self) -> Result<Vec<StoredObject>> {
        let mut objects = Vec::new();
        let mut continuation = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .list_page(&self.prefix, continuation.take(), self.max_keys)
                .await?;
            pages += 1;
            objects.extend(page.objects);

            match page.next_token {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        debug!(prefix = %self.prefix, pages, count = objects.len(), "listed bucket objects");
        Ok(objects)
    }

    /// Reels for every video object that could be given a URL
    pub async fn list(&self) -> Result<Vec<Reel>> {
        let objects = self.list_objects().await?;

        let mut pending = Vec::new();
        for object in objects {
            let filename = filename_from_key(&object.key);
            if filename.is_empty() || !is_video_file(filename) {
                continue;
            }
            let Some(url) = self.retrieval_url(&object.key).await else {
                continue;
            };
            pending.push(PendingReel {
                filename: filename.to_string(),
                url,
                created_at: object.last_modified,
            });
        }

        Ok(number_reels(pending, ReelOrigin::Bucket))
    }

    async fn retrieval_url(&self, key: &str) -> Option<String> {
        match &self.urls {
            UrlStrategy::Signed { expires_in } => {
                match self.store.presign_get(key, *expires_in).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        warn!(key = %key, error = %e, "could not presign object, skipping");
                        None
                    }
                }
            }
            UrlStrategy::Public { base } => {
                let url = public_object_url(base, key);
                if url.is_none() {
                    warn!(key = %key, "could not build public URL, skipping");
                }
                url
            }
        }
    }
}

/// `base` with each `/`-separated part of `key` appended as an encoded segment
pub fn public_object_url(base: &Url, key: &str) -> Option<String> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty();
        for part in key.split('/').filter(|p| !p.is_empty()) {
            segments.push(part);
        }
    }
    Some(url.to_string())
}
