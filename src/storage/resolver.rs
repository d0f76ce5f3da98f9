//! Video source selection
//!
//! The configured storage mode becomes one [`VideoSource`] variant at startup.
//! Handlers only ever call [`VideoSource::list_reels`].

use crate::Result;
use crate::config::{Settings, StorageMode};
use crate::db::{CatalogEntry, CatalogRepository};
use crate::storage::bucket::BucketSource;
use crate::storage::listing::title_from_filename;
use crate::storage::local::LocalSource;
use crate::storage::s3::S3ObjectStore;
use crate::types::{ListingSource, Reel, ReelListing, ReelOrigin};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Local directory only
    Local(LocalSource),
    /// Bucket listing; the local directory is used when it yields nothing
    Bucket {
        bucket: BucketSource,
        fallback: LocalSource,
    },
    /// Legacy reels table
    Catalog(CatalogRepository),
}

impl VideoSource {
    /// Build the source for `settings.storage.mode`
    pub async fn from_settings(settings: &Settings, catalog: CatalogRepository) -> Result<Self> {
        let local = LocalSource::new(
            settings.storage.video_dir.clone(),
            settings.storage.video_url_prefix.clone(),
        );

        let source = match settings.storage.mode {
            StorageMode::Local => VideoSource::Local(local),
            StorageMode::Bucket => {
                let store = S3ObjectStore::from_settings(&settings.bucket).await;
                info!(
                    bucket = %store.bucket(),
                    prefix = %settings.bucket.prefix,
                    signed_urls = settings.bucket.signed_urls,
                    "using bucket video source"
                );
                let bucket = BucketSource::from_settings(Arc::new(store), &settings.bucket)?;
                VideoSource::Bucket {
                    bucket,
                    fallback: local,
                }
            }
            StorageMode::Catalog => VideoSource::Catalog(catalog),
        };
        Ok(source)
    }

    pub fn mode(&self) -> StorageMode {
        match self {
            VideoSource::Local(_) => StorageMode::Local,
            VideoSource::Bucket { .. } => StorageMode::Bucket,
            VideoSource::Catalog(_) => StorageMode::Catalog,
        }
    }

    /// Ordered reels plus the tag of the source that produced them.
    ///
    /// Bucket failures never surface: an unreachable bucket or one without
    /// matching objects degrades to the local listing tagged `local_fallback`.
    pub async fn list_reels(&self) -> Result<ReelListing> {
        match self {
            VideoSource::Local(local) => {
                Ok(ReelListing::new(local.list().await?, ListingSource::Local))
            }
            VideoSource::Bucket { bucket, fallback } => match bucket.list().await {
                Ok(reels) if !reels.is_empty() => {
                    Ok(ReelListing::new(reels, ListingSource::Bucket))
                }
                Ok(_) => {
                    warn!("bucket listing returned no videos, falling back to local directory");
                    Ok(ReelListing::new(
                        fallback.list().await?,
                        ListingSource::LocalFallback,
                    ))
                }
                Err(e) => {
                    warn!(error = %e, "bucket listing failed, falling back to local directory");
                    Ok(ReelListing::new(
                        fallback.list().await?,
                        ListingSource::LocalFallback,
                    ))
                }
            },
            VideoSource::Catalog(catalog) => {
                let reels = catalog.list().await?.into_iter().map(catalog_reel).collect();
                Ok(ReelListing::new(reels, ListingSource::Catalog))
            }
        }
    }
}

fn catalog_reel(entry: CatalogEntry) -> Reel {
    let filename = filename_from_url(&entry.url);
    let title = entry
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| title_from_filename(&filename));

    Reel {
        id: entry.id,
        filename,
        title,
        description: entry.description.unwrap_or_default(),
        url: entry.url,
        source: ReelOrigin::Catalog,
        created_at: Some(entry.created_at),
    }
}

/// Last path segment of an absolute URL, or the raw text for anything else
fn filename_from_url(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| raw.rsplit('/').next().unwrap_or(raw).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;
    use crate::storage::bucket::UrlStrategy;
    use crate::storage::bucket::tests::FakeStore;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn local_with(names: &[&str]) -> (TempDir, LocalSource) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let source = LocalSource::new(dir.path(), "/videos");
        (dir, source)
    }

    fn bucket_with(store: FakeStore) -> BucketSource {
        BucketSource::new(
            Arc::new(store),
            "videos/",
            UrlStrategy::Signed {
                expires_in: Duration::from_secs(60),
            },
        )
    }

    #[tokio::test]
    async fn test_local_mode() {
        let (_dir, local) = local_with(&["b.mp4", "a.mp4"]);
        let source = VideoSource::Local(local);

        let listing = source.list_reels().await.unwrap();
        assert_eq!(listing.source, ListingSource::Local);
        assert_eq!(listing.reels[0].filename, "a.mp4");
        assert_eq!(source.mode(), StorageMode::Local);
    }

    #[tokio::test]
    async fn test_bucket_mode_uses_bucket() {
        let (_dir, local) = local_with(&["local.mp4"]);
        let source = VideoSource::Bucket {
            bucket: bucket_with(FakeStore::with_keys(&[&["videos/remote.mp4"]])),
            fallback: local,
        };

        let listing = source.list_reels().await.unwrap();
        assert_eq!(listing.source, ListingSource::Bucket);
        assert_eq!(listing.reels.len(), 1);
        assert_eq!(listing.reels[0].source, ReelOrigin::Bucket);
    }

    #[tokio::test]
    async fn test_empty_bucket_falls_back_to_local() {
        let (_dir, local) = local_with(&["b.mp4", "a.mp4"]);
        let source = VideoSource::Bucket {
            bucket: bucket_with(FakeStore::with_keys(&[&["videos/readme.txt"]])),
            fallback: local,
        };

        let listing = source.list_reels().await.unwrap();
        assert_eq!(listing.source, ListingSource::LocalFallback);
        let names: Vec<&str> = listing.reels.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);
        assert!(listing.reels.iter().all(|r| r.source == ReelOrigin::Local));
    }

    #[tokio::test]
    async fn test_unreachable_bucket_falls_back_to_local() {
        let (_dir, local) = local_with(&["a.mp4"]);
        let store = FakeStore {
            fail_listing: true,
            ..Default::default()
        };
        let source = VideoSource::Bucket {
            bucket: bucket_with(store),
            fallback: local,
        };

        let listing = source.list_reels().await.unwrap();
        assert_eq!(listing.source, ListingSource::LocalFallback);
        assert_eq!(listing.len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_mode() {
        let pool = connect_and_migrate("sqlite::memory:").await.unwrap();
        let catalog = CatalogRepository::new(pool);
        let id = catalog
            .insert("https://cdn.example.com/clips/ocean_waves.mp4", "", "Calm sea")
            .await
            .unwrap();

        let source = VideoSource::Catalog(catalog);
        let listing = source.list_reels().await.unwrap();

        assert_eq!(listing.source, ListingSource::Catalog);
        let reel = &listing.reels[0];
        assert_eq!(reel.id, id);
        assert_eq!(reel.filename, "ocean_waves.mp4");
        assert_eq!(reel.title, "ocean waves");
        assert_eq!(reel.description, "Calm sea");
        assert!(reel.created_at.is_some());
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://cdn.example.com/a/b/clip.mp4?sig=1"),
            "clip.mp4"
        );
        assert_eq!(filename_from_url("/videos/clip.mp4"), "clip.mp4");
    }
}
