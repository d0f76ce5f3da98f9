//! Local directory listing

use crate::Result;
use crate::storage::listing::{PendingReel, is_video_file, number_reels};
use crate::types::{Reel, ReelOrigin};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, warn};
use url::Url;

/// Videos in a single directory, served under `url_prefix`
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Enumerate the directory. A missing directory lists as empty.
    pub async fn list(&self) -> Result<Vec<Reel>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(dir = %self.dir.display(), "video directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut pending = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            // Follows symlinks so linked videos are listed too
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };
            let Ok(filename) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "skipping non UTF-8 filename");
                continue;
            };
            if !is_video_file(&filename) {
                continue;
            }
            let Some(url) = local_video_url(&self.url_prefix, &filename) else {
                debug!(filename = %filename, "no URL for local video, skipping");
                continue;
            };

            pending.push(PendingReel {
                filename,
                url,
                created_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        debug!(dir = %self.dir.display(), count = pending.len(), "listed local videos");
        Ok(number_reels(pending, ReelOrigin::Local))
    }
}

/// Percent-encoded path of `filename` under `prefix`, e.g. `/videos/my%20clip.mp4`
pub fn local_video_url(prefix: &str, filename: &str) -> Option<String> {
    let mut url = Url::parse("http://localhost").ok()?;
    url.set_path(prefix);
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push(filename);
    Some(url.path().to_string())
}
