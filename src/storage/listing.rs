//! Shared listing rules: the extension allow-list, title derivation and
//! sequential numbering.

use crate::types::{Reel, ReelOrigin};
use chrono::{DateTime, Utc};
use std::path::Path;

/// File extensions treated as playable video, compared case-insensitively
pub const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "webm", "ogg", "mov", "avi", "mkv"];

/// True when `filename` carries an allow-listed video extension
pub fn is_video_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)))
}

/// Display title: extension stripped, underscores and hyphens become spaces
pub fn title_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    stem.replace(['_', '-'], " ")
}

/// Last segment of an object key
pub fn filename_from_key(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// A listed file whose retrieval URL has already been produced
#[derive(Debug, Clone)]
pub struct PendingReel {
    pub filename: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Sort by filename and number from 1
pub fn number_reels(mut pending: Vec<PendingReel>, origin: ReelOrigin) -> Vec<Reel> {
    pending.sort_by(|a, b| a.filename.cmp(&b.filename));
    pending
        .into_iter()
        .zip(1..)
        .map(|(item, id)| Reel {
            id,
            title: title_from_filename(&item.filename),
            filename: item.filename,
            description: String::new(),
            url: item.url,
            source: origin,
            created_at: item.created_at,
        })
        .collect()
}
