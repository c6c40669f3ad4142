//! Post collection builder
//!
//! Turns pasted text or a posts file into an ordered list of posts, one per
//! non-blank line.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{PostsmithError, Result};

/// Split text into posts: trim each line, drop blank ones, keep order.
pub fn posts_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read posts from a file, one per non-blank line.
pub fn read_posts(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| PostsmithError::SourceUnavailable(format!("{}: {}", path.display(), e)))?;

    let posts = posts_from_text(&content);
    debug!("Read {} posts from {}", posts.len(), path.display());
    Ok(posts)
}

/// Read posts from a file, yielding an empty collection when it is unavailable.
pub fn load_posts_from_file(path: impl AsRef<Path>) -> Vec<String> {
    match read_posts(path) {
        Ok(posts) => posts,
        Err(e) => {
            warn!("{}", e);
            Vec::new()
        }
    }
}
