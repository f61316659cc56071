//! Feed fetcher
//!
//! Downloads the game feeds listed in the sources file, keeping a raw copy
//! on disk. Feeds already cached are never re-fetched; a failed download
//! skips that game and the run continues.

use crate::{BoxscoreError, Config, MatchId, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Blocking HTTP fetcher for provider feeds
pub struct FeedFetcher {
    client: reqwest::blocking::Client,
}

impl Default for FeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedFetcher {
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .user_agent("boxscore-fetcher/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        FeedFetcher { client }
    }

    /// Fetch every source feed that is not already cached.
    ///
    /// Returns the number of newly downloaded feeds.
    pub fn sync(&self, config: &Config) -> Result<usize> {
        let urls = read_sources(&config.paths.sources_file)?;
        std::fs::create_dir_all(&config.paths.raw_dir)?;

        let mut fetched = 0;
        for url in urls {
            let Some(match_id) = parse_match_id(&url) else {
                log::warn!("Could not extract match id from URL: {}", url);
                continue;
            };

            let target = raw_feed_path(&config.paths.raw_dir, match_id);
            if target.exists() {
                log::debug!("Game {} already cached at {}", match_id, target.display());
                continue;
            }

            match self.fetch_one(&url) {
                Ok(body) => {
                    std::fs::write(&target, &body)?;
                    log::info!("Saved game {} -> {}", match_id, target.display());
                    fetched += 1;
                }
                Err(e) => log::warn!("Failed to fetch game {}: {}", match_id, e),
            }
        }

        Ok(fetched)
    }

    fn fetch_one(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;
        if body.is_empty() {
            return Err(BoxscoreError::Parse(format!("No data returned for {}", url)));
        }
        Ok(body.to_vec())
    }
}

/// Path of the cached raw copy for one game
pub fn raw_feed_path(raw_dir: &str, match_id: MatchId) -> PathBuf {
    Path::new(raw_dir).join(format!("game_{}.json", match_id))
}

/// Read feed URLs from the sources file; blanks and `#` comments ignored.
///
/// A missing sources file is fatal: without it `sync` has nothing to do.
pub fn read_sources(path: &str) -> Result<Vec<String>> {
    if !Path::new(path).exists() {
        return Err(BoxscoreError::MissingInput(format!(
            "sources file not found: {}",
            path
        )));
    }

    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Extract the match id from a feed URL's `/emp/<id>/` segment
pub fn parse_match_id(url: &str) -> Option<MatchId> {
    let pattern = Regex::new(r"/emp/(\d+)/").unwrap();
    let caps = pattern.captures(url)?;
    caps[1].parse().ok().map(MatchId)
}
