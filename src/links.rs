//! Links passthrough
//!
//! The site sidebar links live in a line-oriented text file and are
//! republished as JSON without interpretation.

use crate::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Load `label, url` pairs; blanks and `#` comments are ignored, and a
/// missing file yields an empty list.
pub fn load_links(path: &str) -> Result<Vec<Link>> {
    if !Path::new(path).exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let mut links = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((label, url)) = line.split_once(',') else {
            log::debug!("Ignoring malformed links line: {:?}", line);
            continue;
        };
        links.push(Link {
            label: label.trim().to_string(),
            url: url.trim().to_string(),
        });
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_links_text() {
        let dir = std::env::temp_dir().join("boxscore_links_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("links.txt");
        std::fs::write(
            &path,
            "# sidebar\n\nLeague table, https://example.org/table\nbroken line\nClub page, https://example.org/club, extra\n",
        )
        .unwrap();

        let links = load_links(path.to_str().unwrap()).unwrap();
        assert_eq!(
            links,
            vec![
                Link {
                    label: "League table".to_string(),
                    url: "https://example.org/table".to_string(),
                },
                Link {
                    label: "Club page".to_string(),
                    // Split on the first comma only; the rest is the URL field
                    url: "https://example.org/club, extra".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_file_is_empty() {
        let links = load_links("does/not/exist/links.txt").unwrap();
        assert!(links.is_empty());
    }
}
