use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::types::SavedDeck;

/// File name for an exported deck: every character outside `[A-Za-z0-9]`
/// becomes `_`, the rest is lowercased.
pub fn pptx_filename(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "presentation.pptx".to_string()
    } else {
        format!("{stem}.pptx")
    }
}

/// Default file name for a deck's JSON: alphanumeric words, lowercased
/// and joined by `-`, with the stem capped at 50 characters.
pub fn deck_json_filename(title: &str) -> String {
    let mut stem = String::new();
    for word in title.split(|c: char| c.is_whitespace() || c == '-' || c == '_') {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        if word.is_empty() {
            continue;
        }
        if !stem.is_empty() {
            stem.push('-');
        }
        stem.push_str(&word);
    }
    let stem: String = stem.chars().take(50).collect();
    match stem.trim_end_matches('-') {
        "" => "presentation.json".to_string(),
        stem => format!("{stem}.json"),
    }
}

/// Ensure the output directory exists
pub async fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let path = dir.as_ref();
    if !path.as_os_str().is_empty() && !path.exists() {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}

pub async fn save_deck<P: AsRef<Path>>(path: P, deck: &SavedDeck) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string_pretty(deck)?;
    tokio::fs::write(path, content).await?;
    Ok(path.to_path_buf())
}

pub async fn load_deck<P: AsRef<Path>>(path: P) -> Result<SavedDeck> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let deck: SavedDeck = serde_json::from_str(&content)?;
    Ok(deck)
}
