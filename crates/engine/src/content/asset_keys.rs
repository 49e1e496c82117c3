use std::path::{Path, PathBuf};

use thiserror::Error;

/// Asset keys are `/`-separated paths relative to the `assets/` root, e.g.
/// `scenes/birthday/characters/character_1.png`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset key must not be empty")]
    Empty,
    #[error("asset key must not start with '/'")]
    LeadingSlash,
    #[error("asset key must not end with '/'")]
    TrailingSlash,
    #[error("asset key must not contain '\\\\'")]
    Backslash,
    #[error("asset key must not contain '..'")]
    ParentTraversal,
    #[error("asset key must not contain empty path segments")]
    EmptySegment,
    #[error("asset key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub fn validate_asset_key(key: &str) -> Result<(), AssetKeyError> {
    if key.is_empty() {
        return Err(AssetKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(AssetKeyError::LeadingSlash);
    }
    if key.ends_with('/') {
        return Err(AssetKeyError::TrailingSlash);
    }
    if key.contains('\\') {
        return Err(AssetKeyError::Backslash);
    }
    if key.contains("..") {
        return Err(AssetKeyError::ParentTraversal);
    }
    if key.contains("//") {
        return Err(AssetKeyError::EmptySegment);
    }
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-' | '.') {
            continue;
        }
        return Err(AssetKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

/// Joins two key fragments with exactly one `/`.
pub fn join_key(prefix: &str, rest: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let rest = rest.trim_start_matches('/');
    if prefix.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}/{rest}")
    }
}

/// Converts a validated key into a filesystem path under `asset_root`.
pub fn asset_path(asset_root: &Path, key: &str) -> Result<PathBuf, AssetKeyError> {
    validate_asset_key(key)?;
    Ok(key
        .split('/')
        .fold(asset_root.to_path_buf(), |path, segment| path.join(segment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_keys() {
        for key in [
            "bg.png",
            "scenes/birthday/characters/character_1.png",
            "a-b/c_d/Music.MP3",
        ] {
            assert!(validate_asset_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in [
            "",
            "/a",
            "a/",
            "..",
            "a/../b",
            r"a\b",
            "a//b",
            "a b.png",
            "caf\u{e9}.png",
        ] {
            assert!(validate_asset_key(key).is_err(), "key={key}");
        }
    }

    #[test]
    fn join_key_normalizes_separators() {
        assert_eq!(join_key("scenes/x/", "/bg.png"), "scenes/x/bg.png");
        assert_eq!(join_key("", "bg.png"), "bg.png");
        assert_eq!(join_key("scenes/x", ""), "scenes/x");
    }

    #[test]
    fn asset_path_splits_segments_under_root() {
        let root = Path::new("root");
        let path = asset_path(root, "scenes/x/bg.png").expect("path");
        assert_eq!(path, root.join("scenes").join("x").join("bg.png"));
        assert!(asset_path(root, "../secret").is_err());
    }
}
