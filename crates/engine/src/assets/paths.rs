use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetPathError {
    #[error("asset path must not be empty")]
    Empty,
    #[error("asset path must not start with '/'")]
    LeadingSlash,
    #[error("asset path must not contain '\\\\'")]
    Backslash,
    #[error("asset path must not contain a '..' segment")]
    ParentTraversal,
    #[error("asset path contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_asset_path(path: &str) -> Result<(), AssetPathError> {
    if path.is_empty() {
        return Err(AssetPathError::Empty);
    }
    if path.starts_with('/') {
        return Err(AssetPathError::LeadingSlash);
    }
    if path.contains('\\') {
        return Err(AssetPathError::Backslash);
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(AssetPathError::ParentTraversal);
    }
    for ch in path.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-' | '.' | ' ') {
            continue;
        }
        return Err(AssetPathError::InvalidCharacter { character: ch });
    }
    Ok(())
}

/// Joins `relative` onto the directory holding `base_file`, folding `.` and
/// `..` segments. A `..` that climbs above the asset root is kept so that
/// validation rejects it later.
pub fn resolve_relative(base_file: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = base_file.split('/').collect();
    segments.pop();
    segments.retain(|segment| !segment.is_empty());

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
