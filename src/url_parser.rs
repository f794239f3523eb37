//! Input normalization: public share links and destination file names.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{DiskError, Result};

/// Public share links, e.g. `https://yadi.sk/d/<id>` or `https://disk.yandex.ru/i/<id>`.
static SHARE_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://(?:yadi\.sk|disk\.yandex\.(?:ru|com|kz|by|ua|com\.tr))/(?:d|i)/[A-Za-z0-9_-]+)(?:[/?#].*)?$",
    )
    .expect("Invalid share link regex")
});

/// Raw public key (base64 alphabet plus the URL-safe and `:` separators).
static PUBLIC_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/=_:-]+$").expect("Invalid public key regex"));

/// Normalize a public share link or validate a raw public key.
///
/// Share links keep only scheme, host and `/d/<id>` or `/i/<id>`; query and
/// fragment are dropped.
///
/// # Examples
///
/// ```
/// use yadisk::url_parser::normalize_public_key;
///
/// let key = normalize_public_key("https://yadi.sk/i/AbC123?utm=1").unwrap();
/// assert_eq!(key, "https://yadi.sk/i/AbC123");
///
/// let key = normalize_public_key("  xKq9pL2+/Q==  ").unwrap();
/// assert_eq!(key, "xKq9pL2+/Q==");
/// ```
pub fn normalize_public_key(link_or_key: &str) -> Result<String> {
    let trimmed = link_or_key.trim();

    if let Some(captures) = SHARE_LINK_REGEX.captures(trimmed) {
        if let Some(link) = captures.get(1) {
            return Ok(link.as_str().to_string());
        }
    }

    if !trimmed.contains("://") && PUBLIC_KEY_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(DiskError::InvalidPublicKey(link_or_key.to_string()))
}

/// Local file name for a remote path: its final `/`-separated segment.
///
/// Trailing slashes are ignored. Empty, `.` and `..` segments are rejected so
/// a name can never leave the output directory.
///
/// ```
/// use yadisk::url_parser::file_name_from_path;
///
/// assert_eq!(file_name_from_path("photos/mountains.jpg").unwrap(), "mountains.jpg");
/// assert_eq!(file_name_from_path("disk:/Горы.jpg").unwrap(), "Горы.jpg");
/// ```
pub fn file_name_from_path(path: &str) -> Result<String> {
    let trimmed = path.trim_end_matches('/');
    let name = trimmed.rsplit('/').next().unwrap_or_default();

    match name {
        "" | "." | ".." => Err(DiskError::InvalidPath(path.to_string())),
        _ if name.contains('\\') || name.contains('\0') => {
            Err(DiskError::InvalidPath(path.to_string()))
        }
        _ => Ok(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_variants() {
        for link in [
            "https://yadi.sk/d/AbC123",
            "https://disk.yandex.ru/d/AbC123",
            "https://disk.yandex.com/i/AbC123",
            "http://disk.yandex.kz/d/AbC123",
        ] {
            assert_eq!(normalize_public_key(link).unwrap(), link);
        }
    }

    #[test]
    fn test_share_link_strips_suffix() {
        assert_eq!(
            normalize_public_key("https://disk.yandex.ru/d/AbC123/sub#frag").unwrap(),
            "https://disk.yandex.ru/d/AbC123"
        );
    }

    #[test]
    fn test_raw_key() {
        assert_eq!(normalize_public_key("AbC+1/2==").unwrap(), "AbC+1/2==");
    }

    #[test]
    fn test_invalid_keys() {
        assert!(normalize_public_key("").is_err());
        assert!(normalize_public_key("   ").is_err());
        assert!(normalize_public_key("https://example.com/d/AbC").is_err());
        assert!(normalize_public_key("key with spaces").is_err());
    }

    #[test]
    fn test_file_name_from_path() {
        assert_eq!(file_name_from_path("photos/mountains.jpg").unwrap(), "mountains.jpg");
        assert_eq!(file_name_from_path("mountains.jpg").unwrap(), "mountains.jpg");
        assert_eq!(file_name_from_path("/a/b/c.txt").unwrap(), "c.txt");
        assert_eq!(file_name_from_path("photos/").unwrap(), "photos");
    }

    #[test]
    fn test_file_name_rejects_escapes() {
        assert!(file_name_from_path("").is_err());
        assert!(file_name_from_path("/").is_err());
        assert!(file_name_from_path("photos/..").is_err());
        assert!(file_name_from_path(".").is_err());
        assert!(file_name_from_path("a\\..\\b").is_err());
    }
}
