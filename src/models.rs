//! Data models for Disk API responses.

use serde::{Deserialize, Serialize};

/// Response of the download-link endpoint for a private resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadLink {
    pub href: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub templated: bool,
}

/// Properties of a publicly shared resource.
///
/// Only `file` and `name` drive a download; the rest is informational.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicResource {
    pub name: String,
    /// Direct download URL. Absent for folders.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub md5: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub public_url: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub antivirus_status: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub views_count: Option<i64>,
    #[serde(default)]
    pub revision: Option<i64>,
    #[serde(default)]
    pub exif: Option<serde_json::Value>,
    #[serde(default)]
    pub owner: Option<serde_json::Value>,
    #[serde(default)]
    pub comment_ids: Option<serde_json::Value>,
}

impl std::fmt::Display for PublicResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_str = self
            .size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let kind = self.resource_type.as_deref().unwrap_or("-");
        let mime = self.mime_type.as_deref().unwrap_or("-");
        write!(f, "{}\t{}\t{}\t{}", kind, size_str, mime, self.name)
    }
}

/// Error body returned by the Disk API alongside non-200 statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    /// Best human-readable explanation in the body.
    pub fn summary(&self) -> Option<String> {
        self.description
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format seconds into human-readable time (e.g., "2m 15s", "1h 5m", "< 1s").
pub fn format_eta(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--".to_string();
    }

    let secs = seconds.round() as u64;

    if secs == 0 {
        return "< 1s".to_string();
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let remaining_secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, remaining_secs)
    } else {
        format!("{}s", remaining_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        // a typical shared photo
        assert_eq!(format_size(2_621_440), "2.50 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(10 * 1024 + 512), "10.50 KB");
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(0.0), "< 1s");
        assert_eq!(format_eta(29.6), "30s");
        assert_eq!(format_eta(125.0), "2m 5s");
        assert_eq!(format_eta(7260.0), "2h 1m");
        assert_eq!(format_eta(-5.0), "--");
        assert_eq!(format_eta(f64::INFINITY), "--");
        assert_eq!(format_eta(f64::NAN), "--");
    }

    #[test]
    fn test_download_link_deserialize() {
        let json = r#"{
            "href": "https://downloader.disk.yandex.ru/disk/abc?filename=a.jpg",
            "method": "GET",
            "templated": false
        }"#;

        let link: DownloadLink = serde_json::from_str(json).unwrap();
        assert_eq!(
            link.href,
            "https://downloader.disk.yandex.ru/disk/abc?filename=a.jpg"
        );
        assert_eq!(link.method, "GET");
        assert!(!link.templated);
    }

    #[test]
    fn test_public_resource_deserialize() {
        let json = r#"{
            "antivirus_status": "clean",
            "public_key": "abcKEY==",
            "public_url": "https://yadi.sk/i/abc",
            "views_count": 3,
            "exif": {},
            "created": "2019-09-12T10:00:00+00:00",
            "type": "file",
            "resource_id": "1:xyz",
            "modified": "2019-09-12T10:00:00+00:00",
            "size": 2048,
            "mime_type": "image/jpeg",
            "file": "https://downloader.disk.yandex.ru/disk/xyz",
            "media_type": "image",
            "path": "/",
            "sha256": "deadbeef",
            "revision": 42,
            "md5": "cafe",
            "name": "mountains.jpg"
        }"#;

        let resource: PublicResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.name, "mountains.jpg");
        assert_eq!(
            resource.file.as_deref(),
            Some("https://downloader.disk.yandex.ru/disk/xyz")
        );
        assert_eq!(resource.resource_type.as_deref(), Some("file"));
        assert_eq!(resource.size, Some(2048));
        assert_eq!(resource.revision, Some(42));
    }

    #[test]
    fn test_public_folder_has_no_file() {
        let json = r#"{"name": "Photos", "type": "dir"}"#;
        let resource: PublicResource = serde_json::from_str(json).unwrap();
        assert!(resource.file.is_none());
        assert_eq!(format!("{}", resource), "dir\t-\t-\tPhotos");
    }

    #[test]
    fn test_api_error_summary_prefers_description() {
        let json = r#"{"message": "Не удалось найти", "description": "Resource not found.", "error": "DiskNotFoundError"}"#;
        let body: ApiErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.summary().as_deref(), Some("Resource not found."));
    }
}
