//! yadisk - A minimal client for the Yandex Disk REST API.
//!
//! This library provides functionality to:
//! - Download a file from the authenticated account's disk
//! - Download a file shared by a public link (or a file inside a shared folder)
//!
//! Both go through the same two steps: a metadata request resolves the
//! resource to a short-lived download URL, then the body of that URL is
//! streamed into a local file.
//!
//! # Example
//!
//! ```no_run
//! use yadisk::{YaDiskClient, DEFAULT_BASE_URL};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = YaDiskClient::new(DEFAULT_BASE_URL, "oauth-token");
//!     let saved = client.save_private("photos/mountains.jpg").await?;
//!     println!("{} ({} bytes)", saved.path.display(), saved.bytes);
//!
//!     let public = YaDiskClient::public(DEFAULT_BASE_URL);
//!     public.save_public("https://yadi.sk/i/AbC123").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod models;
pub mod url_parser;

// Re-exports for convenience
pub use client::{
    ClientConfig, Progress, Resource, ResolvedDownload, SavedFile, YaDiskClient, DEFAULT_BASE_URL,
};
pub use error::{DiskError, Result};
pub use http::AuthHeaderPolicy;
pub use models::{DownloadLink, PublicResource};
pub use url_parser::{file_name_from_path, normalize_public_key};
