//! Disk API client: resolve a resource to a download URL, then save it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{DiskError, Result};
use crate::http::{
    authorization_value, AuthHeaderPolicy, Transport, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
use crate::models::{DownloadLink, PublicResource};
use crate::url_parser::file_name_from_path;

/// Base URL of the public Disk REST API.
pub const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net/v1";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub auth_header: AuthHeaderPolicy,
    pub timeout: Duration,
    pub user_agent: String,
    /// Directory saved files are written to. Never created by the client.
    pub output_dir: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            auth_header: AuthHeaderPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn auth_header(mut self, policy: AuthHeaderPolicy) -> Self {
        self.auth_header = policy;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// What to download and how to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// A file on the authenticated account's disk.
    Private { path: String },
    /// A public share, optionally a file inside a shared folder.
    Public { key: String, path: Option<String> },
}

impl Resource {
    pub fn private(path: impl Into<String>) -> Self {
        Resource::Private { path: path.into() }
    }

    pub fn public(key: impl Into<String>) -> Self {
        Resource::Public {
            key: key.into(),
            path: None,
        }
    }

    pub fn public_in_folder(key: impl Into<String>, path: impl Into<String>) -> Self {
        Resource::Public {
            key: key.into(),
            path: Some(path.into()),
        }
    }

    /// Build from a path or public key plus a public/private flag.
    pub fn from_input(path_or_key: &str, is_public: bool) -> Self {
        if is_public {
            Resource::public(path_or_key)
        } else {
            Resource::private(path_or_key)
        }
    }
}

/// Outcome of the resolution step. Valid for one save only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    /// Pre-signed download URL.
    pub href: String,
    /// Local file name to save under.
    pub filename: String,
}

/// A file written to disk.
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
    pub source_url: String,
}

/// Download progress, reported after every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub downloaded: u64,
    /// From `Content-Length`, when the server sends it.
    pub total: Option<u64>,
}

/// Client for downloading private and public files from the Disk API.
///
/// The resolved download URL is never stored on the client, so one instance
/// can serve overlapping saves.
#[derive(Debug, Clone)]
pub struct YaDiskClient {
    base_url: String,
    output_dir: PathBuf,
    transport: Transport,
}

impl YaDiskClient {
    /// Create a client authenticated with an OAuth token.
    ///
    /// # Arguments
    /// * `base_url` - API endpoint, e.g. [`DEFAULT_BASE_URL`]
    /// * `token` - OAuth token, sent as `Authorization: OAuth <token>`
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url).token(token))
    }

    /// Create a client without credentials, for public links.
    pub fn public(base_url: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let authorization = authorization_value(config.token.as_deref(), config.auth_header);
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            output_dir: config.output_dir,
            transport: Transport::new(authorization, config.user_agent, config.timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether requests from this client carry an `Authorization` header.
    pub fn sends_authorization(&self) -> bool {
        self.transport.sends_authorization()
    }

    /// Save a private path (`is_public == false`) or a public key/link.
    pub async fn save_to_disk(&self, path_or_key: &str, is_public: bool) -> Result<SavedFile> {
        self.save_resource(&Resource::from_input(path_or_key, is_public))
            .await
    }

    /// Save a file from the authenticated account's disk.
    pub async fn save_private(&self, path: &str) -> Result<SavedFile> {
        self.save_resource(&Resource::private(path)).await
    }

    /// Save a publicly shared file.
    ///
    /// `public_key` is sent as given; use
    /// [`normalize_public_key`](crate::url_parser::normalize_public_key) first
    /// to trim a share link or validate a raw key.
    pub async fn save_public(&self, public_key: &str) -> Result<SavedFile> {
        self.save_resource(&Resource::public(public_key)).await
    }

    pub async fn save_resource(&self, resource: &Resource) -> Result<SavedFile> {
        self.save_resource_with_progress(resource, |_| {}).await
    }

    /// Resolve `resource`, download it and write it to the output directory.
    ///
    /// The local file is created (or truncated) only after the download
    /// request succeeded. A failed transfer may leave a partial file behind.
    #[instrument(skip(self, on_progress))]
    pub async fn save_resource_with_progress<F>(
        &self,
        resource: &Resource,
        mut on_progress: F,
    ) -> Result<SavedFile>
    where
        F: FnMut(Progress),
    {
        let resolved = self.resolve(resource).await?;
        debug!(href = %resolved.href, filename = %resolved.filename, "resolved");

        let response = self.transport.get(&resolved.href).await?;
        let total = response.content_length();
        let final_path = self.output_dir.join(&resolved.filename);

        let mut file = File::create(&final_path)
            .await
            .map_err(|source| file_error(&final_path, source))?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|source| file_error(&final_path, source))?;
            downloaded += chunk.len() as u64;
            on_progress(Progress { downloaded, total });
        }

        file.flush()
            .await
            .map_err(|source| file_error(&final_path, source))?;

        info!(path = %final_path.display(), bytes = downloaded, "saved");

        Ok(SavedFile {
            path: final_path,
            bytes: downloaded,
            source_url: resolved.href,
        })
    }

    /// Resolve a resource to its download URL and local file name.
    pub async fn resolve(&self, resource: &Resource) -> Result<ResolvedDownload> {
        match resource {
            Resource::Private { path } => {
                let filename = file_name_from_path(path)?;
                let link = self.download_link(path).await?;
                if link.href.is_empty() {
                    return Err(DiskError::MissingField("href"));
                }
                Ok(ResolvedDownload {
                    href: link.href,
                    filename,
                })
            }
            Resource::Public { key, path } => {
                let shared = self.public_resource(key, path.as_deref()).await?;
                let filename = file_name_from_path(&shared.name)?;
                let href = shared
                    .file
                    .filter(|file| !file.is_empty())
                    .ok_or(DiskError::MissingField("file"))?;
                Ok(ResolvedDownload { href, filename })
            }
        }
    }

    /// Look up the download link of a private path.
    pub async fn download_link(&self, path: &str) -> Result<DownloadLink> {
        let url = self.endpoint("disk/resources/download/", &[("path", path)])?;
        self.transport.get_json(url.as_str()).await
    }

    /// Fetch metadata of a public resource.
    ///
    /// # Arguments
    /// * `public_key` - Public key or share link
    /// * `path` - Path of a file inside a shared folder
    pub async fn public_resource(
        &self,
        public_key: &str,
        path: Option<&str>,
    ) -> Result<PublicResource> {
        let mut params = vec![("public_key", public_key)];
        if let Some(path) = path {
            params.push(("path", path));
        }
        let url = self.endpoint("disk/public/resources", &params)?;
        self.transport.get_json(url.as_str()).await
    }

    fn endpoint(&self, route: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, route))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }
}

fn file_error(path: &Path, source: std::io::Error) -> DiskError {
    DiskError::FileError {
        path: path.to_path_buf(),
        source,
    }
}
