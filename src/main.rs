//! yadisk CLI - Download files from Yandex Disk.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use yadisk::models::{format_eta, format_size};
use yadisk::{
    normalize_public_key, AuthHeaderPolicy, ClientConfig, Progress, Resource, SavedFile,
    YaDiskClient, DEFAULT_BASE_URL,
};

/// CLI tool for downloading private and public files from Yandex Disk.
#[derive(Parser, Debug)]
#[command(name = "yadisk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Disk REST API endpoint.
    #[arg(long, env = "YADISK_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// OAuth token (required for private files).
    #[arg(long, env = "YADISK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Send the Authorization header even when the token is empty.
    #[arg(long)]
    always_send_auth: bool,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Local directory to save into (must exist).
    #[arg(long, short = 't', global = true, default_value = ".")]
    to: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download a file from your disk.
    Download {
        /// Path on the disk, e.g. photos/mountains.jpg.
        path: String,
    },

    /// Download a file by public link or key.
    Public {
        /// Public share link or key.
        link: String,

        /// Path of a file inside a shared folder.
        #[arg(long)]
        path: Option<String>,
    },

    /// Show metadata of a public resource.
    Info {
        /// Public share link or key.
        link: String,

        /// Path of a file inside a shared folder.
        #[arg(long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -q/-v
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(command = ?cli.command, base_url = %cli.base_url, "CLI arguments parsed");

    if !cli.to.is_dir() {
        anyhow::bail!("Destination directory does not exist: {:?}", cli.to);
    }

    let mut config = ClientConfig::new(&cli.base_url)
        .timeout(Duration::from_secs(cli.timeout))
        .output_dir(&cli.to);
    if let Some(token) = cli.token {
        config = config.token(token);
    }
    if cli.always_send_auth {
        config = config.auth_header(AuthHeaderPolicy::Always);
    }
    let client = YaDiskClient::with_config(config);

    match cli.command {
        Commands::Download { path } => {
            if !client.sends_authorization() {
                warn!("No token set (--token or YADISK_TOKEN); the server will likely reject this request");
            }

            println!("Downloading {}...", path);
            let saved = download(&client, &Resource::private(path.as_str()))
                .await
                .with_context(|| format!("Failed to download file: {}", path))?;
            report(&saved);
        }

        Commands::Public { link, path } => {
            let key = normalize_public_key(&link)
                .with_context(|| format!("Invalid public link or key: {}", link))?;
            let resource = match path {
                Some(path) => Resource::public_in_folder(key, path),
                None => Resource::public(key),
            };

            println!("Downloading {}...", link);
            let saved = download(&client, &resource)
                .await
                .with_context(|| format!("Failed to download public file: {}", link))?;
            report(&saved);
        }

        Commands::Info { link, path } => {
            let key = normalize_public_key(&link)
                .with_context(|| format!("Invalid public link or key: {}", link))?;

            let resource = client
                .public_resource(&key, path.as_deref())
                .await
                .with_context(|| format!("Failed to fetch public resource: {}", link))?;

            println!("{:<6} {:>10} {:<24} {}", "TYPE", "SIZE", "MIME", "NAME");
            println!("{}", "-".repeat(60));
            println!("{}", resource);
            if let Some(md5) = &resource.md5 {
                println!("md5:      {}", md5);
            }
            if let Some(sha256) = &resource.sha256 {
                println!("sha256:   {}", sha256);
            }
            if let Some(modified) = &resource.modified {
                println!("modified: {}", modified);
            }
        }
    }

    Ok(())
}

/// Save a resource, drawing a single-line progress indicator.
async fn download(client: &YaDiskClient, resource: &Resource) -> yadisk::Result<SavedFile> {
    let started = Instant::now();
    let result = client
        .save_resource_with_progress(resource, |progress| print_progress(progress, started))
        .await;
    println!();
    result
}

fn print_progress(progress: Progress, started: Instant) {
    let elapsed = started.elapsed().as_secs_f64();
    let line = match progress.total {
        Some(total) if total > 0 => {
            let rate = progress.downloaded as f64 / elapsed.max(f64::EPSILON);
            let remaining = total.saturating_sub(progress.downloaded) as f64;
            format!(
                "\r  {} / {} ({:.0}%) ETA {}",
                format_size(progress.downloaded),
                format_size(total),
                progress.downloaded as f64 * 100.0 / total as f64,
                format_eta(remaining / rate),
            )
        }
        _ => format!("\r  {}", format_size(progress.downloaded)),
    };
    print!("{:<60}", line);
    let _ = std::io::stdout().flush();
}

fn report(saved: &SavedFile) {
    println!("OK ({})", format_size(saved.bytes));
    println!("Saved to: {:?}", saved.path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_download_args() {
        let cli = Cli::try_parse_from([
            "yadisk",
            "--token",
            "tok",
            "download",
            "photos/mountains.jpg",
            "-t",
            "/tmp",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("tok"));
        assert_eq!(cli.to, PathBuf::from("/tmp"));
        assert!(matches!(
            cli.command,
            Commands::Download { ref path } if path == "photos/mountains.jpg"
        ));
    }

    #[test]
    fn test_cli_public_args() {
        let cli = Cli::try_parse_from([
            "yadisk",
            "--always-send-auth",
            "public",
            "https://yadi.sk/d/AbC",
            "--path",
            "/sub/a.txt",
        ])
        .unwrap();

        assert!(cli.always_send_auth);
        assert_eq!(cli.timeout, 30);
        assert!(matches!(
            cli.command,
            Commands::Public { ref link, path: Some(ref p) } if link == "https://yadi.sk/d/AbC" && p == "/sub/a.txt"
        ));
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["yadisk"]).is_err());
    }
}
