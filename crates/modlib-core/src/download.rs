//! Plain HTTP download of mod archives.
//!
//! Streams the response body to disk; the caller hands the result to
//! [`Mod::set_file`](crate::Mod::set_file).

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::paths::filename_from_url;

/// Errors raised while fetching a file.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server answered {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status.
        status: reqwest::StatusCode,
    },

    /// Writing the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the final nor the requested URL ends in a usable file name.
    #[error("cannot derive a file name from {0}")]
    NoFileName(String),
}

/// Download `url` into `dest_dir`, naming the file after the last path
/// segment of the final (post-redirect) URL.
///
/// A partially written file is removed on failure.
///
/// # Errors
///
/// Returns [`DownloadError`] on transport failures, non-success responses,
/// unusable file names, or write errors.
pub async fn download(client: &Client, url: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
    debug!("GET {url}");
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::Status {
            url: url.to_string(),
            status,
        });
    }

    let name = [filename_from_url(response.url().as_str()), filename_from_url(url)]
        .into_iter()
        .find(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(str::to_string)
        .ok_or_else(|| DownloadError::NoFileName(url.to_string()))?;
    let dest = dest_dir.join(name);

    if let Err(e) = stream_to_file(response, &dest).await {
        let _ = tokio::fs::remove_file(&dest).await;
        return Err(e);
    }

    info!("Downloaded {url} to {}", dest.display());
    Ok(dest)
}

async fn stream_to_file(response: reqwest::Response, dest: &Path) -> Result<(), DownloadError> {
    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}
