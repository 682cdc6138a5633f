//! Fetching remote job artifacts.

use std::path::Path;

use tracing::info;

use crate::error::DownloadError;

/// Header used to authenticate against private artifact registries.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Download a remote JAR to `target`, returning the number of bytes written.
///
/// Anything other than a 200 response is fatal.
pub(crate) async fn download(
    url: &str,
    api_token: Option<&str>,
    target: &Path,
) -> Result<u64, DownloadError> {
    let client = reqwest::Client::new();

    let mut request = client.get(url);
    if let Some(token) = api_token {
        request = request.header(TOKEN_HEADER, token);
    }

    let response = request.send().await?;
    if response.status() != reqwest::StatusCode::OK {
        return Err(DownloadError::UnexpectedStatus(response.status().as_u16()));
    }

    let bytes = response.bytes().await?;
    tokio::fs::write(target, &bytes)
        .await
        .map_err(|source| DownloadError::Io {
            path: target.to_path_buf(),
            source,
        })?;

    let written = bytes.len() as u64;
    info!(url, bytes = written, target = %target.display(), "artifact downloaded");
    Ok(written)
}
