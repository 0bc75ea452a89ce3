use crate::power::error::PowerApiError;
use crate::power::request::{
    PowerRequest, DEFAULT_BASE_URL, DEFAULT_COMMUNITY, DEFAULT_PARAMETER,
};
use crate::power::response::Payload;
use bon::bon;
use chrono::Datelike;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the NASA POWER temporal API.
///
/// Every request blocks until a response or the timeout; there is no retry. Responses
/// covering a complete past year can be cached on disk, since POWER does not revise
/// them between runs.
#[derive(Debug, Clone)]
pub struct PowerClient {
    http: Client,
    base_url: String,
    community: String,
    parameter: String,
    cache_dir: Option<PathBuf>,
}

#[bon]
impl PowerClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.timeout(Duration)`: Optional. Per-request timeout. Defaults to 60 seconds.
    /// * `.base_url(String)`: Optional. API root. Defaults to the public POWER endpoint.
    /// * `.community(String)`: Optional. POWER user community. Defaults to `re`.
    /// * `.parameter(String)`: Optional. Variable to download. Defaults to `ALLSKY_SFC_SW_DWN`.
    /// * `.cache_dir(PathBuf)`: Optional. Directory for cached responses. No caching if unset.
    ///
    /// # Errors
    ///
    /// Returns [`PowerApiError::InvalidTimeout`] for a zero timeout and
    /// [`PowerApiError::ClientBuild`] if the TLS backend cannot be initialised.
    ///
    /// # Examples
    ///
    /// ```
    /// # use irradiance_grid::PowerClient;
    /// # use std::time::Duration;
    /// # fn run() -> Result<(), irradiance_grid::PowerApiError> {
    /// let client = PowerClient::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()?;
    /// assert_eq!(client.parameter(), "ALLSKY_SFC_SW_DWN");
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        timeout: Option<Duration>,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] community: Option<String>,
        #[builder(into)] parameter: Option<String>,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self, PowerApiError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(PowerApiError::InvalidTimeout(timeout));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PowerApiError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            community: community.unwrap_or_else(|| DEFAULT_COMMUNITY.to_string()),
            parameter: parameter.unwrap_or_else(|| DEFAULT_PARAMETER.to_string()),
            cache_dir,
        })
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Full URL that `request` is sent to.
    pub fn url_for(&self, request: &PowerRequest) -> String {
        request.url(&self.base_url, &self.community, &self.parameter)
    }

    /// Downloads (or loads from cache) and decodes one payload.
    pub async fn fetch_payload(&self, request: &PowerRequest) -> Result<Payload, PowerApiError> {
        let url = self.url_for(request);
        let cache_path = self.cache_path(request);

        let bytes = match &cache_path {
            Some(path) if fs::metadata(path).await.is_ok() => {
                info!("Cache hit for {} query at {:?}", request.kind, path);
                fs::read(path)
                    .await
                    .map_err(|e| PowerApiError::CacheRead(path.clone(), e))?
            }
            _ => {
                let bytes = self.download(request, &url).await?;
                if let Some(path) = &cache_path {
                    self.cache_response(&bytes, path).await?;
                }
                bytes
            }
        };

        let kind = request.kind;
        let parameter = self.parameter.clone();
        let payload = task::spawn_blocking(move || {
            Payload::from_json(&bytes, kind, &url, &parameter)
        })
        .await??;

        info!(
            "{} ({}), fill value {}",
            payload.long_name.as_deref().unwrap_or(&self.parameter),
            payload.units.as_deref().unwrap_or("unknown units"),
            payload.fill_value
        );
        Ok(payload)
    }

    /// Cache location for `request`, if caching is enabled and the request covers a full year.
    fn cache_path(&self, request: &PowerRequest) -> Option<PathBuf> {
        let cache_dir = self.cache_dir.as_ref()?;
        let complete_year = request.end.month() == 12 && request.end.day() == 31;
        if !complete_year {
            return None;
        }
        Some(cache_dir.join(request.cache_file_name(&self.community, &self.parameter)))
    }

    async fn download(&self, request: &PowerRequest, url: &str) -> Result<Vec<u8>, PowerApiError> {
        let kind = request.kind;
        info!("Downloading {} data from {}", kind, url);

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                PowerApiError::Timeout {
                    kind,
                    url: url.to_string(),
                    source: e,
                }
            } else {
                PowerApiError::NetworkRequest {
                    kind,
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    PowerApiError::HttpStatus {
                        kind,
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    PowerApiError::NetworkRequest {
                        kind,
                        url: url.to_string(),
                        source: e,
                    }
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader.read_to_end(&mut body).await?;
        debug!("Downloaded {} bytes for {} query", body.len(), kind);
        Ok(body)
    }

    async fn cache_response(&self, bytes: &[u8], path: &Path) -> Result<(), PowerApiError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| PowerApiError::CacheDirCreation(dir.to_path_buf(), e))?;
        }
        fs::write(path, bytes)
            .await
            .map_err(|e| PowerApiError::CacheWrite(path.to_path_buf(), e))?;
        debug!("Cached response to {:?}", path);
        Ok(())
    }
}
