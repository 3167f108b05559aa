use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::core::unix_millis;
use crate::foundation::error::{PosecardError, PosecardResult};

/// Why a single image could not be produced.
///
/// Composers recover from every variant by skipping the element that needed the image.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Bytes were obtained but are not a decodable image (or the data URI is malformed).
    #[error("decode error: {0}")]
    Decode(String),

    /// The remote request failed (network error or non-success status).
    #[error("fetch '{url}' failed: {reason}")]
    Fetch { url: String, reason: String },

    /// Reading a local image file failed.
    #[error("read '{}' failed: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    /// The reference is empty or uses a scheme the loader does not handle.
    #[error("unsupported image reference '{0}'")]
    Unsupported(String),
}

impl LoadError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Classified image reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// `data:` URI carrying the encoded image inline.
    Data(&'a str),
    /// `http(s)://` URL.
    Remote(&'a str),
    /// `file://` URL or filesystem path, already resolved against the base directory.
    Local(PathBuf),
}

impl<'a> ImageRef<'a> {
    pub fn classify(source: &'a str, base_dir: Option<&Path>) -> Result<Self, LoadError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(LoadError::Unsupported(source.to_string()));
        }
        if has_scheme(trimmed, "data:") {
            return Ok(Self::Data(trimmed));
        }
        if has_scheme(trimmed, "http://") || has_scheme(trimmed, "https://") {
            return Ok(Self::Remote(trimmed));
        }
        if has_scheme(trimmed, "file://") {
            let raw = &trimmed["file://".len()..];
            let decoded = percent_encoding::percent_decode_str(raw).decode_utf8_lossy();
            return Ok(Self::Local(PathBuf::from(decoded.as_ref())));
        }
        if trimmed.contains("://") || has_scheme(trimmed, "blob:") {
            return Err(LoadError::Unsupported(source.to_string()));
        }

        let path = Path::new(trimmed);
        let resolved = match base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };
        Ok(Self::Local(resolved))
    }
}

fn has_scheme(s: &str, scheme: &str) -> bool {
    s.len() >= scheme.len()
        && s.is_char_boundary(scheme.len())
        && s[..scheme.len()].eq_ignore_ascii_case(scheme)
}

// Browsers accept data URIs with or without trailing padding.
const DATA_URI_BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the payload of a `data:[<mime>][;base64],<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LoadError> {
    if !has_scheme(uri, "data:") {
        return Err(LoadError::decode("data uri must start with 'data:'"));
    }
    let rest = &uri["data:".len()..];
    let Some((meta, payload)) = rest.split_once(',') else {
        return Err(LoadError::decode("data uri has no ',' separator"));
    };

    let is_base64 = meta
        .rsplit(';')
        .next()
        .is_some_and(|p| p.trim().eq_ignore_ascii_case("base64"));
    if is_base64 {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = percent_encoding::percent_decode_str(&cleaned).decode_utf8_lossy();
        DATA_URI_BASE64
            .decode(cleaned.as_bytes())
            .map_err(|e| LoadError::decode(format!("invalid base64 payload: {e}")))
    } else {
        Ok(percent_encoding::percent_decode_str(payload).collect())
    }
}

/// Append a cache-busting `cors=<millis>` query parameter.
pub fn cache_bust_url(url: &str, millis: u64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}cors={millis}")
}

/// Remote byte source used by [`ImageLoader`].
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the full response body for `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
}

/// [`Fetch`] implementation backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher. `timeout` bounds each request; `None` never times out.
    pub fn new(timeout: Option<Duration>) -> PosecardResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| PosecardError::validation(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::fetch(url, e))?;
        let resp = resp.error_for_status().map_err(|e| LoadError::fetch(url, e))?;
        let body = resp.bytes().await.map_err(|e| LoadError::fetch(url, e))?;
        Ok(body.to_vec())
    }
}

/// [`Fetch`] implementation that refuses every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineFetcher;

#[async_trait::async_trait]
impl Fetch for OfflineFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        Err(LoadError::fetch(url, "network access disabled"))
    }
}

/// Resolves image references into decoded rasters.
#[derive(Clone)]
pub struct ImageLoader {
    fetcher: Arc<dyn Fetch>,
    base_dir: Option<PathBuf>,
    clock: fn() -> u64,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            base_dir: None,
            clock: unix_millis,
        }
    }

    /// Resolve relative filesystem references against `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Clock used for the cache-busting parameter of the fallback request.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Load and decode one image.
    ///
    /// Remote references get one fallback request with a cache-busting parameter when the first
    /// fetch fails. A fetch that succeeds but yields undecodable bytes is not retried.
    pub async fn load(&self, source: &str) -> Result<DecodedImage, LoadError> {
        match ImageRef::classify(source, self.base_dir.as_deref())? {
            ImageRef::Data(uri) => decode_image(&decode_data_uri(uri)?),
            ImageRef::Local(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| LoadError::Io {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                decode_fetched(bytes)
            }
            ImageRef::Remote(url) => match self.fetcher.fetch(url).await {
                Ok(bytes) => decode_fetched(bytes),
                Err(err) => {
                    tracing::debug!(url, error = %err, "primary fetch failed, retrying cache-busted");
                    let busted = cache_bust_url(url, (self.clock)());
                    let bytes = self.fetcher.fetch(&busted).await?;
                    decode_fetched(bytes)
                }
            },
        }
    }
}

// Owns the fetched buffer; it is dropped once decode settles.
fn decode_fetched(bytes: Vec<u8>) -> Result<DecodedImage, LoadError> {
    decode_image(&bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
