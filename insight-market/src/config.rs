//! Marketplace connection settings.
//!
//! Built once by the caller and passed into the client; nothing here is
//! process-global.

use std::path::Path;

use crate::error::{MarketError, MarketResult};

pub const DEFAULT_BASE_URL: &str = "https://api.mercadolibre.com";
pub const DEFAULT_DATE_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_PAGE_LIMIT: usize = 50;
/// Marketplace cap on ids per multiget call.
pub const DEFAULT_MULTIGET_CHUNK: usize = 20;
pub const DEFAULT_PERFORMANCE_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct MarketConfig {
    pub base_url: String,
    pub access_token: String,
    pub user_id: String,
    pub date_window_days: u32,
    pub page_limit: usize,
    pub multiget_chunk: usize,
    pub performance_concurrency: usize,
    pub timeout_secs: u64,
}

impl MarketConfig {
    /// Settings with defaults; the seller id is taken from the token.
    pub fn new(access_token: impl Into<String>) -> MarketResult<Self> {
        let access_token = access_token.into();
        let user_id = user_id_from_token(&access_token)?;
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token,
            user_id,
            date_window_days: DEFAULT_DATE_WINDOW_DAYS,
            page_limit: DEFAULT_PAGE_LIMIT,
            multiget_chunk: DEFAULT_MULTIGET_CHUNK,
            performance_concurrency: DEFAULT_PERFORMANCE_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn from_token_file(path: &Path) -> MarketResult<Self> {
        Self::new(load_access_token(path)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `base_url` joined with `path`, tolerating slashes on either side.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Read an access token from a file, trimming surrounding whitespace.
pub fn load_access_token(path: &Path) -> MarketResult<String> {
    let raw = std::fs::read_to_string(path).map_err(|e| MarketError::io(path, e))?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(MarketError::InvalidToken(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(token.to_string())
}

/// The seller id is the last `-`-separated segment of the token.
pub fn user_id_from_token(token: &str) -> MarketResult<String> {
    match token.rsplit('-').next() {
        Some(id) if !id.is_empty() && id != token => Ok(id.to_string()),
        _ => Err(MarketError::InvalidToken(
            "expected APP_USR-...-<user id>".to_string(),
        )),
    }
}
