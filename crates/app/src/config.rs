//! Runtime configuration, read from `PLANTSTORE_*` environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::TimeDelta;

use plantstore_checkout::DEFAULT_NOTICE_SECS;
use plantstore_observability::LogFormat;
use plantstore_products::{DEFAULT_PAGE_SIZE, Paginator};
use plantstore_sales::{DEFAULT_RANK_SIZE, SalesAggregator};

pub const PAGE_SIZE_VAR: &str = "PLANTSTORE_PAGE_SIZE";
pub const RANK_SIZE_VAR: &str = "PLANTSTORE_RANK_SIZE";
pub const NOTICE_SECS_VAR: &str = "PLANTSTORE_NOTICE_SECS";
pub const CART_DIR_VAR: &str = "PLANTSTORE_CART_DIR";
pub const LOG_FORMAT_VAR: &str = "PLANTSTORE_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Products per storefront page.
    pub page_size: usize,
    /// Length of the dashboard's top/bottom seller lists.
    pub rank_size: usize,
    /// How long the "order placed" notice stays up.
    pub notice_secs: u32,
    /// Where carts are saved. `None` keeps them in memory.
    pub cart_dir: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            rank_size: DEFAULT_RANK_SIZE,
            notice_secs: DEFAULT_NOTICE_SECS as u32,
            cart_dir: None,
            log_format: LogFormat::default(),
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or blank variables take the
    /// default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let page_size = match var(PAGE_SIZE_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{PAGE_SIZE_VAR} must be a positive integer"))?,
            None => defaults.page_size,
        };
        if page_size == 0 {
            bail!("{PAGE_SIZE_VAR} must be at least 1");
        }

        let rank_size = match var(RANK_SIZE_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{RANK_SIZE_VAR} must be a non-negative integer"))?,
            None => defaults.rank_size,
        };

        let notice_secs = match var(NOTICE_SECS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{NOTICE_SECS_VAR} must be a number of seconds"))?,
            None => defaults.notice_secs,
        };

        let log_format = match var(LOG_FORMAT_VAR) {
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| {
                anyhow!("{LOG_FORMAT_VAR} must be 'json' or 'pretty', got '{raw}'")
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            page_size,
            rank_size,
            notice_secs,
            cart_dir: var(CART_DIR_VAR).map(PathBuf::from),
            log_format,
        })
    }

    pub fn paginator(&self) -> Result<Paginator> {
        Paginator::new(self.page_size).context("invalid page size")
    }

    pub fn aggregator(&self) -> SalesAggregator {
        SalesAggregator::new(self.rank_size)
    }

    pub fn notice_ttl(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.notice_secs))
    }
}
