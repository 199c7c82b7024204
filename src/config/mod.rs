//! Configuration management for the newsharvest crawler
//!
//! Configuration is loaded from a TOML file or environment variables and
//! passed explicitly into every component at construction time.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Desktop browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Accept-Language sent with every request
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "vi-VN,vi;q=0.9,en-US;q=0.8,en;q=0.7";

/// Upper bound accepted for `max_pages`
pub const MAX_PAGES_LIMIT: u32 = 10_000;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site and category
    pub site: SiteConfig,

    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Output locations
    pub output: OutputConfig,

    /// Daily schedule
    pub schedule: ScheduleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
    pub max_pages: Option<u32>,
    pub run_at: Option<String>,
}

/// Site-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root, e.g. `https://dantri.com.vn/`
    pub base_url: String,

    /// Category path segment, e.g. `cong-nghe`
    pub category_slug: String,

    /// Human readable category name stamped on every record
    pub category_name: String,

    /// User agent string
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Hard ceiling on listing pages per run
    pub max_pages: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Client-side request spacing (requests per second, 0 = unlimited)
    pub requests_per_second: u32,

    /// Articles processed at once; output order is preserved either way
    pub article_concurrency: usize,
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append-only CSV record store
    pub csv_path: PathBuf,

    /// HTML gallery of the latest run
    pub gallery_path: PathBuf,

    /// Directory receiving downloaded lead images
    pub image_dir: PathBuf,

    /// Image shown in the gallery when a record has no local image
    pub placeholder_image: String,
}

/// Daily schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily run (24h `HH:MM`)
    pub run_at: String,

    /// How often the trigger is checked, in seconds
    pub poll_interval_secs: u64,

    /// Run once immediately when the scheduler starts
    pub run_on_startup: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://dantri.com.vn/"),
            category_slug: String::from("cong-nghe"),
            category_name: String::from("Công nghệ"),
            user_agent: String::from(DEFAULT_USER_AGENT),
            accept_language: String::from(DEFAULT_ACCEPT_LANGUAGE),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            request_timeout_secs: 10,
            requests_per_second: 2,
            article_concurrency: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("dantri_congnghe.csv"),
            gallery_path: PathBuf::from("dantri_gallery.html"),
            image_dir: PathBuf::from("dantri_images"),
            placeholder_image: String::from("no_image.png"),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_at: String::from("06:00"),
            poll_interval_secs: 60,
            run_on_startup: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Read an environment variable and parse it, keeping `default` when unset or invalid
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            site: SiteConfig {
                base_url: env_or("NEWSHARVEST_BASE_URL", defaults.site.base_url),
                category_slug: env_or("NEWSHARVEST_CATEGORY", defaults.site.category_slug),
                category_name: env_or(
                    "NEWSHARVEST_CATEGORY_NAME",
                    defaults.site.category_name,
                ),
                user_agent: env_or("NEWSHARVEST_USER_AGENT", defaults.site.user_agent),
                accept_language: env_or(
                    "NEWSHARVEST_ACCEPT_LANGUAGE",
                    defaults.site.accept_language,
                ),
            },
            crawler: CrawlerConfig {
                max_pages: env_or("NEWSHARVEST_MAX_PAGES", defaults.crawler.max_pages),
                request_timeout_secs: env_or(
                    "NEWSHARVEST_REQUEST_TIMEOUT",
                    defaults.crawler.request_timeout_secs,
                ),
                requests_per_second: env_or(
                    "NEWSHARVEST_RATE_LIMIT",
                    defaults.crawler.requests_per_second,
                ),
                article_concurrency: env_or(
                    "NEWSHARVEST_CONCURRENCY",
                    defaults.crawler.article_concurrency,
                ),
            },
            output: OutputConfig {
                csv_path: env_or("NEWSHARVEST_CSV_PATH", defaults.output.csv_path),
                gallery_path: env_or("NEWSHARVEST_GALLERY_PATH", defaults.output.gallery_path),
                image_dir: env_or("NEWSHARVEST_IMAGE_DIR", defaults.output.image_dir),
                placeholder_image: defaults.output.placeholder_image,
            },
            schedule: ScheduleConfig {
                run_at: env_or("NEWSHARVEST_RUN_AT", defaults.schedule.run_at),
                ..defaults.schedule
            },
            logging: LoggingConfig {
                level: env_or("NEWSHARVEST_LOG_LEVEL", defaults.logging.level),
                format: env_or("NEWSHARVEST_LOG_FORMAT", defaults.logging.format),
            },
        };

        config.validate().context("Invalid configuration from environment")?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.site.base_url)
            .with_context(|| format!("base_url is not a valid URL: {}", self.site.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("base_url must use http or https");
        }

        if self.site.category_slug.trim().is_empty() {
            anyhow::bail!("category_slug must not be empty");
        }

        if self.crawler.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.crawler.max_pages > MAX_PAGES_LIMIT {
            anyhow::bail!("max_pages must not exceed {MAX_PAGES_LIMIT}");
        }

        if self.site.category_name.trim().is_empty() {
            anyhow::bail!("category_name must not be empty");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.crawler.article_concurrency == 0 {
            anyhow::bail!("article_concurrency must be greater than 0");
        }

        if self.schedule.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than 0");
        }

        self.run_at()?;

        Ok(())
    }

    /// Site root with a guaranteed trailing slash, so relative joins stay under it
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.site.base_url.ends_with('/') {
            self.site.base_url.clone()
        } else {
            format!("{}/", self.site.base_url)
        }
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the scheduler poll interval as Duration
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.poll_interval_secs)
    }

    /// Apply command line overrides, then re-validate
    ///
    /// A new category slug must come with its display name; otherwise every
    /// record would be stamped with the previous category's name.
    pub fn apply_overrides(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(slug) = overrides.category_slug {
            if slug != self.site.category_slug && overrides.category_name.is_none() {
                anyhow::bail!(
                    "Category '{slug}' needs a display name (--category-name); \
                     the configured name '{}' belongs to '{}'",
                    self.site.category_name,
                    self.site.category_slug
                );
            }
            self.site.category_slug = slug;
        }
        if let Some(name) = overrides.category_name {
            self.site.category_name = name;
        }
        if let Some(max_pages) = overrides.max_pages {
            self.crawler.max_pages = max_pages;
        }
        if let Some(run_at) = overrides.run_at {
            self.schedule.run_at = run_at;
        }

        self.validate()
            .context("Invalid configuration after command line overrides")
    }

    /// Parse the daily run time
    pub fn run_at(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.schedule.run_at, "%H:%M").with_context(|| {
            format!(
                "Invalid run_at '{}'. Expected HH:MM",
                self.schedule.run_at
            )
        })
    }
}
