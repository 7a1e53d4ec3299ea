//! Run settings.
//!
//! Settings are layered: built-in defaults, then the optional YAML file, then
//! command-line flags. The result is validated once (selectors compiled, genre
//! filter checked) before anything is fetched.
//!
//! ```yaml
//! policy: lenient
//! on_missing_required: skip-item
//! required_fields: [title]   # rank is always required
//! sentinel: descriptive
//! bom: true
//! pause_secs: 3
//! subdir: comment
//! selectors:
//!   rank: [".sc-1hy2mez-8", ".newsFeed_item_rankNum"]
//! genres:
//!   - code: world
//!     label: 国際
//!     url: https://news.yahoo.co.jp/ranking/comment/world
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::fetch::DEFAULT_USER_AGENT;
use crate::models::{Field, Genre};
use crate::outputs::csv::WriterOptions;
use crate::scrapers::normalize::SentinelStyle;
use crate::scrapers::ranking::ExtractionRules;
use crate::scrapers::selectors::{SelectorConfig, SelectorProfile};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Pause between page requests when nothing else is configured.
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(3);

/// Per-request timeout when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_GENRES: [(&str, &str, &str); 9] = [
    ("TTL", "総合", "https://news.yahoo.co.jp/ranking/comment"),
    ("domestic", "国内", "https://news.yahoo.co.jp/ranking/comment/domestic"),
    ("world", "国際", "https://news.yahoo.co.jp/ranking/comment/world"),
    ("business", "経済", "https://news.yahoo.co.jp/ranking/comment/business"),
    ("entertainment", "エンタメ", "https://news.yahoo.co.jp/ranking/comment/entertainment"),
    ("sports", "スポーツ", "https://news.yahoo.co.jp/ranking/comment/sports"),
    ("it-science", "IT・科学", "https://news.yahoo.co.jp/ranking/comment/it-science"),
    ("life", "ライフ", "https://news.yahoo.co.jp/ranking/comment/life"),
    ("local", "地域", "https://news.yahoo.co.jp/ranking/comment/local"),
];

/// The built-in genre list, in capture order.
pub fn default_genres() -> Vec<Genre> {
    DEFAULT_GENRES
        .iter()
        .filter_map(|(code, label, url)| Url::parse(url).ok().map(|u| Genre::new(code, label, u)))
        .collect()
}

/// What a failed genre does to the rest of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failed genre; exit status 1.
    #[default]
    Strict,
    /// Record the failure and continue with the next genre; exit status 0.
    Lenient,
}

/// What an entry missing a required field does to its genre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MissingRequired {
    /// Drop the entry with a warning and keep the rest of the page.
    #[default]
    SkipItem,
    /// Fail the whole genre.
    FailGenre,
}

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub subdir: Option<String>,
    pub policy: Option<FailurePolicy>,
    pub on_missing_required: Option<MissingRequired>,
    pub required_fields: Option<Vec<Field>>,
    pub sentinel: Option<SentinelStyle>,
    pub bom: Option<bool>,
    pub pause_secs: Option<f64>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub selectors: Option<SelectorConfig>,
    pub genres: Option<Vec<Genre>>,
}

impl FileConfig {
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config file");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub genres: Vec<Genre>,
    pub policy: FailurePolicy,
    pub on_missing_required: MissingRequired,
    pub rules: ExtractionRules,
    pub selectors: SelectorProfile,
    pub writer: WriterOptions,
    pub pause: Duration,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Settings {
    /// Merge defaults, the file and the command line, then validate.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let genres = select_genres(file.genres.unwrap_or_else(default_genres), &cli.genres)?;
        let selectors = SelectorProfile::compile(&file.selectors.unwrap_or_default())?;

        let configured = if cli.required_fields.is_empty() {
            file.required_fields.unwrap_or_default()
        } else {
            cli.required_fields.clone()
        };
        // rank is always required; configured fields are added to it
        let mut required = ExtractionRules::default().required;
        for field in configured {
            if !required.contains(&field) {
                required.push(field);
            }
        }
        let rules = ExtractionRules {
            required,
            sentinel: cli.sentinel.or(file.sentinel).unwrap_or_default(),
        };

        let writer = WriterOptions {
            root: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            subdir: cli.subdir.clone().or(file.subdir),
            bom: cli.bom || file.bom.unwrap_or(false),
        };

        let pause = match cli.pause_secs.or(file.pause_secs) {
            Some(secs) => {
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidPause(secs))?
            }
            None => DEFAULT_PAUSE,
        };
        let timeout = cli
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            genres,
            policy: cli.policy.or(file.policy).unwrap_or_default(),
            on_missing_required: cli
                .on_missing_required
                .or(file.on_missing_required)
                .unwrap_or_default(),
            rules,
            selectors,
            writer,
            pause,
            user_agent: cli
                .user_agent
                .clone()
                .or(file.user_agent)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout,
        })
    }
}

/// Keep only the genres named in `filter`, preserving configured order.
fn select_genres(all: Vec<Genre>, filter: &[String]) -> Result<Vec<Genre>, ConfigError> {
    for (i, genre) in all.iter().enumerate() {
        validate_code(&genre.code)?;
        if all[..i].iter().any(|g| g.code == genre.code) {
            return Err(ConfigError::DuplicateGenre(genre.code.clone()));
        }
    }
    if let Some(unknown) = filter.iter().find(|code| !all.iter().any(|g| &g.code == *code)) {
        return Err(ConfigError::UnknownGenre(unknown.clone()));
    }
    let genres: Vec<Genre> = if filter.is_empty() {
        all
    } else {
        all.into_iter().filter(|g| filter.contains(&g.code)).collect()
    };
    if genres.is_empty() {
        return Err(ConfigError::NoGenres);
    }
    Ok(genres)
}

/// Genre codes end up in file names, so they must be a single path segment.
fn validate_code(code: &str) -> Result<(), ConfigError> {
    if code.is_empty() || code.contains(['/', '\\']) || code.contains("..") {
        return Err(ConfigError::InvalidGenreCode(code.to_string()));
    }
    Ok(())
}
