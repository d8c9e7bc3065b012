use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::ArtifactPaths;
use crate::identity::DEFAULT_PLACEHOLDER_NAME;
use crate::logging::LogFormat;
use crate::scanner::{DEFAULT_FRAGMENT_EXTENSION, DEFAULT_MAX_PATH_SEPARATORS};
use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub archive: ArchiveConfig,
    pub pipeline: PipelineConfig,
    pub stats: StatsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive identifier; names the zip and the per-archive directories
    pub id: String,
    /// Owner display name, exactly as it appears in the export
    pub owner_name: String,
    pub zip_dir: String,
    pub raw_dir: String,
    pub processed_dir: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Force every stage to recompute
    pub debug: bool,
    pub max_path_separators: usize,
    pub fragment_extension: String,
    pub placeholder_name: String,
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Contacts with this many characters or fewer are left out of the report
    pub min_total_chars: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            archive: ArchiveConfig {
                id: "facebook-example".to_string(),
                owner_name: "MyFirst MyLast".to_string(),
                zip_dir: "facebook-zips".to_string(),
                raw_dir: "raw-data".to_string(),
                processed_dir: "processed-data".to_string(),
                output_dir: "output-data".to_string(),
            },
            pipeline: PipelineConfig {
                debug: false,
                max_path_separators: DEFAULT_MAX_PATH_SEPARATORS,
                fragment_extension: DEFAULT_FRAGMENT_EXTENSION.to_string(),
                placeholder_name: DEFAULT_PLACEHOLDER_NAME.to_string(),
                show_progress: true,
            },
            stats: StatsConfig { min_total_chars: 250 },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?;

        let config = Config::builder()
            // Start with default values
            .add_source(defaults)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("analysis").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix("MESSENGER_ANALYSIS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        InputValidator::validate_archive_id(&self.archive.id)?;
        InputValidator::validate_owner_name(&self.archive.owner_name)?;
        InputValidator::validate_fragment_extension(&self.pipeline.fragment_extension)?;

        for dir in [
            &self.archive.zip_dir,
            &self.archive.raw_dir,
            &self.archive.processed_dir,
            &self.archive.output_dir,
        ] {
            if dir.trim().is_empty() {
                return Err(anyhow::anyhow!("Data directories cannot be empty"));
            }
        }

        if self.pipeline.max_path_separators == 0 {
            return Err(anyhow::anyhow!("max_path_separators must be greater than 0"));
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        self.log_format()?;

        if let Some(file_path) = &self.logging.file_path {
            InputValidator::validate_file_path(Path::new(file_path))?;
        }

        Ok(())
    }

    /// `<zip dir>/<archive id>.zip`
    #[must_use]
    pub fn zip_path(&self) -> PathBuf {
        PathBuf::from(&self.archive.zip_dir).join(format!("{}.zip", self.archive.id))
    }

    /// `<raw dir>/<archive id>`
    #[must_use]
    pub fn raw_root(&self) -> PathBuf {
        PathBuf::from(&self.archive.raw_dir).join(&self.archive.id)
    }

    /// Canonical table locations for this archive
    #[must_use]
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::for_archive(&PathBuf::from(&self.archive.processed_dir), &self.archive.id)
    }

    /// `<output dir>/<archive id>`
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        PathBuf::from(&self.archive.output_dir).join(&self.archive.id)
    }

    /// Parsed log format
    pub fn log_format(&self) -> Result<LogFormat> {
        self.logging.format.parse()
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
