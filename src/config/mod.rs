pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use toml_config::Settings;

#[derive(Debug, Clone, Parser)]
#[command(name = "zillow-listings")]
#[command(about = "Export for-sale listings of a city to a delimited file")]
pub struct CliConfig {
    #[arg(short, long, help = "State code, e.g. WA")]
    pub state: String,

    #[arg(short, long, help = "City name, e.g. Seattle")]
    pub city: String,

    #[arg(long, help = "Use this region id instead of looking it up")]
    pub region_id: Option<String>,

    #[arg(long, help = "Fetch sale history and tax fields for every listing")]
    pub enrich: bool,

    #[arg(short, long, default_value = "datasets")]
    pub output_dir: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ZWS_ID", help = "API key for the region lookup")]
    pub zws_id: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Tsv,
}

impl OutputFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Csv => b',',
            OutputFormat::Tsv => b'\t',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
        }
    }
}

impl CliConfig {
    /// Loads the settings file (if any), applies flag overrides and
    /// validates the result.
    pub fn resolve(&self) -> Result<JobConfig> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        if let Some(zws_id) = &self.zws_id {
            settings.http.zws_id = zws_id.clone();
        }

        let job = JobConfig {
            state: self.state.clone(),
            city: self.city.clone(),
            region_id: self.region_id.clone(),
            enrich: self.enrich,
            format: self.format,
            settings,
        };
        validation::validate_path("output_dir", &self.output_dir)?;
        job.validate()?;
        Ok(job)
    }
}

/// Everything one run needs, after flags and settings file are merged.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub state: String,
    pub city: String,
    pub region_id: Option<String>,
    pub enrich: bool,
    pub format: OutputFormat,
    pub settings: Settings,
}

impl JobConfig {
    pub fn new(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
            region_id: None,
            enrich: false,
            format: OutputFormat::Csv,
            settings: Settings::default(),
        }
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("state", &self.state)?;
        validation::validate_non_empty_string("city", &self.city)?;
        if let Some(region_id) = &self.region_id {
            validation::validate_non_empty_string("region_id", region_id)?;
        }
        self.settings.validate()
    }
}

impl ConfigProvider for JobConfig {
    fn state(&self) -> &str {
        &self.state
    }

    fn city(&self) -> &str {
        &self.city
    }

    fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    fn enrich(&self) -> bool {
        self.enrich
    }

    fn delimiter(&self) -> u8 {
        self.format.delimiter()
    }

    fn file_extension(&self) -> &str {
        self.format.extension()
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }
}
