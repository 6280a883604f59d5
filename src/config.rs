use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::utils::constants::{DEFAULT_DELIMITER, DEFAULT_MISSING_MARKERS, ENV_PREFIX};

/// What the field deriver does with a row that violates a field contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Drop the row, record it, log a warning and carry on
    #[default]
    Skip,
    /// Fail the whole run on the first offending row
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub row_error_policy: RowErrorPolicy,
    pub delimiter: String,
    pub missing_markers: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            row_error_policy: RowErrorPolicy::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Layer defaults, an optional config file and `AIRQ_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("row_error_policy", "skip")?
            .set_default("delimiter", defaults.delimiter.clone())?
            .set_default("missing_markers", defaults.missing_markers.clone())?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("missing_markers"),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::debug!(?config, "Loaded pipeline configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte().map(|_| ())
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(PipelineError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }

    pub fn with_row_error_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.row_error_policy = policy;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.row_error_policy, RowErrorPolicy::Skip);
        assert_eq!(config.delimiter_byte().unwrap(), b',');
        assert!(config.missing_markers.iter().any(|m| m == "NA"));
        assert!(config.missing_markers.iter().any(|m| m.is_empty()));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "row_error_policy = \"abort\"")?;
        writeln!(file, "delimiter = \";\"")?;

        let config = PipelineConfig::load(Some(file.path()))?;
        assert_eq!(config.row_error_policy, RowErrorPolicy::Abort);
        assert_eq!(config.delimiter_byte()?, b';');
        assert_eq!(config.missing_markers, PipelineConfig::default().missing_markers);

        Ok(())
    }

    #[test]
    fn test_invalid_delimiter() {
        let config = PipelineConfig {
            delimiter: "||".to_string(),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }
}
