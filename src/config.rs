//! sqlport configuration file.
//!
//! ```toml
//! [defaults]
//! source = "tibero"
//! target = "postgresql"
//!
//! [options]
//! include_info = false
//! ddl_indent = 2
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dialect::DialectType;
use crate::error::{ConvertError, ConvertResult};
use crate::types::ConversionOptions;

/// Default dialects used when the command line names none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub source: Option<DialectType>,
    pub target: Option<DialectType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: Defaults,
    pub options: ConversionOptions,
}

impl Config {
    /// `<config dir>/sqlport/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlport").join("config.toml"))
    }

    pub fn from_toml(text: &str) -> ConvertResult<Self> {
        toml::from_str(text).map_err(|e| ConvertError::Config(e.to_string()))
    }

    /// Load an explicit file. A missing file is an error.
    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    /// Load `path` if given, else the default location if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> ConvertResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::from_file(&default),
            _ => Ok(Self::default()),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn source(mut self, dialect: DialectType) -> Self {
        self.config.defaults.source = Some(dialect);
        self
    }

    pub fn target(mut self, dialect: DialectType) -> Self {
        self.config.defaults.target = Some(dialect);
        self
    }

    pub fn options(mut self, options: ConversionOptions) -> Self {
        self.config.options = options;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            "[defaults]\nsource = \"tibero\"\ntarget = \"postgresql\"\n\n[options]\ninclude_info = false\nddl_indent = 2\n",
        )
        .unwrap();
        assert_eq!(config.defaults.source, Some(DialectType::Tibero));
        assert_eq!(config.defaults.target, Some(DialectType::Postgresql));
        assert!(!config.options.include_info);
        assert!(config.options.record_unchanged);
        assert_eq!(config.options.ddl_indent, 2);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_dialect_is_config_error() {
        let err = Config::from_toml("[defaults]\nsource = \"sqlite\"\n").unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/sqlport.toml"))).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .source(DialectType::Mysql)
            .options(ConversionOptions::default().ddl_indent(8))
            .build();
        assert_eq!(config.defaults.source, Some(DialectType::Mysql));
        assert_eq!(config.defaults.target, None);
        assert_eq!(config.options.ddl_indent, 8);
    }
}
