//! Configuration file discovery and format detection.
//!
//! Files are read straight into a `serde_json::Value` so that key order
//! survives: pattern maps are linted in the order they are written.

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use super::{ConfigError, EnvOverrides, HooksConfig};

/// Base names looked up in the project root, in priority order.
pub const CONFIG_BASENAMES: [&str; 2] = [".git-hooks.config", "git-hooks.config"];

/// Extensions tried for each base name, in priority order.
pub const CONFIG_EXTENSIONS: [&str; 4] = ["json", "toml", "yaml", "yml"];

/// Key holding the configuration inside `package.json`.
pub const PACKAGE_JSON_KEY: &str = "git-hooks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            _ => None,
        }
    }

    /// Guess a format from file content when the extension says nothing.
    pub fn detect(content: &str) -> Option<Self> {
        let trimmed = content.trim();

        if (trimmed.starts_with('{') && trimmed.ends_with('}'))
            || (trimmed.starts_with('[') && trimmed.ends_with(']'))
        {
            return Some(ConfigFormat::Json);
        }

        let toml_like = trimmed.lines().map(str::trim).any(|line| {
            if line.starts_with('#') || line.starts_with('-') {
                return false;
            }
            (line.starts_with('[') && line.ends_with(']'))
                || match (line.find('='), line.find(':')) {
                    (Some(eq), Some(colon)) => eq < colon,
                    (Some(_), None) => true,
                    _ => false,
                }
        });
        if toml_like {
            return Some(ConfigFormat::Toml);
        }

        if trimmed.contains("---") || trimmed.lines().any(|line| line.contains(':')) {
            return Some(ConfigFormat::Yaml);
        }

        None
    }

    /// Parse content into an order-preserving JSON value.
    pub fn parse(self, content: &str) -> Result<Value, String> {
        match self {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Yaml => "YAML",
        })
    }
}

/// Where a configuration document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    PackageJson(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::PackageJson(path) => {
                write!(f, "{} (\"{PACKAGE_JSON_KEY}\")", path.display())
            }
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn package_json_section(path: &Path) -> Result<Option<Value>, ConfigError> {
    let content = read(path)?;
    let mut manifest: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        format: ConfigFormat::Json,
        message: e.to_string(),
    })?;
    Ok(manifest
        .as_object_mut()
        .and_then(|fields| fields.remove(PACKAGE_JSON_KEY)))
}

/// Find the first configuration source in the project root.
pub fn discover(project_root: &Path) -> Option<ConfigSource> {
    for basename in CONFIG_BASENAMES {
        for extension in CONFIG_EXTENSIONS {
            let candidate = project_root.join(format!("{basename}.{extension}"));
            if candidate.is_file() {
                return Some(ConfigSource::File(candidate));
            }
        }
    }

    let manifest = project_root.join("package.json");
    if manifest.is_file() {
        match package_json_section(&manifest) {
            Ok(Some(_)) => return Some(ConfigSource::PackageJson(manifest)),
            Ok(None) => {}
            Err(e) => tracing::debug!("ignoring unreadable package.json: {e}"),
        }
    }

    None
}

/// Read a source into a raw document.
pub fn read_source(source: &ConfigSource) -> Result<Value, ConfigError> {
    match source {
        ConfigSource::File(path) => {
            let content = read(path)?;
            let format = ConfigFormat::from_path(path)
                .or_else(|| ConfigFormat::detect(&content))
                .unwrap_or(ConfigFormat::Toml);
            tracing::trace!("parsing {} as {format}", path.display());
            format.parse(&content).map_err(|message| ConfigError::Parse {
                path: path.clone(),
                format,
                message,
            })
        }
        ConfigSource::PackageJson(path) => {
            package_json_section(path)?.ok_or(ConfigError::NotFound)
        }
    }
}

/// Load the configuration for a project.
///
/// An explicit path wins over discovery; relative paths resolve against the
/// project root. Environment overrides are applied last.
pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<HooksConfig, ConfigError> {
    let source = match explicit {
        Some(path) if path.is_absolute() => ConfigSource::File(path.to_path_buf()),
        Some(path) => ConfigSource::File(project_root.join(path)),
        None => discover(project_root).ok_or(ConfigError::NotFound)?,
    };

    tracing::debug!("loading configuration from {source}");
    let mut config = HooksConfig::from_value(read_source(&source)?)?;
    config.apply_env(&EnvOverrides::from_env()?);
    Ok(config)
}
