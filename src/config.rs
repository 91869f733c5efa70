//! Configuration for the selector
//!
//! Configuration is loaded in order of precedence:
//! 1. Command-line flags (highest priority, applied by the caller)
//! 2. Environment variables
//! 3. Config file (~/.config/tinct/config.toml)
//! 4. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one .toml file per Alacritty theme
    pub themes_dir: PathBuf,

    /// Alacritty config whose `import` array references the active theme
    pub alacritty_config: PathBuf,

    /// Oh My Posh config whose `palettes.template` holds the active theme
    pub posh_config: PathBuf,

    /// Annotation store (pins, comments, light/dark marks)
    pub store_path: PathBuf,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace" (RUST_LOG overrides)
    pub level: String,

    /// Write log files in addition to the in-TUI buffer
    pub file_enabled: bool,

    /// Directory for log files
    pub file_dir: PathBuf,

    /// Log file rotation policy
    pub file_rotation: LogRotation,

    /// Log file name prefix
    pub file_prefix: String,
}

/// Log file rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "hourly" => LogRotation::Hourly,
            "never" => LogRotation::Never,
            _ => LogRotation::Daily,
        }
    }
}

/// `~/.config`, or a relative fallback when the home directory is unknown
fn config_root() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".config"))
        .unwrap_or_else(|| PathBuf::from(".config"))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: config_root().join("tinct").join("logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "tinct.log".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let root = config_root();
        Self {
            themes_dir: root.join("alacritty").join("themes"),
            alacritty_config: root.join("alacritty").join("alacritty.toml"),
            posh_config: root.join("oh-my-posh").join("config.toml"),
            store_path: root.join("tinct").join("annotations.toml"),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub themes_dir: Option<String>,
    pub alacritty_config: Option<String>,
    pub posh_config: Option<String>,
    pub store_path: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();
        Self {
            level: file.level.unwrap_or(defaults.level),
            file_enabled: file.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file
                .file_dir
                .map(|d| expand_tilde(&d))
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|r| LogRotation::parse(&r))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file.file_prefix.unwrap_or(defaults.file_prefix),
        }
    }
}

/// Expand a leading `~/` to the home directory so paths in the config file
/// can be written the way shells accept them.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/tinct/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config").join("tinct").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        // Use Config::default().to_toml() as single source of truth
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists.
    ///
    /// A config file that exists but cannot be parsed fails fast with a
    /// clear error instead of silently falling back to defaults while the
    /// user debugs the wrong thing.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to parse config file {}:", path.display());
                    eprintln!("  {}", e);
                    eprintln!("To reset, run: tinct config --reset");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("Cannot read config file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        let defaults = Self::default();

        let path_from = |env_key: &str, file_value: Option<String>, default: PathBuf| {
            std::env::var(env_key)
                .ok()
                .or(file_value)
                .map(|p| expand_tilde(&p))
                .unwrap_or(default)
        };

        Self {
            themes_dir: path_from("TINCT_THEMES_DIR", file.themes_dir, defaults.themes_dir),
            alacritty_config: path_from(
                "TINCT_ALACRITTY_CONFIG",
                file.alacritty_config,
                defaults.alacritty_config,
            ),
            posh_config: path_from("TINCT_POSH_CONFIG", file.posh_config, defaults.posh_config),
            store_path: path_from("TINCT_STORE_PATH", file.store_path, defaults.store_path),
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        format!(
            r#"# tinct configuration

# Directory holding one .toml file per Alacritty theme
themes_dir = "{themes_dir}"

# Alacritty config whose `import` array references the active theme
alacritty_config = "{alacritty_config}"

# Oh My Posh config whose `palettes.template` holds the active theme
posh_config = "{posh_config}"

# Where pins, comments, and light/dark marks are persisted
store_path = "{store_path}"

# Logging configuration (RUST_LOG env var overrides the level)
[logging]
level = "{log_level}"
# File logging (in addition to the in-TUI status line)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            themes_dir = self.themes_dir.display(),
            alacritty_config = self.alacritty_config.display(),
            posh_config = self.posh_config.display(),
            store_path = self.store_path.display(),
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify that serialized config can be parsed back. Catches TOML
    /// syntax errors in the to_toml template.
    #[test]
    fn test_config_roundtrip_default() {
        let config = Config::default();
        let toml_str = config.to_toml();

        let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
        assert!(
            parsed.is_ok(),
            "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
            toml_str,
            parsed.err()
        );
    }

    #[test]
    fn test_roundtrip_preserves_values() {
        let mut config = Config::default();
        config.themes_dir = PathBuf::from("/custom/themes");
        config.logging.file_enabled = true;
        config.logging.file_rotation = LogRotation::Never;

        let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
        assert_eq!(parsed.themes_dir.as_deref(), Some("/custom/themes"));

        let logging = LoggingConfig::from_file(parsed.logging);
        assert!(logging.file_enabled);
        assert_eq!(logging.file_rotation, LogRotation::Never);
    }

    #[test]
    fn test_log_rotation_parse() {
        assert_eq!(LogRotation::parse("hourly"), LogRotation::Hourly);
        assert_eq!(LogRotation::parse("never"), LogRotation::Never);
        assert_eq!(LogRotation::parse("daily"), LogRotation::Daily);
        // Unknown values fall back to daily
        assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    }

    #[test]
    fn test_expand_tilde_without_prefix() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/path"), PathBuf::from("rel/path"));
    }

    #[test]
    fn test_expand_tilde_with_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/x/y"), home.join("x/y"));
        }
    }
}
