//! File configuration and resolved runtime settings.
//!
//! The config file is a flat `key = value` list (a TOML subset): strings are
//! double-quoted, integers and booleans are bare, `#` starts a comment.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::catalog::{CatalogEndpoints, DEFAULT_PAGE_SIZE};
use crate::http_client::HttpTimeouts;

/// Default listen address for the HTTP service.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Values read from the config file. `None` means "not set in the file".
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Address the HTTP service binds to.
    pub listen_addr: Option<SocketAddr>,
    /// Directory where CLI downloads are saved.
    pub output_dir: Option<PathBuf>,
    /// Default number of results per search page.
    pub page_size: Option<u8>,
    pub catalog_connect_timeout_secs: Option<u64>,
    pub catalog_read_timeout_secs: Option<u64>,
    pub transfer_connect_timeout_secs: Option<u64>,
    pub transfer_read_timeout_secs: Option<u64>,
    /// Full URL of the catalog search page.
    pub search_base_url: Option<String>,
    /// Full URL of the JSON metadata endpoint.
    pub metadata_base_url: Option<String>,
    /// Full URL of the mirror page.
    pub mirror_base_url: Option<String>,
    /// Scheme and host of the file server.
    pub download_base_url: Option<String>,
    /// Sanitize the filename sent in `Content-Disposition`.
    pub sanitize_filenames: Option<bool>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range field.
    pub fn validate(&self) -> Result<()> {
        if let Some(page_size) = self.page_size
            && !(1..=100).contains(&page_size)
        {
            bail!("Invalid config value for `page_size`: {page_size}. Expected range: 1..=100");
        }
        validate_timeout_secs(
            "catalog_connect_timeout_secs",
            self.catalog_connect_timeout_secs,
        )?;
        validate_timeout_secs("catalog_read_timeout_secs", self.catalog_read_timeout_secs)?;
        validate_timeout_secs(
            "transfer_connect_timeout_secs",
            self.transfer_connect_timeout_secs,
        )?;
        validate_timeout_secs(
            "transfer_read_timeout_secs",
            self.transfer_read_timeout_secs,
        )?;
        validate_absolute_url("search_base_url", self.search_base_url.as_deref())?;
        validate_absolute_url("metadata_base_url", self.metadata_base_url.as_deref())?;
        validate_absolute_url("mirror_base_url", self.mirror_base_url.as_deref())?;
        validate_absolute_url("download_base_url", self.download_base_url.as_deref())?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

fn validate_absolute_url(field: &str, value: Option<&str>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    url::Url::parse(value)
        .with_context(|| format!("Invalid config value for `{field}`: '{value}' is not an absolute URL"))?;
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerbositySetting {
    #[default]
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Tracing filter directive for this mode.
    #[must_use]
    pub fn filter_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/bookproxy/config.toml`
/// 2. `$HOME/.config/bookproxy/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("bookproxy")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("bookproxy")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the explicit path, or from the default path if present.
///
/// An explicit path must exist; a missing default file is not an error.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
            loaded_from_file: true,
        });
    }

    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig {
            path,
            config: None,
            loaded_from_file: false,
        });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
        loaded_from_file: true,
    })
}

/// Reads and parses one config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Parses config text.
///
/// # Errors
///
/// Returns an error for bad syntax, unknown keys, or invalid values; the
/// message carries the line number.
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "listen_addr" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                let addr = parsed
                    .parse::<SocketAddr>()
                    .with_context(|| format!("Invalid `listen_addr` '{parsed}' on line {line_no}"))?;
                cfg.listen_addr = Some(addr);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "page_size" => {
                cfg.page_size = Some(parse_integer_u8(value).with_context(invalid)?);
            }
            "catalog_connect_timeout_secs" => {
                cfg.catalog_connect_timeout_secs =
                    Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "catalog_read_timeout_secs" => {
                cfg.catalog_read_timeout_secs =
                    Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "transfer_connect_timeout_secs" => {
                cfg.transfer_connect_timeout_secs =
                    Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "transfer_read_timeout_secs" => {
                cfg.transfer_read_timeout_secs =
                    Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "search_base_url" => {
                cfg.search_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "metadata_base_url" => {
                cfg.metadata_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "mirror_base_url" => {
                cfg.mirror_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "download_base_url" => {
                cfg.download_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "sanitize_filenames" => {
                cfg.sanitize_filenames = Some(parse_boolean(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u8(raw_value: &str) -> Result<u8> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<u16>()?;
    u8::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}

/// Effective settings: defaults, overlaid by the config file.
///
/// CLI flags are applied on top by the binary, which owns the precedence
/// rule (flag > file > default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    pub output_dir: PathBuf,
    pub page_size: u8,
    pub catalog_timeouts: HttpTimeouts,
    pub transfer_timeouts: HttpTimeouts,
    pub endpoints: CatalogEndpoints,
    pub sanitize_filenames: bool,
    pub verbosity: VerbositySetting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            output_dir: PathBuf::from("."),
            page_size: DEFAULT_PAGE_SIZE.parse().unwrap_or(10),
            catalog_timeouts: HttpTimeouts::catalog(),
            transfer_timeouts: HttpTimeouts::transfer(),
            endpoints: CatalogEndpoints::default(),
            sanitize_filenames: true,
            verbosity: VerbositySetting::Default,
        }
    }
}

impl Settings {
    /// Overlays the values set in `file` onto the defaults.
    #[must_use]
    pub fn from_file_config(file: Option<&FileConfig>) -> Self {
        let mut settings = Self::default();
        let Some(file) = file else {
            return settings;
        };

        if let Some(addr) = file.listen_addr {
            settings.listen_addr = addr;
        }
        if let Some(dir) = &file.output_dir {
            settings.output_dir.clone_from(dir);
        }
        if let Some(page_size) = file.page_size {
            settings.page_size = page_size;
        }
        overlay_timeouts(
            &mut settings.catalog_timeouts,
            file.catalog_connect_timeout_secs,
            file.catalog_read_timeout_secs,
        );
        overlay_timeouts(
            &mut settings.transfer_timeouts,
            file.transfer_connect_timeout_secs,
            file.transfer_read_timeout_secs,
        );
        if let Some(url) = &file.search_base_url {
            settings.endpoints.search_url.clone_from(url);
        }
        if let Some(url) = &file.metadata_base_url {
            settings.endpoints.metadata_url.clone_from(url);
        }
        if let Some(url) = &file.mirror_base_url {
            settings.endpoints.mirror_url.clone_from(url);
        }
        if let Some(url) = &file.download_base_url {
            settings.endpoints.download_base_url.clone_from(url);
        }
        if let Some(sanitize) = file.sanitize_filenames {
            settings.sanitize_filenames = sanitize;
        }
        if let Some(verbosity) = file.verbosity {
            settings.verbosity = verbosity;
        }
        settings
    }
}

fn overlay_timeouts(timeouts: &mut HttpTimeouts, connect: Option<u64>, read: Option<u64>) {
    if let Some(connect) = connect {
        timeouts.connect_secs = connect;
    }
    if let Some(read) = read {
        timeouts.read_secs = read;
    }
}
