use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rolodex_core::options::{
    validate_threshold, DEFAULT_FUZZY_NAME_THRESHOLD, DEFAULT_FUZZY_SCAN_LIMIT,
    DEFAULT_PHONE_NAME_THRESHOLD,
};
use rolodex_core::{CoreError, EngineOptions, NameRules, Normalizer, PhoneRules};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "rolodex";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: Option<PathBuf>,
    pub matching: MatchingConfig,
    pub phone: PhoneConfig,
    pub extra_name_suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    pub phone_name_threshold: f64,
    pub fuzzy_name_threshold: f64,
    pub fuzzy_scan_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneConfig {
    pub rules: PhoneRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            matching: MatchingConfig {
                phone_name_threshold: DEFAULT_PHONE_NAME_THRESHOLD,
                fuzzy_name_threshold: DEFAULT_FUZZY_NAME_THRESHOLD,
                fuzzy_scan_limit: DEFAULT_FUZZY_SCAN_LIMIT,
            },
            phone: PhoneConfig {
                rules: PhoneRules::default(),
            },
            extra_name_suffixes: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            normalizer: Normalizer::new(
                self.phone.rules.clone(),
                NameRules::with_extra_suffixes(&self.extra_name_suffixes),
            ),
            phone_name_threshold: self.matching.phone_name_threshold,
            fuzzy_name_threshold: self.matching.fuzzy_name_threshold,
            fuzzy_scan_limit: self.matching.fuzzy_scan_limit,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid data_dir value: {0}")]
    InvalidDataDir(PathBuf),
    #[error("invalid matching.{field} value: {value}")]
    InvalidThreshold { field: &'static str, value: f64 },
    #[error("invalid phone.{field} value: {value}")]
    InvalidPhoneField { field: &'static str, value: String },
    #[error("invalid names.extra_suffixes entry: {0:?}")]
    InvalidNameSuffix(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    matching: Option<MatchingFile>,
    phone: Option<PhoneFile>,
    names: Option<NamesFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchingFile {
    phone_name_threshold: Option<f64>,
    fuzzy_name_threshold: Option<f64>,
    fuzzy_scan_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    country_code: Option<String>,
    leading_digits: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamesFile {
    extra_suffixes: Option<Vec<String>>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(dir) = parsed.data_dir {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDataDir(dir));
        }
        config.data_dir = Some(dir);
    }

    if let Some(matching) = parsed.matching {
        if let Some(value) = matching.phone_name_threshold {
            config.matching.phone_name_threshold =
                validate_threshold(value).map_err(|_| ConfigError::InvalidThreshold {
                    field: "phone_name_threshold",
                    value,
                })?;
        }
        if let Some(value) = matching.fuzzy_name_threshold {
            config.matching.fuzzy_name_threshold =
                validate_threshold(value).map_err(|_| ConfigError::InvalidThreshold {
                    field: "fuzzy_name_threshold",
                    value,
                })?;
        }
        if let Some(limit) = matching.fuzzy_scan_limit {
            config.matching.fuzzy_scan_limit = limit;
        }
    }

    if let Some(phone) = parsed.phone {
        let country_code = phone
            .country_code
            .unwrap_or_else(|| config.phone.rules.country_code().to_string());
        let leading_digits = phone
            .leading_digits
            .unwrap_or_else(|| config.phone.rules.leading_digits().to_string());
        config.phone.rules =
            PhoneRules::new(&country_code, &leading_digits).map_err(|err| match err {
                CoreError::InvalidLeadingDigits(value) => ConfigError::InvalidPhoneField {
                    field: "leading_digits",
                    value,
                },
                _ => ConfigError::InvalidPhoneField {
                    field: "country_code",
                    value: country_code.clone(),
                },
            })?;
    }

    if let Some(names) = parsed.names {
        for suffix in names.extra_suffixes.unwrap_or_default() {
            if suffix.trim().is_empty() {
                return Err(ConfigError::InvalidNameSuffix(suffix));
            }
            config.extra_name_suffixes.push(suffix);
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
