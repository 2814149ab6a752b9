use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use orderlink_core::TableId;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "orderlink";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "https://app.nocodb.com";
pub const DEFAULT_TOKEN_ENV: &str = "NOCODB_API_TOKEN";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_CLIENT_EMAIL_FIELD: &str = "Email";
pub const DEFAULT_ORDER_EMAIL_FIELD: &str = "Email (Billing)";
pub const DEFAULT_RELATION_FIELD_NAME: &str = "Orders 1";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;
pub const DEFAULT_LINK_DELAY_MS: u64 = 100;

pub const ENV_BASE_URL: &str = "NOCODB_BASE_URL";
pub const ENV_CLIENTS_TABLE_ID: &str = "NOCODB_CLIENTS_TABLE_ID";
pub const ENV_ORDERS_TABLE_ID: &str = "NOCODB_ORDERS_TABLE_ID";
pub const ENV_CLIENT_EMAIL_FIELD: &str = "NOCODB_EMAIL_FIELD_CLIENTS";
pub const ENV_ORDER_EMAIL_FIELD: &str = "NOCODB_EMAIL_FIELD_ORDERS";
pub const ENV_RELATION_FIELD_ID: &str = "NOCODB_RELATION_FIELD_ID";
pub const ENV_RELATION_FIELD_NAME: &str = "NOCODB_RELATION_FIELD_NAME";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    pub tables: TablesConfig,
    pub pacing: PacingConfig,
}

#[derive(Clone)]
pub struct RemoteConfig {
    pub base_url: Url,
    pub token: String,
    pub timeout: Duration,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TablesConfig {
    pub clients_table: TableId,
    pub orders_table: TableId,
    pub client_email_field: String,
    pub order_email_field: String,
    pub relation_field_id: String,
    pub relation_field_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub page_size: usize,
    pub page_delay: Duration,
    pub link_delay: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            link_delay: Duration::from_millis(DEFAULT_LINK_DELAY_MS),
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
    #[error("missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),
    #[error("invalid base url {0:?}: expected an http or https url")]
    InvalidBaseUrl(String),
    #[error("invalid page_size value: {0} (expected 1..=1000)")]
    InvalidPageSize(usize),
    #[error("invalid timeout_seconds value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
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

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    remote: Option<RemoteFile>,
    tables: Option<TablesFile>,
    pacing: Option<PacingFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RemoteFile {
    base_url: Option<String>,
    token_env: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesFile {
    clients_table_id: Option<String>,
    orders_table_id: Option<String>,
    client_email_field: Option<String>,
    order_email_field: Option<String>,
    relation_field_id: Option<String>,
    relation_field_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PacingFile {
    page_size: Option<usize>,
    page_delay_ms: Option<u64>,
    link_delay_ms: Option<u64>,
}

/// Loads the config file (if any) and overlays the process environment.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    load_with_env(config_path, |key| env::var(key).ok())
}

pub fn load_with_env<F>(config_path: Option<PathBuf>, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = config_path.is_some();
    let file = match resolve_config_path_with(config_path, &lookup) {
        Ok(path) => load_at_path(&path, required)?.unwrap_or_default(),
        Err(ConfigError::MissingHomeDir) if !required => ConfigFile::default(),
        Err(ConfigError::InvalidConfigPath(_)) if !required => ConfigFile::default(),
        Err(err) => return Err(err),
    };
    merge_config(file, &lookup)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    resolve_config_path_with(custom, &|key: &str| env::var(key).ok())
}

fn resolve_config_path_with<F>(custom: Option<PathBuf>, lookup: &F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = lookup("XDG_CONFIG_HOME") {
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

fn load_at_path(path: &Path, required: bool) -> Result<Option<ConfigFile>> {
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
    Ok(Some(parsed))
}

fn merge_config<F>(parsed: ConfigFile, lookup: &F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let remote = parsed.remote.unwrap_or_default();
    let tables = parsed.tables.unwrap_or_default();
    let pacing = parsed.pacing.unwrap_or_default();
    let setting = |env_key: &str, file_value: Option<String>| {
        non_empty(lookup(env_key)).or_else(|| non_empty(file_value))
    };

    let token_env = non_empty(remote.token_env).unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());
    let token = non_empty(lookup(&token_env));
    let clients_table = setting(ENV_CLIENTS_TABLE_ID, tables.clients_table_id);
    let orders_table = setting(ENV_ORDERS_TABLE_ID, tables.orders_table_id);
    let relation_field_id = setting(ENV_RELATION_FIELD_ID, tables.relation_field_id);

    let mut missing = Vec::new();
    if token.is_none() {
        missing.push(token_env.clone());
    }
    if clients_table.is_none() {
        missing.push(ENV_CLIENTS_TABLE_ID.to_string());
    }
    if orders_table.is_none() {
        missing.push(ENV_ORDERS_TABLE_ID.to_string());
    }
    if relation_field_id.is_none() {
        missing.push(ENV_RELATION_FIELD_ID.to_string());
    }
    let (Some(token), Some(clients_table), Some(orders_table), Some(relation_field_id)) =
        (token, clients_table, orders_table, relation_field_id)
    else {
        return Err(ConfigError::MissingSettings(missing));
    };

    let base_url = setting(ENV_BASE_URL, remote.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = parse_base_url(&base_url)?;

    let timeout_seconds = remote.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
    if timeout_seconds == 0 {
        return Err(ConfigError::InvalidTimeout(timeout_seconds));
    }

    let page_size = pacing.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    validate_page_size(page_size)?;

    Ok(AppConfig {
        remote: RemoteConfig {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_seconds),
        },
        tables: TablesConfig {
            clients_table: table_id("tables.clients_table_id", &clients_table)?,
            orders_table: table_id("tables.orders_table_id", &orders_table)?,
            client_email_field: setting(ENV_CLIENT_EMAIL_FIELD, tables.client_email_field)
                .unwrap_or_else(|| DEFAULT_CLIENT_EMAIL_FIELD.to_string()),
            order_email_field: setting(ENV_ORDER_EMAIL_FIELD, tables.order_email_field)
                .unwrap_or_else(|| DEFAULT_ORDER_EMAIL_FIELD.to_string()),
            relation_field_id,
            relation_field_name: setting(ENV_RELATION_FIELD_NAME, tables.relation_field_name)
                .unwrap_or_else(|| DEFAULT_RELATION_FIELD_NAME.to_string()),
        },
        pacing: PacingConfig {
            page_size,
            page_delay: Duration::from_millis(
                pacing.page_delay_ms.unwrap_or(DEFAULT_PAGE_DELAY_MS),
            ),
            link_delay: Duration::from_millis(
                pacing.link_delay_ms.unwrap_or(DEFAULT_LINK_DELAY_MS),
            ),
        },
    })
}

pub fn validate_page_size(page_size: usize) -> Result<usize> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidPageSize(page_size));
    }
    Ok(page_size)
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

fn table_id(field: &'static str, raw: &str) -> Result<TableId> {
    TableId::new(raw).map_err(|err| ConfigError::InvalidField {
        field,
        message: err.to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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
