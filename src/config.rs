//! Startup configuration.
//!
//! All settings come from `PRESSTRACK_*` environment variables. Missing
//! required keys are collected and reported in one enumerated error so the
//! operator fixes everything at once; nothing fails deep inside a request
//! handler.

use thiserror::Error;

/// Environment variable prefix.
const PREFIX: &str = "PRESSTRACK_";

/// Errors returned while loading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required keys are absent.
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// A key is present but unusable.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Which backend holds the job table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// CSV file in a local data directory.
    Csv {
        /// Directory holding `jobs.csv` and the QR output folder.
        data_dir: String,
    },
    /// Google Sheets worksheet.
    Sheets {
        /// Spreadsheet identifier.
        spreadsheet_id: String,
        /// Ready OAuth bearer token for the Sheets API.
        access_token: String,
    },
}

/// Optional image-hosting settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImgBbConfig {
    /// ImgBB API key.
    pub api_key: String,
}

/// Optional outgoing-mail settings. All keys or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// Relay host.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Sender mailbox.
    pub from: String,
}

/// Fully loaded application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Admin password for staff pages.
    pub admin_password: String,
    /// Public base URL tracking links are built from.
    pub public_base_url: String,
    /// Record store backend.
    pub store: StoreConfig,
    /// Image hosting, required for sheet deployments to show QR images.
    pub imgbb: Option<ImgBbConfig>,
    /// Outgoing mail for QR delivery.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKeys`] naming every absent required
    /// key, or [`ConfigError::InvalidValue`] for unusable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup (test seam).
    ///
    /// # Errors
    ///
    /// As [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut require = |name: &str| -> String {
            let key = format!("{PREFIX}{name}");
            lookup(&key).filter(|value| !value.trim().is_empty()).unwrap_or_else(|| {
                missing.push(key);
                String::new()
            })
        };
        let optional = |name: &str| -> Option<String> {
            lookup(&format!("{PREFIX}{name}")).filter(|value| !value.trim().is_empty())
        };

        let admin_password = require("ADMIN_PASSWORD");
        let public_base_url = require("PUBLIC_URL");
        let backend = require("STORE");

        let store_config = match backend.as_str() {
            "csv" => Some(StoreConfig::Csv {
                data_dir: require("DATA_DIR"),
            }),
            "sheets" => Some(StoreConfig::Sheets {
                spreadsheet_id: require("SHEET_ID"),
                access_token: require("SHEETS_TOKEN"),
            }),
            // Empty means the STORE key itself was already recorded missing.
            "" => None,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: format!("{PREFIX}STORE"),
                    reason: format!("expected \"csv\" or \"sheets\", got {other:?}"),
                });
            }
        };

        let smtp = load_smtp(&optional, &mut missing)?;

        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }
        // Unreachable in practice: a missing STORE key lands in `missing`
        // and errors above.
        let Some(store) = store_config else {
            return Err(ConfigError::MissingKeys(vec![format!("{PREFIX}STORE")]));
        };

        Ok(Self {
            admin_password,
            public_base_url,
            store,
            imgbb: optional("IMGBB_KEY").map(|api_key| ImgBbConfig { api_key }),
            smtp,
        })
    }
}

/// Loads the all-or-none SMTP block.
///
/// A partially present block is a configuration mistake and is reported
/// with the names of the absent keys rather than silently disabling mail.
fn load_smtp(
    optional: &impl Fn(&str) -> Option<String>,
    missing: &mut Vec<String>,
) -> Result<Option<SmtpConfig>, ConfigError> {
    const KEYS: [&str; 5] = [
        "SMTP_HOST",
        "SMTP_PORT",
        "SMTP_USERNAME",
        "SMTP_PASSWORD",
        "SMTP_FROM",
    ];

    let values: Vec<Option<String>> = KEYS.iter().map(|key| optional(key)).collect();
    if values.iter().all(Option::is_none) {
        return Ok(None);
    }
    if values.iter().any(Option::is_none) {
        for (key, value) in KEYS.iter().zip(&values) {
            if value.is_none() {
                missing.push(format!("{PREFIX}{key}"));
            }
        }
        return Ok(None);
    }

    let mut fields = values.into_iter().flatten();
    let host = fields.next().unwrap_or_default();
    let port_raw = fields.next().unwrap_or_default();
    let username = fields.next().unwrap_or_default();
    let password = fields.next().unwrap_or_default();
    let from = fields.next().unwrap_or_default();

    let port = port_raw.parse::<u16>().map_err(|err| ConfigError::InvalidValue {
        key: format!("{PREFIX}SMTP_PORT"),
        reason: err.to_string(),
    })?;

    Ok(Some(SmtpConfig {
        host,
        port,
        username,
        password,
        from,
    }))
}
