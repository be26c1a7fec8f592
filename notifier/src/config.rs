//! Configuration module
//!
//! Parameters come from an optional HCL file (`tagwatch.hcl`) and from the environment, the
//! environment winning.  Everything is checked once in `Config::try_from()` and the result is
//! never modified afterwards.
//!
//! ```hcl
//! version = 1
//!
//! smtp_server          = "smtp.example.com"
//! smtp_server_port     = 587
//! email_from           = "bus@example.com"
//! email_from_password  = "secret"
//! email_to             = "parent1@example.com, parent2@example.com"
//!
//! home_lat             = 47.0
//! home_long            = -122.0
//! meters_to_notify     = 500
//!
//! smart_tag_student_id = 1234
//! schedule             = "5m"
//! ```
//!
//! Version History:
//!
//! - v1 is the initial one
//!

use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use eyre::Result;
use lettre::Address;
use serde::Deserialize;
use tracing::{debug, trace};

use tagwatch_common::{ConfigFile, Location, Versioned};
use tagwatch_sources::DEF_SITE;

use crate::ConfigError;

/// Current version
pub const CVERSION: usize = 1;

const SMTP_SERVER: &str = "SMTP_SERVER";
const SMTP_SERVER_PORT: &str = "SMTP_SERVER_PORT";
const EMAIL_FROM: &str = "EMAIL_FROM";
const EMAIL_FROM_PASSWORD: &str = "EMAIL_FROM_PASSWORD";
const EMAIL_TO: &str = "EMAIL_TO";
const HOME_LAT: &str = "HOME_LAT";
const HOME_LONG: &str = "HOME_LONG";
const METERS_TO_NOTIFY: &str = "METERS_TO_NOTIFY";
const SMART_TAG_STUDENT_ID: &str = "SMART_TAG_STUDENT_ID";
const SMART_TAG_BASE_URL: &str = "SMART_TAG_BASE_URL";
const SCHEDULE: &str = "SCHEDULE";

/// What we read from the file, nothing is checked yet.
///
#[derive(Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawConfig {
    pub version: usize,
    pub smtp_server: Option<String>,
    pub smtp_server_port: Option<u16>,
    pub email_from: Option<String>,
    pub email_from_password: Option<String>,
    pub email_to: Option<String>,
    pub home_lat: Option<f64>,
    pub home_long: Option<f64>,
    pub meters_to_notify: Option<f64>,
    pub smart_tag_student_id: Option<i64>,
    pub base_url: Option<String>,
    pub schedule: Option<String>,
}

impl Versioned for RawConfig {
    fn version(&self) -> usize {
        self.version
    }
}

impl Debug for RawConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawConfig")
            .field("version", &self.version)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_server_port", &self.smtp_server_port)
            .field("email_from", &self.email_from)
            .field("email_from_password", &self.email_from_password.as_ref().map(|_| "HIDDEN"))
            .field("email_to", &self.email_to)
            .field("home_lat", &self.home_lat)
            .field("home_long", &self.home_long)
            .field("meters_to_notify", &self.meters_to_notify)
            .field("smart_tag_student_id", &self.smart_tag_student_id)
            .field("base_url", &self.base_url)
            .field("schedule", &self.schedule)
            .finish()
    }
}

/// A blank variable is as good as no variable.
///
fn lookup_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Missing(key)),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(None),
    }
}

impl RawConfig {
    /// Override file values with whatever `lookup` knows about, usually `std::env::var`.
    ///
    #[tracing::instrument(skip(self, lookup))]
    pub fn merge_env(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        trace!("merge environment");

        let text = |key: &'static str, current: Option<String>| lookup(key).or(current);

        Ok(RawConfig {
            version: self.version,
            smtp_server: text(SMTP_SERVER, self.smtp_server),
            smtp_server_port: lookup_number(&lookup, SMTP_SERVER_PORT)?.or(self.smtp_server_port),
            email_from: text(EMAIL_FROM, self.email_from),
            email_from_password: text(EMAIL_FROM_PASSWORD, self.email_from_password),
            email_to: text(EMAIL_TO, self.email_to),
            home_lat: lookup_number(&lookup, HOME_LAT)?.or(self.home_lat),
            home_long: lookup_number(&lookup, HOME_LONG)?.or(self.home_long),
            meters_to_notify: lookup_number(&lookup, METERS_TO_NOTIFY)?.or(self.meters_to_notify),
            smart_tag_student_id: lookup_number(&lookup, SMART_TAG_STUDENT_ID)?
                .or(self.smart_tag_student_id),
            base_url: text(SMART_TAG_BASE_URL, self.base_url),
            schedule: text(SCHEDULE, self.schedule),
        })
    }
}

/// What the decision needs to know.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Home or drop-off location
    pub home: Location,
    /// Notify when at most this far from `home`, in meters
    pub meters_to_notify: f64,
}

/// How to send the email.
///
#[derive(Clone, PartialEq)]
pub struct MailSettings {
    pub server: String,
    pub port: u16,
    pub from: String,
    pub password: String,
    pub to: Vec<String>,
}

impl Debug for MailSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("password", &"HIDDEN")
            .field("to", &self.to)
            .finish()
    }
}

/// Validated configuration.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub settings: Settings,
    pub mail: MailSettings,
    /// SmartTag student ID
    pub student_id: i64,
    /// SmartTag site
    pub base_url: String,
    /// Run periodically instead of once
    pub schedule: Option<Duration>,
}

fn required<T>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::Missing(key))
}

fn required_str(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn finite(value: f64, key: &'static str) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

/// Split a list of addresses on `,` or `;` and check every one of them.
///
fn recipients(list: &str) -> Result<Vec<String>, ConfigError> {
    let to: Vec<String> = list
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if to.is_empty() {
        return Err(ConfigError::Missing(EMAIL_TO));
    }
    if let Some(bad) = to.iter().find(|s| s.parse::<Address>().is_err()) {
        return Err(ConfigError::Invalid {
            key: EMAIL_TO,
            value: bad.to_owned(),
        });
    }
    Ok(to)
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    #[tracing::instrument]
    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let server = required_str(raw.smtp_server, SMTP_SERVER)?;
        let port = required(raw.smtp_server_port, SMTP_SERVER_PORT)?;

        let from = required_str(raw.email_from, EMAIL_FROM)?;
        if from.parse::<Address>().is_err() {
            return Err(ConfigError::Invalid {
                key: EMAIL_FROM,
                value: from,
            });
        }
        let password = required_str(raw.email_from_password, EMAIL_FROM_PASSWORD)?;
        let to = recipients(&required_str(raw.email_to, EMAIL_TO)?)?;

        let lat = finite(required(raw.home_lat, HOME_LAT)?, HOME_LAT)?;
        let lon = finite(required(raw.home_long, HOME_LONG)?, HOME_LONG)?;

        let meters_to_notify = required(raw.meters_to_notify, METERS_TO_NOTIFY)?;
        if !(meters_to_notify >= 0.) || meters_to_notify.is_infinite() {
            return Err(ConfigError::Invalid {
                key: METERS_TO_NOTIFY,
                value: meters_to_notify.to_string(),
            });
        }

        let student_id = required(raw.smart_tag_student_id, SMART_TAG_STUDENT_ID)?;

        let base_url = match raw.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_owned(),
            _ => DEF_SITE.to_owned(),
        };

        let schedule = match raw.schedule {
            Some(s) if !s.trim().is_empty() => Some(
                humantime::parse_duration(s.trim())
                    .map_err(|_| ConfigError::Invalid {
                        key: SCHEDULE,
                        value: s.clone(),
                    })?,
            ),
            _ => None,
        };
        if schedule == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid {
                key: SCHEDULE,
                value: "0s".to_owned(),
            });
        }

        Ok(Config {
            settings: Settings {
                home: Location::new(lon, lat),
                meters_to_notify,
            },
            mail: MailSettings {
                server,
                port,
                from,
                password,
                to,
            },
            student_id,
            base_url,
            schedule,
        })
    }
}

/// Load the file (if any), apply the environment and validate.
///
#[tracing::instrument]
pub fn load_config(fname: Option<&str>) -> Result<Config> {
    let raw = ConfigFile::<RawConfig>::load_or_default(fname, CVERSION)?;
    let raw = raw.merge_env(|key| std::env::var(key).ok())?;
    let cfg = Config::try_from(raw)?;
    debug!("config = {cfg:?}");
    Ok(cfg)
}
