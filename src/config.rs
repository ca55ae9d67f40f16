use crate::utils::local_time::LocalZone;
use anyhow::{Context, anyhow, bail};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Connection settings for the ERP's `execute_kw` endpoint.
#[derive(Clone)]
pub struct OdooSettings {
    pub url: String,
    pub db: String,
    pub uid: i64,
    pub password: String,
    pub model: String,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub odoo: OdooSettings,
    pub identity_base_url: String,

    /// Civil zone every local timestamp is interpreted in.
    pub zone: LocalZone,

    // Rate limiting
    pub rate_attendance_per_min: u32,

    pub upstream_timeout: Duration,
    pub api_prefix: String,
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{key} must be set"));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let rate_attendance_per_min: u32 = parse(
            &or_default("RATE_ATTENDANCE_PER_MIN", "600"),
            "RATE_ATTENDANCE_PER_MIN",
        )?;
        if rate_attendance_per_min == 0 {
            bail!("RATE_ATTENDANCE_PER_MIN must be greater than zero");
        }

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            odoo: OdooSettings {
                url: required("ODOO_URL")?,
                db: required("ODOO_DB")?,
                uid: parse(&required("ODOO_UID")?, "ODOO_UID")?,
                password: required("ODOO_PASSWORD")?,
                model: or_default("ODOO_MODEL", "hr.attendance"),
            },
            identity_base_url: required("IDENTITY_BASE_URL")?,
            zone: or_default("ATTENDANCE_UTC_OFFSET", "+09:00")
                .parse()
                .map_err(|e| anyhow!("ATTENDANCE_UTC_OFFSET: {e}"))?,
            rate_attendance_per_min,
            upstream_timeout: Duration::from_secs(parse(
                &or_default("UPSTREAM_TIMEOUT_SECS", "30"),
                "UPSTREAM_TIMEOUT_SECS",
            )?),
            api_prefix: or_default("API_PREFIX", "/api"),
            log_dir: or_default("LOG_DIR", "logs"),
            log_level: parse(&or_default("LOG_LEVEL", "debug"), "LOG_LEVEL")?,
        })
    }
}

fn parse<T>(raw: &str, key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| anyhow!("{e}"))
        .with_context(|| format!("{key} has an invalid value `{raw}`"))
}
