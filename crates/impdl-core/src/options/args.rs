//! `impersonate_args`: explicit arguments that override the bare metadata.

use serde_json::Value;
use std::time::Duration;

use super::client::HttpVersionPref;
use super::{OptionsError, IMPERSONATE_ARGS};
use crate::http::Meta;
use crate::profile::Profile;

#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct ImpersonateArgs {
    pub impersonate: Option<Profile>,
    pub verify: Option<bool>,
    /// `Some(None)` is an explicit `null`: no proxy even if one is configured.
    pub proxy: Option<Option<String>>,
    pub default_headers: Option<bool>,
    pub http_version: Option<HttpVersionPref>,
    pub interface: Option<String>,
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
}

impl ImpersonateArgs {
    pub fn from_meta(meta: &Meta) -> Result<Self, OptionsError> {
        let map = match meta.get(IMPERSONATE_ARGS) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(OptionsError::invalid(IMPERSONATE_ARGS, "an object")),
        };

        let mut args = Self::default();
        for (key, value) in map {
            let key_path = format!("{}.{}", IMPERSONATE_ARGS, key);
            match key.as_str() {
                "impersonate" => {
                    let id = value
                        .as_str()
                        .ok_or_else(|| OptionsError::invalid(&key_path, "a profile id"))?;
                    args.impersonate = Some(id.parse()?);
                }
                "verify" => {
                    args.verify = Some(
                        value
                            .as_bool()
                            .ok_or_else(|| OptionsError::invalid(&key_path, "a boolean"))?,
                    );
                }
                "proxy" => {
                    args.proxy = Some(match value {
                        Value::Null => None,
                        Value::String(s) if s.is_empty() => None,
                        Value::String(s) => Some(s.clone()),
                        _ => return Err(OptionsError::invalid(&key_path, "a string or null")),
                    });
                }
                "default_headers" => {
                    args.default_headers = Some(
                        value
                            .as_bool()
                            .ok_or_else(|| OptionsError::invalid(&key_path, "a boolean"))?,
                    );
                }
                "http_version" => {
                    args.http_version = Some(HttpVersionPref::from_value(value).ok_or_else(
                        || OptionsError::invalid(&key_path, "\"1.1\" or \"2\""),
                    )?);
                }
                "interface" => {
                    let iface = value
                        .as_str()
                        .ok_or_else(|| OptionsError::invalid(&key_path, "a string"))?;
                    args.interface = Some(iface.to_string());
                }
                "timeout" => args.timeout = Some(parse_timeout(value, &key_path)?),
                "headers" => args.headers = string_pairs(value, &key_path)?,
                "cookies" => args.cookies = string_pairs(value, &key_path)?,
                other => return Err(OptionsError::UnknownArgument(other.to_string())),
            }
        }
        Ok(args)
    }
}

pub(super) fn parse_timeout(value: &Value, key: &str) -> Result<Duration, OptionsError> {
    let secs = value
        .as_f64()
        .ok_or_else(|| OptionsError::invalid(key, "a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(OptionsError::InvalidTimeout(secs));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| OptionsError::InvalidTimeout(secs))
}

fn string_pairs(value: &Value, key: &str) -> Result<Vec<(String, String)>, OptionsError> {
    let map = value
        .as_object()
        .ok_or_else(|| OptionsError::invalid(key, "an object of strings"))?;
    map.iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), s.clone())),
            Value::Number(n) => Ok((k.clone(), n.to_string())),
            _ => Err(OptionsError::invalid(format!("{}.{}", key, k), "a string")),
        })
        .collect()
}
