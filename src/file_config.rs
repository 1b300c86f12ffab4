//! Load a webhook handler builder from an INI section.
//!
//! ```ini
//! [discord]
//! webhook = https://discord.com/api/webhooks/123/token
//! level = WARNING
//! mode = thread_pool
//! mention = @here
//! can_format = yes
//! workers = 4
//! ```
//!
//! Only `webhook` is required. Unknown keys are ignored so one file can
//! carry settings for other tools.

use std::{fs, io, path::Path, str::FromStr};

use ini::{Ini, Properties};
use thiserror::Error;

use crate::handlers::{DiscordWebhookBuilder, HandlerBuildError, HandlerBuilderTrait};
use crate::level::DislogLevel;
use crate::webhook::{DiscordWebhookHandler, DispatchMode};

/// Errors raised while reading handler settings from INI.
#[derive(Debug, Error)]
pub enum FileConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid INI: {0}")]
    Ini(#[from] ini::ParseError),
    #[error("section [{0}] not found")]
    MissingSection(String),
    #[error("section [{section}] is missing required key `{key}`")]
    MissingKey { section: String, key: &'static str },
    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: &'static str, value: String },
    #[error(transparent)]
    Build(#[from] HandlerBuildError),
}

/// Parse `text` and configure a builder from `section`.
pub fn builder_from_ini_str(
    text: &str,
    section: &str,
) -> Result<DiscordWebhookBuilder, FileConfigError> {
    let ini = Ini::load_from_str(text)?;
    let props = ini
        .section(Some(section))
        .ok_or_else(|| FileConfigError::MissingSection(section.to_owned()))?;
    let get = |key| value_of(props, key);

    let webhook = get("webhook").ok_or_else(|| FileConfigError::MissingKey {
        section: section.to_owned(),
        key: "webhook",
    })?;
    let mut builder = DiscordWebhookBuilder::new().with_url(webhook);

    if let Some(value) = get("level") {
        builder = builder.with_level(parse_value::<DislogLevel>("level", value)?);
    }
    if let Some(value) = get("mode") {
        builder = builder.with_mode(parse_value::<DispatchMode>("mode", value)?);
    }
    if let Some(value) = get("mention") {
        builder = builder.with_mention(value);
    }
    if let Some(value) = get("can_format") {
        builder = builder.with_can_format(parse_bool("can_format", value)?);
    }
    if let Some(value) = get("workers") {
        builder = builder.with_workers(parse_value("workers", value)?);
    }
    if let Some(value) = get("capacity") {
        builder = builder.with_capacity(parse_value("capacity", value)?);
    }
    if let Some(value) = get("connect_timeout_ms") {
        builder = builder.with_connect_timeout_ms(parse_value("connect_timeout_ms", value)?);
    }
    if let Some(value) = get("request_timeout_ms") {
        builder = builder.with_request_timeout_ms(parse_value("request_timeout_ms", value)?);
    }
    if let Some(value) = get("username") {
        builder = builder.with_username(value);
    }
    Ok(builder)
}

/// Read the INI file at `path` and configure a builder from `section`.
pub fn load_builder_from_ini(
    path: impl AsRef<Path>,
    section: &str,
) -> Result<DiscordWebhookBuilder, FileConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| FileConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    builder_from_ini_str(&text, section)
}

/// Read `path` and build the handler described by `section`.
pub fn load_handler_from_ini(
    path: impl AsRef<Path>,
    section: &str,
) -> Result<DiscordWebhookHandler, FileConfigError> {
    Ok(load_builder_from_ini(path, section)?.build_inner()?)
}

/// Trimmed value of `key`; blank values count as absent.
fn value_of<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, FileConfigError> {
    value.parse().map_err(|_| FileConfigError::InvalidValue {
        key,
        value: value.to_owned(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, FileConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(FileConfigError::InvalidValue {
            key,
            value: value.to_owned(),
        }),
    }
}
