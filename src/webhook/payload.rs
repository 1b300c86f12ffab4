//! Webhook message model and record rendering.
//!
//! A [`WebhookMessage`] serialises to the JSON body Discord expects for an
//! execute-webhook call. Rendering applies Discord's documented field limits
//! so an oversized record is shortened rather than rejected by the API.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::color::ColorMap;
use crate::formatter::SharedFormatter;
use crate::level::DislogLevel;
use crate::log_record::DislogRecord;

pub const CONTENT_LIMIT: usize = 2000;
pub const USERNAME_LIMIT: usize = 80;
pub const TITLE_LIMIT: usize = 256;
pub const DESCRIPTION_LIMIT: usize = 4096;
pub const FOOTER_LIMIT: usize = 2048;
/// Combined character budget for all text fields of the embeds in a message.
pub const EMBED_TOTAL_LIMIT: usize = 6000;

const ELLIPSIS: char = '…';
const FENCE_OPEN: &str = "```\n";
const FENCE_CLOSE: &str = "\n```";
const FENCE_LEN: usize = 8;

/// JSON body of an execute-webhook request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

impl Embed {
    fn text_len(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + self
                .footer
                .as_ref()
                .map_or(0, |footer| footer.text.chars().count())
    }
}

impl WebhookMessage {
    /// Plain-text message without embeds.
    pub fn text(content: &str, username: Option<&str>) -> Self {
        Self {
            content: Some(truncate(content, CONTENT_LIMIT).into_owned()),
            username: username.map(|name| truncate(name, USERNAME_LIMIT).into_owned()),
            embeds: Vec::new(),
        }
    }

    /// Sum of the characters counted against [`EMBED_TOTAL_LIMIT`].
    pub fn embed_text_len(&self) -> usize {
        self.embeds.iter().map(Embed::text_len).sum()
    }
}

/// Shorten `text` to at most `limit` characters.
///
/// Text that fits is returned unchanged. Longer text keeps its first
/// `limit - 1` characters followed by `…`. Cuts always land on a `char`
/// boundary.
pub fn truncate(text: &str, limit: usize) -> Cow<'_, str> {
    if limit == 0 {
        return Cow::Borrowed("");
    }
    match text.char_indices().nth(limit) {
        None => Cow::Borrowed(text),
        Some(_) => {
            let cut = text
                .char_indices()
                .nth(limit - 1)
                .map_or(text.len(), |(idx, _)| idx);
            let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
            out.push_str(&text[..cut]);
            out.push(ELLIPSIS);
            Cow::Owned(out)
        }
    }
}

/// Turns records into webhook messages.
#[derive(Clone, Debug, Default)]
pub struct MessageRenderer {
    colors: ColorMap,
    formatter: Option<SharedFormatter>,
    username: Option<String>,
}

impl MessageRenderer {
    /// `formatter` is used for the embed body when set; otherwise the raw
    /// message text is sent.
    pub fn new(
        colors: ColorMap,
        formatter: Option<SharedFormatter>,
        username: Option<String>,
    ) -> Self {
        Self {
            colors,
            formatter,
            username,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn render(&self, record: &DislogRecord) -> WebhookMessage {
        let metadata = record.metadata();
        let title = format!(
            "{} on {} ({})",
            record.level_str(),
            metadata.thread_display_name(),
            metadata.thread_ident()
        );
        let title = truncate(&title, TITLE_LIMIT).into_owned();
        let footer = truncate(record.logger(), FOOTER_LIMIT).into_owned();

        let body = match &self.formatter {
            Some(formatter) => Cow::Owned(formatter.format(record)),
            None => Cow::Borrowed(record.message()),
        };
        let budget = EMBED_TOTAL_LIMIT
            .saturating_sub(title.chars().count() + footer.chars().count())
            .min(DESCRIPTION_LIMIT);
        let description = fence(&body, budget);

        let timestamp = DateTime::<Utc>::from(metadata.timestamp)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        WebhookMessage {
            content: None,
            username: self
                .username
                .as_deref()
                .map(|name| truncate(name, USERNAME_LIMIT).into_owned()),
            embeds: vec![Embed {
                title,
                description,
                color: self.colors.color_for(record.level()),
                timestamp: Some(timestamp),
                footer: Some(EmbedFooter { text: footer }),
            }],
        }
    }
}

/// Wrap `body` in a code block no longer than `limit` characters.
fn fence(body: &str, limit: usize) -> String {
    // A literal fence inside the body would close the block early.
    let body = body.replace("```", "``\u{200B}`");
    let inner = truncate(&body, limit.saturating_sub(FENCE_LEN));
    format!("{FENCE_OPEN}{inner}{FENCE_CLOSE}")
}

/// What the fallback notification needs to know about the lost record.
#[derive(Clone, Debug)]
pub struct FallbackContext {
    level: DislogLevel,
    logger: String,
    mention: Option<String>,
    username: Option<String>,
}

impl FallbackContext {
    pub fn new(
        record: &DislogRecord,
        mention: Option<String>,
        username: Option<String>,
    ) -> Self {
        Self {
            level: record.level(),
            logger: record.logger().to_owned(),
            mention,
            username,
        }
    }

    /// Plain-text notice sent after the primary message failed with `error`.
    pub fn message(&self, error: &dyn fmt::Display) -> WebhookMessage {
        let notice = format!(
            "Failed to deliver {} record from `{}`: {}",
            self.level, self.logger, error
        );
        let content = match self.mention.as_deref().map(str::trim) {
            Some(mention) if !mention.is_empty() => format!("{mention} {notice}"),
            _ => notice,
        };
        WebhookMessage::text(&content, self.username.as_deref())
    }
}
