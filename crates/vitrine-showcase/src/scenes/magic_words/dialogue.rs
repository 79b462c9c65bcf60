//! Dialogue document model and inline emoji tokens.

use std::collections::HashMap;

use serde::Deserialize;
use vitrine_ui::content::ContentError;

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    dialogue: Option<Vec<RawLine>>,
    #[serde(default)]
    avatars: Option<Vec<RawAvatar>>,
    #[serde(default)]
    emojies: Option<Vec<RawEmoji>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLine {
    character: Option<String>,
    name: Option<String>,
    speaker: Option<String>,
    message: Option<String>,
    text: Option<String>,
    msg: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAvatar {
    name: String,
    url: String,
    #[serde(default)]
    position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEmoji {
    name: String,
    url: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub url: String,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub speaker: String,
    pub message: String,
}

/// One piece of a message, in reading order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Part<'a> {
    Text(&'a str),
    Emoji { name: &'a str, url: &'a str },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dialogue {
    pub lines: Vec<Line>,
    avatars: HashMap<String, Avatar>,
    emojis: HashMap<String, String>,
}

/// First present, non-empty field.
fn first_of(fields: [Option<String>; 4]) -> Option<String> {
    fields.into_iter().flatten().find(|s| !s.is_empty())
}

impl Dialogue {
    /// Parses the JSON document.
    ///
    /// Speaker comes from `character`, `name` or `speaker` (default
    /// `"Unknown"`), the message from `message`, `text`, `msg` or `content`.
    /// Missing sections are empty.
    pub fn parse(body: &str) -> Result<Self, ContentError> {
        let raw: RawDocument =
            serde_json::from_str(body).map_err(|e| ContentError::Malformed(e.to_string()))?;

        let lines = raw
            .dialogue
            .unwrap_or_default()
            .into_iter()
            .map(|l| Line {
                speaker: first_of([l.character, l.name, l.speaker, None]).unwrap_or_else(|| "Unknown".to_string()),
                message: first_of([l.message, l.text, l.msg, l.content]).unwrap_or_default(),
            })
            .collect();

        let avatars = raw
            .avatars
            .unwrap_or_default()
            .into_iter()
            .map(|a| {
                let side = if a.position.as_deref() == Some("right") { Side::Right } else { Side::Left };
                (a.name, Avatar { url: a.url, side })
            })
            .collect();

        let emojis = raw.emojies.unwrap_or_default().into_iter().map(|e| (e.name, e.url)).collect();

        Ok(Self { lines, avatars, emojis })
    }

    pub fn avatar(&self, speaker: &str) -> Option<&Avatar> {
        self.avatars.get(speaker)
    }

    /// Side a speaker's bubbles sit on; speakers without an avatar sit left.
    pub fn side(&self, speaker: &str) -> Side {
        self.avatar(speaker).map_or(Side::Left, |a| a.side)
    }

    pub fn emoji(&self, name: &str) -> Option<&str> {
        self.emojis.get(name).map(String::as_str)
    }

    /// Splits `message` into text and emoji parts.
    ///
    /// `:name:` and `{name}` become emojis when `name` is known; unknown
    /// tokens stay as their own text part. Empty text is dropped.
    pub fn tokenize<'a>(&'a self, message: &'a str) -> Vec<Part<'a>> {
        let mut parts = Vec::new();
        let mut text_start = 0;
        let mut i = 0;
        let bytes = message.as_bytes();

        while i < bytes.len() {
            let Some(end) = token_end(bytes, i) else {
                i += 1;
                continue;
            };
            if text_start < i {
                parts.push(Part::Text(&message[text_start..i]));
            }
            let token = &message[i..end];
            let name = &token[1..token.len() - 1];
            parts.push(match self.emoji(name) {
                Some(url) => Part::Emoji { name, url },
                None => Part::Text(token),
            });
            i = end;
            text_start = end;
        }
        if text_start < message.len() {
            parts.push(Part::Text(&message[text_start..]));
        }
        parts
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End (exclusive) of a `:name:` or `{name}` token starting at `start`.
fn token_end(bytes: &[u8], start: usize) -> Option<usize> {
    let close = match bytes[start] {
        b':' => b':',
        b'{' => b'}',
        _ => return None,
    };
    let name_len = bytes[start + 1..].iter().take_while(|b| is_name_byte(**b)).count();
    let close_at = start + 1 + name_len;
    (name_len > 0 && bytes.get(close_at) == Some(&close)).then_some(close_at + 1)
}
