use serde_json::Value;

use crate::types::Generation;
use crate::{Error, Result};

/// Guard some firmware puts around JSON bodies; the last two characters of
/// such a body are a non-standard terminator.
pub const SECURE_PREFIX: &str = "/*-secure-";

pub const PANEL_CONDITION_XT: &str = "panelCondGet";
pub const SENSOR_LIST_XT1: &str = "sensorListGet";
pub const HISTORY_XT1: &str = "historyGet";
pub const DEVICE_LIST_XT2: &str = "deviceListGet";
pub const RECORD_LIST_XT2: &str = "recordListGet";

/// Endpoint names (the `/action/<name>` path segment) used by one panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub condition: String,
    pub devices: String,
    pub history: String,
}

impl Endpoints {
    pub fn for_generation(generation: Generation) -> Self {
        let (devices, history) = match generation {
            Generation::Xt1 => (SENSOR_LIST_XT1, HISTORY_XT1),
            Generation::Xt2 => (DEVICE_LIST_XT2, RECORD_LIST_XT2),
        };
        Self {
            condition: PANEL_CONDITION_XT.to_string(),
            devices: devices.to_string(),
            history: history.to_string(),
        }
    }
}

pub fn action_path(endpoint: &str) -> String {
    format!("/action/{endpoint}")
}

/// Remove tab characters and, when present, the secure comment guard.
pub fn strip_envelope(body: &str) -> Result<String> {
    let text = body.replace('\t', "");
    if !text.starts_with(SECURE_PREFIX) {
        return Ok(text);
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < SECURE_PREFIX.len() + 2 {
        return Err(Error::Decode(format!(
            "secure envelope too short ({} chars)",
            chars.len()
        )));
    }
    Ok(chars[SECURE_PREFIX.len()..chars.len() - 2].iter().collect())
}

/// Rewrite the lenient JSON emitted by panel firmware into strict JSON:
/// single-quoted strings, bare object keys, trailing commas and raw line
/// breaks inside strings are accepted.
pub fn relax_json(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => {
                i = copy_string(&chars, i, &mut out);
                continue;
            }
            ',' => {
                let next = next_significant(&chars, i + 1);
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(',');
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if next_significant(&chars, i) == Some(':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                continue;
            }
            other => out.push(other),
        }
        i += 1;
    }
    out
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

/// Copy a quoted string starting at `start` as a double-quoted JSON string.
/// Returns the index just past the closing quote.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    out.push('"');
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if i + 1 < chars.len() => {
                let escaped = chars[i + 1];
                if escaped == '\'' {
                    out.push('\'');
                } else {
                    out.push('\\');
                    out.push(escaped);
                }
                i += 2;
                continue;
            }
            c if c == quote => {
                out.push('"');
                return i + 1;
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            other => out.push(other),
        }
        i += 1;
    }
    out.push('"');
    i
}

/// Turn a raw response body into a generic document.
pub fn decode_document(body: &str) -> Result<Value> {
    let stripped = strip_envelope(body)?;
    let relaxed = relax_json(&stripped);
    serde_json::from_str(&relaxed)
        .map_err(|e| Error::Decode(format!("{e} (body starts {:?})", preview(&stripped))))
}

fn preview(text: &str) -> String {
    text.chars().take(40).collect()
}
