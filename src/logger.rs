use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::diff::diff_json;

pub enum MessageLogMode {
    /// Every decoded document in full.
    Full,
    /// First document per endpoint in full, then only changed paths.
    Diffed,
}

/// NDJSON capture of panel traffic, for studying firmware quirks.
pub(crate) struct MessageLogger {
    mode: MessageLogMode,
    file: File,
    previous: HashMap<String, Value>,
}

impl MessageLogger {
    pub fn new(mode: MessageLogMode, path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            mode,
            file,
            previous: HashMap::new(),
        })
    }

    pub fn log_request(&mut self, endpoint: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "endpoint": endpoint,
        });
        self.write_line(&entry);
    }

    pub fn log_failure(&mut self, endpoint: &str, error: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "err",
            "endpoint": endpoint,
            "error": error,
        });
        self.write_line(&entry);
    }

    pub fn log_document(&mut self, endpoint: &str, status: u16, doc: &Value) {
        let entry = match self.mode {
            MessageLogMode::Full => json!({
                "ts": Utc::now().to_rfc3339(),
                "dir": "resp",
                "endpoint": endpoint,
                "status": status,
                "body": doc,
            }),
            MessageLogMode::Diffed => match self.previous.get(endpoint) {
                None => json!({
                    "ts": Utc::now().to_rfc3339(),
                    "dir": "resp",
                    "endpoint": endpoint,
                    "status": status,
                    "full": true,
                    "body": doc,
                }),
                Some(prev) => {
                    let mut changes = Vec::new();
                    diff_json(prev, doc, "", &mut changes);
                    let changes: Vec<Value> = changes
                        .iter()
                        .map(|c| json!({ "path": c.path, "old": c.old, "new": c.new }))
                        .collect();
                    json!({
                        "ts": Utc::now().to_rfc3339(),
                        "dir": "resp",
                        "endpoint": endpoint,
                        "status": status,
                        "changes": changes,
                    })
                }
            },
        };
        self.write_line(&entry);

        if matches!(self.mode, MessageLogMode::Diffed) {
            self.previous.insert(endpoint.to_string(), doc.clone());
        }
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
