//! JSONL writer for consultation transcripts.
//!
//! Every [`TranscriptEvent`] becomes one JSON object per line carrying
//! `type`, `timestamp` and a per-file `seq`, followed by the event payload.
//! The file is opened in append mode so several runs can share a transcript.

use dxo_application::{TranscriptEvent, TranscriptLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// Transcript logger writing JSON lines to a file
pub struct JsonlTranscriptLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Open (or create) the transcript, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: TranscriptEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = Map::new();
    map.insert("type".into(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".into(), Value::String(timestamp));
    map.insert("seq".into(), Value::from(seq));
    match event.payload {
        Value::Object(fields) => {
            for (key, value) in fields {
                map.entry(key).or_insert(value);
            }
        }
        Value::Null => {}
        other => {
            map.insert("data".into(), other);
        }
    }
    Value::Object(map)
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: TranscriptEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let line = record(event, sink.seq).to_string();

        // Flushed per line: a crashed run still leaves a readable transcript
        if let Err(e) = writeln!(sink.writer, "{}", line).and_then(|_| sink.writer.flush()) {
            warn!(path = %self.path.display(), "transcript write failed: {}", e);
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}
