//! JSONL transcript writer.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying its payload plus
//! `type`, `seq` and `timestamp`.

use philosopher_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// JSONL transcript logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex`; parallel phases log from several tasks at once.
/// Flushes after each line and on `Drop`.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create the transcript file (and its parent directories), truncating
    /// any previous content.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Timestamped transcript path inside `dir`, e.g.
    /// `debate-20260301-142501.jsonl`
    pub fn timestamped_path(dir: impl AsRef<Path>, mode: &str) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        dir.as_ref().join(format!("{}-{}.jsonl", mode, stamp))
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> serde_json::Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    match event.payload {
        serde_json::Value::Object(mut map) => {
            map.insert("type".into(), event.event_type.into());
            map.insert("seq".into(), seq.into());
            map.insert("timestamp".into(), timestamp.into());
            serde_json::Value::Object(map)
        }
        other => serde_json::json!({
            "type": event.event_type,
            "seq": seq,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        sink.seq += 1;
        let line = match serde_json::to_string(&record(event, sink.seq)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not encode transcript event: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(sink.writer, "{}", line).and_then(|_| sink.writer.flush()) {
            warn!("Could not write transcript {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new(
            "worker_response",
            serde_json::json!({ "participant": "A", "phase": "research", "bytes": 42 }),
        ));
        logger.log(ConversationEvent::new(
            "coercion",
            serde_json::json!({ "speaker": "B", "from": "defend", "to": "attack" }),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "worker_response");
        assert_eq!(lines[0]["participant"], "A");
        assert_eq!(lines[0]["bytes"], 42);
        assert_eq!(lines[0]["seq"], 1);
        assert_eq!(lines[1]["type"], "coercion");
        assert_eq!(lines[1]["seq"], 2);
        for line in &lines {
            let ts = line["timestamp"].as_str().unwrap();
            assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
        }
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new(
            "session_terminated",
            serde_json::json!("satisfied"),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "session_terminated");
        assert_eq!(lines[0]["data"], "satisfied");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("nested").join("t.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_timestamped_path() {
        let path = JsonlConversationLogger::timestamped_path("/tmp/runs", "socratic");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("socratic-"));
        assert!(name.ends_with(".jsonl"));
        assert_eq!(path.parent().unwrap(), Path::new("/tmp/runs"));
    }
}
