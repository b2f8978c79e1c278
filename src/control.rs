use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use serde::Deserialize;

/// One steering message for a running display. Absent fields leave the
/// current value alone; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ControlMsg {
    /// Replace the title text and replay its entrance
    pub text: Option<String>,
    /// Turn the automatic launch scheduler on or off
    pub auto: Option<bool>,
    /// Particle density scale factor (0.5-2.0)
    pub scale: Option<f64>,
    /// Fire one shell at a point
    pub launch: Option<Launch>,
}

/// A scripted launch; coordinates are fractions of the canvas (0.0-1.0).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Launch {
    pub x: f64,
    pub y: f64,
}

/// Watch a JSON-lines file; the last non-empty line is parsed and sent on
/// every change (and once at startup if the file already exists).
pub fn watch(path: PathBuf) -> Receiver<ControlMsg> {
    let (tx, rx) = std::sync::mpsc::channel::<ControlMsg>();

    std::thread::spawn(move || {
        if let Ok(contents) = std::fs::read_to_string(&path)
            && let Some(line) = contents.lines().rfind(|l| !l.trim().is_empty())
            && let Ok(msg) = serde_json::from_str::<ControlMsg>(line)
            && tx.send(msg).is_err()
        {
            return;
        }

        let (file_tx, file_rx) = std::sync::mpsc::channel();
        let Ok(mut watcher) = notify::recommended_watcher(move |res| {
            let _ = file_tx.send(res);
        }) else {
            return;
        };
        if notify::Watcher::watch(&mut watcher, &path, notify::RecursiveMode::NonRecursive).is_err()
        {
            return;
        }
        while let Ok(Ok(_event)) = file_rx.recv() {
            if let Ok(contents) = std::fs::read_to_string(&path)
                && let Some(line) = contents.lines().rfind(|l| !l.trim().is_empty())
                && let Ok(msg) = serde_json::from_str::<ControlMsg>(line)
                && tx.send(msg).is_err()
            {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_parse_with_any_subset_of_fields() {
        let msg: ControlMsg = serde_json::from_str(r#"{"text": "happy 2026"}"#).unwrap();
        assert_eq!(msg.text.as_deref(), Some("happy 2026"));
        assert!(msg.auto.is_none());

        let msg: ControlMsg =
            serde_json::from_str(r#"{"auto": false, "launch": {"x": 0.5, "y": 0.2}}"#).unwrap();
        assert_eq!(msg.auto, Some(false));
        let launch = msg.launch.unwrap();
        assert_eq!((launch.x, launch.y), (0.5, 0.2));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let msg: ControlMsg = serde_json::from_str(r#"{"scale": 1.5, "nope": 1}"#).unwrap();
        assert_eq!(msg.scale, Some(1.5));
    }
}
