//! JSON-lines landmark recordings.
//!
//! One [`FrameRecord`] per line:
//!
//! ```text
//! {"t_ms":0,"landmarks":[{"x":0.5,"y":0.73,"z":0.0}, ...]}
//! {"t_ms":33,"landmarks":null}
//! ```
//!
//! Landmark lists are stored as captured.  A list of the wrong length is
//! still a readable record; the engine skips it as a malformed tick.

use std::io::{BufRead, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RecordingError;
use crate::landmarks::{HandFrame, Landmark};

/// One capture tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Milliseconds since the source started.
    pub t_ms:      u64,
    /// `None` when no hand was visible.
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl FrameRecord {
    pub fn new(t_ms: u64, hand: Option<&HandFrame>) -> Self {
        FrameRecord {
            t_ms,
            landmarks: hand.map(|h| h.landmarks().to_vec()),
        }
    }

    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.t_ms)
    }

    pub fn landmarks(&self) -> Option<&[Landmark]> {
        self.landmarks.as_deref()
    }
}

/// Iterate the records of a recording.  Blank lines are skipped; a line
/// that fails to parse yields an error carrying its 1-based line number.
pub fn read_recording<R: BufRead>(reader: R) -> impl Iterator<Item = Result<FrameRecord, RecordingError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Err(e) => Some(Err(RecordingError::Io(e))),
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(
                serde_json::from_str(&text)
                    .map_err(|source| RecordingError::Parse { line: i + 1, source }),
            ),
        })
}

/// Append one record as a single line.
pub fn write_record<W: Write>(mut writer: W, record: &FrameRecord) -> Result<(), RecordingError> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{HandPose, PoseKind};
    use std::io::Cursor;

    #[test]
    fn written_records_read_back() {
        let hand = HandPose::new(PoseKind::Open).frame();
        let mut buf = Vec::new();
        write_record(&mut buf, &FrameRecord::new(0, Some(&hand))).unwrap();
        write_record(&mut buf, &FrameRecord::new(33, None)).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert_eq!(text.lines().count(), 2);

        let records: Vec<_> = read_recording(Cursor::new(buf)).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(HandFrame::from_slice(records[0].landmarks().unwrap()).unwrap(), hand);
        assert_eq!(records[1].landmarks(), None);
        assert_eq!(records[1].timestamp(), Duration::from_millis(33));
    }

    #[test]
    fn blank_lines_skipped() {
        let input = "\n{\"t_ms\":5}\n   \n{\"t_ms\":9,\"landmarks\":null}\n";
        let records: Vec<_> = read_recording(Cursor::new(input)).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.iter().map(|r| r.t_ms).collect::<Vec<_>>(), vec![5, 9]);
    }

    #[test]
    fn parse_error_reports_line() {
        let input = "{\"t_ms\":1}\n\nnot json\n";
        let results: Vec<_> = read_recording(Cursor::new(input)).collect();
        assert!(results[0].is_ok());
        match &results[1] {
            Err(RecordingError::Parse { line, .. }) => assert_eq!(*line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn short_landmark_list_is_still_a_record() {
        let input = "{\"t_ms\":1,\"landmarks\":[{\"x\":0.1,\"y\":0.2}]}";
        let record = read_recording(Cursor::new(input)).next().unwrap().unwrap();
        assert_eq!(record.landmarks().map(<[Landmark]>::len), Some(1));
    }
}
