//! Background frame recorder.
//!
//! Frames are written as JSON lines on a dedicated thread so a slow disk
//! never stalls the render loop.  Write errors stop the thread; they are
//! reported by [`Recorder::finish`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use hand_gesture::{write_record, FrameRecord, RecordingError};
use tracing::{info, warn};

enum RecorderCommand {
    Record(FrameRecord),
    Finish,
}

/// Handle to the recording thread.
pub struct Recorder {
    cmd_tx: Sender<RecorderCommand>,
    handle: Option<JoinHandle<Result<usize, RecordingError>>>,
}

impl Recorder {
    /// Spawn the writer thread around any sink.
    pub fn spawn<W: Write + Send + 'static>(writer: W) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RecorderCommand>();
        let handle = thread::spawn(move || recorder_thread(writer, cmd_rx));
        Recorder { cmd_tx, handle: Some(handle) }
    }

    pub fn create(path: &Path) -> Result<Self, RecordingError> {
        let file = File::create(path)?;
        info!("recording frames to {}", path.display());
        Ok(Self::spawn(BufWriter::new(file)))
    }

    /// Queue one frame.  Silently dropped once the writer has failed.
    pub fn record(&self, record: FrameRecord) {
        let _ = self.cmd_tx.send(RecorderCommand::Record(record));
    }

    /// Flush, stop the thread, and return how many frames were written.
    pub fn finish(mut self) -> Result<usize, RecordingError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<usize, RecordingError> {
        let Some(handle) = self.handle.take() else { return Ok(0) };
        let _ = self.cmd_tx.send(RecorderCommand::Finish);
        handle.join().unwrap_or_else(|_| {
            Err(RecordingError::Io(io::Error::new(io::ErrorKind::Other, "recorder thread panicked")))
        })
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("recording incomplete: {}", e);
        }
    }
}

fn recorder_thread<W: Write>(mut writer: W, cmd_rx: Receiver<RecorderCommand>) -> Result<usize, RecordingError> {
    let mut written = 0;
    for cmd in cmd_rx {
        match cmd {
            RecorderCommand::Record(record) => {
                write_record(&mut writer, &record)?;
                written += 1;
            }
            RecorderCommand::Finish => break,
        }
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn finish_reports_count_and_flushes() {
        let buf = SharedBuf::default();
        let recorder = Recorder::spawn(buf.clone());
        for t in 0..3 {
            recorder.record(FrameRecord::new(t * 33, None));
        }
        assert_eq!(recorder.finish().unwrap(), 3);

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("{\"t_ms\":0"));
    }

    #[test]
    fn write_failure_surfaces_on_finish() {
        let recorder = Recorder::spawn(FailingSink);
        recorder.record(FrameRecord::new(0, None));
        assert!(matches!(recorder.finish(), Err(RecordingError::Io(_))));
    }

    #[test]
    fn drop_flushes_pending_frames() {
        let buf = SharedBuf::default();
        {
            let recorder = Recorder::spawn(buf.clone());
            recorder.record(FrameRecord::new(7, None));
        }
        assert_eq!(buf.0.lock().unwrap().iter().filter(|&&b| b == b'\n').count(), 1);
    }
}
