//! Console recognizer: commands typed on standard input
//!
//! Each line is one utterance. Lines typed while disabled are dropped.

use std::io::{self, BufRead, BufReader};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;

use crate::application::ports::{RecognitionError, RecognitionSink, SpeechRecognizer};
use crate::domain::recognition::{Recognition, Vocabulary};

type LineSource = Box<dyn BufRead + Send>;

/// Reads commands from a line-oriented source
pub struct ConsoleRecognizer {
    /// Sink of the current file, `None` while disabled
    active: Arc<Mutex<Option<RecognitionSink>>>,
    /// Taken by the reader thread on first enable
    source: Mutex<Option<LineSource>>,
}

impl ConsoleRecognizer {
    /// Read commands from standard input
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    /// Read commands from any line source
    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            active: Arc::new(Mutex::new(None)),
            source: Mutex::new(Some(Box::new(reader))),
        }
    }

    fn start_reader(&self) -> Result<(), RecognitionError> {
        let Some(source) = self
            .source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return Ok(());
        };

        let active = Arc::clone(&self.active);
        thread::Builder::new()
            .name("console-input".to_string())
            .spawn(move || read_lines(source, active))
            .map_err(|e| RecognitionError::StartFailed(format!("Failed to spawn reader: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl SpeechRecognizer for ConsoleRecognizer {
    async fn enable(
        &self,
        _vocabulary: &Vocabulary,
        sink: RecognitionSink,
    ) -> Result<(), RecognitionError> {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
        self.start_reader()
    }

    async fn disable(&self) -> Result<(), RecognitionError> {
        // Sends happen under this lock, so none can follow once it is cleared
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

fn read_lines(source: LineSource, active: Arc<Mutex<Option<RecognitionSink>>>) {
    for line in source.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read console input");
                break;
            }
        };

        let phrase = line.trim();
        if phrase.is_empty() {
            continue;
        }

        let guard = active.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(sink) => {
                if let Err(TrySendError::Full(_)) = sink.try_send(Recognition::Phrase(phrase.to_string())) {
                    tracing::debug!(phrase, "recognition buffer full, dropping input");
                }
            }
            None => tracing::debug!(phrase, "input while not listening, ignored"),
        }
    }

    tracing::debug!("console input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Reader fed line by line from the test
    struct Feed {
        lines: std_mpsc::Receiver<&'static str>,
        pending: Vec<u8>,
    }

    impl Read for Feed {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pending.is_empty() {
                match self.lines.recv() {
                    Ok(line) => self.pending = format!("{}\n", line).into_bytes(),
                    Err(_) => return Ok(0),
                }
            }
            let n = buf.len().min(self.pending.len());
            buf[..n].copy_from_slice(&self.pending[..n]);
            self.pending.drain(..n);
            Ok(n)
        }
    }

    fn fed() -> (ConsoleRecognizer, std_mpsc::Sender<&'static str>) {
        let (tx, rx) = std_mpsc::channel();
        let feed = Feed {
            lines: rx,
            pending: Vec::new(),
        };
        (ConsoleRecognizer::from_reader(BufReader::new(feed)), tx)
    }

    #[tokio::test]
    async fn forwards_lines_while_enabled() {
        let recognizer = ConsoleRecognizer::from_reader(Cursor::new("  Accept \n\nskip\n"));
        let (tx, mut rx) = mpsc::channel(8);

        recognizer.enable(&Vocabulary::default(), tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(Recognition::Phrase("Accept".to_string())));
        assert_eq!(rx.recv().await, Some(Recognition::Phrase("skip".to_string())));
    }

    #[tokio::test]
    async fn disable_closes_the_channel() {
        let (recognizer, feed) = fed();
        let (tx, mut rx) = mpsc::channel(8);

        recognizer.enable(&Vocabulary::default(), tx).await.unwrap();
        feed.send("delete").unwrap();
        assert_eq!(rx.recv().await, Some(Recognition::Phrase("delete".to_string())));

        recognizer.disable().await.unwrap();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn input_while_disabled_is_dropped() {
        let (recognizer, feed) = fed();
        let (first_tx, _first_rx) = mpsc::channel(8);
        recognizer.enable(&Vocabulary::default(), first_tx).await.unwrap();
        recognizer.disable().await.unwrap();

        feed.send("accept").unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (tx, mut rx) = mpsc::channel(8);
        recognizer.enable(&Vocabulary::default(), tx).await.unwrap();
        feed.send("skip").unwrap();

        assert_eq!(rx.recv().await, Some(Recognition::Phrase("skip".to_string())));
    }

    #[tokio::test]
    async fn second_enable_reuses_reader() {
        let (recognizer, feed) = fed();
        for word in ["accept", "delete"] {
            let (tx, mut rx) = mpsc::channel(8);
            recognizer.enable(&Vocabulary::default(), tx).await.unwrap();
            feed.send(word).unwrap();
            assert_eq!(rx.recv().await, Some(Recognition::Phrase(word.to_string())));
            recognizer.disable().await.unwrap();
        }
    }
}
