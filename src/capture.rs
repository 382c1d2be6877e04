use std::io::{self, Write};
use std::time::SystemTime;

use thiserror::Error;
use tracing::debug;

use crate::runtime::{KeyEvent, RawKeyReader};
use crate::scoring::signed_secs_between;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("typing was interrupted")]
    Interrupted,
    #[error("failed to read keystroke: {0}")]
    Io(#[from] io::Error),
}

/// Everything the scorers need to know about one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub typed_word: String,
    pub backspace_count: u32,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
}

impl CaptureResult {
    pub fn elapsed_secs(&self) -> f64 {
        signed_secs_between(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Typing,
    Done,
}

/// What a single keystroke did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Appended(char),
    Erased(char),
    /// Backspace on an empty buffer; still counted
    EmptyBackspace,
    Ignored,
    Finished,
}

/// Typing -> Done state machine for one attempt
#[derive(Debug)]
pub struct Capture {
    buffer: String,
    backspace_count: u32,
    started_at: SystemTime,
    ended_at: Option<SystemTime>,
}

impl Capture {
    pub fn new() -> Self {
        Self::started_at(SystemTime::now())
    }

    fn started_at(started_at: SystemTime) -> Self {
        Self {
            buffer: String::new(),
            backspace_count: 0,
            started_at,
            ended_at: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.ended_at.is_some() {
            CaptureState::Done
        } else {
            CaptureState::Typing
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn backspace_count(&self) -> u32 {
        self.backspace_count
    }

    fn write(&mut self, c: char) {
        self.buffer.push(c);
    }

    fn backspace(&mut self) -> Option<char> {
        self.backspace_count = self.backspace_count.saturating_add(1);
        self.buffer.pop()
    }

    fn finish_at(&mut self, ended_at: SystemTime) {
        self.ended_at = Some(ended_at);
    }

    /// Apply one keystroke. Keys after Enter are ignored.
    pub fn handle(&mut self, key: KeyEvent) -> Step {
        if self.state() == CaptureState::Done {
            return Step::Ignored;
        }

        match key {
            KeyEvent::Enter => {
                self.finish_at(SystemTime::now());
                Step::Finished
            }
            KeyEvent::Backspace => match self.backspace() {
                Some(c) => Step::Erased(c),
                None => Step::EmptyBackspace,
            },
            KeyEvent::Char(c) => {
                self.write(c);
                Step::Appended(c)
            }
            KeyEvent::Interrupt | KeyEvent::Ignored => Step::Ignored,
        }
    }

    /// The finished attempt, or `None` while still typing
    pub fn into_result(self) -> Option<CaptureResult> {
        let end_time = self.ended_at?;
        Some(CaptureResult {
            typed_word: self.buffer,
            backspace_count: self.backspace_count,
            start_time: self.started_at,
            end_time,
        })
    }
}

impl Default for Capture {
    fn default() -> Self {
        Self::new()
    }
}

/// Read keys until Enter and return the attempt.
///
/// The clock starts on entry. Typed characters are mirrored to `echo`;
/// pass `io::sink()` for no echo.
pub fn capture_word<R, W>(reader: &mut R, echo: &mut W) -> Result<CaptureResult, CaptureError>
where
    R: RawKeyReader + ?Sized,
    W: Write + ?Sized,
{
    reader.begin_capture()?;
    let result = run_capture(reader, echo);
    let ended = reader.end_capture();
    let result = result?;
    ended?;
    Ok(result)
}

fn run_capture<R, W>(reader: &mut R, echo: &mut W) -> Result<CaptureResult, CaptureError>
where
    R: RawKeyReader + ?Sized,
    W: Write + ?Sized,
{
    let mut capture = Capture::new();

    loop {
        let key = reader.next_key()?;
        if key == KeyEvent::Interrupt {
            debug!("capture interrupted");
            return Err(CaptureError::Interrupted);
        }

        match capture.handle(key) {
            Step::Appended(c) => {
                write!(echo, "{c}")?;
                echo.flush()?;
            }
            Step::Erased(_) => {
                echo.write_all(b"\x08 \x08")?;
                echo.flush()?;
            }
            Step::EmptyBackspace => debug!("backspace on empty buffer"),
            Step::Ignored => debug!(?key, "ignored key"),
            Step::Finished => break,
        }
    }

    let result = capture
        .into_result()
        .ok_or_else(|| io::Error::other("capture ended while typing"))?;
    debug!(
        typed = %result.typed_word,
        backspaces = result.backspace_count,
        "capture finished"
    );
    Ok(result)
}
