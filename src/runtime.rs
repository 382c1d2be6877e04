use std::collections::VecDeque;
use std::io::{self, Read};

use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent as CtKeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Byte a line-buffered or raw stream sends for Enter
pub const ENTER_BYTE: u8 = 10;
/// Byte terminals send for Backspace/Delete
pub const BACKSPACE_BYTE: u8 = 127;

/// One keystroke as seen by the capture loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    Enter,
    Backspace,
    Char(char),
    /// Ctrl+C or Esc; raw mode swallows SIGINT so this is the way out
    Interrupt,
    /// Arrows, function keys, key releases and the like
    Ignored,
}

impl KeyEvent {
    /// Classify a single raw byte. No UTF-8 decoding: every byte other
    /// than Enter and Backspace becomes one character.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ENTER_BYTE => KeyEvent::Enter,
            BACKSPACE_BYTE => KeyEvent::Backspace,
            other => KeyEvent::Char(other as char),
        }
    }
}

impl From<CtKeyEvent> for KeyEvent {
    fn from(key: CtKeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyEvent::Ignored;
        }

        match key.code {
            KeyCode::Enter => KeyEvent::Enter,
            KeyCode::Backspace | KeyCode::Delete => KeyEvent::Backspace,
            KeyCode::Esc => KeyEvent::Interrupt,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyEvent::Interrupt
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                KeyEvent::Char(c)
            }
            _ => KeyEvent::Ignored,
        }
    }
}

/// Source of raw keystrokes, one at a time
pub trait RawKeyReader {
    /// Block until the next key arrives.
    fn next_key(&mut self) -> io::Result<KeyEvent>;

    /// Called right before the first key of an attempt is read
    fn begin_capture(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once the attempt is over, whether it finished or failed
    fn end_capture(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: RawKeyReader + ?Sized> RawKeyReader for &mut R {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        (**self).next_key()
    }

    fn begin_capture(&mut self) -> io::Result<()> {
        (**self).begin_capture()
    }

    fn end_capture(&mut self) -> io::Result<()> {
        (**self).end_capture()
    }
}

impl<R: RawKeyReader + ?Sized> RawKeyReader for Box<R> {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        (**self).next_key()
    }

    fn begin_capture(&mut self) -> io::Result<()> {
        (**self).begin_capture()
    }

    fn end_capture(&mut self) -> io::Result<()> {
        (**self).end_capture()
    }
}

/// Production reader for an interactive terminal. Raw mode is held only
/// while an attempt is being captured.
#[derive(Debug, Default)]
pub struct CrosstermKeyReader {
    raw_mode: Option<RawModeGuard>,
}

impl CrosstermKeyReader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RawKeyReader for CrosstermKeyReader {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            // resize, focus and mouse events are not keystrokes
            if let CtEvent::Key(key) = event::read()? {
                return Ok(key.into());
            }
        }
    }

    fn begin_capture(&mut self) -> io::Result<()> {
        if self.raw_mode.is_none() {
            self.raw_mode = Some(RawModeGuard::enable()?);
        }
        Ok(())
    }

    fn end_capture(&mut self) -> io::Result<()> {
        if self.raw_mode.take().is_some() {
            disable_raw_mode()?;
        }
        Ok(())
    }
}

/// Reads keystrokes byte by byte from any stream, e.g. piped stdin
#[derive(Debug)]
pub struct ByteKeyReader<R: Read> {
    inner: R,
}

impl<R: Read> ByteKeyReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> RawKeyReader for ByteKeyReader<R> {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(KeyEvent::from_byte(buf[0]))
    }
}

/// Replays a fixed list of keys; runs dry with `UnexpectedEof`
#[derive(Debug, Default)]
pub struct ScriptedKeyReader {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeyReader {
    pub fn new(keys: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Type `text` followed by Enter
    pub fn typing(text: &str) -> Self {
        Self::new(text.chars().map(KeyEvent::Char).chain([KeyEvent::Enter]))
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl RawKeyReader for ScriptedKeyReader {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more scripted keys"))
    }
}

/// Keeps the terminal in raw mode for as long as it lives
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // harmless if raw mode was already turned off
        let _ = disable_raw_mode();
    }
}
