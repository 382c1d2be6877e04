use std::fmt;
use std::io::{self, Write};

use thiserror::Error;
use tracing::info;

use crate::capture::{capture_word, CaptureError, CaptureResult};
use crate::runtime::RawKeyReader;
use crate::scoring::{round2, Scores};
use crate::word::TestWord;
use crate::word_source::{WordSource, WordSourceError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    WordSource(#[from] WordSourceError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("failed to write to console: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Mirror typed characters back to the console
    pub echo: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { echo: true }
    }
}

/// One finished round: the word, what was typed, and how it scored
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub test_word: TestWord,
    pub capture: CaptureResult,
    pub scores: Scores,
}

impl RoundReport {
    pub fn new(test_word: TestWord, capture: CaptureResult) -> Self {
        let scores = Scores::compute(&test_word, &capture);
        Self {
            test_word,
            capture,
            scores,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        round2(self.capture.elapsed_secs())
    }
}

/// Whole numbers keep one decimal (`100.0`), everything else prints as is.
pub fn format_score(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Word: {}", self.test_word)?;
        writeln!(f, "No. of letters: {}", self.test_word.len())?;
        writeln!(f, "\n")?;
        writeln!(f, "User typed:  {}", self.capture.typed_word)?;
        writeln!(
            f,
            "Time taken by user: {}s",
            format_score(self.elapsed_secs())
        )?;
        writeln!(f, "\n")?;
        writeln!(f, "AccuracyScore: {}", format_score(self.scores.accuracy_score))?;
        writeln!(f, "Time Score: {}s", format_score(self.scores.time_score))?;
        writeln!(f, "\n")?;
        writeln!(f, "Total Score:  {}", format_score(self.scores.total_score))
    }
}

/// Runs a single round: fetch a word, prompt, capture, score
pub struct Session<S: WordSource, R: RawKeyReader> {
    source: S,
    reader: R,
    config: SessionConfig,
}

impl<S: WordSource, R: RawKeyReader> Session<S, R> {
    pub fn new(source: S, reader: R, config: SessionConfig) -> Self {
        Self {
            source,
            reader,
            config,
        }
    }

    /// Prompt and echo go to `out`; the report is returned, not printed.
    /// A failed word fetch ends the round before anything is prompted.
    pub fn run_round<W: Write>(&mut self, out: &mut W) -> Result<RoundReport, SessionError> {
        let test_word = self.source.fetch_word()?;

        writeln!(out, "Type {test_word} and press Enter")?;
        out.flush()?;

        let capture = if self.config.echo {
            let capture = capture_word(&mut self.reader, out)?;
            writeln!(out)?;
            capture
        } else {
            capture_word(&mut self.reader, &mut io::sink())?
        };

        let report = RoundReport::new(test_word, capture);
        info!(word = %report.test_word, total = report.scores.total_score, "round complete");
        Ok(report)
    }
}
