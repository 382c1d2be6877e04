use std::io;

use wordtap::capture::CaptureError;
use wordtap::runtime::{ByteKeyReader, KeyEvent, ScriptedKeyReader};
use wordtap::session::{Session, SessionConfig, SessionError};
use wordtap::word::TestWord;
use wordtap::word_source::FixedWordSource;

// Headless rounds driven through the public Session API without a TTY.

fn fixed(word: &str) -> FixedWordSource {
    FixedWordSource::new(TestWord::new(word).unwrap())
}

#[test]
fn headless_round_scores_perfect_attempt() {
    let mut session = Session::new(
        fixed("test"),
        ScriptedKeyReader::typing("test"),
        SessionConfig { echo: false },
    );

    let report = session.run_round(&mut io::sink()).unwrap();

    assert_eq!(report.test_word.as_str(), "test");
    assert_eq!(report.capture.typed_word, "test");
    assert_eq!(report.capture.backspace_count, 0);
    assert_eq!(report.scores.accuracy_score, 100.0);
    // a scripted reader finishes far inside the expected 1.8s
    assert_eq!(report.scores.time_score, 100.0);
    assert_eq!(report.scores.total_score, 100.0);
}

#[test]
fn headless_round_empty_attempt() {
    let mut session = Session::new(
        fixed("hello"),
        ScriptedKeyReader::new([KeyEvent::Enter]),
        SessionConfig { echo: false },
    );

    let report = session.run_round(&mut io::sink()).unwrap();

    assert_eq!(report.capture.typed_word, "");
    assert_eq!(report.scores.accuracy_score, 0.0);
    assert_eq!(report.scores.total_score, 50.0);
}

#[test]
fn headless_round_excess_backspaces_reflect() {
    let mut keys: Vec<KeyEvent> = Vec::new();
    // type junk, erase it all, then type the word
    keys.extend("xxxxxx".chars().map(KeyEvent::Char));
    keys.extend(std::iter::repeat(KeyEvent::Backspace).take(6));
    keys.extend("hello".chars().map(KeyEvent::Char));
    keys.push(KeyEvent::Enter);

    let mut session = Session::new(
        fixed("hello"),
        ScriptedKeyReader::new(keys),
        SessionConfig { echo: false },
    );
    let report = session.run_round(&mut io::sink()).unwrap();

    assert_eq!(report.capture.typed_word, "hello");
    assert_eq!(report.capture.backspace_count, 6);
    assert_eq!(report.scores.accuracy_score, 20.0);
}

#[test]
fn headless_round_from_raw_bytes() {
    // 127 is backspace, 10 is enter
    let input: &[u8] = b"cax\x7ft\n";
    let mut session = Session::new(
        fixed("cat"),
        ByteKeyReader::new(input),
        SessionConfig { echo: false },
    );

    let report = session.run_round(&mut io::sink()).unwrap();

    assert_eq!(report.capture.typed_word, "cat");
    assert_eq!(report.capture.backspace_count, 1);
    assert_eq!(report.scores.accuracy_score, 66.67);
}

#[test]
fn headless_round_input_closed_before_enter() {
    let input: &[u8] = b"ca";
    let mut session = Session::new(
        fixed("cat"),
        ByteKeyReader::new(input),
        SessionConfig { echo: false },
    );

    let err = session.run_round(&mut io::sink()).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Capture(CaptureError::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof
    ));
}

#[test]
fn headless_report_lists_every_field() {
    let mut session = Session::new(
        fixed("quill"),
        ScriptedKeyReader::typing("quil"),
        SessionConfig { echo: false },
    );
    let report = session.run_round(&mut io::sink()).unwrap();
    let text = report.to_string();

    assert!(text.contains("Word: quill"));
    assert!(text.contains("No. of letters: 5"));
    assert!(text.contains("User typed:  quil"));
    assert!(text.contains("Time taken by user: "));
    assert!(text.contains("AccuracyScore: 80.0"));
    assert!(text.contains("Time Score: 100.0"));
    assert!(text.contains("Total Score:  90.0"));
}
