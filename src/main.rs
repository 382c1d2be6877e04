use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::tty::IsTty;
use std::{
    io::{self, stdin, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing_subscriber::EnvFilter;
use wordtap::{
    capture::CaptureError,
    config::{load_dotenv, Config, ConfigStore, Credentials, FileConfigStore},
    runtime::{ByteKeyReader, CrosstermKeyReader, RawKeyReader},
    session::{Session, SessionConfig, SessionError},
    word::{TestWord, WordError},
    word_source::{FixedWordSource, HttpWordSource, WordSource},
};

const EXIT_INTERRUPTED: u8 = 130;

/// type one random word as fast and accurately as you can, then get scored
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Fetches a random word, times you typing it, and scores the attempt on accuracy (mistakes and backspaces) and speed."
)]
pub struct Cli {
    /// word to type instead of fetching a random one
    #[clap(short = 'w', long, value_parser = parse_word)]
    word: Option<TestWord>,

    /// word service endpoint
    #[clap(short = 'e', long)]
    endpoint: Option<String>,

    /// path to the config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// where keystrokes come from
    #[clap(short = 'i', long, value_enum, default_value_t = InputMode::Auto)]
    input: InputMode,

    /// do not echo typed characters
    #[clap(long)]
    no_echo: bool,

    /// request timeout for the word service, in seconds
    #[clap(short = 't', long)]
    timeout: Option<u64>,
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum, strum_macros::Display)]
pub enum InputMode {
    /// raw terminal when stdin is a tty, bytes otherwise
    Auto,
    /// raw terminal keys
    Terminal,
    /// one byte per key from stdin
    Bytes,
}

fn parse_word(s: &str) -> Result<TestWord, WordError> {
    TestWord::new(s)
}

impl Cli {
    /// Command line flags win over the config file
    fn apply(&self, mut config: Config) -> Config {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        if self.no_echo {
            config.echo = false;
        }
        config
    }

    fn resolve_input(&self, stdin_is_tty: bool) -> InputMode {
        match self.input {
            InputMode::Auto if stdin_is_tty => InputMode::Terminal,
            InputMode::Auto => InputMode::Bytes,
            other => other,
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wordtap=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn word_source(cli: &Cli, config: &Config) -> anyhow::Result<Box<dyn WordSource>> {
    if let Some(word) = &cli.word {
        return Ok(Box::new(FixedWordSource::new(word.clone())));
    }

    let credentials = Credentials::from_env(&config.api_key_env);
    let source =
        HttpWordSource::new(config, credentials).context("failed to set up word service client")?;
    Ok(Box::new(source))
}

fn key_reader(mode: InputMode) -> Box<dyn RawKeyReader> {
    match mode {
        InputMode::Terminal => Box::new(CrosstermKeyReader::new()),
        InputMode::Bytes | InputMode::Auto => Box::new(ByteKeyReader::new(stdin())),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    load_dotenv();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(store.load());
    tracing::debug!(?config, path = %store.path().display(), "loaded config");

    let stdin_is_tty = stdin().is_tty();
    if cli.input == InputMode::Terminal && !stdin_is_tty {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }
    let input = cli.resolve_input(stdin_is_tty);
    tracing::debug!(%input, "reading keystrokes");

    let source = word_source(&cli, &config)?;
    let session_config = SessionConfig {
        // piped input would be echoed twice
        echo: config.echo && input == InputMode::Terminal,
    };
    let mut session = Session::new(source, key_reader(input), session_config);

    let mut stdout = io::stdout().lock();
    let report = session.run_round(&mut stdout)?;
    write!(stdout, "{report}")?;
    stdout.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<SessionError>() {
            Some(SessionError::Capture(CaptureError::Interrupted)) => {
                eprintln!();
                ExitCode::from(EXIT_INTERRUPTED)
            }
            _ => {
                eprintln!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["wordtap"]);

        assert_eq!(cli.word, None);
        assert_eq!(cli.endpoint, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.input, InputMode::Auto);
        assert!(!cli.no_echo);
        assert_eq!(cli.timeout, None);
    }

    #[test]
    fn test_cli_word() {
        let cli = Cli::parse_from(["wordtap", "-w", "lantern"]);
        assert_eq!(cli.word.unwrap().as_str(), "lantern");

        let cli = Cli::parse_from(["wordtap", "--word", "quill"]);
        assert_eq!(cli.word.unwrap().as_str(), "quill");
    }

    #[test]
    fn test_cli_rejects_empty_word() {
        let err = Cli::try_parse_from(["wordtap", "--word", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_input_mode() {
        let cli = Cli::parse_from(["wordtap", "--input", "bytes"]);
        assert_eq!(cli.input, InputMode::Bytes);

        let cli = Cli::parse_from(["wordtap", "-i", "terminal"]);
        assert_eq!(cli.input, InputMode::Terminal);

        assert!(Cli::try_parse_from(["wordtap", "--input", "mouse"]).is_err());
    }

    #[test]
    fn test_resolve_input() {
        let cli = Cli::parse_from(["wordtap"]);
        assert_eq!(cli.resolve_input(true), InputMode::Terminal);
        assert_eq!(cli.resolve_input(false), InputMode::Bytes);

        let cli = Cli::parse_from(["wordtap", "--input", "bytes"]);
        assert_eq!(cli.resolve_input(true), InputMode::Bytes);
    }

    #[test]
    fn test_apply_overrides_config() {
        let cli = Cli::parse_from([
            "wordtap",
            "--endpoint",
            "http://localhost:9000/word",
            "--timeout",
            "3",
            "--no-echo",
        ]);
        let config = cli.apply(Config::default());

        assert_eq!(config.endpoint, "http://localhost:9000/word");
        assert_eq!(config.request_timeout_secs, Some(3));
        assert!(!config.echo);
        assert_eq!(config.api_host, Config::default().api_host);
    }

    #[test]
    fn test_apply_keeps_config_without_flags() {
        let cli = Cli::parse_from(["wordtap"]);
        let custom = Config {
            endpoint: "http://example.test/word".into(),
            request_timeout_secs: Some(9),
            ..Config::default()
        };
        assert_eq!(cli.apply(custom.clone()), custom);
    }

    #[test]
    fn test_input_mode_display() {
        assert_eq!(InputMode::Terminal.to_string(), "Terminal");
        assert_eq!(InputMode::Bytes.to_string(), "Bytes");
    }
}
