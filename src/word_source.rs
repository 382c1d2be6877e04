//! Where test words come from.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Config, Credentials};
use crate::word::{TestWord, WordError};

const KEY_HEADER: &str = "X-RapidAPI-Key";
const HOST_HEADER: &str = "X-RapidAPI-Host";
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum WordSourceError {
    #[error("error fetching word: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("word service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed word response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("word service returned no words")]
    NoWord,
    #[error("word service returned an unusable word: {0}")]
    Word(#[from] WordError),
}

pub trait WordSource {
    fn fetch_word(&self) -> Result<TestWord, WordSourceError>;
}

impl<S: WordSource + ?Sized> WordSource for Box<S> {
    fn fetch_word(&self) -> Result<TestWord, WordSourceError> {
        (**self).fetch_word()
    }
}

/// Always hands out the same word, e.g. one given on the command line
#[derive(Debug, Clone)]
pub struct FixedWordSource {
    word: TestWord,
}

impl FixedWordSource {
    pub fn new(word: TestWord) -> Self {
        Self { word }
    }
}

impl WordSource for FixedWordSource {
    fn fetch_word(&self) -> Result<TestWord, WordSourceError> {
        Ok(self.word.clone())
    }
}

#[derive(Debug, Deserialize)]
struct WordRecord {
    word: String,
}

// The service answers with a one element list; a bare record is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordResponse {
    Many(Vec<WordRecord>),
    One(WordRecord),
}

pub fn parse_word_response(body: &str) -> Result<TestWord, WordSourceError> {
    let record = match serde_json::from_str::<WordResponse>(body)? {
        WordResponse::One(record) => record,
        WordResponse::Many(records) => records.into_iter().next().ok_or(WordSourceError::NoWord)?,
    };
    Ok(TestWord::new(record.word)?)
}

/// Random word service over HTTP. One blocking GET per word, no retries.
#[derive(Debug)]
pub struct HttpWordSource {
    client: Client,
    endpoint: String,
    api_host: String,
    credentials: Credentials,
}

impl HttpWordSource {
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self, WordSourceError> {
        let client = Client::builder()
            .timeout(config.request_timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_host: config.api_host.clone(),
            credentials,
        })
    }
}

impl WordSource for HttpWordSource {
    fn fetch_word(&self) -> Result<TestWord, WordSourceError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .header(HOST_HEADER, &self.api_host);
        if let Some(key) = self.credentials.api_key() {
            request = request.header(KEY_HEADER, key);
        }

        debug!(endpoint = %self.endpoint, "fetching word");
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(WordSourceError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let word = parse_word_response(&body)?;
        info!(word = %word, "fetched word");
        Ok(word)
    }
}
