use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://random-words-with-pronunciation.p.rapidapi.com/word";
pub const DEFAULT_API_HOST: &str = "random-words-with-pronunciation.p.rapidapi.com";
pub const DEFAULT_API_KEY_ENV: &str = "RAPIDAPI_KEY";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[cfg_attr(test, derive(serde::Serialize))]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub api_host: String,
    /// Name of the environment variable that holds the API key
    pub api_key_env: String,
    pub request_timeout_secs: Option<u64>,
    pub echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: None,
            echo: true,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "wordtap") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("wordtap_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed config"),
            },
            Err(e) => tracing::debug!(path = %self.path.display(), error = %e, "no config file"),
        }
        Config::default()
    }
}

/// API credential for the word service. Never printed.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    api_key: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Read the key from the process environment
    pub fn from_env(var: &str) -> Self {
        Self::from_lookup(var, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(var: &str, lookup: F) -> Self
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let creds = Self::new(lookup(var));
        if creds.api_key.is_none() {
            tracing::warn!(var, "no API key set; word requests will be unauthenticated");
        }
        creds
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Load a `.env` file from the working directory or its parents, if any
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}
