// Library surface for headless/integration tests and reuse.
// Terminal setup and argument parsing stay in main.rs.
pub mod capture;
pub mod config;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod word;
pub mod word_source;
