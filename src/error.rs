use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BountyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No API token found. Set GITHUB_TOKEN env var or add api_token to ~/.config/bounty/config.toml"
    )]
    MissingToken,

    #[error(
        "No Airtable key found. Set AIRTABLE_API_KEY env var or add airtable_key to ~/.config/bounty/config.toml"
    )]
    MissingAirtableKey,

    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Time not found in issue body.")]
    TimeNotFound,

    #[error("Price not found in issue title.")]
    TitlePriceNotFound,

    #[error("Bonus price not found in issue body.")]
    BonusPriceNotFound,

    #[error("Issue not found: {0}")]
    IssueNotFound(String),

    #[error("Issue has no linked project item")]
    NoProjectItem,

    #[error("Missing required project fields: {}", names.join(", "))]
    MissingFields { names: Vec<String> },

    #[error("One or more payout checks failed")]
    ChecksFailed,
}

pub type Result<T> = std::result::Result<T, BountyError>;
