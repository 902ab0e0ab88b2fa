//! s3-localize Library
//!
//! Command-line option structs for the `s3-localize` binary and their
//! mapping onto the core crate's [`ClientConfig`].
//!
//! The heavy lifting lives in `s3-localize-file`, re-exported here for
//! convenience.

use clap::{Parser, ValueEnum};
use s3_localize_file::{ClientConfig, RetryMode, DEFAULT_MAX_ATTEMPTS, DEFAULT_SESSION_NAME};

pub use s3_localize_file as file;

/// AWS client connection options
#[derive(Parser, Clone)]
pub struct ClientOpts {
    /// Named credential profile to use
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Static access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    /// Static secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: Option<String>,

    /// Session token accompanying the static key pair
    #[arg(long, env = "AWS_SESSION_TOKEN")]
    pub session_token: Option<String>,

    /// Target region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Role to assume; static credentials are ignored when set
    #[arg(long)]
    pub role_arn: Option<String>,

    /// Label for the assumed-role session
    #[arg(long, default_value = DEFAULT_SESSION_NAME)]
    pub session_name: String,

    /// Retry mode forwarded to the client's retry policy
    #[arg(long, value_enum, default_value_t = RetryModeOpt::Standard)]
    pub retry_mode: RetryModeOpt,

    /// Maximum number of attempts forwarded to the client's retry policy
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

/// Retry modes accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryModeOpt {
    /// Standard exponential backoff
    Standard,
    /// Client-side rate limiting on top of standard backoff
    Adaptive,
}

impl From<RetryModeOpt> for RetryMode {
    fn from(mode: RetryModeOpt) -> Self {
        match mode {
            RetryModeOpt::Standard => RetryMode::Standard,
            RetryModeOpt::Adaptive => RetryMode::Adaptive,
        }
    }
}

impl ClientOpts {
    /// Bundle the options into the core crate's client configuration
    pub fn to_config(&self) -> ClientConfig {
        ClientConfig {
            profile_name: self.profile.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
            region: self.region.clone(),
            role_arn: self.role_arn.clone(),
            session_name: self.session_name.clone(),
            retry_mode: self.retry_mode.into(),
            max_attempts: self.max_attempts,
        }
    }
}
