//! CLI argument definitions using clap

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Send a stored request, negotiating authorization on the way
#[derive(Parser, Debug, Clone)]
#[command(name = "quicpulse-auth", version, about, long_about = None)]
pub struct Args {
    // =========================================================================
    // POSITIONAL ARGUMENTS
    // =========================================================================

    /// Request file (JSON request descriptor)
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,

    // =========================================================================
    // STORES
    // =========================================================================

    /// Config file (defaults to <config dir>/quicpulse-auth/config.toml)
    #[arg(long = "config", value_name = "FILE", env = "QUICPULSE_AUTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Credential store file
    #[arg(long = "credentials", value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Client certificate directory
    #[arg(long = "certificates", value_name = "DIR")]
    pub certificates: Option<PathBuf>,

    // =========================================================================
    // BEHAVIOR
    // =========================================================================

    /// Never prompt for credentials; a 401 response is final
    #[arg(long = "no-prompt", action = ArgAction::SetTrue)]
    pub no_prompt: bool,

    /// Maximum number of send attempts for the request
    #[arg(long = "max-attempts", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<f64>,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Print the final request (after authorization) as JSON to stderr
    #[arg(long = "print-request", action = ArgAction::SetTrue)]
    pub print_request: bool,

    /// Verbose logging. Use -vv for trace output
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Debug logging
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl Args {
    /// Log filter directive derived from the verbosity flags
    pub fn log_directive(&self) -> &'static str {
        match (self.debug, self.verbose) {
            (_, v) if v >= 2 => "quicpulse_auth=trace",
            (true, _) | (_, 1) => "quicpulse_auth=debug",
            _ => "quicpulse_auth=warn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["quicpulse-auth", "request.json"]).unwrap();
        assert_eq!(args.request, PathBuf::from("request.json"));
        assert!(!args.no_prompt);
        assert_eq!(args.log_directive(), "quicpulse_auth=warn");
    }

    #[test]
    fn test_parse_options() {
        let args = Args::try_parse_from([
            "quicpulse-auth", "--no-prompt", "--max-attempts", "2", "-vv", "req.json",
        ]).unwrap();
        assert!(args.no_prompt);
        assert_eq!(args.max_attempts, Some(2));
        assert_eq!(args.log_directive(), "quicpulse_auth=trace");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Args::try_parse_from(["quicpulse-auth", "--max-attempts", "0", "req.json"]).is_err());
    }
}
