use clap::Parser;
use std::time::Duration;

use crate::diff::{CompareOptions, TextPolicy};
use crate::io::HttpOptions;
use crate::report::ReportOptions;

#[derive(Parser, Debug)]
#[command(name = "zipdiff")]
#[command(version)]
#[command(about = "Compare two ZIP archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipdiff v1.zip v2.zip              summary, path lists and unified diffs\n  \
  zipdiff -u --no-patch a.zip b.zip  path lists only, unchanged paths included\n  \
  zipdiff --json old.zip https://example.com/new.zip   JSON payload, remote right side")]
pub struct Cli {
    /// Left (old) ZIP file path or HTTP URL
    #[arg(value_name = "LEFT")]
    pub left: String,

    /// Right (new) ZIP file path or HTTP URL
    #[arg(value_name = "RIGHT")]
    pub right: String,

    /// Print the result as JSON ({"diff": ...} or {"error": ...})
    #[arg(long)]
    pub json: bool,

    /// Write the report to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,

    /// Also list unchanged paths
    #[arg(short = 'u', long)]
    pub show_unchanged: bool,

    /// Omit unified diffs from the text report
    #[arg(long)]
    pub no_patch: bool,

    /// Lines of context in unified diffs
    #[arg(short = 'U', long, value_name = "N", default_value_t = 3, env = "ZIPDIFF_CONTEXT")]
    pub context: usize,

    /// Label for the left archive in diff headers
    #[arg(long, value_name = "LABEL", default_value = "ZIP 1", env = "ZIPDIFF_LEFT_LABEL")]
    pub left_label: String,

    /// Label for the right archive in diff headers
    #[arg(long, value_name = "LABEL", default_value = "ZIP 2", env = "ZIPDIFF_RIGHT_LABEL")]
    pub right_label: String,

    /// Treat files with this extension as text too (repeatable)
    #[arg(short = 't', long = "text-ext", value_name = "EXT")]
    pub text_extensions: Vec<String>,

    /// Timeout in seconds for each HTTP request
    #[arg(long, value_name = "SECS", default_value_t = 30, env = "ZIPDIFF_HTTP_TIMEOUT")]
    pub http_timeout: u64,

    /// Attempts per HTTP range request before giving up
    #[arg(long, value_name = "N", default_value_t = 10, env = "ZIPDIFF_HTTP_RETRIES")]
    pub http_retries: u32,

    /// Quiet mode (no timing or transfer info on stderr)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn compare_options(&self) -> CompareOptions {
        let policy = self
            .text_extensions
            .iter()
            .fold(TextPolicy::default(), |policy, ext| policy.with_extension(ext));

        CompareOptions {
            context_radius: self.context,
            left_label: self.left_label.clone(),
            right_label: self.right_label.clone(),
            policy,
        }
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            timeout: Duration::from_secs(self.http_timeout),
            max_attempts: self.http_retries,
            ..HttpOptions::default()
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            show_unchanged: self.show_unchanged,
            show_patches: !self.no_patch,
        }
    }
}
