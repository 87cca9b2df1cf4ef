use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CODEDROP_LOG";

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "codedrop", bin_name = "codedrop", version = get_version())]
#[command(about = "Share files with four-digit codes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding uploads (overrides CODEDROP_HOME)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a file and print its share code
    Upload {
        /// File to upload, or "-" for stdin
        path: PathBuf,

        /// Name to record the upload under (defaults to the file's name,
        /// required with "-")
        #[arg(short, long, required_if_eq("path", "-"))]
        name: Option<String>,
    },

    /// Fetch the file behind a code
    #[command(alias = "get")]
    Download {
        code: String,

        /// Target file or directory (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the target if it already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show name and size of the file behind a code
    Info { code: String },

    /// List stored files, newest first
    #[command(alias = "ls")]
    List,

    /// Remove a file and release its code
    #[command(alias = "rm")]
    Delete { code: String },

    /// Report what startup reconciliation fixed
    Doctor,

    /// Get or set configuration values
    Config {
        /// Configuration key
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}

/// Install the stderr subscriber. `CODEDROP_LOG` takes precedence over the
/// `--verbose` default.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "codedrop=debug"
    } else {
        "codedrop=warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A second install (tests driving `run` twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
