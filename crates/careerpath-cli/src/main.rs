//! careerpath CLI — student and admin commands against the careerpath backend.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use careerpath_client::{load_config_from, HttpApi};
use careerpath_core::model::Role;

mod commands;

#[derive(Parser)]
#[command(name = "careerpath", version, about = "Career guidance client for students and admins")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Student views and actions
    #[command(subcommand)]
    Student(StudentCommand),

    /// Admin views and actions
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Create starter config and sample draft files
    Init,
}

#[derive(Subcommand)]
pub enum StudentCommand {
    /// Dashboard: latest request, active test, recommendation and timeline
    Overview,

    /// List your test requests
    Requests,

    /// Request a personalized test
    Request {
        /// Interests to snapshot into the request
        #[arg(long, default_value = "")]
        interests: String,

        /// Qualification to snapshot into the request
        #[arg(long, default_value = "")]
        qualification: String,
    },

    /// List tests assigned to you
    Tests,

    /// Show an assigned test
    Test {
        #[arg(long)]
        id: u64,
    },

    /// Answer one question of a test
    Answer {
        #[arg(long)]
        test: u64,

        #[arg(long)]
        question: u64,

        #[arg(long)]
        option: u64,
    },

    /// Finalize a test
    Submit {
        #[arg(long)]
        test: u64,
    },

    /// List your recommendations
    Recommendations,

    /// Download a recommendation as PDF
    Export {
        #[arg(long)]
        id: u64,

        /// Output file (default: <export_dir>/recommendation-<id>.pdf)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a recommendation's roadmap as a standalone HTML page
    Roadmap {
        #[arg(long)]
        id: u64,

        #[arg(long, default_value = "roadmap.html")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List test requests for triage
    Requests {
        /// Filter by status (pending, in_progress, assigned, completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Create a personalized test for a pending request
    CreateTest {
        #[arg(long)]
        request: u64,
    },

    /// Show a test under construction
    Test {
        /// Test id
        #[arg(long, conflicts_with = "request", required_unless_present = "request")]
        id: Option<u64>,

        /// Request id whose test to show
        #[arg(long)]
        request: Option<u64>,
    },

    /// Append a question from a TOML draft file
    AddQuestion {
        #[arg(long)]
        test: u64,

        #[arg(long)]
        file: PathBuf,
    },

    /// Lock a test and assign it to its student
    Assign {
        #[arg(long)]
        test: u64,
    },

    /// List completed tests awaiting review
    Completed,

    /// Show a completed test's answers
    Answers {
        #[arg(long)]
        test: u64,
    },

    /// Publish a recommendation from a TOML draft file
    Recommend {
        #[arg(long)]
        test: u64,

        #[arg(long)]
        file: PathBuf,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    let role = match &cli.command {
        Commands::Init => return commands::init::execute(&mut stdout),
        Commands::Student(_) => Role::Student,
        Commands::Admin(_) => Role::Admin,
    };

    let config = load_config_from(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");
    let session = config.session();
    let user = session.require(role)?;
    let api = HttpApi::from_config(&config)?;

    match cli.command {
        Commands::Student(command) => {
            commands::student::execute(&api, command, user, &config.export_dir, &mut stdout).await
        }
        Commands::Admin(command) => commands::admin::execute(&api, command, &mut stdout).await,
        Commands::Init => Ok(()),
    }
}

const DEFAULT_LOG_FILTER: &str = "careerpath=info";

/// `RUST_LOG` when it is set and parses, otherwise `careerpath=info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    fn enabled(filter: EnvFilter, level: Level) -> bool {
        let subscriber = tracing_subscriber::registry().with(filter);
        tracing::subscriber::with_default(subscriber, || match level {
            Level::DEBUG => tracing::enabled!(target: "careerpath_client::http", Level::DEBUG),
            _ => tracing::enabled!(target: "careerpath_client::http", Level::INFO),
        })
    }

    #[test]
    fn default_filter_is_info() {
        assert!(enabled(log_filter(None), Level::INFO));
        assert!(!enabled(log_filter(None), Level::DEBUG));
        assert!(!enabled(log_filter(Some("  ")), Level::DEBUG));
    }

    #[test]
    fn rust_log_raises_level() {
        assert!(enabled(log_filter(Some("careerpath=debug")), Level::DEBUG));
    }

    #[test]
    fn rust_log_lowers_level() {
        assert!(!enabled(log_filter(Some("careerpath=warn")), Level::INFO));
    }

    #[test]
    fn unparsable_rust_log_falls_back() {
        assert!(enabled(log_filter(Some("careerpath=loudest")), Level::INFO));
        assert!(!enabled(log_filter(Some("careerpath=loudest")), Level::DEBUG));
    }
}
