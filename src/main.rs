//! motion-recorder - Session inspection tool
//!
//! Lists, inspects, exports, imports and analyses sessions saved by the
//! recorder.
//!
//! # Subcommands
//! - `list`                         - stored session ids
//! - `show <id>`                    - record metadata
//! - `export <id> [--out <file>]`   - write the plain-text sample layout
//! - `import <file> --id <id>`      - store a plain-text log under an id
//! - `analyze <id> [--json]`        - room visit summary
//! - `remove <id>`                  - delete a stored session
//! - `init-config`                  - write a default config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motion_recorder::{
    analysis::infer_path,
    config::{self, LoggingConfig, RecorderConfig},
    store::text,
    SessionId, SessionStore,
};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    name = "motion-recorder",
    version,
    about = "Inspect and analyse recorded motion sessions"
)]
struct Cli {
    /// Config file (defaults to the app data directory)
    #[arg(long, env = "MOTION_RECORDER_CONFIG")]
    config: Option<PathBuf>,

    /// Session directory, overriding the config file
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List stored session ids
    List,

    /// Show metadata of a stored session
    Show {
        #[arg(allow_negative_numbers = true)]
        id: SessionId,
    },

    /// Export a session as one `t,px,py,pz,qx,qy,qz,qw` line per sample
    Export {
        #[arg(allow_negative_numbers = true)]
        id: SessionId,

        /// Output file (defaults to `<id>.txt`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import a plain-text log and store it under an id
    Import {
        file: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        id: SessionId,
    },

    /// Summarise which rooms a session visited
    Analyze {
        #[arg(allow_negative_numbers = true)]
        id: SessionId,

        /// Use the spread-out portal layout
        #[arg(long)]
        portals: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a stored session
    Remove {
        #[arg(allow_negative_numbers = true)]
        id: SessionId,
    },

    /// Write a config file with default values
    InitConfig,
}

fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let (file_layer, guard) = match &logging.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "motion-recorder.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                ),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(config::config_path)
        .context("Could not determine config file location")?;

    let loaded = RecorderConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => RecorderConfig::default(),
    };
    let _guard = init_logging(&config.logging);
    if let Err(e) = loaded {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    if let Some(dir) = cli.store {
        config.storage.dir = Some(dir);
    }

    run(cli.command, &config, config_path)
}

fn run(command: Commands, config: &RecorderConfig, config_path: PathBuf) -> Result<()> {
    let open_store = || {
        config
            .storage
            .open_store()
            .context("Failed to open session store")
    };

    match command {
        Commands::List => {
            for id in open_store()?.list()? {
                println!("{}", id);
            }
        }
        Commands::Show { id } => {
            let record = open_store()?.load_record(id)?;
            let log = record.clone().into_log()?;
            println!("Session:     {}", record.id);
            println!("Recorded at: {}", record.recorded_at.to_rfc3339());
            println!("Samples:     {}", record.sample_count);
            println!("Duration:    {:.2}s", record.duration);
            println!("Path length: {:.2}m", log.path_length());
        }
        Commands::Export { id, out } => {
            let log = open_store()?.load(id)?;
            let out =
                out.unwrap_or_else(|| PathBuf::from(format!("{}.{}", id, text::TEXT_EXTENSION)));
            text::write_file(&out, &log)?;
            println!("Exported {} samples to {}", log.len(), out.display());
        }
        Commands::Import { file, id } => {
            let log = text::read_file(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            open_store()?.save(id, &log)?;
            println!("Stored {} samples under ID: {}", log.len(), id);
        }
        Commands::Analyze { id, portals, json } => {
            let log = open_store()?.load(id)?;
            let summary = infer_path(
                &log,
                &config.analysis.layout(),
                portals || config.analysis.portals,
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Total time: {:.2}s", summary.total_time);
                for visit in &summary.visited {
                    println!(
                        "{:>2}. {:<16} entries: {:<3} time: {:.1}s",
                        visit.order + 1,
                        visit.name,
                        visit.entries(),
                        visit.dwell_time
                    );
                }
                if !summary.unvisited.is_empty() {
                    println!("Unvisited: {}", summary.unvisited.join(", "));
                }
            }
        }
        Commands::Remove { id } => {
            open_store()?.remove(id)?;
            println!("Removed session {}", id);
        }
        Commands::InitConfig => {
            config
                .save(&config_path)
                .with_context(|| format!("Failed to write {:?}", config_path))?;
            println!("Wrote {}", config_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serial_test::serial;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    #[serial]
    fn test_parse_negative_id() {
        std::env::remove_var("MOTION_RECORDER_CONFIG");
        let cli = Cli::try_parse_from(["motion-recorder", "show", "-2"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { id } if id == SessionId::new(-2)));
        assert!(cli.config.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("MOTION_RECORDER_CONFIG", "/tmp/recorder.toml");
        let cli = Cli::try_parse_from(["motion-recorder", "list"]).unwrap();
        std::env::remove_var("MOTION_RECORDER_CONFIG");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/recorder.toml")));
    }

    #[test]
    fn test_import_then_export() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = RecorderConfig::default();
        config.storage.dir = Some(tmp.path().join("sessions"));
        let config_path = tmp.path().join("config.toml");

        let input = tmp.path().join("in.txt");
        std::fs::write(&input, "0.5,0,1.7,0,0,0,0,1\n1,0,1.7,6,0,0,0,1").unwrap();
        run(
            Commands::Import {
                file: input,
                id: SessionId::new(4),
            },
            &config,
            config_path.clone(),
        )
        .unwrap();

        let out = tmp.path().join("out.txt");
        run(
            Commands::Export {
                id: SessionId::new(4),
                out: Some(out.clone()),
            },
            &config,
            config_path,
        )
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "0.5,0,1.7,0,0,0,0,1\n1,0,1.7,6,0,0,0,1"
        );
    }
}
