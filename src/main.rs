//! Binary entrypoint for the Rede CLI.
//!
//! Commands:
//! - `shell` (default) - run the interactive shell against the configured snapshot
//! - `init` - create a starter `config.toml`
//! - `status` - print snapshot location and entity counts
//! - `export` - dump the whole graph as pretty JSON on stdout
//! - `reset --yes` - wipe all state and remove the snapshot
//!
//! See the library crate docs for module-level details: `rede::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

// Use the published library crate modules instead of redefining them here.
use rede::config::Config;
use rede::facade::Facade;
use rede::shell::Shell;
use rede::storage::SnapshotStore;

#[derive(Parser)]
#[command(name = "rede")]
#[command(about = "An in-memory social network simulator with snapshot persistence")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive shell (the default when no subcommand is given)
    Shell,
    /// Initialize a new configuration file
    Init,
    /// Show snapshot location and entity counts
    Status,
    /// Print the whole graph as pretty JSON
    Export,
    /// Remove every user, session, community, and the snapshot file
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Shell);

    // Load config early to configure logging (except for Init which writes it later)
    let pre_config = match command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match command {
        Commands::Shell => {
            let config = Config::resolve(pre_config, &cli.config).await?;
            info!("Starting Rede v{}", env!("CARGO_PKG_VERSION"));
            let facade = Facade::open(&config).await?;
            let mut shell = Shell::new(facade);
            shell.run().await?;
        }
        Commands::Init => {
            info!("Initializing new Rede configuration");
            if std::path::Path::new(&cli.config).exists() {
                eprintln!("Refusing to overwrite existing {}", cli.config);
                std::process::exit(1);
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            println!("Created {}", cli.config);
        }
        Commands::Status => {
            let config = Config::resolve(pre_config, &cli.config).await?;
            let store = SnapshotStore::new(&config.storage.data_file);
            let graph = store.load().await?;
            println!("Rede status");
            match store.file_size() {
                Some(bytes) => println!("  snapshot: {} ({} bytes)", store.path().display(), bytes),
                None => println!("  snapshot: {} (not yet written)", store.path().display()),
            }
            println!("  users: {}", graph.user_count());
            println!("  communities: {}", graph.community_count());
            println!("  sessions: {}", graph.session_count());
        }
        Commands::Export => {
            let config = Config::resolve(pre_config, &cli.config).await?;
            let store = SnapshotStore::new(&config.storage.data_file);
            let graph = store.load().await?;
            println!("{}", serde_json::to_string_pretty(&graph)?);
        }
        Commands::Reset { yes } => {
            if !yes {
                eprintln!("Refusing to reset without --yes");
                std::process::exit(1);
            }
            let config = Config::resolve(pre_config, &cli.config).await?;
            let mut facade = Facade::open(&config).await?;
            facade.reset().await?;
            println!("All state wiped.");
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|cfg| cfg.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(cfg) = config {
        if let Some(ref file) = cfg.logging.file {
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
            {
                let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
                let write_mutex = mutex.clone();

                // Check if stdout is a terminal (TTY) - if so, write to both file and console
                let is_tty = atty::is(atty::Stream::Stdout);

                builder.format(move |fmt, record| {
                    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                    let line = format!("{} [{}] {}", ts, record.level(), record.args());

                    // Always write to log file
                    if let Ok(mut guard) = write_mutex.lock() {
                        let _ = writeln!(guard, "{}", line);
                    }

                    // If stdout is a TTY (foreground mode), also write to console
                    if is_tty {
                        writeln!(fmt, "{}", line)
                    } else {
                        Ok(())
                    }
                });
            } else {
                builder.format(|fmt, record| {
                    writeln!(
                        fmt,
                        "{} [{}] {}",
                        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                        record.level(),
                        record.args()
                    )
                });
            }
        } else {
            builder.format(|fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
