//! CLI entry point for garden-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garden_rs::commands;
use garden_rs::Garden;

#[derive(Parser)]
#[command(name = "garden-rs")]
#[command(author = "Yukang Chen")]
#[command(version = "0.1.0")]
#[command(about = "A static site generator for interlinked markdown notes", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new garden
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new note
    New {
        /// Title of the new note
        title: String,

        /// Folder under the content directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List garden information
    List {
        /// What to list (notes, links, backlinks, dangling, orphans)
        #[arg(default_value = "notes")]
        r#type: String,
    },

    /// Print the graph around a note as JSON
    Graph {
        /// Logical path of the note, e.g. ideas/zettelkasten
        url: String,

        /// Keep duplicate nodes and edges
        #[arg(long)]
        raw: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = base_dir.join(folder);
            tracing::info!("Initializing garden in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized garden in {:?}", target_dir);
        }
        Commands::Version => {
            println!("garden-rs version {}", env!("CARGO_PKG_VERSION"));
        }
        command => run(Garden::new(&base_dir)?, command).await?,
    }

    Ok(())
}

/// Commands that operate on an existing garden
async fn run(garden: Garden, command: Commands) -> Result<()> {
    match command {
        Commands::New { title, path } => {
            let file_path = commands::new::create_note(&garden, &title, path.as_deref())?;
            println!("Created: {:?}", file_path);
        }
        Commands::Generate { watch } => {
            garden.generate()?;
            println!("Generated successfully!");
            if watch {
                commands::generate::watch(&garden).await?;
            }
        }
        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let snapshot = garden.generate()?;
            garden_rs::server::start(&garden, snapshot, &ip, port, !r#static, open).await?;
        }
        Commands::Clean => {
            garden.clean()?;
            println!("Cleaned successfully!");
        }
        Commands::List { r#type } => commands::list::run(&garden, &r#type)?,
        Commands::Graph { url, raw } => commands::graph::run(&garden, &url, raw)?,
        // Handled in main, no garden needed
        Commands::Init { .. } | Commands::Version => {}
    }

    Ok(())
}

/// `RUST_LOG` wins over `--debug`
fn init_logging(debug: bool) {
    let default_filter = if debug {
        "garden_rs=debug,info"
    } else {
        "garden_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
