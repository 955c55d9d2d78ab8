mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use xncf_core::kernel::constants;
use xncf_core::{Application, InstallerConfig, MemoryStore, MenuStore, ModuleRegistry};

/// Xncf: install and update extension modules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Module manifest listing every known module (.json, .yaml or .toml)
    #[arg(long, default_value = "modules.json")]
    manifest: PathBuf,

    /// State file holding installed modules, menus and permissions
    #[arg(long, default_value = "xncf-state.json")]
    state: PathBuf,

    /// Installer configuration; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install or update a module and the modules it depends on
    Install {
        /// Uid of the module to install
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        uid: Option<String>,
        /// Install or update every module in the manifest
        #[arg(long)]
        all: bool,
    },
    /// List installed modules, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 20)]
        page_size: usize,
    },
    /// Show the menu tree
    Menus,
    /// Link a menu to a module whose menu synchronization failed
    RepairMenu {
        /// Uid of the module to repair
        uid: String,
    },
}

fn init_logging() {
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to bridge log records to tracing: {}", e);
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }
}

async fn load_config(path: Option<&Path>) -> xncf_core::Result<InstallerConfig> {
    match path {
        Some(path) => InstallerConfig::load_or_default(path).await,
        None => Ok(InstallerConfig::default()),
    }
}

async fn run_command(app: &Application, command: Commands) -> xncf_core::Result<()> {
    match command {
        Commands::Install { all: true, .. } => {
            println!("Installing all modules...");
            let result = app.installer().install_all().await?;
            print!("{}", cli::render_installation(&result));
        }
        Commands::Install { uid, .. } => {
            let uid = uid.unwrap_or_default();
            println!("Installing module '{}'...", uid);
            let result = app.installer().install_module(&uid).await?;
            print!("{}", cli::render_installation(&result));
        }
        Commands::List { page, page_size } => {
            let records = app.installer().list_modules(page, page_size).await?;
            print!("{}", cli::render_records(&records));
        }
        Commands::Menus => {
            let menus = app.store().list_menus().await?;
            print!("{}", cli::render_menu_tree(&menus));
        }
        Commands::RepairMenu { uid } => match app.installer().repair_menu(&uid).await? {
            Some(menu) => println!("Module '{}' is linked to menu '{}' ({})", uid, menu.name, menu.id),
            None => println!("Module '{}' is a bootstrap module and has no menu", uid),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging();
    tracing::debug!(?args, "parsed command line");
    info!("{} v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = match load_config(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load installer config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let registry = match ModuleRegistry::load_from_path(&args.manifest).await {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to load module manifest: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut app = Application::new(config, registry, MemoryStore::with_snapshot_path(&args.state));
    if let Err(e) = app.initialize().await {
        eprintln!("Failed to initialize application: {}", e);
        return ExitCode::FAILURE;
    }
    info!("{} module(s) registered from {}", app.registry().len(), args.manifest.display());

    // Writes made before a failure stay; there is no rollback
    let outcome = run_command(&app, args.command).await;

    if let Err(e) = app.shutdown().await {
        error!("Shutdown failed: {}", e);
        eprintln!("Failed to save state: {}", e);
        return ExitCode::FAILURE;
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
