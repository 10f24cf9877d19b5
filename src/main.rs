use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use modeldiff::commands::{self, DiffOutcome};
use modeldiff::config;
use modeldiff::constants::CONFIG_FILENAME;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for modeldiff diff
#[derive(Parser, Debug)]
struct DiffArgs {
    /// Model file or directory describing the current state
    #[arg(long)]
    from: PathBuf,

    /// Model file or directory describing the desired state
    #[arg(long)]
    to: PathBuf,

    /// Exit with status 1 when the models differ
    #[arg(long)]
    exit_code: bool,

    #[command(flatten)]
    model_args: ModelArgs,
}

/// Arguments for modeldiff create / drop
#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Model file or directory (defaults to the configured models directory)
    #[arg(long)]
    model: Option<PathBuf>,

    #[command(flatten)]
    model_args: ModelArgs,
}

/// Options shared by every command that loads models
#[derive(Parser, Debug, Clone)]
struct ModelArgs {
    #[command(flatten)]
    output_args: config::OutputArgs,

    #[command(flatten)]
    object_filter_args: config::ObjectFilterArgs,

    #[command(flatten)]
    migration_args: config::MigrationArgs,
}

impl ModelArgs {
    fn config_input(&self) -> config::ConfigInput {
        config::ConfigInput {
            objects: Some(self.object_filter_args.clone().into()),
            migration: Some(self.migration_args.clone().into()),
            ..config::ConfigInput::from(self.output_args.clone())
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the operations that turn one model into another
    Diff(DiffArgs),

    /// Print the script that creates a model from an empty database
    Create(ScriptArgs),

    /// Print the script that removes everything a model describes
    Drop(ScriptArgs),

    /// Migration commands
    Migrate {
        #[command(subcommand)]
        command: MigrateCommands,
    },

    /// Print the resolved configuration
    Config,
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Scaffold a migration from the snapshot to the current model
    New {
        /// Name of the migration
        name: String,

        /// Model file or directory (defaults to the configured models directory)
        #[arg(long)]
        model: Option<PathBuf>,

        #[command(flatten)]
        directory_args: config::DirectoryArgs,

        #[command(flatten)]
        object_filter_args: config::ObjectFilterArgs,

        #[command(flatten)]
        migration_args: config::MigrationArgs,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);
    run_main(cli)
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;

    let resolve = |cli_config: config::ConfigInput| {
        config::ConfigBuilder::new()
            .with_file(file_config.clone())
            .with_cli_args(cli_config)
            .resolve()
    };

    match &cli.command {
        Commands::Diff(args) => {
            let config = resolve(args.model_args.config_input())?;

            info!("Diffing {} against {}", args.from.display(), args.to.display());
            let outcome = commands::cmd_diff(&config, &args.from, &args.to)?;
            if args.exit_code && outcome == DiffOutcome::Changes {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Create(args) => {
            let config = resolve(args.model_args.config_input())?;
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| config.directories.models_path(&root_dir));

            info!("Generating create script for {}", model.display());
            commands::cmd_create(&config, &model)
        }
        Commands::Drop(args) => {
            let config = resolve(args.model_args.config_input())?;
            let model = args
                .model
                .clone()
                .unwrap_or_else(|| config.directories.models_path(&root_dir));

            info!("Generating drop script for {}", model.display());
            commands::cmd_drop(&config, &model)
        }
        Commands::Migrate { command } => match command {
            MigrateCommands::New {
                name,
                model,
                directory_args,
                object_filter_args,
                migration_args,
            } => {
                let config = resolve(config::ConfigInput {
                    directories: Some(directory_args.clone().into()),
                    objects: Some(object_filter_args.clone().into()),
                    migration: Some(migration_args.clone().into()),
                    ..Default::default()
                })?;

                info!("Scaffolding migration {}", name);
                commands::cmd_migrate_new(&config, &root_dir, name, model.as_deref())
            }
        },
        Commands::Config => {
            let config = resolve(config::ConfigInput::default())?;
            commands::cmd_config(&config)
        }
    }
}
