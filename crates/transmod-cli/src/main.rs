#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use commands::Overrides;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "transmod")]
#[command(author, version, about = "Locate and inspect node_modules packages transpiled as first-party source", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Config file (default: transmod.config.json or package.json "transpileModules")
    #[arg(long, global = true, value_name = "FILE", env = "TRANSMOD_CONFIG")]
    config: Option<PathBuf>,

    /// Module to transpile, in addition to the configured ones (repeatable)
    #[arg(short, long = "module", global = true, value_name = "NAME")]
    modules: Vec<String>,

    /// Let the host resolve symlinks to their real path
    #[arg(long, global = true)]
    resolve_symlinks: bool,

    /// Use the webpack 5 rule schema
    #[arg(long, global = true)]
    webpack5: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve modules to the directories that get transpiled
    Resolve {
        /// Modules to resolve (default: the configured modules)
        modules: Vec<String>,
    },

    /// Check whether paths fall inside the transpiled directories
    Check {
        /// Paths to check
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Decide whether an import is bundled or left to the externals hook
    Import {
        /// The import request as written (e.g. "@org/ui", "./button")
        request: String,

        /// Directory of the importing module (default: working directory)
        #[arg(long, value_name = "DIR")]
        context: Option<PathBuf>,
    },

    /// Print the watcher globs that re-include the transpiled directories
    Globs,

    /// Patch a JSON snapshot of a host configuration
    Patch {
        /// JSON file: {"config": {...}, "defaultLoaders": {...}}
        file: PathBuf,

        /// Treat the file as a dev-middleware config instead
        #[arg(long)]
        dev_middleware: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Absolute, like the directory set
    let current = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let cwd = match cli.cwd {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => current.join(dir),
        None => current,
    };

    let overrides = Overrides {
        config: cli.config,
        modules: cli.modules,
        resolve_symlinks: cli.resolve_symlinks,
        webpack5: cli.webpack5,
    };

    let Some(command) = cli.command else {
        return commands::version::run();
    };
    if matches!(command, Commands::Version) {
        return commands::version::run();
    }

    logging::init(cli.verbose, cli.json);

    let span = tracing::info_span!("transmod", cwd = %cwd.display());
    let _guard = span.enter();

    match command {
        Commands::Version => unreachable!(), // Handled above
        Commands::Resolve { modules } => commands::resolve::run(&cwd, &overrides, &modules, cli.json),
        Commands::Check { paths } => commands::check::run(&cwd, &overrides, &paths, cli.json),
        Commands::Import { request, context } => {
            let context = context.map_or_else(
                || cwd.clone(),
                |dir| if dir.is_absolute() { dir } else { cwd.join(dir) },
            );
            commands::import::run(&cwd, &overrides, &request, &context, cli.json)
        }
        Commands::Globs => commands::globs::run(&cwd, &overrides, cli.json),
        Commands::Patch {
            file,
            dev_middleware,
        } => {
            let file = if file.is_absolute() { file } else { cwd.join(file) };
            commands::patch::run(&cwd, &overrides, &file, dev_middleware, cli.json)
        }
    }
}
