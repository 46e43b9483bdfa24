pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use mirror_core::error::Result;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cfg = handlers::config_from_args(cli.archive)?;

    match cli.command {
        Commands::Path { archive_path } => handlers::handle_path(&cfg, archive_path),
        Commands::Status { catalog, resource } => handlers::handle_status(&cfg, catalog, resource),
        Commands::GetFile {
            catalog,
            resource,
            file,
        } => handlers::handle_get_file(&cfg, catalog, resource, file),
        Commands::GetResource {
            catalog,
            resource,
            zip,
            dest,
        } => handlers::handle_get_resource(&cfg, catalog, resource, zip, dest),
    }
}
