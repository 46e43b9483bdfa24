use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "mirrordev: archive mirror CLI", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub archive: ArchiveArgs,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BackendArg {
    /// Archive storage is mounted locally
    Direct,
    /// Local storage is a cache filled on demand
    Mirror,
}

#[derive(Args)]
pub struct ArchiveArgs {
    /// JSON archive config; flags below override its fields
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Local root directory of the mirror
    #[arg(long, global = true)]
    pub rootdir: Option<PathBuf>,

    /// Server path corresponding to the mirror root
    #[arg(long = "archive-root", global = true)]
    pub archive_root: Option<String>,

    /// Retrieval strategy (default: mirror)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// Copy the mirrored tree before filling missing files
    #[arg(long = "legacy-copy-order", global = true)]
    pub legacy_copy_order: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate an archive path into its local mirror path
    Path { archive_path: String },

    /// Show which files of a resource are present locally
    Status {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        resource: String,
    },

    /// Make one file of a resource available locally and print its path
    GetFile {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        resource: String,
        /// server path of the file
        #[arg(long)]
        file: String,
    },

    /// Retrieve a whole resource as files or as a zip
    GetResource {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        resource: String,
        /// produce a zip instead of files
        #[arg(long)]
        zip: bool,
        /// destination directory (copy target, or where the zip goes)
        #[arg(long)]
        dest: Option<PathBuf>,
    },
}
