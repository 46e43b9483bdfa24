use std::path::PathBuf;

use mirror_core::error::Result;
use mirror_core::list::status;
use mirror_core::{
    ArchiveConfig, Backend, Catalog, CopyOrder, MirrorStrategy, Retrieved, open_archive,
};
use tracing::debug;

use crate::presentation::cli::{ArchiveArgs, BackendArg};

pub fn config_from_args(args: ArchiveArgs) -> Result<ArchiveConfig> {
    let mut cfg = match &args.config {
        Some(p) => ArchiveConfig::load(p)?,
        None => ArchiveConfig::default(),
    };
    if let Some(root) = args.rootdir {
        cfg.rootdir = root;
    }
    if args.archive_root.is_some() {
        cfg.archive_root = args.archive_root;
    }
    if let Some(b) = args.backend {
        cfg.backend = match b {
            BackendArg::Direct => Backend::Direct,
            BackendArg::Mirror => Backend::Mirror,
        };
    }
    if args.legacy_copy_order {
        cfg.copy_order = CopyOrder::Legacy;
    }
    debug!(?cfg, "archive config");
    Ok(cfg)
}

fn summarize(archive: &dyn MirrorStrategy) {
    let s = archive.stats();
    debug!(
        fetched = s.files_fetched,
        present = s.files_present,
        bulk = s.bulk_fetches,
        zips = s.zips_built,
        copied = s.files_copied,
        "done"
    );
}

pub fn handle_path(cfg: &ArchiveConfig, archive_path: String) -> Result<()> {
    let p = cfg.translator().local_path(&archive_path)?;
    println!("{}", p.display());
    Ok(())
}

pub fn handle_status(cfg: &ArchiveConfig, catalog: PathBuf, resource: String) -> Result<()> {
    let cat = Catalog::load(&catalog, cfg.translator())?;
    let res = cat.resource(&resource)?;
    let (state, rows) = status(&cfg.translator(), &res)?;
    println!("{resource}  {state:?}");
    for r in rows {
        let mark = if r.present { "present" } else { "missing" };
        println!("{mark:<8} {}  {}", r.server_path, r.local_path.display());
    }
    Ok(())
}

pub fn handle_get_file(
    cfg: &ArchiveConfig,
    catalog: PathBuf,
    resource: String,
    file: String,
) -> Result<()> {
    let cat = Catalog::load(&catalog, cfg.translator())?;
    let res = cat.resource(&resource)?;
    let f = res.file(&file)?;
    let archive = open_archive(cfg);
    let p = archive.get_file(&f)?;
    println!("{}", p.display());
    summarize(archive.as_ref());
    Ok(())
}

pub fn handle_get_resource(
    cfg: &ArchiveConfig,
    catalog: PathBuf,
    resource: String,
    zip: bool,
    dest: Option<PathBuf>,
) -> Result<()> {
    let cat = Catalog::load(&catalog, cfg.translator())?;
    let res = cat.resource(&resource)?;
    let archive = open_archive(cfg);
    match archive.get_resource(&res, !zip, dest.as_deref())? {
        Retrieved::Files(paths) => {
            for p in paths {
                println!("{}", p.display());
            }
        }
        Retrieved::Zip(p) => println!("{}", p.display()),
    }
    summarize(archive.as_ref());
    Ok(())
}
