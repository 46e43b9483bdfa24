use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use ureq::{Agent, AgentBuilder};
use url::Url;

use crate::error::{MirrorError, Result};
use crate::pack::writer::{ZipEntry, entry_name, prepare_dest_dir, write_zip};
use crate::util::uri::{join_local, relative, uri_last};

/// Where remote files come from: a server tree reachable as a directory, or an
/// HTTP(S) endpoint.
#[derive(Clone, Debug)]
pub enum Source {
    Dir(PathBuf),
    Http { base: String, agent: Agent },
}

fn new_agent() -> Agent {
    AgentBuilder::new()
        .user_agent(concat!("mirror-core/", env!("CARGO_PKG_VERSION")))
        .timeout_connect(Duration::from_secs(15))
        .timeout_read(Duration::from_secs(60))
        .timeout_write(Duration::from_secs(60))
        .build()
}

impl Source {
    /// `http(s)://` bases become HTTP sources; anything else is a directory,
    /// resolved against `base_dir` when relative.
    pub fn parse(spec: &str, base_dir: &Path) -> Result<Self> {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            let url = Url::parse(spec).map_err(|e| MirrorError::Config(format!("source {spec}: {e}")))?;
            return Ok(Source::Http {
                base: url.as_str().trim_end_matches('/').to_string(),
                agent: new_agent(),
            });
        }
        let p = Path::new(spec.strip_prefix("file://").unwrap_or(spec));
        Ok(Source::Dir(if p.is_absolute() {
            p.to_path_buf()
        } else {
            base_dir.join(p)
        }))
    }

    /// Download one file to `dest`, creating its parent directories.
    pub fn fetch_file(&self, server_path: &str, uri: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        match self {
            Source::Dir(root) => {
                let src = join_local(root, server_path);
                debug!(src = %src.display(), dest = %dest.display(), "source: copy");
                fs::copy(&src, dest)?;
                Ok(())
            }
            Source::Http { base, agent } => get_to(agent, &format!("{base}{uri}"), dest),
        }
    }

    /// Produce the server-side zip of a resource at `out`. Entries are named
    /// `<basename of server_root>/<path relative to server_root>`.
    pub fn fetch_resource_zip(
        &self,
        resource_uri: &str,
        server_root: &str,
        server_paths: &[&str],
        out: &Path,
    ) -> Result<()> {
        if let Some(parent) = out.parent() {
            prepare_dest_dir(parent)?;
        }
        match self {
            Source::Dir(root) => {
                let top = uri_last(server_root);
                let entries = server_paths
                    .iter()
                    .map(|p| {
                        let rel = relative(p, server_root).ok_or_else(|| MirrorError::OutsideRoot {
                            path: p.to_string(),
                            root: server_root.to_string(),
                        })?;
                        Ok(ZipEntry::new(join_local(root, p), entry_name(&[top, rel])))
                    })
                    .collect::<Result<Vec<_>>>()?;
                write_zip(out, &entries)?;
                Ok(())
            }
            Source::Http { base, agent } => {
                get_to(agent, &format!("{base}{resource_uri}/files?format=zip"), out)
            }
        }
    }
}

/// GET `url` into a temporary file next to `dest`, then rename it into place.
fn get_to(agent: &Agent, url: &str, dest: &Path) -> Result<()> {
    debug!(url, dest = %dest.display(), "source: GET");
    let resp = agent.get(url).call().map_err(Box::new)?;
    let dir = dest.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut resp.into_reader(), &mut tmp)?;
    tmp.as_file().sync_data()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
