use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::defs::Aggregate;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(arg: Option<&str>) -> OutputTarget {
        match arg {
            None | Some("-") => OutputTarget::Stdout,
            Some(path) => OutputTarget::File(PathBuf::from(path)),
        }
    }

    // callers hand over the complete document, so a failed run never
    // leaves half a file (or half a stdout stream) behind
    pub fn write_all(&self, contents: &[u8]) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(contents)?;
                handle.flush()?;
            }
            OutputTarget::File(path) => {
                let dir = match path.parent() {
                    Some(p) if !p.as_os_str().is_empty() => p,
                    _ => Path::new("."),
                };
                let mut fd = NamedTempFile::new_in(dir)?;
                fd.write_all(contents)?;
                fd.flush()?;
                fd.persist(path).map_err(|e| e.error)?;
                info!("wrote {}", path.display());
            }
        }
        Ok(())
    }
}

pub fn aggregate_json(aggregate: &Aggregate, pretty: bool) -> Result<Vec<u8>> {
    let buf = if pretty {
        serde_json::to_vec_pretty(aggregate)?
    } else {
        serde_json::to_vec(aggregate)?
    };
    Ok(buf)
}
