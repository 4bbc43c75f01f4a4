//! Per-request scratch directory holding the image the tool works on.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

/// Name of the source file inside the workspace.
const SOURCE_FILE: &str = "image";

/// A uniquely named scratch directory with the source image written into it.
///
/// The directory and everything the tool wrote into it are removed when the
/// workspace is dropped.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    source: PathBuf,
}

impl Workspace {
    /// Create a scratch directory under `base` (or the system temp dir) and
    /// write `data` to its source file, readable by the owner only.
    pub async fn create(base: Option<&Path>, prefix: &str, data: &[u8]) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match base {
            Some(base) => builder.tempdir_in(base)?,
            None => builder.tempdir()?,
        };
        let source = dir.path().join(SOURCE_FILE);

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&source).await?;
        file.write_all(data).await?;
        file.flush().await?;

        tracing::trace!("Workspace created: {:?}", dir.path());
        Ok(Self { dir, source })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the source file handed to the tool.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path the tool writes its result to.
    ///
    /// `mogrify -format FMT` leaves the input alone and writes `<file>.FMT`;
    /// without `-format` the input is rewritten in place.
    pub fn output(&self, format: Option<&str>) -> PathBuf {
        match format {
            Some(format) => {
                let mut name = self.source.clone().into_os_string();
                name.push(".");
                name.push(format);
                PathBuf::from(name)
            }
            None => self.source.clone(),
        }
    }
}
