//! Output sinks for the generated ClusterServiceVersion

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::descriptor::ClusterServiceVersion;
use crate::{Error, Result};

/// Where the generated document goes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputSink {
    /// Standard output
    #[default]
    Stdout,
    /// A file, created if absent and truncated if present
    File(PathBuf),
}

impl OutputSink {
    /// Serialize `csv` and write it to the sink
    pub fn write(&self, csv: &ClusterServiceVersion) -> Result<()> {
        let yaml = csv.to_yaml()?;
        debug!(sink = %self, "Writing generated ClusterServiceVersion");
        match self {
            OutputSink::Stdout => write_to(std::io::stdout().lock(), yaml.as_bytes(), self.path()),
            OutputSink::File(path) => {
                let file = File::create(path).map_err(|e| Error::io(path, e))?;
                write_to(file, yaml.as_bytes(), path)
            }
        }
    }

    fn path(&self) -> &Path {
        match self {
            OutputSink::Stdout => Path::new("<stdout>"),
            OutputSink::File(path) => path,
        }
    }
}

impl From<Option<PathBuf>> for OutputSink {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(OutputSink::Stdout, OutputSink::File)
    }
}

impl fmt::Display for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}

/// Write a serialized document and flush it
pub fn write_to<W: Write>(mut writer: W, bytes: &[u8], sink: &Path) -> Result<()> {
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(sink, e))
}
