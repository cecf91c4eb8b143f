use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::domain::RateCategory;

/// Supplies the raw JSON records for one rate table at a time.
pub trait RateSource: Send + Sync {
    fn fetch(&self, category: RateCategory) -> Result<Value, RateLoadError>;
}

/// Failure to fetch, decode, or normalize a rate table.
#[derive(Debug, thiserror::Error)]
pub enum RateLoadError {
    #[error("rate table {} not found", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read rate table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {category} records: {source}")]
    Parse {
        category: RateCategory,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {category} range token '{token}'")]
    InvalidRangeToken {
        category: RateCategory,
        token: String,
    },
    /// Reported by [`RateSource`] implementations backed by remote or
    /// in-process stores when a table cannot be served at all.
    #[error("rate source unavailable: {0}")]
    Unavailable(String),
}

/// Reads each table from `<directory>/<category file name>`.
#[derive(Debug, Clone)]
pub struct FileRateSource {
    directory: PathBuf,
}

impl FileRateSource {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, category: RateCategory) -> PathBuf {
        self.directory.join(category.file_name())
    }
}

impl RateSource for FileRateSource {
    fn fetch(&self, category: RateCategory) -> Result<Value, RateLoadError> {
        let path = self.path_for(category);
        let file = std::fs::File::open(&path).map_err(|source| io_error(&path, source))?;
        read_table(file, category).map_err(|err| match err {
            RateLoadError::Io { source, .. } => io_error(&path, source),
            other => other,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> RateLoadError {
    if source.kind() == ErrorKind::NotFound {
        RateLoadError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        RateLoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Decodes a JSON document from `reader` for the given category.
pub fn read_table<R: Read>(reader: R, category: RateCategory) -> Result<Value, RateLoadError> {
    serde_json::from_reader(reader).map_err(|source| {
        if source.is_io() {
            RateLoadError::Io {
                path: PathBuf::from(category.file_name()),
                source: source.into(),
            }
        } else {
            RateLoadError::Parse { category, source }
        }
    })
}
