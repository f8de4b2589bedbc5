use crate::domain::ports::SnapshotSource;
use crate::utils::error::{InspectorError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    path: PathBuf,
}

impl LocalSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 快照不存在時回傳 SnapshotMissing，其他 I/O 問題留給讀取時處理
    pub fn ensure_present(&self) -> Result<()> {
        match fs::metadata(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => Err(self.missing()),
            _ => Ok(()),
        }
    }

    fn missing(&self) -> InspectorError {
        InspectorError::SnapshotMissing {
            path: self.path.display().to_string(),
        }
    }
}

impl SnapshotSource for LocalSnapshotStore {
    fn read_snapshot(&self) -> Result<String> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(self.missing()),
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(data)
            .map_err(|e| std::io::Error::new(ErrorKind::InvalidData, e).into())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
