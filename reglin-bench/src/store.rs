//! Reading and writing result documents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HarnessError, Result};
use crate::record::ResultDocument;

/// A directory of result documents.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write `doc` to `file_name`.
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the target, so readers and concurrent writers never see
    /// a partial file.
    pub fn write(&self, file_name: &str, doc: &ResultDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| HarnessError::io(&self.dir, e))?;
        let target = self.path(file_name);
        let tmp = self
            .dir
            .join(format!(".{file_name}.{}.tmp", std::process::id()));

        let bytes = serde_json::to_vec_pretty(doc)?;
        let written = fs::File::create(&tmp)
            .and_then(|mut f| {
                f.write_all(&bytes)?;
                f.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, &target));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(HarnessError::io(&target, e));
        }
        debug!(path = %target.display(), records = doc.benchmarks.len(), "wrote result document");
        Ok(target)
    }

    pub fn read(&self, file_name: &str) -> Result<ResultDocument> {
        read_document(&self.path(file_name))
    }

    /// Like [`read`](Self::read), but a missing file is `Ok(None)`.
    pub fn read_optional(&self, file_name: &str) -> Result<Option<ResultDocument>> {
        let path = self.path(file_name);
        if !path.exists() {
            return Ok(None);
        }
        read_document(&path).map(Some)
    }

    /// Names of the `.json` files in the store starting with `prefix`,
    /// sorted.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HarnessError::io(&self.dir, e)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HarnessError::io(&self.dir, e))?;
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) && name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Read a result document from `path`.
pub fn read_document(path: &Path) -> Result<ResultDocument> {
    let text = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use crate::record::{BenchmarkSample, DocumentContext};

    fn doc(real_time: f64) -> ResultDocument {
        let mut doc = ResultDocument::new(DocumentContext::default());
        doc.push(BenchmarkSample {
            name: "Serial_F64_NoPivot/4".to_string(),
            config: None,
            iterations: 3,
            real_time,
            cpu_time: real_time,
            time_unit: TimeUnit::Nanoseconds,
        });
        doc
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("nested"));
        let path = store.write("LU.json", &doc(1.5)).unwrap();
        assert_eq!(path, store.path("LU.json"));
        assert_eq!(store.read("LU.json").unwrap(), doc(1.5));

        // overwrite replaces the whole document
        store.write("LU.json", &doc(2.5)).unwrap();
        assert_eq!(store.read("LU.json").unwrap(), doc(2.5));

        assert_eq!(store.list("").unwrap(), vec!["LU.json".to_string()]);
        assert!(store.read_optional("QR.json").unwrap().is_none());
        assert!(matches!(store.read("QR.json"), Err(HarnessError::Io { .. })));
    }

    #[test]
    fn test_list_filters() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        assert!(store.list("transpose_").unwrap().is_empty());
        store.write("transpose_1x1_m128_in_0_out_0.json", &doc(1.0)).unwrap();
        store.write("Gauss.json", &doc(1.0)).unwrap();
        fs::write(store.path("transpose_notes.txt"), "x").unwrap();
        assert_eq!(
            store.list("transpose_").unwrap(),
            vec!["transpose_1x1_m128_in_0_out_0.json".to_string()]
        );
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        fs::write(store.path("Gauss.json"), "{not json").unwrap();
        assert!(matches!(store.read("Gauss.json"), Err(HarnessError::Json(_))));
    }
}
