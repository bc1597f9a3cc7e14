use arcstr::ArcStr;
use sandpit_common::{FileContent, FileSet};

use crate::FileStore;

/// In-memory store backing a single project.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
  files: FileSet,
}

impl MemoryFileStore {
  pub fn new(files: FileSet) -> Self {
    Self { files }
  }

  pub fn files(&self) -> &FileSet {
    &self.files
  }
}

impl FileStore for MemoryFileStore {
  fn read(&self, path: &str) -> Option<FileContent> {
    self.files.get(path).cloned()
  }

  fn write(&mut self, path: &str, content: FileContent) {
    self.files.insert(path, content);
  }

  fn list(&self) -> Vec<ArcStr> {
    self.files.paths().cloned().collect()
  }

  fn delete(&mut self, path: &str) -> bool {
    self.files.remove(path).is_some()
  }

  fn snapshot(&self) -> FileSet {
    self.files.clone()
  }
}
