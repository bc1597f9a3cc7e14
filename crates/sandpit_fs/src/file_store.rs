use arcstr::ArcStr;
use sandpit_common::{FileContent, FileSet};

/// The project file-set provider, as an injected capability.
///
/// The pipeline only ever reads a `snapshot` per pass; `write` exists for the
/// one sanctioned mutation (synthesized default manifest/config files), which
/// callers must surface as a visible, logged change rather than a silent one.
pub trait FileStore: Send + Sync {
  fn read(&self, path: &str) -> Option<FileContent>;

  fn write(&mut self, path: &str, content: FileContent);

  fn list(&self) -> Vec<ArcStr>;

  fn delete(&mut self, path: &str) -> bool;

  /// Immutable copy of the current file set for one pipeline pass.
  fn snapshot(&self) -> FileSet;
}
