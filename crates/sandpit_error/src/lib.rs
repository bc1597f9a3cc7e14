mod diagnostic;

pub use crate::diagnostic::Diagnostic;

use std::ops::{Deref, DerefMut};

/// Aggregate of every error produced by a single pipeline invocation.
///
/// Callers that only care about success check `is_empty()` on the rendered
/// message list; callers that surface diagnostics iterate in order.
#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  pub fn into_messages(self) -> Vec<String> {
    self.0.into_iter().map(|error| error.to_string()).collect()
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<Diagnostic> for BuildError {
  fn from(diagnostic: Diagnostic) -> Self {
    Self(vec![anyhow::anyhow!("{diagnostic}")])
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;
