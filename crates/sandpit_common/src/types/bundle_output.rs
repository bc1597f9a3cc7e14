use arcstr::ArcStr;

use crate::SynthesizedLockfile;

/// Result of one bundle invocation, owned by the orchestrator and never
/// mutated after construction.
///
/// Callers never see a thrown error: structural failures are normalized into
/// `errors` with the same shape as ordinary diagnostics. An empty `errors`
/// list implies success.
#[derive(Debug, Default)]
pub struct BundleOutput {
  /// Generated script artifact. May be empty.
  pub code: String,
  /// Ordered, non-fatal findings (missing internal modules, ignored inputs).
  pub warnings: Vec<String>,
  /// Ordered fatal findings; `path:line:column`-prefixed when a span is known.
  pub errors: Vec<String>,
  /// Synthesized reproducibility artifact, when a manifest was present.
  pub lockfile: Option<SynthesizedLockfile>,
  /// Logical paths folded into `code`, discovery order. Downstream rewriting
  /// uses this to avoid double-injecting sources the artifact already runs.
  pub included_modules: Vec<ArcStr>,
}

impl BundleOutput {
  pub fn is_success(&self) -> bool {
    self.errors.is_empty()
  }

  /// A success-shaped output carrying a single explanatory error.
  pub fn from_error(message: impl Into<String>) -> Self {
    Self { errors: vec![message.into()], ..Self::default() }
  }
}
