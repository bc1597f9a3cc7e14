pub mod module_type;

use crate::PackageManifest;

/// Options for one bundle invocation.
#[derive(Debug, Default, Clone)]
pub struct BundleOptions {
  /// Entry path within the file set. When absent, entry detection picks one.
  pub entry: Option<String>,
  /// Accepted for interface parity; the in-memory bundler does not emit maps.
  pub sourcemap: bool,
  /// Strip whitespace from the generated artifact.
  pub minify: bool,
  /// Dependency manifest backing external-import bookkeeping and the
  /// synthesized lockfile.
  pub manifest: Option<PackageManifest>,
}
