use sandpit_utils::indexmap::FxIndexMap;
use serde::Serialize;

use crate::{types::import_map::cdn_url, PackageManifest};

/// A deterministic, side-effect-free projection of a dependency manifest into
/// a minimal lock-like shape.
///
/// This is documentation/traceability tooling only. No real resolution
/// happens: version ranges are recorded verbatim, the resolved URL is a CDN
/// guess, and nothing here carries reproducible-install guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedLockfile {
  pub name: String,
  pub version: String,
  pub packages: FxIndexMap<String, LockfileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockfileEntry {
  /// Original version-range string, unpinned.
  pub version: String,
  /// Guessed external CDN URL of the `{host}/{name}@{version}` form.
  pub resolved: String,
  pub dev: bool,
}

impl SynthesizedLockfile {
  pub fn from_manifest(manifest: &PackageManifest) -> Self {
    let packages = manifest
      .all_dependencies()
      .map(|(name, range, dev)| {
        let entry =
          LockfileEntry { version: range.to_string(), resolved: cdn_url(name, range), dev };
        (name.to_string(), entry)
      })
      .collect();

    Self {
      name: manifest.display_name().to_string(),
      version: manifest.display_version().to_string(),
      packages,
    }
  }

  /// Canonical serialized form; byte-for-byte identical across invocations
  /// for the same manifest.
  pub fn to_json(&self) -> String {
    serde_json::to_string_pretty(self).expect("lockfile serialization is infallible")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn manifest() -> PackageManifest {
    PackageManifest::from_json(
      r#"{
        "name": "demo",
        "version": "0.2.0",
        "dependencies": { "react": "^18.2.0", "react-dom": "^18.2.0" },
        "devDependencies": { "typescript": "~5.4.0" }
      }"#,
    )
    .unwrap()
  }

  #[test]
  fn projection_is_deterministic() {
    let first = SynthesizedLockfile::from_manifest(&manifest());
    let second = SynthesizedLockfile::from_manifest(&manifest());
    assert_eq!(first.to_json(), second.to_json());
  }

  #[test]
  fn records_ranges_verbatim_and_guesses_urls() {
    let lockfile = SynthesizedLockfile::from_manifest(&manifest());
    let react = &lockfile.packages["react"];
    assert_eq!(react.version, "^18.2.0");
    assert_eq!(react.resolved, "https://esm.sh/react@18.2.0");
    assert!(!react.dev);
    assert!(lockfile.packages["typescript"].dev);
  }
}
