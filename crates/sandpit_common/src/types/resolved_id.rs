use arcstr::ArcStr;

/// Outcome of resolving one import specifier.
///
/// Internal ids are normalized logical paths into the file set. External ids
/// keep the original specifier verbatim; the bundler leaves them unresolved
/// and the preview import map makes them fetchable at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
  pub id: ArcStr,
  pub is_external: bool,
}

impl ResolvedId {
  pub fn internal(id: impl AsRef<str>) -> Self {
    Self { id: ArcStr::from(id.as_ref()), is_external: false }
  }

  pub fn external(specifier: impl AsRef<str>) -> Self {
    Self { id: ArcStr::from(specifier.as_ref()), is_external: true }
  }
}
