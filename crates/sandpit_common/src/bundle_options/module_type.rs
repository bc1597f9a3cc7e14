/// Loader kind inferred from a file extension.
///
/// ref: https://github.com/evanw/esbuild/blob/9c13ae1f06dfa909eb4a53882e3b7e4216a503fe/internal/bundler/bundler.go#L1161-L1183
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
  Js,
  Jsx,
  Ts,
  Tsx,
  Css,
  Json,
  Empty,
}

/// Extensions the bundler accepts into its candidate set. Anything else
/// (yaml, markdown, lockfiles) is not meaningful as a program source.
pub const BUNDLEABLE_EXTENSIONS: &[&str] =
  &["js", "mjs", "cjs", "ts", "tsx", "jsx", "css", "json"];

/// Extensions recognized as executable program code when picking an entry.
pub const CODE_EXTENSIONS: &[&str] = &["ts", "tsx", "jsx", "js", "mjs", "cjs"];

impl ModuleType {
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext {
      "js" | "mjs" | "cjs" => Some(Self::Js),
      "jsx" => Some(Self::Jsx),
      "ts" | "mts" | "cts" => Some(Self::Ts),
      "tsx" => Some(Self::Tsx),
      "css" => Some(Self::Css),
      "json" => Some(Self::Json),
      _ => None,
    }
  }

  pub fn from_path(path: &str) -> Option<Self> {
    sandpit_utils::path_ext::extension(path).and_then(Self::from_extension)
  }

  /// Whether sources of this kind must pass through the transpiler before a
  /// browser can execute them.
  pub fn needs_transpilation(self) -> bool {
    matches!(self, Self::Ts | Self::Tsx | Self::Jsx)
  }
}

#[test]
fn loader_kind_from_path() {
  assert_eq!(ModuleType::from_path("src/main.tsx"), Some(ModuleType::Tsx));
  assert_eq!(ModuleType::from_path("util.cjs"), Some(ModuleType::Js));
  assert_eq!(ModuleType::from_path("readme.md"), None);
  assert_eq!(ModuleType::from_path("Makefile"), None);
}
