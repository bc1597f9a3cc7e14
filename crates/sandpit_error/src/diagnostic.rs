use std::fmt;

/// A located build diagnostic.
///
/// The preview runs in an environment without a source-level debugger, so the
/// rendered form always leads with `path:line:column` when a span is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub path: String,
  pub line: Option<u32>,
  pub column: Option<u32>,
  pub message: String,
}

impl Diagnostic {
  pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), line: None, column: None, message: message.into() }
  }

  /// Attach a location computed from a byte offset into `source`.
  ///
  /// Lines and columns are 1-based. Offsets past the end of `source` clamp to
  /// its last position instead of being dropped.
  pub fn with_offset(mut self, source: &str, offset: usize) -> Self {
    let offset = offset.min(source.len());
    let line_start = memchr::memrchr(b'\n', source[..offset].as_bytes()).map_or(0, |at| at + 1);
    let line = memchr::memchr_iter(b'\n', source[..line_start].as_bytes()).count();

    self.line = Some(u32::try_from(line).unwrap_or(u32::MAX) + 1);
    self.column = Some(u32::try_from(offset - line_start).unwrap_or(u32::MAX) + 1);
    self
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (self.line, self.column) {
      (Some(line), Some(column)) => {
        write!(f, "{}:{line}:{column}: {}", self.path, self.message)
      }
      _ => write!(f, "{}: {}", self.path, self.message),
    }
  }
}

#[test]
fn offset_to_line_and_column() {
  let source = "const a = 1;\nconst b = ;\n";
  let diagnostic = Diagnostic::new("src/main.ts", "unexpected token").with_offset(source, 23);
  assert_eq!(diagnostic.to_string(), "src/main.ts:2:11: unexpected token");
}

#[test]
fn offset_clamps_past_the_end() {
  let diagnostic = Diagnostic::new("a.js", "eof").with_offset("x", 999);
  assert_eq!((diagnostic.line, diagnostic.column), (Some(1), Some(2)));
}
