/// Newline-joins generated source fragments with a single preallocation.
#[derive(Default)]
pub struct SourceJoiner {
  sources: Vec<String>,
}

impl SourceJoiner {
  pub fn append_source(&mut self, source: impl Into<String>) {
    self.sources.push(source.into());
  }

  pub fn join(&self) -> String {
    if self.sources.is_empty() {
      return String::new();
    }

    let size_hint =
      self.sources.iter().map(String::len).sum::<usize>() + (self.sources.len() - 1);
    let mut out = String::with_capacity(size_hint);

    for (index, source) in self.sources.iter().enumerate() {
      out.push_str(source);
      if index < self.sources.len() - 1 {
        out.push('\n');
      }
    }

    out
  }
}

#[test]
fn joins_with_single_newlines() {
  let mut joiner = SourceJoiner::default();
  joiner.append_source("a");
  joiner.append_source("b");
  assert_eq!(joiner.join(), "a\nb");
}
