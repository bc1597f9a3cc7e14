use arcstr::ArcStr;
use sandpit_common::{FileContent, FileSet, ModuleType};

/// Content and loader kind for one resolved internal path, transient to a
/// single bundle invocation.
#[derive(Debug)]
pub struct LoadedModule {
  pub content: ArcStr,
  pub module_type: ModuleType,
  /// Non-fatal finding raised while loading (missing file, unreadable
  /// content). The build continues with the placeholder content.
  pub warning: Option<String>,
}

/// Load a resolved internal path from the file set.
///
/// A path that is absent, or whose content cannot serve as source text,
/// degrades to a safe empty placeholder plus a warning: partial AI-generated
/// projects stay previewable instead of crashing the build.
pub fn load_module(files: &FileSet, id: &str) -> LoadedModule {
  let module_type = ModuleType::from_path(id).unwrap_or(ModuleType::Js);

  match files.get(id) {
    Some(FileContent::Text(text)) => {
      LoadedModule { content: text.clone(), module_type, warning: None }
    }
    Some(FileContent::ExternalUrl(url)) => LoadedModule {
      content: placeholder_content(module_type),
      module_type,
      warning: Some(format!("\"{id}\" holds an external asset URL ({url}) and cannot be bundled as source; substituting an empty module")),
    },
    Some(FileContent::Omitted) => LoadedModule {
      content: placeholder_content(module_type),
      module_type,
      warning: Some(format!("content of \"{id}\" was omitted; substituting an empty module")),
    },
    None => LoadedModule {
      content: placeholder_content(module_type),
      module_type,
      warning: Some(format!("imported file \"{id}\" does not exist in the project; substituting an empty module")),
    },
  }
}

/// Empty-but-valid stand-in per loader kind: an empty object for json so
/// importers can still destructure, empty source otherwise.
fn placeholder_content(module_type: ModuleType) -> ArcStr {
  match module_type {
    ModuleType::Json => arcstr::literal!("{}"),
    _ => ArcStr::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn loads_existing_text_content() {
    let files: FileSet = [("src/a.ts", "export const a = 1;")].into_iter().collect();
    let loaded = load_module(&files, "src/a.ts");
    assert_eq!(loaded.content.as_str(), "export const a = 1;");
    assert_eq!(loaded.module_type, ModuleType::Ts);
    assert!(loaded.warning.is_none());
  }

  #[test]
  fn missing_files_degrade_to_placeholders() {
    let files = FileSet::new();

    let loaded = load_module(&files, "src/b.ts");
    assert_eq!(loaded.content.as_str(), "");
    assert!(loaded.warning.as_deref().unwrap().contains("src/b.ts"));

    let loaded = load_module(&files, "config.json");
    assert_eq!(loaded.content.as_str(), "{}");
    assert_eq!(loaded.module_type, ModuleType::Json);

    let loaded = load_module(&files, "theme.css");
    assert_eq!(loaded.content.as_str(), "");
    assert_eq!(loaded.module_type, ModuleType::Css);
  }

  #[test]
  fn omitted_content_warns_without_failing() {
    let mut files = FileSet::new();
    files.insert("big.js", FileContent::Omitted);
    let loaded = load_module(&files, "big.js");
    assert_eq!(loaded.content.as_str(), "");
    assert!(loaded.warning.is_some());
  }
}
