mod rewrite;
mod scanner;

use std::collections::VecDeque;

use arcstr::ArcStr;
use rustc_hash::{FxHashMap, FxHashSet};
use sandpit_common::{FileSet, ModuleType, ResolvedId};
use sandpit_ecmascript::EcmaCompiler;
use sandpit_error::BuildResult;
use sandpit_resolver::{load_module, Resolver};
use sandpit_utils::{ecmascript::binding_name_for_specifier, indexmap::FxIndexMap};

use crate::module_loader::scanner::{scan_module, Record};

/// One resolved module, transient to a single bundle invocation.
#[derive(Debug)]
pub struct ModuleNode {
  pub id: ArcStr,
  pub module_type: ModuleType,
  pub code: String,
  records: Vec<Record>,
  resolved: FxHashMap<String, ResolvedId>,
}

impl ModuleNode {
  pub fn render(&self, external_bindings: &FxIndexMap<ArcStr, String>) -> String {
    rewrite::rewrite_module(&self.code, &self.records, &self.resolved, external_bindings)
  }
}

/// The module graph for one bundle invocation. Nothing survives the
/// invocation; there is no persistent graph across builds.
#[derive(Debug)]
pub struct ModuleGraph {
  /// Discovery (BFS) order; the entry module is always first.
  pub modules: FxIndexMap<ArcStr, ModuleNode>,
  /// External specifier to hoisted namespace binding, discovery order.
  pub externals: FxIndexMap<ArcStr, String>,
  pub warnings: Vec<String>,
}

impl ModuleGraph {
  pub fn entry_id(&self) -> Option<&ArcStr> {
    self.modules.keys().next()
  }
}

/// Walk the graph rooted at `entry`, loading, transpiling and scanning each
/// internal module once.
///
/// Missing internal imports degrade to placeholder modules with warnings;
/// transpilation failures abort with located diagnostics.
pub fn load_graph(files: &FileSet, resolver: &Resolver, entry: &str) -> BuildResult<ModuleGraph> {
  let mut graph =
    ModuleGraph { modules: FxIndexMap::default(), externals: FxIndexMap::default(), warnings: Vec::new() };

  let entry_resolved = resolver.resolve(files, None, entry);
  if entry_resolved.is_external {
    return Err(anyhow::anyhow!("entry \"{entry}\" does not name a bundleable project file"))?;
  }

  let mut seen = FxHashSet::default();
  seen.insert(entry_resolved.id.clone());
  let mut queue = VecDeque::from([entry_resolved.id]);

  while let Some(id) = queue.pop_front() {
    let loaded = load_module(files, &id);
    if let Some(warning) = loaded.warning {
      graph.warnings.push(warning);
    }

    let node = match loaded.module_type {
      ModuleType::Css => css_node(&id, &loaded.content),
      ModuleType::Json => json_node(&id, &loaded.content, &mut graph.warnings),
      _ => {
        let transpiled = EcmaCompiler::transpile(&id, &loaded.content, loaded.module_type)?;
        graph.warnings.extend(transpiled.warnings);

        let ast = EcmaCompiler::parse(
          &id,
          transpiled.code.as_str(),
          oxc::span::SourceType::default().with_module(true),
        )?;
        let records = scan_module(&ast);

        let mut resolved = FxHashMap::default();
        for record in &records {
          let Some(source) = record.source() else { continue };
          if resolved.contains_key(source) {
            continue;
          }
          let target = resolver.resolve(files, Some(&id), source);
          if target.is_external {
            if !graph.externals.contains_key(&target.id) {
              let binding = unique_binding(&graph.externals, &target.id);
              graph.externals.insert(target.id.clone(), binding);
            }
          } else if seen.insert(target.id.clone()) {
            queue.push_back(target.id.clone());
          }
          resolved.insert(source.to_string(), target);
        }

        ModuleNode {
          id: id.clone(),
          module_type: loaded.module_type,
          code: transpiled.code,
          records,
          resolved,
        }
      }
    };

    graph.modules.insert(id, node);
  }

  Ok(graph)
}

/// Stylesheets become a style-injection side effect executed when the module
/// is first required; the preview pipeline has exactly one script injection
/// point, so CSS must ride along inside the artifact.
fn css_node(id: &ArcStr, content: &str) -> ModuleNode {
  ModuleNode {
    id: id.clone(),
    module_type: ModuleType::Css,
    code: format!(
      "__sp_injectStyle({});",
      serde_json::to_string(content).unwrap_or_else(|_| String::from("\"\""))
    ),
    records: Vec::new(),
    resolved: FxHashMap::default(),
  }
}

fn json_node(id: &ArcStr, content: &str, warnings: &mut Vec<String>) -> ModuleNode {
  let value = match serde_json::from_str::<serde_json::Value>(content) {
    Ok(value) => value,
    Err(error) => {
      warnings.push(format!("\"{id}\" is not valid JSON ({error}); substituting an empty object"));
      serde_json::Value::Object(serde_json::Map::new())
    }
  };
  ModuleNode {
    id: id.clone(),
    module_type: ModuleType::Json,
    code: format!(
      "module.exports = {};\nmodule.exports.default = module.exports;",
      serde_json::to_string(&value).unwrap_or_else(|_| String::from("{}"))
    ),
    records: Vec::new(),
    resolved: FxHashMap::default(),
  }
}

fn unique_binding(externals: &FxIndexMap<ArcStr, String>, specifier: &str) -> String {
  let base = format!("__sp_ext_{}", binding_name_for_specifier(specifier));
  if !externals.values().any(|existing| *existing == base) {
    return base;
  }
  let mut suffix = 2usize;
  loop {
    let candidate = format!("{base}_{suffix}");
    if !externals.values().any(|existing| *existing == candidate) {
      return candidate;
    }
    suffix += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn walks_the_graph_breadth_first_from_the_entry() {
    let files: FileSet = [
      ("src/main.ts", "import { a } from './a';\nimport './style.css';\nconsole.log(a);"),
      ("src/a.ts", "import data from '../data.json';\nexport const a = data;"),
      ("src/style.css", "body { margin: 0 }"),
      ("data.json", r#"{"k": 1}"#),
    ]
    .into_iter()
    .collect();

    let graph = load_graph(&files, &Resolver::new(), "src/main.ts").unwrap();
    let order: Vec<&str> = graph.modules.keys().map(ArcStr::as_str).collect();
    assert_eq!(order, ["src/main.ts", "src/a.ts", "src/style.css", "data.json"]);
    assert!(graph.warnings.is_empty());
    assert_eq!(graph.entry_id().map(ArcStr::as_str), Some("src/main.ts"));
  }

  #[test]
  fn missing_imports_warn_but_do_not_fail() {
    let files: FileSet =
      [("a.ts", "import { x } from './b'; console.log(x);")].into_iter().collect();

    let graph = load_graph(&files, &Resolver::new(), "a.ts").unwrap();
    assert_eq!(graph.warnings.len(), 1);
    assert!(graph.warnings[0].contains("a/b") || graph.warnings[0].contains("\"b\""), "{:?}", graph.warnings);
    assert!(graph.modules.contains_key("b"));
  }

  #[test]
  fn bare_imports_collect_as_externals_with_bindings() {
    let files: FileSet = [
      ("main.jsx", "import React from 'react';\nimport { createRoot } from 'react-dom/client';\nexport const App = () => <p>ok</p>;"),
    ]
    .into_iter()
    .collect();

    let graph = load_graph(&files, &Resolver::new(), "main.jsx").unwrap();
    assert_eq!(graph.modules.len(), 1);
    let externals: Vec<(&str, &str)> =
      graph.externals.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
      externals,
      [("react", "__sp_ext_react"), ("react-dom/client", "__sp_ext_react_dom_client")],
    );
  }

  #[test]
  fn transpile_failures_surface_located_diagnostics() {
    let files: FileSet = [("bad.ts", "const = ;")].into_iter().collect();
    let err = load_graph(&files, &Resolver::new(), "bad.ts").unwrap_err();
    assert!(err.first().map(ToString::to_string).unwrap_or_default().starts_with("bad.ts:1:"));
  }
}
