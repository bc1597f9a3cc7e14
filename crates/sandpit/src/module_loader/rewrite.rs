use rustc_hash::FxHashMap;
use sandpit_common::ResolvedId;
use sandpit_utils::{ecmascript::property_access_str, indexmap::FxIndexMap};
use string_wizard::MagicString;

use crate::module_loader::scanner::Record;

fn quoted(id: &str) -> String {
  serde_json::to_string(id).unwrap_or_default()
}

/// Rewrite one transpiled module body into a registry-factory body.
///
/// Import/export statements are replaced in place (spans never overlap);
/// export assignments accumulate at the end of the body, which is sound for
/// hoisted declarations and matches CommonJS-style late binding for the rest.
pub fn rewrite_module(
  code: &str,
  records: &[Record],
  resolved: &FxHashMap<String, ResolvedId>,
  external_bindings: &FxIndexMap<arcstr::ArcStr, String>,
) -> String {
  let mut magic = MagicString::new(code);
  let mut appendix = String::new();
  let mut temp_index = 0usize;

  for record in records {
    match record {
      Record::Import { span, source, default_local, namespace_local, named } => {
        let Some(target) = resolved.get(source) else { continue };
        let mut replacement = String::new();

        if target.is_external {
          let binding = &external_bindings[&target.id];
          if let Some(namespace) = namespace_local {
            replacement.push_str(&format!("const {namespace} = {binding};\n"));
          }
          if let Some(default) = default_local {
            replacement.push_str(&format!("const {default} = __sp_interop({binding});\n"));
          }
          for (imported, local) in named {
            replacement
              .push_str(&format!("const {local} = {};\n", property_access_str(binding, imported)));
          }
          // Side-effect-only external imports need no bindings here: the
          // hoisted namespace import at the top of the artifact already ran
          // the module.
        } else {
          let key = quoted(&target.id);
          if default_local.is_none() && namespace_local.is_none() && named.is_empty() {
            replacement = format!("require({key});");
          } else {
            let temp = format!("__sp_m{temp_index}");
            temp_index += 1;
            replacement.push_str(&format!("const {temp} = require({key});\n"));
            if let Some(namespace) = namespace_local {
              replacement.push_str(&format!("const {namespace} = {temp};\n"));
            }
            if let Some(default) = default_local {
              replacement.push_str(&format!("const {default} = __sp_interop({temp});\n"));
            }
            for (imported, local) in named {
              replacement
                .push_str(&format!("const {local} = {};\n", property_access_str(&temp, imported)));
            }
          }
        }

        let replacement = replacement.trim_end().to_string();
        if replacement.is_empty() {
          magic.remove(span.0 as usize, span.1 as usize);
        } else {
          magic.update(span.0 as usize, span.1 as usize, replacement);
        }
      }
      Record::ExportDecl { keyword, names } => {
        magic.remove(keyword.0 as usize, keyword.1 as usize);
        for name in names {
          appendix.push_str(&format!("{} = {name};\n", property_access_str("exports", name)));
        }
      }
      Record::ExportNamed { span, pairs } => {
        magic.remove(span.0 as usize, span.1 as usize);
        for (local, exported) in pairs {
          appendix.push_str(&format!("{} = {local};\n", property_access_str("exports", exported)));
        }
      }
      Record::ReexportNamed { span, source, pairs } => {
        let Some(target) = resolved.get(source) else { continue };
        let mut replacement = String::new();
        let origin = if target.is_external {
          external_bindings[&target.id].clone()
        } else {
          let temp = format!("__sp_m{temp_index}");
          temp_index += 1;
          replacement.push_str(&format!("const {temp} = require({});\n", quoted(&target.id)));
          temp
        };
        for (imported, exported) in pairs {
          replacement.push_str(&format!(
            "{} = {};\n",
            property_access_str("exports", exported),
            property_access_str(&origin, imported),
          ));
        }
        magic.update(span.0 as usize, span.1 as usize, replacement.trim_end().to_string());
      }
      Record::ReexportAll { span, source, namespace } => {
        let Some(target) = resolved.get(source) else { continue };
        let origin = if target.is_external {
          external_bindings[&target.id].clone()
        } else {
          format!("require({})", quoted(&target.id))
        };
        let replacement = match namespace {
          Some(namespace) => {
            format!("{} = {origin};", property_access_str("exports", namespace))
          }
          None => format!("__sp_reExport(exports, {origin});"),
        };
        magic.update(span.0 as usize, span.1 as usize, replacement);
      }
      Record::ExportDefaultExpr { keyword } => {
        magic.update(keyword.0 as usize, keyword.1 as usize, "exports.default = ");
      }
      Record::ExportDefaultDecl { keyword, name } => {
        magic.remove(keyword.0 as usize, keyword.1 as usize);
        appendix.push_str(&format!("exports.default = {name};\n"));
      }
    }
  }

  if !appendix.is_empty() {
    magic.append(format!("\n{}", appendix.trim_end()));
  }

  magic.to_string()
}

#[cfg(test)]
mod tests {
  use oxc::span::SourceType;
  use sandpit_ecmascript::EcmaCompiler;

  use super::*;
  use crate::module_loader::scanner::scan_module;

  fn rewrite(source: &str, resolved: &[(&str, ResolvedId)]) -> String {
    let ast =
      EcmaCompiler::parse("test.js", source, SourceType::default().with_module(true)).unwrap();
    let records = scan_module(&ast);
    let resolved: FxHashMap<String, ResolvedId> =
      resolved.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect();
    let mut bindings = FxIndexMap::default();
    for target in resolved.values().filter(|target| target.is_external) {
      bindings.insert(
        target.id.clone(),
        format!("__sp_ext_{}", sandpit_utils::ecmascript::binding_name_for_specifier(&target.id)),
      );
    }
    rewrite_module(source, &records, &resolved, &bindings)
  }

  #[test]
  fn internal_imports_become_require_calls() {
    let out = rewrite(
      "import { add } from './math.js';\nconsole.log(add(1, 2));",
      &[("./math.js", ResolvedId::internal("math.js"))],
    );
    assert!(out.contains("const __sp_m0 = require(\"math.js\");"));
    assert!(out.contains("const add = __sp_m0.add;"));
    assert!(!out.contains("import "));
  }

  #[test]
  fn external_imports_use_hoisted_bindings() {
    let out = rewrite(
      "import React from 'react';\nReact.createElement('div');",
      &[("react", ResolvedId::external("react"))],
    );
    assert!(out.contains("const React = __sp_interop(__sp_ext_react);"));
  }

  #[test]
  fn exported_declarations_keep_their_declaration() {
    let out = rewrite("export const answer = 42;", &[]);
    assert!(out.contains("const answer = 42;"));
    assert!(out.contains("exports.answer = answer;"));
    assert!(!out.contains("export const"));
  }

  #[test]
  fn default_export_expression_assigns_exports() {
    let out = rewrite("export default 1 + 1;", &[]);
    assert!(out.contains("exports.default = 1 + 1;"));
  }

  #[test]
  fn named_default_function_hoists_then_assigns() {
    let out = rewrite("export default function main() { return 1; }", &[]);
    assert!(out.contains("function main() { return 1; }"));
    assert!(out.contains("exports.default = main;"));
  }

  #[test]
  fn star_reexport_uses_runtime_helper() {
    let out =
      rewrite("export * from './lib.js';", &[("./lib.js", ResolvedId::internal("lib.js"))]);
    assert!(out.contains("__sp_reExport(exports, require(\"lib.js\"));"));
  }
}
