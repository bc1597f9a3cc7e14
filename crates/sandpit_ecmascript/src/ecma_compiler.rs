use std::path::Path;

use arcstr::ArcStr;
use oxc::{
  codegen::{Codegen, CodegenOptions},
  diagnostics::{OxcDiagnostic, Severity},
  parser::Parser,
  semantic::SemanticBuilder,
  span::SourceType,
  transformer::{ESTarget, JsxRuntime, TransformOptions, Transformer},
};
use sandpit_common::ModuleType;
use sandpit_error::{BuildResult, Diagnostic};

use crate::ecma_ast::{
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
  EcmaAst,
};

/// Transpiled source plus the non-fatal findings gathered on the way.
#[derive(Debug)]
pub struct TranspileOutput {
  pub code: String,
  pub warnings: Vec<String>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn parse(
    path: &str,
    source: impl Into<ArcStr>,
    source_type: SourceType,
  ) -> BuildResult<EcmaAst> {
    let allocator = oxc::allocator::Allocator::default();
    let owner = ProgramCellOwner { source: source.into(), allocator };
    let program = ProgramCell::try_new(owner, |owner| {
      let ret = Parser::new(&owner.allocator, &owner.source, source_type).parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(render_diagnostics(path, &owner.source, &ret.errors))
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  /// Turn one module's source into plain executable JavaScript.
  ///
  /// Plain scripts pass through untouched so the caller rewrites the text the
  /// author wrote; TypeScript/JSX run through the oxc transformer (ESNext
  /// target, classic JSX runtime, mirroring the esbuild-style pipeline this
  /// engine stands in for) and come back from codegen.
  pub fn transpile(
    path: &str,
    source: &str,
    module_type: ModuleType,
  ) -> BuildResult<TranspileOutput> {
    let source_type = source_type_for(module_type);

    if !module_type.needs_transpilation() {
      // Still parse: a module that cannot parse must fail here, with located
      // diagnostics, not at artifact execution time.
      Self::parse(path, source, source_type)?;
      return Ok(TranspileOutput { code: source.to_string(), warnings: Vec::new() });
    }

    let mut ast = Self::parse(path, source, source_type)?;

    let (warnings, errors) = ast.program.with_mut(|fields| {
      let semantic_ret = SemanticBuilder::new().build(fields.program);
      let warnings: Vec<String> =
        semantic_ret.errors.iter().map(|error| render_one(path, source, error).to_string()).collect();
      let (symbols, scopes) = semantic_ret.semantic.into_symbol_table_and_scope_tree();

      let mut transformer_options = TransformOptions::from(ESTarget::ESNext);
      transformer_options.jsx.runtime = JsxRuntime::Classic;

      let transformer_ret = Transformer::new(fields.allocator, Path::new(path), &transformer_options)
        .build_with_symbols_and_scopes(symbols, scopes, fields.program);

      let errors: Vec<String> = transformer_ret
        .errors
        .iter()
        .filter(|error| matches!(error.severity, Severity::Error))
        .map(|error| render_one(path, source, error).to_string())
        .collect();

      (warnings, errors)
    });

    if !errors.is_empty() {
      return Err(errors.into_iter().map(|message| anyhow::anyhow!(message)).collect::<Vec<_>>())?;
    }

    Ok(TranspileOutput { code: Self::print(&ast), warnings })
  }

  pub fn print(ast: &EcmaAst) -> String {
    Codegen::new().build(ast.program()).code
  }

  /// Whitespace-level minification of an assembled artifact.
  pub fn minify_whitespace(path: &str, source: &str) -> BuildResult<String> {
    let ast = Self::parse(path, source, SourceType::default().with_module(true))?;
    let ret = Codegen::new()
      .with_options(CodegenOptions { minify: true, ..CodegenOptions::default() })
      .build(ast.program());
    Ok(ret.code)
  }
}

fn source_type_for(module_type: ModuleType) -> SourceType {
  let default = SourceType::default().with_module(true);
  match module_type {
    ModuleType::Ts => default.with_typescript(true),
    ModuleType::Tsx => default.with_typescript(true).with_jsx(true),
    ModuleType::Jsx => default.with_jsx(true),
    _ => default,
  }
}

fn render_one(path: &str, source: &str, error: &OxcDiagnostic) -> Diagnostic {
  let diagnostic = Diagnostic::new(path, error.message.to_string());
  match error.labels.as_ref().and_then(|labels| labels.first()) {
    Some(label) => diagnostic.with_offset(source, label.offset()),
    None => diagnostic,
  }
}

fn render_diagnostics(path: &str, source: &str, errors: &[OxcDiagnostic]) -> Vec<anyhow::Error> {
  errors.iter().map(|error| anyhow::anyhow!("{}", render_one(path, source, error))).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_and_print_round_trip() {
    let ast =
      EcmaCompiler::parse("a.js", "const a = 1;", SourceType::default().with_module(true)).unwrap();
    assert_eq!(EcmaCompiler::print(&ast), "const a = 1;\n");
  }

  #[test]
  fn typescript_types_are_stripped() {
    let output =
      EcmaCompiler::transpile("a.ts", "const a: number = 1; export { a };", ModuleType::Ts)
        .unwrap();
    assert!(!output.code.contains(": number"));
    assert!(output.code.contains("const a = 1"));
  }

  #[test]
  fn jsx_is_lowered_to_create_element_calls() {
    let output = EcmaCompiler::transpile(
      "app.jsx",
      "import React from 'react';\nexport const App = () => <h1>Hi</h1>;",
      ModuleType::Jsx,
    )
    .unwrap();
    assert!(output.code.contains("React.createElement"));
    assert!(!output.code.contains("<h1>"));
  }

  #[test]
  fn parse_failures_carry_location_info() {
    let err = EcmaCompiler::transpile("src/bad.ts", "const = 1;", ModuleType::Ts).unwrap_err();
    let rendered = err.first().map(ToString::to_string).unwrap_or_default();
    assert!(rendered.starts_with("src/bad.ts:1:"), "got: {rendered}");
  }

  #[test]
  fn plain_scripts_pass_through_verbatim() {
    let source = "// keep me\nconsole.log(1)";
    let output = EcmaCompiler::transpile("a.js", source, ModuleType::Js).unwrap();
    assert_eq!(output.code, source);
  }
}
