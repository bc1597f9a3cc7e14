use oxc::{
  ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, ExportDefaultDeclarationKind,
    ImportDeclarationSpecifier, ModuleExportName, Statement,
  },
  span::GetSpan,
};
use sandpit_ecmascript::EcmaAst;

/// One top-level module-system statement, with the span the rewriter will
/// replace. Spans are byte offsets into the transpiled module source.
#[derive(Debug)]
pub enum Record {
  Import {
    span: (u32, u32),
    source: String,
    default_local: Option<String>,
    namespace_local: Option<String>,
    /// `(imported, local)` pairs.
    named: Vec<(String, String)>,
  },
  /// `export const x = ..` / `export function f() {}`: erase the keyword,
  /// keep the declaration, assign the bound names afterwards.
  ExportDecl { keyword: (u32, u32), names: Vec<String> },
  /// `export { a, b as c }` with `(local, exported)` pairs.
  ExportNamed { span: (u32, u32), pairs: Vec<(String, String)> },
  /// `export { a as b } from "x"` with `(imported, exported)` pairs.
  ReexportNamed { span: (u32, u32), source: String, pairs: Vec<(String, String)> },
  /// `export * from "x"` / `export * as ns from "x"`.
  ReexportAll { span: (u32, u32), source: String, namespace: Option<String> },
  /// `export default <expression-or-anonymous-declaration>`.
  ExportDefaultExpr { keyword: (u32, u32) },
  /// `export default function f() {}`: the declaration hoists, so erase the
  /// keyword and assign the name afterwards.
  ExportDefaultDecl { keyword: (u32, u32), name: String },
}

impl Record {
  pub fn source(&self) -> Option<&str> {
    match self {
      Self::Import { source, .. }
      | Self::ReexportNamed { source, .. }
      | Self::ReexportAll { source, .. } => Some(source),
      _ => None,
    }
  }
}

/// Collect every top-level import/export statement of a plain-JS module.
pub fn scan_module(ast: &EcmaAst) -> Vec<Record> {
  let mut records = Vec::new();

  for statement in &ast.program().body {
    match statement {
      Statement::ImportDeclaration(decl) => {
        let mut default_local = None;
        let mut namespace_local = None;
        let mut named = Vec::new();

        if let Some(specifiers) = &decl.specifiers {
          for specifier in specifiers {
            match specifier {
              ImportDeclarationSpecifier::ImportSpecifier(import) => {
                named.push((export_name(&import.imported), import.local.name.to_string()));
              }
              ImportDeclarationSpecifier::ImportDefaultSpecifier(import) => {
                default_local = Some(import.local.name.to_string());
              }
              ImportDeclarationSpecifier::ImportNamespaceSpecifier(import) => {
                namespace_local = Some(import.local.name.to_string());
              }
            }
          }
        }

        records.push(Record::Import {
          span: (decl.span.start, decl.span.end),
          source: decl.source.value.to_string(),
          default_local,
          namespace_local,
          named,
        });
      }
      Statement::ExportNamedDeclaration(decl) => {
        if let Some(declaration) = &decl.declaration {
          records.push(Record::ExportDecl {
            keyword: (decl.span.start, declaration.span().start),
            names: bound_names(declaration),
          });
        } else {
          let pairs = decl
            .specifiers
            .iter()
            .map(|specifier| (export_name(&specifier.local), export_name(&specifier.exported)))
            .collect();
          match &decl.source {
            Some(source) => records.push(Record::ReexportNamed {
              span: (decl.span.start, decl.span.end),
              source: source.value.to_string(),
              pairs,
            }),
            None => {
              records.push(Record::ExportNamed { span: (decl.span.start, decl.span.end), pairs });
            }
          }
        }
      }
      Statement::ExportDefaultDeclaration(decl) => {
        let keyword = (decl.span.start, decl.declaration.span().start);
        let hoisted_name = match &decl.declaration {
          ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
            func.id.as_ref().map(|id| id.name.to_string())
          }
          ExportDefaultDeclarationKind::ClassDeclaration(class) => {
            class.id.as_ref().map(|id| id.name.to_string())
          }
          _ => None,
        };
        match hoisted_name {
          Some(name) => records.push(Record::ExportDefaultDecl { keyword, name }),
          None => records.push(Record::ExportDefaultExpr { keyword }),
        }
      }
      Statement::ExportAllDeclaration(decl) => {
        records.push(Record::ReexportAll {
          span: (decl.span.start, decl.span.end),
          source: decl.source.value.to_string(),
          namespace: decl.exported.as_ref().map(export_name),
        });
      }
      _ => {}
    }
  }

  records
}

fn export_name(name: &ModuleExportName) -> String {
  match name {
    ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
    ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
    ModuleExportName::StringLiteral(literal) => literal.value.to_string(),
  }
}

fn bound_names(declaration: &Declaration) -> Vec<String> {
  let mut names = Vec::new();
  match declaration {
    Declaration::VariableDeclaration(var) => {
      for declarator in &var.declarations {
        collect_pattern_names(&declarator.id, &mut names);
      }
    }
    Declaration::FunctionDeclaration(func) => {
      names.extend(func.id.as_ref().map(|id| id.name.to_string()));
    }
    Declaration::ClassDeclaration(class) => {
      names.extend(class.id.as_ref().map(|id| id.name.to_string()));
    }
    _ => {}
  }
  names
}

fn collect_pattern_names(pattern: &BindingPattern, names: &mut Vec<String>) {
  match &pattern.kind {
    BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
    BindingPatternKind::ObjectPattern(object) => {
      for property in &object.properties {
        collect_pattern_names(&property.value, names);
      }
      if let Some(rest) = &object.rest {
        collect_pattern_names(&rest.argument, names);
      }
    }
    BindingPatternKind::ArrayPattern(array) => {
      for element in array.elements.iter().flatten() {
        collect_pattern_names(element, names);
      }
      if let Some(rest) = &array.rest {
        collect_pattern_names(&rest.argument, names);
      }
    }
    BindingPatternKind::AssignmentPattern(assignment) => {
      collect_pattern_names(&assignment.left, names);
    }
  }
}

#[cfg(test)]
mod tests {
  use oxc::span::SourceType;
  use pretty_assertions::assert_eq;
  use sandpit_ecmascript::EcmaCompiler;

  use super::*;

  fn scan(source: &str) -> Vec<Record> {
    let ast =
      EcmaCompiler::parse("test.js", source, SourceType::default().with_module(true)).unwrap();
    scan_module(&ast)
  }

  #[test]
  fn collects_import_shapes() {
    let records = scan("import React, { useState as useLocal } from 'react';\nimport * as api from './api.js';\nimport './side-effect.js';");
    assert_eq!(records.len(), 3);

    let Record::Import { default_local, named, source, .. } = &records[0] else { panic!() };
    assert_eq!(default_local.as_deref(), Some("React"));
    assert_eq!(named, &[("useState".to_string(), "useLocal".to_string())]);
    assert_eq!(source, "react");

    let Record::Import { namespace_local, .. } = &records[1] else { panic!() };
    assert_eq!(namespace_local.as_deref(), Some("api"));

    let Record::Import { default_local, namespace_local, named, .. } = &records[2] else { panic!() };
    assert!(default_local.is_none() && namespace_local.is_none() && named.is_empty());
  }

  #[test]
  fn collects_export_shapes() {
    let records = scan(
      "export const { a, b: renamed } = pair();\nexport default function main() {}\nexport { x as y } from './other.js';\nexport * from './all.js';",
    );

    let Record::ExportDecl { names, .. } = &records[0] else { panic!() };
    assert_eq!(names, &["a".to_string(), "renamed".to_string()]);

    let Record::ExportDefaultDecl { name, .. } = &records[1] else { panic!() };
    assert_eq!(name, "main");

    let Record::ReexportNamed { pairs, source, .. } = &records[2] else { panic!() };
    assert_eq!(pairs, &[("x".to_string(), "y".to_string())]);
    assert_eq!(source, "./other.js");

    assert!(matches!(&records[3], Record::ReexportAll { namespace: None, .. }));
  }
}
