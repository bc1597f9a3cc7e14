use oxc::syntax::identifier;

use crate::concat_string;

pub fn is_valid_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

pub fn property_access_str(obj: &str, prop: &str) -> String {
  if is_valid_identifier_name(prop) {
    concat_string!(obj, ".", prop)
  } else {
    concat_string!(obj, "[", serde_json::to_string(prop).unwrap(), "]")
  }
}

/// Derive a legal, readable JS binding name from a module specifier.
///
/// Used for the hoisted namespace bindings of external imports, e.g.
/// `react-dom/client` becomes `react_dom_client`.
pub fn binding_name_for_specifier(specifier: &str) -> String {
  let mut name = String::with_capacity(specifier.len());
  for ch in specifier.chars() {
    if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
      name.push(ch);
    } else {
      name.push('_');
    }
  }
  if name.chars().next().map_or(true, |ch| ch.is_ascii_digit()) {
    name.insert(0, '_');
  }
  name
}

#[test]
fn test_is_valid_identifier_name() {
  assert!(is_valid_identifier_name("foo"));
  assert!(!is_valid_identifier_name("1aaaa"));
  assert!(!is_valid_identifier_name("a-b"));
}

#[test]
fn test_binding_name_for_specifier() {
  assert_eq!(binding_name_for_specifier("react-dom/client"), "react_dom_client");
  assert_eq!(binding_name_for_specifier("@scope/pkg"), "_scope_pkg");
  assert_eq!(binding_name_for_specifier("3d-lib"), "_3d_lib");
}
