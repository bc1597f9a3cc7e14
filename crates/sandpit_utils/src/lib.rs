pub mod ecmascript;
pub mod indexmap;
pub mod mime_ext;
pub mod path_ext;
pub mod xxhash;

/// Concatenate string expressions without a format-string round trip.
#[macro_export]
macro_rules! concat_string {
  ($($item:expr),* $(,)?) => {{
    let mut ret = String::new();
    $(ret.push_str($item.as_ref());)*
    ret
  }};
}
