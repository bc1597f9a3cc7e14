use xxhash_rust::xxh3::xxh3_128;

/// Short url-safe digest used in synthesized handle URLs.
pub fn xxhash_base64_url(input: &[u8]) -> String {
  let hash = xxh3_128(input).to_le_bytes();
  base64_simd::URL_SAFE_NO_PAD.encode_to_string(hash)
}

/// Stable fingerprint of one file's content for the bundle cache.
pub fn xxhash_u128(input: &[u8]) -> u128 {
  xxh3_128(input)
}

#[test]
fn test_xxhash_base64_url() {
  assert_eq!(xxhash_base64_url(b"hello"), xxhash_base64_url(b"hello"));
  assert_ne!(xxhash_base64_url(b"hello"), xxhash_base64_url(b"hello!"));
  assert!(!xxhash_base64_url(b"hello").contains('='));
}
