//! Unique fixture data so parallel tests never share a room or map id.

use ulid::Ulid;

/// A unique string in the format `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("room");
/// let b = unique_str("room");
/// assert_ne!(a, b);
/// assert!(a.starts_with("room-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `count` distinct map ids sharing one random tag, e.g. `map1-<tag>`.
pub fn unique_map_pool(count: usize) -> Vec<String> {
    let tag = Ulid::new().to_string().to_lowercase();
    (1..=count).map(|i| format!("map{i}-{tag}")).collect()
}

/// Plain `m1..=mN` pool for tests that assert on exact ids.
pub fn numbered_pool(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("m{i}")).collect()
}
