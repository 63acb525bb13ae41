//! Test helpers for generating unique test data
//!
//! ULID-based helpers that keep test data unique across runs, so tests can
//! share a process without colliding on player or game names.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("player");
/// let id2 = unique_str("player");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique player name with the given prefix, short enough to be
/// readable in logs.
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_name;
///
/// let n1 = unique_name("host");
/// let n2 = unique_name("host");
/// assert_ne!(n1, n2);
/// ```
pub fn unique_name(prefix: &str) -> String {
    let ulid = Ulid::new().to_string();
    format!("{}-{}", prefix, &ulid[ulid.len() - 6..])
}
