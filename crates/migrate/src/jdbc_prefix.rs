use regex::Regex;
use std::sync::LazyLock;

static JDBC_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^jdbc:([^:]+):").expect("hardcoded regex must compile"));

/// Extract the database product token from a JDBC URL ("jdbc:mysql://..." -> "mysql")
#[must_use]
pub fn extract_jdbc_prefix(url: &str) -> Option<&str> {
    JDBC_PREFIX_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
