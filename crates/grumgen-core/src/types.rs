//! Shared type definitions used across grumgen crates.

/// Identifier of a GrumPHP task (e.g. `phpcs`).
pub type TaskId = String;

/// Composer package identifier (e.g. `phpstan/phpstan`).
pub type PackageId = String;

/// The lint orchestrator package; every package selection starts with it.
pub const ORCHESTRATOR_PACKAGE: &str = "phpro/grumphp";

/// Split a comma-separated list into trimmed, non-empty names.
///
/// ```
/// use grumgen_core::types::parse_name_list;
///
/// assert_eq!(parse_name_list(" phpcs, phplint ,,"), vec!["phpcs", "phplint"]);
/// assert!(parse_name_list("").is_empty());
/// ```
pub fn parse_name_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Remove duplicates while keeping the first occurrence of each item.
pub fn dedup_preserving_order<I, T>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: PartialEq,
{
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_list_trims_whitespace() {
        assert_eq!(
            parse_name_list("  phpcs ,phplint  "),
            vec!["phpcs".to_string(), "phplint".to_string()]
        );
    }

    #[test]
    fn test_parse_name_list_only_separators() {
        assert!(parse_name_list(" , , ").is_empty());
    }

    #[test]
    fn test_dedup_preserving_order() {
        let deduped = dedup_preserving_order(["b", "a", "b", "c", "a"]);
        assert_eq!(deduped, vec!["b", "a", "c"]);
    }
}
