use crate::domain::model::{GeneratedBlock, LinkEntry, RemoteMapping};
use std::collections::BTreeMap;

/// Extension carried by every source path in the remote mapping.
pub const SOURCE_SUFFIX: &str = ".mdx";

/// `guide/setup.mdx` -> `/guide/setup`
///
/// Removal repeats until no suffix is left, since dropping one occurrence can
/// join its neighbours into a new one (`a.md.mdxx`).
pub fn to_link_path(source_path: &str) -> String {
    let mut stripped = source_path.replace(SOURCE_SUFFIX, "");
    while stripped.contains(SOURCE_SUFFIX) {
        stripped = stripped.replace(SOURCE_SUFFIX, "");
    }
    format!("/{}", stripped.trim_start_matches('/'))
}

/// Inverts path -> identifier into identifier -> path, sorted by identifier.
///
/// When two source paths carry the same identifier the one later in the
/// document wins. Collisions are logged, not rejected.
pub fn transform(document: &RemoteMapping) -> GeneratedBlock {
    let mut article_map: BTreeMap<String, String> = BTreeMap::new();

    for (source_path, identifier) in document.entries() {
        let link_path = to_link_path(source_path);
        if let Some(previous) = article_map.insert(identifier.to_string(), link_path.clone()) {
            tracing::warn!(
                "Duplicate article id {}: '{}' replaces '{}'",
                identifier,
                link_path,
                previous
            );
        }
    }

    let entries = article_map
        .into_iter()
        .map(|(identifier, path)| LinkEntry { identifier, path })
        .collect();

    GeneratedBlock::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(json: &str) -> RemoteMapping {
        RemoteMapping::from_slice(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_transform_guide_example() {
        let block = transform(&mapping(
            r#"{"files": {"guide/setup.mdx": "1001", "guide/faq.mdx": "1002"}}"#,
        ));

        assert_eq!(
            block.as_str(),
            "  '1001': '/guide/setup',\n  '1002': '/guide/faq'"
        );
    }

    #[test]
    fn test_transform_sorts_by_identifier_as_string() {
        let block = transform(&mapping(
            r#"{"files": {"c.mdx": "20", "a.mdx": "3", "b.mdx": "100"}}"#,
        ));

        let ids: Vec<_> = block.entries().iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["100", "20", "3"]);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let doc = mapping(r#"{"files": {"x/b.mdx": "2", "x/a.mdx": "1", "y.mdx": "3"}}"#);
        assert_eq!(transform(&doc).as_str(), transform(&doc).as_str());
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins() {
        let block = transform(&mapping(
            r#"{"files": {"old/page.mdx": "7", "new/page.mdx": "7"}}"#,
        ));

        assert_eq!(block.len(), 1);
        assert_eq!(block.entries()[0].path, "/new/page");
    }

    #[test]
    fn test_paths_have_single_leading_separator_and_no_suffix() {
        let block = transform(&mapping(
            r#"{"files": {"/abs/page.mdx": "1", "//double.mdx": "2", "plain.mdx": "3", "guide/a.md.mdxx": "4", "x.mdx.mdx": "5"}}"#,
        ));

        assert_eq!(block.len(), 5);
        for entry in block.entries() {
            assert!(entry.path.starts_with('/'));
            assert!(!entry.path.starts_with("//"));
            assert!(!entry.path.contains(SOURCE_SUFFIX));
        }
    }

    #[test]
    fn test_suffix_exposed_by_removal_is_also_removed() {
        assert_eq!(to_link_path("guide/a.md.mdxx"), "/guide/a");
        assert_eq!(to_link_path("a..mdxmdx"), "/a");
        assert_eq!(to_link_path("guide/setup.mdx"), "/guide/setup");
    }

    #[test]
    fn test_empty_mapping_yields_empty_block() {
        let block = transform(&mapping(r#"{"files": {}}"#));
        assert!(block.is_empty());
        assert_eq!(block.as_str(), "");
    }

    #[test]
    fn test_numeric_identifiers_are_stringified() {
        let block = transform(&mapping(r#"{"files": {"a.mdx": 5}}"#));
        assert_eq!(block.as_str(), "  '5': '/a'");
    }
}
