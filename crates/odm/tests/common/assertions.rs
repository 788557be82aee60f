//! Assertion helpers for mapping documents.

use serde_json::Value;

/// Returns the mapping of a property addressed by a dotted path through nested
/// `properties` objects.
pub fn property<'a>(mapping: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(mapping, |node, name| node.get("properties")?.get(name))
}

/// Asserts that the property at `path` maps to exactly `expected`.
pub fn assert_property(mapping: &Value, path: &str, expected: &Value) {
    let actual = property(mapping, path)
        .unwrap_or_else(|| panic!("property {path} missing from mapping: {mapping}"));
    assert_eq!(actual, expected, "mapping of property {path}");
}

/// Asserts that the property at `path` is not mapped.
pub fn assert_no_property(mapping: &Value, path: &str) {
    assert!(
        property(mapping, path).is_none(),
        "property {path} should not be mapped: {mapping}"
    );
}

/// Returns the property names of the root `properties` object in order.
pub fn property_names(mapping: &Value) -> Vec<String> {
    mapping["properties"]
        .as_object()
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default()
}
