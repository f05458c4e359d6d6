//! Namespace prefixing for table names.

/// Prefixes a logical table name with the deployment namespace.
pub fn table_name(namespace: &str, logical_name: &str) -> String {
    format!("{namespace}{logical_name}")
}

/// Strips the deployment namespace from a namespaced table name.
///
/// Names that do not carry the namespace are returned unchanged.
pub fn reverse_table_name<'a>(namespace: &str, namespaced: &'a str) -> &'a str {
    namespaced.strip_prefix(namespace).unwrap_or(namespaced)
}
