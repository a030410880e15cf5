//! Taxon label parsing

/// Extract the taxon id from a "Name (id)" label
///
/// Returns `None` when the label has no parenthesised part.
pub fn parse_taxa_id(label: &str) -> Option<&str> {
    let (_, rest) = label.split_once('(')?;
    let id = rest.strip_suffix(')').unwrap_or(rest).trim();
    if id.is_empty() { None } else { Some(id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_taxa_id() {
        assert_eq!(parse_taxa_id("Red Fox (42069)"), Some("42069"));
        assert_eq!(parse_taxa_id("Vulpes vulpes(7)"), Some("7"));
        assert_eq!(parse_taxa_id("Red Fox"), None);
        assert_eq!(parse_taxa_id("Empty ()"), None);
    }
}
