//! Inspection argument handling.
//!
//! Every inspection declares default parameter values; callers may override
//! them per inspection. All values are treated as text and bound as such when
//! the SQL executes, so a threshold of `50` and a schema of `public` travel
//! the same way.

use indexmap::IndexMap;

/// Overrides grouped by inspection alias
pub type ArgumentOverrides = IndexMap<String, IndexMap<String, String>>;

/// Merge default parameters with caller-supplied overrides.
///
/// Overrides replace matching keys in place; keys absent from the defaults
/// are appended. Defaults keep their declaration order.
pub fn resolve_arguments(
    defaults: &IndexMap<String, String>,
    overrides: Option<&IndexMap<String, String>>
) -> IndexMap<String, String> {
    let mut resolved = defaults.clone();

    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            resolved.insert(key.clone(), value.clone());
        }
    }

    resolved
}

/// Parse an override string like `idx_bloat:schema=my,bloat_min=20;idx_unused:schema=my`.
///
/// Segments are `;`-separated; each segment is `alias:` followed by
/// `,`-separated `key=value` pairs. Whitespace around tokens is trimmed, a
/// token without `=` is ignored, and a segment producing zero valid pairs is
/// dropped entirely.
pub fn parse_args_string(raw: &str) -> ArgumentOverrides {
    let mut out = ArgumentOverrides::new();

    for segment in raw.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let Some((alias, pairs)) = segment.split_once(':') else {
            continue;
        };
        let alias = alias.trim();
        if alias.is_empty() {
            continue;
        }

        let mut args = IndexMap::new();
        for pair in pairs.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            args.insert(key.to_string(), value.trim().to_string());
        }

        if !args.is_empty() {
            out.insert(alias.to_string(), args);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> IndexMap<String, String> {
        IndexMap::from([
            (String::from("schema"), String::from("public")),
            (String::from("bloat_min"), String::from("50")),
        ])
    }

    #[test]
    fn test_overrides_replace_matching_keys_only() {
        let overrides = IndexMap::from([(String::from("bloat_min"), String::from("70"))]);
        let resolved = resolve_arguments(&defaults(), Some(&overrides));

        assert_eq!(resolved.get("schema"), Some(&String::from("public")));
        assert_eq!(resolved.get("bloat_min"), Some(&String::from("70")));
    }

    #[test]
    fn test_override_only_keys_are_admitted() {
        let overrides = IndexMap::from([(String::from("extra"), String::from("x"))]);
        let resolved = resolve_arguments(&defaults(), Some(&overrides));

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.get("extra"), Some(&String::from("x")));
    }

    #[test]
    fn test_parse_args_string() {
        let parsed = parse_args_string("idx_bloat:schema=my,bloat_min=20;idx_unused:schema=my");

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed["idx_bloat"].get("bloat_min"),
            Some(&String::from("20"))
        );
        assert_eq!(parsed["idx_unused"].get("schema"), Some(&String::from("my")));
    }

    #[test]
    fn test_parse_args_string_trims_whitespace() {
        let parsed = parse_args_string(" idx_bloat : schema = my , bloat_min = 20 ");

        assert_eq!(parsed["idx_bloat"].get("schema"), Some(&String::from("my")));
        assert_eq!(
            parsed["idx_bloat"].get("bloat_min"),
            Some(&String::from("20"))
        );
    }

    #[test]
    fn test_parse_args_string_drops_valueless_tokens() {
        let parsed = parse_args_string("idx_bloat:schema,bloat_min=20");

        assert_eq!(parsed["idx_bloat"].len(), 1);
    }

    #[test]
    fn test_parse_args_string_drops_empty_segments() {
        let parsed = parse_args_string("idx_bloat:schema;;idx_unused:");

        assert!(parsed.is_empty());
    }
}
