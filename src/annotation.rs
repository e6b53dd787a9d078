//! Decoder for the `/*--urge(...)--*/` declaration annotations.
//!
//! Annotations carry the binding-visible name and per-declaration flags in an
//! ordered `key:value` list: `name:Bitmap,optional:opacity=255,is_module`.
//! Items without a colon are boolean flags; a key that repeats is promoted to
//! a list in first-seen order.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::split_top_level;

lazy_static! {
    static ref URGE_SENTINEL: Regex =
        Regex::new(r"(?s)/\*--urge\((.*)\)--\*/").expect("valid sentinel pattern");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    Flag,
    Scalar(String),
    List(Vec<String>),
}

/// Ordered key → value(s) map decoded from one annotation comment. Built
/// fresh per declaration and consumed by the next recognized entity builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationMap {
    entries: Vec<(String, AnnotationValue)>,
}

impl AnnotationMap {
    /// Decodes a single- or multi-line annotation buffer. Returns `None` when
    /// the sentinel pattern does not match at all; the caller decides whether
    /// that is worth a diagnostic.
    pub fn decode(buffer: &str) -> Option<AnnotationMap> {
        let captures = URGE_SENTINEL.captures(buffer)?;
        Some(Self::parse_items(captures.get(1).map_or("", |m| m.as_str())))
    }

    fn parse_items(inner: &str) -> AnnotationMap {
        let mut map = AnnotationMap::default();
        for item in split_top_level(inner, ',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            match item.split_once(':') {
                Some((key, value)) => map.insert(key.trim(), value.trim()),
                None => map.entries.push((item.to_string(), AnnotationValue::Flag)),
            }
        }
        map
    }

    fn insert(&mut self, key: &str, value: &str) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            match existing {
                AnnotationValue::List(values) => values.push(value.to_string()),
                AnnotationValue::Scalar(first) => {
                    let promoted = vec![std::mem::take(first), value.to_string()];
                    *existing = AnnotationValue::List(promoted);
                }
                AnnotationValue::Flag => {
                    *existing = AnnotationValue::Scalar(value.to_string());
                }
            }
            return;
        }
        self.entries
            .push((key.to_string(), AnnotationValue::Scalar(value.to_string())));
    }

    /// First scalar value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|(k, v)| {
            if k != key {
                return None;
            }
            match v {
                AnnotationValue::Scalar(s) => Some(s.as_str()),
                AnnotationValue::List(values) => values.first().map(String::as_str),
                AnnotationValue::Flag => None,
            }
        })
    }

    /// All values recorded for `key`, in declaration order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        match self.entries.iter().find(|(k, _)| k == key) {
            Some((_, AnnotationValue::Scalar(s))) => vec![s.as_str()],
            Some((_, AnnotationValue::List(values))) => {
                values.iter().map(String::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// True when `key` appears as a bare flag.
    pub fn flag(&self, key: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, v)| k == key && *v == AnnotationValue::Flag)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `optional:param=default` entries as a `(param, default)` table, used
    /// to tag method parameters.
    pub fn optional_defaults(&self) -> Vec<(String, String)> {
        self.get_all("optional")
            .into_iter()
            .filter_map(|entry| {
                entry
                    .split_once('=')
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_scalars_lists_and_flags() {
        let map = AnnotationMap::decode("/*--urge(name:Foo,optional:x=1,optional:y=2,flag)--*/")
            .expect("sentinel matches");
        assert_eq!(map.get("name"), Some("Foo"));
        assert_eq!(map.get_all("optional"), vec!["x=1", "y=2"]);
        assert!(map.flag("flag"));
        assert!(!map.flag("name"));
    }

    #[test]
    fn decodes_empty_annotation() {
        let map = AnnotationMap::decode("/*--urge()--*/").expect("sentinel matches");
        assert!(map.is_empty());
    }

    #[test]
    fn rejects_non_sentinel_text() {
        assert!(AnnotationMap::decode("// just a comment").is_none());
        assert!(AnnotationMap::decode("/*--urge(unterminated").is_none());
    }

    #[test]
    fn multiline_buffers_decode() {
        let buffer = "/*--urge(name:Bitmap,\n   optional:opacity=255)--*/";
        let map = AnnotationMap::decode(buffer).expect("sentinel matches");
        assert_eq!(map.get("name"), Some("Bitmap"));
        assert_eq!(map.optional_defaults(), vec![(
            "opacity".to_string(),
            "255".to_string()
        )]);
    }

    #[test]
    fn nested_commas_stay_inside_one_value() {
        let map = AnnotationMap::decode("/*--urge(optional:color=Color(0, 0, 0))--*/")
            .expect("sentinel matches");
        assert_eq!(
            map.optional_defaults(),
            vec![("color".to_string(), "Color(0, 0, 0)".to_string())]
        );
    }
}
