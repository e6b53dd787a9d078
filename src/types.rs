//! Type resolution for annotated interface headers.
//!
//! A declarator such as `const std::vector<scoped_refptr<Item>>& items` is
//! split into its raw type text, a decayed `(root_type, containers)` view and
//! the declared identifier. The flat view is what lands in the schema dump;
//! the recursive [`TypeDesc`] classification built on top of it is the single
//! source of truth for "what kind of value is this" across the dependency
//! analyzer, the conversion registry and the code generator.

use serde::{Deserialize, Serialize};

/// Generic wrappers that carry a reference-counted engine handle.
const HANDLE_CONTAINERS: &[&str] = &["scoped_refptr"];

/// Generic wrappers that carry an element sequence.
const SEQUENCE_CONTAINERS: &[&str] = &["std::vector", "base::Vector"];

/// Generic wrappers that carry an optional value.
const OPTIONAL_CONTAINERS: &[&str] = &["std::optional", "base::Optional"];

/// Root names treated as host strings.
const TEXT_TYPES: &[&str] = &["std::string", "base::String"];

// ═══════════════════════════════════════════════════════════════════════════════
// FLAT TYPE VIEW
// ═══════════════════════════════════════════════════════════════════════════════

/// Decayed type of a declarator: the innermost non-generic name plus the
/// stack of generic containers around it, outermost first. `containers` is
/// empty iff the type is not a template instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDetail {
    pub root_type: String,
    pub containers: Vec<String>,
}

impl TypeDetail {
    pub fn plain(root_type: impl Into<String>) -> Self {
        TypeDetail {
            root_type: root_type.into(),
            containers: Vec::new(),
        }
    }
}

/// Splits a declarator into `(raw_type_text, detail, identifier)`.
///
/// The identifier is the last contiguous run of identifier characters;
/// everything before it is the type text. Mirrors the right-to-left scan the
/// header DSL has always used, so `const base::String& name` and
/// `uint32_t width` both resolve.
pub fn resolve_declarator(declarator: &str) -> (String, TypeDetail, String) {
    let trimmed = declarator.trim();
    let bytes = trimmed.as_bytes();

    let mut split = 0;
    for (idx, &b) in bytes.iter().enumerate().rev() {
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            split = idx + 1;
            break;
        }
    }

    let type_text = trimmed[..split].trim_end();
    let identifier = trimmed[split..].to_string();

    let (raw, detail) = resolve_type(type_text);
    (raw, detail, identifier)
}

/// Resolves a bare type string (no identifier) into its raw text and decayed
/// detail.
pub fn resolve_type(type_text: &str) -> (String, TypeDetail) {
    let raw = type_text.trim().to_string();
    let mut decayed = raw.as_str();

    // const ***& => ***
    if let Some(stripped) = decayed.strip_prefix("const ") {
        decayed = stripped.trim();
    }
    decayed = decayed.trim_end_matches(['&', ' ']);

    let mut containers = Vec::new();
    let root_type = unwrap_generics(decayed, &mut containers);

    (
        raw,
        TypeDetail {
            root_type,
            containers,
        },
    )
}

/// Recursively peels generic containers, outermost first, returning the
/// innermost non-generic name. Handles arbitrary nesting depth.
fn unwrap_generics(text: &str, containers: &mut Vec<String>) -> String {
    let text = text.trim();
    if text.ends_with('>') {
        if let Some(open) = text.find('<') {
            let close = text.rfind('>').expect("checked ends_with above");
            containers.push(text[..open].trim().to_string());
            return unwrap_generics(&text[open + 1..close], containers);
        }
    }
    text.to_string()
}

/// Splits `text` on `separator` at nesting depth zero, honoring angle
/// brackets and parentheses. The annotation decoder and the parameter-list
/// splitter both need this; a naive split would cut `Color(0, 0, 0)` or
/// `std::vector<scoped_refptr<Foo>>` apart.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;

    for (idx, ch) in text.char_indices() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Fixed-width scalar roots with direct host conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Bool,
    F32,
    F64,
}

/// Recursive classification of a decayed type. One variant per conversion
/// family the generator knows about; `Named` defers to the schema lookup
/// (enum, struct or closure) at generation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDesc {
    Void,
    Primitive(Scalar),
    Text,
    Named(String),
    Handle(Box<TypeDesc>),
    Sequence(Box<TypeDesc>),
    Optional(Box<TypeDesc>),
}

impl TypeDesc {
    /// Collects the inner type names of every reference-counted handle in
    /// this type, at any nesting depth. Used for dependency extraction;
    /// value-typed references deliberately contribute nothing.
    pub fn collect_handle_targets(&self, out: &mut Vec<String>) {
        match self {
            TypeDesc::Handle(inner) => {
                if let Some(name) = inner.leaf_name() {
                    out.push(name.to_string());
                }
                inner.collect_handle_targets(out);
            }
            TypeDesc::Sequence(inner) | TypeDesc::Optional(inner) => {
                inner.collect_handle_targets(out);
            }
            _ => {}
        }
    }

    fn leaf_name(&self) -> Option<&str> {
        match self {
            TypeDesc::Named(name) => Some(name),
            TypeDesc::Handle(inner)
            | TypeDesc::Sequence(inner)
            | TypeDesc::Optional(inner) => inner.leaf_name(),
            _ => None,
        }
    }
}

/// Maps a flat `TypeDetail` onto the recursive classification. This is the
/// one place the container and root-type names are interpreted; everything
/// downstream matches on `TypeDesc`.
pub fn classify(detail: &TypeDetail) -> TypeDesc {
    classify_parts(&detail.containers, &detail.root_type)
}

fn classify_parts(containers: &[String], root: &str) -> TypeDesc {
    if let Some((head, rest)) = containers.split_first() {
        let inner = Box::new(classify_parts(rest, root));
        if HANDLE_CONTAINERS.contains(&head.as_str()) {
            return TypeDesc::Handle(inner);
        }
        if SEQUENCE_CONTAINERS.contains(&head.as_str()) {
            return TypeDesc::Sequence(inner);
        }
        if OPTIONAL_CONTAINERS.contains(&head.as_str()) {
            return TypeDesc::Optional(inner);
        }
        // Unrecognized wrapper: fall through to the bare root so the
        // generator's default rules apply.
        return TypeDesc::Named(root.to_string());
    }

    if root == "void" {
        return TypeDesc::Void;
    }
    if TEXT_TYPES.contains(&root) {
        return TypeDesc::Text;
    }
    match root {
        "int8_t" => TypeDesc::Primitive(Scalar::I8),
        "uint8_t" => TypeDesc::Primitive(Scalar::U8),
        "int16_t" => TypeDesc::Primitive(Scalar::I16),
        "uint16_t" => TypeDesc::Primitive(Scalar::U16),
        "int32_t" => TypeDesc::Primitive(Scalar::I32),
        "uint32_t" => TypeDesc::Primitive(Scalar::U32),
        "int64_t" => TypeDesc::Primitive(Scalar::I64),
        "uint64_t" => TypeDesc::Primitive(Scalar::U64),
        "bool" => TypeDesc::Primitive(Scalar::Bool),
        "float" => TypeDesc::Primitive(Scalar::F32),
        "double" => TypeDesc::Primitive(Scalar::F64),
        other => TypeDesc::Named(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_scalar_declarator() {
        let (raw, detail, name) = resolve_declarator("uint32_t width");
        assert_eq!(raw, "uint32_t");
        assert_eq!(detail.root_type, "uint32_t");
        assert!(detail.containers.is_empty());
        assert_eq!(name, "width");
    }

    #[test]
    fn resolves_const_ref_nested_generics() {
        let (raw, detail, name) =
            resolve_declarator("const std::vector<scoped_refptr<Item>>& items");
        assert_eq!(raw, "const std::vector<scoped_refptr<Item>>&");
        assert_eq!(detail.root_type, "Item");
        assert_eq!(detail.containers, vec!["std::vector", "scoped_refptr"]);
        assert_eq!(name, "items");
    }

    #[test]
    fn resolves_deeply_nested_handles() {
        let (_, detail, _) =
            resolve_declarator("std::vector<std::vector<scoped_refptr<Mesh>>> layers");
        assert_eq!(detail.root_type, "Mesh");
        assert_eq!(
            detail.containers,
            vec!["std::vector", "std::vector", "scoped_refptr"]
        );
    }

    #[test]
    fn unrecognized_wrappers_keep_their_container_entry() {
        let (_, detail, name) = resolve_declarator("const std::vector<Handle<Item>>& items");
        assert_eq!(detail.root_type, "Item");
        assert_eq!(detail.containers, vec!["std::vector", "Handle"]);
        assert_eq!(name, "items");
        // Classification falls back to the bare root for the unknown wrapper.
        assert_eq!(
            classify(&detail),
            TypeDesc::Sequence(Box::new(TypeDesc::Named("Item".to_string())))
        );
    }

    #[test]
    fn top_level_split_ignores_nested_separators() {
        let parts = split_top_level("int32_t x, std::vector<scoped_refptr<A>> v, bool b", ',');
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].trim(), "std::vector<scoped_refptr<A>> v");
    }

    #[test]
    fn classifies_optional_of_struct() {
        let (_, detail) = resolve_type("std::optional<Size>");
        assert_eq!(
            classify(&detail),
            TypeDesc::Optional(Box::new(TypeDesc::Named("Size".to_string())))
        );
    }

    #[test]
    fn handle_targets_found_under_sequences() {
        let (_, detail) = resolve_type("std::vector<scoped_refptr<Color>>");
        let mut targets = Vec::new();
        classify(&detail).collect_handle_targets(&mut targets);
        assert_eq!(targets, vec!["Color"]);
    }
}
