//! In-memory schema of scanned interface headers.
//!
//! The scanner accumulates these entities; the generator consumes them
//! together with the full [`Schema`] for cross-type lookups. Field names
//! follow the `export_apis.json` dump format consumed by the documentation
//! tooling, so everything here serializes with serde.

use serde::{Deserialize, Serialize};

use crate::types::TypeDetail;

// ═══════════════════════════════════════════════════════════════════════════════
// ENTITY RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamEntity {
    pub native_name: String,
    pub type_raw: String,
    pub type_detail: TypeDetail,
    pub is_optional: bool,
    pub default_value: Option<String>,
}

/// One bound method. `params` holds the overload variants in declaration
/// order; merging is keyed on `(binding_name, native_name, is_static)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodEntity {
    pub binding_name: String,
    pub native_name: String,
    pub is_static: bool,
    pub return_type_raw: String,
    pub return_type_detail: TypeDetail,
    pub params: Vec<Vec<ParamEntity>>,
}

/// A getter/setter pair exported through an attribute macro. The generator
/// expands this into `Get_x`/`Put_x` thunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeEntity {
    pub binding_name: String,
    pub native_name: String,
    pub type_raw: String,
    pub type_detail: TypeDetail,
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumEntity {
    pub native_name: String,
    pub binding_name: String,
    pub range: Option<String>,
    pub constants: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructMember {
    pub native_name: String,
    pub type_raw: String,
    pub type_detail: TypeDetail,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructEntity {
    pub native_name: String,
    pub binding_name: String,
    pub members: Vec<StructMember>,
    pub dependency: Vec<String>,
    #[serde(default)]
    pub filename: String,
}

/// A named callback-alias type (`using X = base::RepeatingCallback<...>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureEntity {
    pub native_name: String,
    pub binding_name: String,
    pub return_type_raw: String,
    pub return_type_detail: TypeDetail,
    pub params: Vec<ParamEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassEntity {
    pub native_name: String,
    pub binding_name: String,
    pub is_module: bool,
    pub is_comparable: bool,
    pub is_serializable: bool,
    pub is_disposable: bool,
    pub enums: Vec<EnumEntity>,
    pub structs: Vec<StructEntity>,
    pub methods: Vec<MethodEntity>,
    pub attributes: Vec<AttributeEntity>,
    pub closures: Vec<ClosureEntity>,
    pub dependency: Vec<String>,
    #[serde(default)]
    pub filename: String,
}

impl ClassEntity {
    pub fn new(native_name: impl Into<String>, binding_name: impl Into<String>) -> Self {
        ClassEntity {
            native_name: native_name.into(),
            binding_name: binding_name.into(),
            is_module: false,
            is_comparable: false,
            is_serializable: false,
            is_disposable: false,
            enums: Vec::new(),
            structs: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            closures: Vec::new(),
            dependency: Vec::new(),
            filename: String::new(),
        }
    }

    /// Appends a scanned method declaration, merging it into an existing
    /// overload set when the identity key matches. Returns the arity of the
    /// clashing variant when the new variant duplicates a parameter count
    /// already present, which the generated argument-count dispatch cannot
    /// disambiguate.
    pub fn merge_method(&mut self, method: MethodEntity) -> Result<(), usize> {
        debug_assert_eq!(method.params.len(), 1);
        let variant = method.params.into_iter().next().unwrap_or_default();

        if let Some(existing) = self.methods.iter_mut().find(|m| {
            m.binding_name == method.binding_name
                && m.native_name == method.native_name
                && m.is_static == method.is_static
        }) {
            let arity = variant.len();
            if existing.params.iter().any(|v| v.len() == arity) {
                return Err(arity);
            }
            existing.params.push(variant);
            return Ok(());
        }

        self.methods.push(MethodEntity {
            params: vec![variant],
            ..method
        });
        Ok(())
    }

    pub fn find_enum(&self, name: &str) -> Option<&EnumEntity> {
        self.enums.iter().find(|e| e.native_name == name)
    }

    pub fn find_closure(&self, name: &str) -> Option<&ClosureEntity> {
        self.closures.iter().find(|c| c.native_name == name)
    }
}

/// Top-level schema node: a class (optionally a module) or a free-standing
/// struct. Serialized with the same `type` tag the JSON dump has always used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    Class(ClassEntity),
    Struct(StructEntity),
}

impl Entity {
    pub fn native_name(&self) -> &str {
        match self {
            Entity::Class(c) => &c.native_name,
            Entity::Struct(s) => &s.native_name,
        }
    }

}

// ═══════════════════════════════════════════════════════════════════════════════
// CROSS-TYPE LOOKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Enum reference resolved against the whole schema, with the owning class
/// for namespace qualification in generated casts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedEnum {
    pub owner: String,
    pub name: String,
}

/// The complete parse result of one run: every entity from every header, in
/// input order. Acts as the global symbol table during generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub entities: Vec<Entity>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntity> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Class(c) => Some(c),
            Entity::Struct(_) => None,
        })
    }

    /// Resolves a bare or `Owner::Name` qualified enum reference. Bare names
    /// resolve against the current class first, then against every class in
    /// the schema.
    pub fn resolve_enum(&self, current: Option<&ClassEntity>, name: &str) -> Option<QualifiedEnum> {
        if let Some((owner, bare)) = name.split_once("::") {
            let class = self.classes().find(|c| c.native_name == owner)?;
            let found = class.find_enum(bare)?;
            return Some(QualifiedEnum {
                owner: class.native_name.clone(),
                name: found.native_name.clone(),
            });
        }

        if let Some(class) = current {
            if let Some(found) = class.find_enum(name) {
                return Some(QualifiedEnum {
                    owner: class.native_name.clone(),
                    name: found.native_name.clone(),
                });
            }
        }

        self.classes().find_map(|class| {
            class.find_enum(name).map(|found| QualifiedEnum {
                owner: class.native_name.clone(),
                name: found.native_name.clone(),
            })
        })
    }

    /// Finds a struct by native name: nested structs of the current class
    /// shadow free-standing ones.
    pub fn resolve_struct<'a>(
        &'a self,
        current: Option<&'a ClassEntity>,
        name: &str,
    ) -> Option<&'a StructEntity> {
        if let Some(class) = current {
            if let Some(nested) = class.structs.iter().find(|s| s.native_name == name) {
                return Some(nested);
            }
        }
        self.entities.iter().find_map(|entity| match entity {
            Entity::Struct(s) if s.native_name == name => Some(s),
            _ => None,
        })
    }
}
