//! Dependency extraction for finalized classes and structs.
//!
//! A class depends on every entity it references through a reference-counted
//! handle: attribute types, method return types, every parameter of every
//! overload, and closure signatures. Value-typed references (enums, structs
//! by value, primitives) are available through the owning header and are
//! intentionally excluded. The result always contains the entity's own name
//! and is sorted so generated include lists are byte-stable across runs.

use std::collections::BTreeSet;

use crate::schema::{ClassEntity, StructMember};
use crate::types::{classify, TypeDetail};

pub fn class_dependencies(class: &ClassEntity) -> Vec<String> {
    let mut referenced: Vec<&TypeDetail> = Vec::new();

    for attribute in &class.attributes {
        referenced.push(&attribute.type_detail);
    }
    for method in &class.methods {
        referenced.push(&method.return_type_detail);
        for variant in &method.params {
            for param in variant {
                referenced.push(&param.type_detail);
            }
        }
    }
    for closure in &class.closures {
        referenced.push(&closure.return_type_detail);
        for param in &closure.params {
            referenced.push(&param.type_detail);
        }
    }

    collect(&class.native_name, referenced)
}

pub fn struct_dependencies(native_name: &str, members: &[StructMember]) -> Vec<String> {
    collect(
        native_name,
        members.iter().map(|m| &m.type_detail).collect(),
    )
}

fn collect(own_name: &str, referenced: Vec<&TypeDetail>) -> Vec<String> {
    let mut names = BTreeSet::new();
    names.insert(own_name.to_string());

    let mut targets = Vec::new();
    for detail in referenced {
        classify(detail).collect_handle_targets(&mut targets);
    }
    names.extend(targets);

    names.into_iter().collect()
}
