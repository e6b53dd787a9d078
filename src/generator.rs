//! Binding code generator.
//!
//! Consumes finalized schema entities and emits one C++ translation unit pair
//! per entity plus the aggregate init header. The emitted text is flat and
//! unindented; the build runs it through clang-format. Generation is pure
//! with respect to its inputs, so identical schemas produce byte-identical
//! output.

use crate::diagnostics::{Diagnostic, Diagnostics, DIAG_UNKNOWN_TYPE};
use crate::registry::{scalar_conv, unknown_conv, ScalarConv, OBJECT_TAG, TEXT_CONV};
use crate::schema::{ClassEntity, Entity, MethodEntity, ParamEntity, Schema, StructEntity};
use crate::types::{classify, Scalar, TypeDesc, TypeDetail};

const AUTOGEN_BANNER: &str = "\
// ---------------------------------------------------------------------------
//
//  This file is produced by the MRI binding generator from an annotated
//  engine interface header. Edits will be overwritten on the next run.
//
";

/// One generated translation-unit pair.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub header_name: String,
    pub header: String,
    pub source_name: String,
    pub source: String,
    pub init_call: String,
}

pub fn generate_entity(
    entity: &Entity,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> GeneratedUnit {
    match entity {
        Entity::Class(class) => generate_class(class, schema, diagnostics),
        Entity::Struct(strukt) => generate_struct(strukt, schema, diagnostics),
    }
}

/// Renders `mri_init_autogen.h` from every generated unit, in unit order.
pub fn aggregate_init_header(units: &[GeneratedUnit]) -> String {
    let mut includes = String::new();
    for unit in units {
        includes.push_str(&format!("#include \"binding/mri/{}\"\n", unit.header_name));
    }
    let mut calls = String::new();
    for unit in units {
        calls.push_str(&format!("  {};\n", unit.init_call));
    }

    format!(
        "\n#ifndef BINDING_MRI_MRI_INIT_AUTOGEN_H_\n\
         #define BINDING_MRI_MRI_INIT_AUTOGEN_H_\n\n\
         {includes}\n\
         namespace binding {{\n\n\
         inline void InitMriAutogen() {{\n\
         {calls}\
         }}\n\n\
         }} // namespace binding\n\n\
         #endif // !BINDING_MRI_MRI_INIT_AUTOGEN_H_\n"
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED UNIT SCAFFOLDING
// ═══════════════════════════════════════════════════════════════════════════════

fn render_header_unit(native: &str, header_file: &str, with_datatype: bool) -> String {
    let guard = format!("BINDING_MRI_AUTOGEN_{}_BINDING_H_", native.to_uppercase());
    let mut out = String::from(AUTOGEN_BANNER);
    out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    out.push_str("#include \"binding/mri/mri_util.h\"\n");
    out.push_str(&format!("#include \"content/public/{header_file}\"\n"));
    out.push_str("\nnamespace binding {\n\n");
    if with_datatype {
        out.push_str(&format!("MRI_DECLARE_DATATYPE({native});\n\n"));
    }
    out.push_str(&format!("void Init{native}Binding();\n\n"));
    out.push_str("}\n");
    out.push_str(&format!("\n#endif // !{guard}\n"));
    out
}

fn render_source_prolog(native: &str, dependency: &[String]) -> String {
    let mut out = String::from(AUTOGEN_BANNER);
    out.push_str(&format!(
        "\n#include \"binding/mri/autogen_{}_binding.h\"\n\n",
        native.to_lowercase()
    ));
    for dep in dependency {
        if dep == native {
            continue;
        }
        out.push_str(&format!(
            "#include \"binding/mri/autogen_{}_binding.h\"\n",
            dep.to_lowercase()
        ));
    }
    out.push_str("\nnamespace binding {\n");
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASS UNITS
// ═══════════════════════════════════════════════════════════════════════════════

fn generate_class(
    class: &ClassEntity,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> GeneratedUnit {
    let native = &class.native_name;

    let header = render_header_unit(native, &class.filename, !class.is_module);

    let mut source = render_source_prolog(native, &class.dependency);
    if !class.is_module {
        source.push_str(&format!(
            "MRI_DEFINE_DATATYPE_REF({native}, \"{}\", content::{native});\n",
            class.binding_name
        ));
        if class.is_comparable {
            source.push_str(&format!("MRI_OBJECT_ID_COMPARE_CUSTOM({native});\n"));
        } else {
            source.push_str(&format!("MRI_OBJECT_ID_COMPARE({native});\n"));
        }
    }
    source.push_str("\n\n");

    // Attribute accessors are ordinary thunks from the dispatcher's point of
    // view; registration happens through the attribute macros instead.
    let mut thunk_methods: Vec<MethodEntity> = class.methods.clone();
    for attribute in &class.attributes {
        thunk_methods.push(MethodEntity {
            binding_name: attribute.binding_name.clone(),
            native_name: format!("Get_{}", attribute.native_name),
            is_static: attribute.is_static,
            return_type_raw: attribute.type_raw.clone(),
            return_type_detail: attribute.type_detail.clone(),
            params: vec![vec![]],
        });
        thunk_methods.push(MethodEntity {
            binding_name: format!("{}=", attribute.binding_name),
            native_name: format!("Put_{}", attribute.native_name),
            is_static: attribute.is_static,
            return_type_raw: "void".to_string(),
            return_type_detail: TypeDetail::plain("void"),
            params: vec![vec![ParamEntity {
                native_name: "value".to_string(),
                type_raw: attribute.type_raw.clone(),
                type_detail: attribute.type_detail.clone(),
                is_optional: false,
                default_value: None,
            }]],
        });
    }

    for method in &thunk_methods {
        render_method_thunk(&mut source, class, method, schema, diagnostics);
    }

    render_class_init(&mut source, class);
    source.push_str("} // namespace binding\n");

    GeneratedUnit {
        header_name: format!("autogen_{}_binding.h", native.to_lowercase()),
        header,
        source_name: format!("autogen_{}_binding.cc", native.to_lowercase()),
        source,
        init_call: format!("Init{native}Binding()"),
    }
}

fn render_class_init(out: &mut String, class: &ClassEntity) {
    let native = &class.native_name;
    let binding = &class.binding_name;

    out.push_str(&format!("void Init{native}Binding() {{\n"));

    if class.is_module {
        out.push_str(&format!("VALUE klass = rb_define_module(\"{binding}\");\n"));
    } else {
        out.push_str(&format!(
            "VALUE klass = rb_define_class(\"{binding}\", rb_cObject);\n"
        ));
        out.push_str(&format!(
            "rb_define_alloc_func(klass, MriClassAllocate<&k{native}DataType>);\n"
        ));
        // Engine object identity is stable; Ruby object identity is not.
        out.push_str("MriDefineMethod(klass, \"engine_id\", MriGetEngineID);\n");
        out.push_str(&format!("MRI_DECLARE_OBJECT_COMPARE(klass, {native});\n"));
    }

    if class.is_serializable {
        out.push_str(&format!(
            "MriInitSerializableBinding<content::{native}>(klass);\n"
        ));
    }

    for enum_entity in &class.enums {
        for constant in &enum_entity.constants {
            out.push_str(&format!(
                "rb_const_set(klass, rb_intern(\"{constant}\"), INT2NUM(content::{native}::{}::{constant}));\n",
                enum_entity.native_name
            ));
        }
        out.push('\n');
    }

    for attribute in &class.attributes {
        let declare = if class.is_module {
            "MRI_DECLARE_MODULE_ATTRIBUTE"
        } else if attribute.is_static {
            "MRI_DECLARE_CLASS_ATTRIBUTE"
        } else {
            "MRI_DECLARE_ATTRIBUTE"
        };
        out.push_str(&format!(
            "{declare}(klass, \"{}\", {binding}, {});\n",
            attribute.binding_name, attribute.native_name
        ));
    }

    for method in &class.methods {
        let declare = if method.binding_name == "initialize"
            || method.binding_name == "initialize_copy"
        {
            "MriDefineMethod"
        } else if class.is_module {
            "MriDefineModuleFunction"
        } else if method.is_static {
            "MriDefineClassMethod"
        } else {
            "MriDefineMethod"
        };
        out.push_str(&format!(
            "{declare}(klass, \"{}\", {binding}_{});\n",
            method.binding_name, method.native_name
        ));
    }

    out.push_str("}\n");
}

// ═══════════════════════════════════════════════════════════════════════════════
// METHOD THUNKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-parameter emission plan.
struct ParamPlan {
    decl: String,
    parse_ref: String,
    tag: String,
    convert: Option<String>,
    call_arg: String,
}

fn render_method_thunk(
    out: &mut String,
    class: &ClassEntity,
    method: &MethodEntity,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) {
    let binding_class = &class.binding_name;
    let dispatched = method.params.len() > 1;

    out.push_str(&format!(
        "MRI_METHOD({binding_class}_{}) {{\n",
        method.native_name
    ));
    if dispatched {
        out.push_str("switch (argc) {\n");
    }

    for variant in &method.params {
        if dispatched {
            out.push_str(&format!("case {}: {{\n", variant.len()));
        }
        render_variant(out, class, method, variant, schema, diagnostics);
        if dispatched {
            out.push_str("}\n");
        }
    }

    if dispatched {
        out.push_str("default:\n");
        out.push_str(
            "rb_raise(rb_eArgError, \"failed to determine overload method. (count: %d)\", argc);\n",
        );
        out.push_str("return Qnil;\n");
        out.push_str("}\n");
    }

    out.push_str("}\n\n");
}

fn render_variant(
    out: &mut String,
    class: &ClassEntity,
    method: &MethodEntity,
    variant: &[ParamEntity],
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) {
    let native_class = &class.native_name;

    let mut template = String::new();
    let mut references = Vec::new();
    let mut converts = String::new();
    let mut call_args = String::new();
    let mut in_optional = false;

    for param in variant {
        if !in_optional && param.is_optional {
            template.push('|');
        }
        in_optional = param.is_optional;

        let plan = plan_param(param, class, schema, diagnostics, &class.filename);
        out.push_str(&plan.decl);
        template.push_str(&plan.tag);
        references.push(plan.parse_ref);
        if let Some(convert) = plan.convert {
            converts.push_str(&convert);
        }
        call_args.push_str(&format!("{}, ", plan.call_arg));
    }

    if !references.is_empty() {
        out.push_str(&format!(
            "MriParseArgsTo(argc, argv, \"{template}\", {});\n",
            references.join(", ")
        ));
    }
    out.push_str(&converts);
    out.push('\n');

    if !method.is_static {
        if class.is_module {
            out.push_str(&format!(
                "scoped_refptr self_obj = MriGetGlobalModules()->{};\n",
                class.binding_name
            ));
        } else {
            out.push_str(&format!(
                "scoped_refptr self_obj = MriGetStructData<content::{native_class}>(self);\n"
            ));
        }
    }

    out.push_str("content::ExceptionState exception_state;\n");
    let return_prefix = if method.return_type_detail.root_type == "void" {
        ""
    } else {
        "auto _return_value = "
    };
    if method.is_static {
        out.push_str(&format!(
            "{return_prefix}content::{native_class}::{}(MriGetCurrentContext(), {call_args}exception_state);\n",
            method.native_name
        ));
    } else {
        out.push_str(&format!(
            "{return_prefix}self_obj->{}({call_args}exception_state);\n",
            method.native_name
        ));
    }
    out.push_str("MriProcessException(exception_state);\n");

    render_return(out, class, method, schema, diagnostics);
}

fn render_return(
    out: &mut String,
    class: &ClassEntity,
    method: &MethodEntity,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) {
    let detail = &method.return_type_detail;
    let desc = classify(detail);

    if desc == TypeDesc::Void {
        out.push_str("return Qnil;\n");
        return;
    }

    // Constructors hand ownership of the fresh object to the receiver.
    if method.native_name == "New" || method.native_name == "Copy" {
        out.push_str("_return_value->AddRef();\n");
        out.push_str("MriSetStructData(self, _return_value.get());\n");
        out.push_str("return self;\n");
        return;
    }

    match &desc {
        TypeDesc::Primitive(scalar) => {
            out.push_str(&format!(
                "VALUE _result = {}(_return_value);\n",
                scalar_conv(*scalar).to_value
            ));
        }
        TypeDesc::Text => {
            out.push_str(&format!(
                "VALUE _result = {}(_return_value);\n",
                TEXT_CONV.to_value
            ));
        }
        TypeDesc::Named(name) => {
            if schema.resolve_enum(Some(class), name).is_some() {
                out.push_str("VALUE _result = INT2NUM(_return_value);\n");
            } else {
                warn_unknown(
                    diagnostics,
                    &class.filename,
                    &format!("return type `{name}` of `{}`", method.native_name),
                );
                out.push_str("VALUE _result = INT2NUM(_return_value);\n");
            }
        }
        TypeDesc::Handle(_) => {
            let target = handle_target(&desc).unwrap_or(&detail.root_type);
            out.push_str(&format!(
                "VALUE _result = MriWrapObject<content::{target}>(_return_value, k{target}DataType);\n"
            ));
        }
        TypeDesc::Sequence(inner) => {
            let convert = match &**inner {
                TypeDesc::Handle(_) => {
                    let target = handle_target(inner).unwrap_or(&detail.root_type);
                    format!("CXX2RBARRAY<content::{target}>(_return_value, k{target}DataType)")
                }
                TypeDesc::Named(name) if schema.resolve_enum(Some(class), name).is_some() => {
                    "CXX2RBARRAY<int32_t>(_return_value)".to_string()
                }
                _ => format!("CXX2RBARRAY<{}>(_return_value)", detail.root_type),
            };
            out.push_str(&format!("VALUE _result = {convert};\n"));
        }
        TypeDesc::Optional(_) | TypeDesc::Void => {
            warn_unknown(
                diagnostics,
                &class.filename,
                &format!("return type `{}` of `{}`", method.return_type_raw, method.native_name),
            );
            out.push_str("VALUE _result = Qnil;\n");
        }
    }
    out.push_str("return _result;\n");
}

fn plan_param(
    param: &ParamEntity,
    class: &ClassEntity,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
    file: &str,
) -> ParamPlan {
    let name = &param.native_name;
    let detail = &param.type_detail;
    let desc = classify(detail);

    let scalar_plan = |conv: ScalarConv, call_cast: &str| {
        let decl = match &param.default_value {
            Some(default) => format!("{} {name} = {default};\n", conv.c_type),
            None => format!("{} {name};\n", conv.c_type),
        };
        ParamPlan {
            decl,
            parse_ref: format!("&{name}"),
            tag: conv.parse_tag.to_string(),
            convert: None,
            call_arg: format!("{call_cast}{name}"),
        }
    };

    match &desc {
        TypeDesc::Primitive(Scalar::F32) => scalar_plan(scalar_conv(Scalar::F32), "(float)"),
        TypeDesc::Primitive(scalar) => scalar_plan(scalar_conv(*scalar), ""),
        TypeDesc::Text => scalar_plan(TEXT_CONV, ""),
        TypeDesc::Named(type_name) => {
            if let Some(found) = schema.resolve_enum(Some(class), type_name) {
                let conv = unknown_conv();
                let mut plan = scalar_plan(conv, "");
                plan.call_arg = format!("(content::{}::{}){name}", found.owner, found.name);
                plan
            } else if schema.resolve_struct(Some(class), type_name).is_some() {
                // Struct values arrive as wrapped objects like handles do. An
                // omitted optional stays Qnil and keeps the default-built value.
                let (decl, convert) = if param.is_optional {
                    (
                        format!("VALUE {name}_obj = Qnil;\n"),
                        format!(
                            "content::{type_name} {name};\nif ({name}_obj != Qnil)\n{name} = *MriGetStructData<content::{type_name}>({name}_obj);\n"
                        ),
                    )
                } else {
                    (
                        format!("VALUE {name}_obj;\n"),
                        format!(
                            "auto {name} = *MriGetStructData<content::{type_name}>({name}_obj);\n"
                        ),
                    )
                };
                ParamPlan {
                    decl,
                    parse_ref: format!("&{name}_obj"),
                    tag: OBJECT_TAG.to_string(),
                    convert: Some(convert),
                    call_arg: name.clone(),
                }
            } else {
                warn_unknown(diagnostics, file, &format!("parameter `{name}: {type_name}`"));
                scalar_plan(unknown_conv(), "")
            }
        }
        TypeDesc::Handle(_) => {
            let target = handle_target(&desc)
                .unwrap_or(&detail.root_type)
                .to_string();
            let decl = if param.is_optional {
                format!("VALUE {name}_obj = Qnil;\n")
            } else {
                format!("VALUE {name}_obj;\n")
            };
            ParamPlan {
                decl,
                parse_ref: format!("&{name}_obj"),
                tag: OBJECT_TAG.to_string(),
                convert: Some(format!(
                    "auto {name} = MriCheckStructData<content::{target}>({name}_obj, k{target}DataType);\n"
                )),
                call_arg: name.clone(),
            }
        }
        TypeDesc::Sequence(inner) => {
            let convert = match &**inner {
                TypeDesc::Handle(_) => {
                    let target = handle_target(inner).unwrap_or(&detail.root_type);
                    format!("RBARRAY2CXX<content::{target}>({name}_ary, k{target}DataType)")
                }
                TypeDesc::Named(element) => {
                    if let Some(found) = schema.resolve_enum(Some(class), element) {
                        format!("RBARRAY2CXX<content::{}::{}>({name}_ary)", found.owner, found.name)
                    } else {
                        warn_unknown(diagnostics, file, &format!("element `{element}` of `{name}`"));
                        format!("RBARRAY2CXX<{}>({name}_ary)", detail.root_type)
                    }
                }
                _ => format!("RBARRAY2CXX<{}>({name}_ary)", detail.root_type),
            };
            let decl = if param.is_optional {
                format!("VALUE {name}_ary = Qnil;\n")
            } else {
                format!("VALUE {name}_ary;\n")
            };
            ParamPlan {
                decl,
                parse_ref: format!("&{name}_ary"),
                tag: OBJECT_TAG.to_string(),
                convert: Some(format!("auto {name} = {convert};\n")),
                call_arg: name.clone(),
            }
        }
        TypeDesc::Optional(_) | TypeDesc::Void => {
            warn_unknown(
                diagnostics,
                file,
                &format!("parameter `{name}: {}`", param.type_raw),
            );
            scalar_plan(unknown_conv(), "")
        }
    }
}

fn handle_target(desc: &TypeDesc) -> Option<&String> {
    match desc {
        TypeDesc::Handle(inner) => match &**inner {
            TypeDesc::Named(name) => Some(name),
            nested => handle_target(nested),
        },
        _ => None,
    }
}

fn warn_unknown(diagnostics: &mut Diagnostics, file: &str, what: &str) {
    diagnostics.push(Diagnostic::warning(
        DIAG_UNKNOWN_TYPE,
        format!("{what} resolves to no known entity; defaulting to integer conversion"),
        file,
        0,
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCT UNITS
// ═══════════════════════════════════════════════════════════════════════════════

fn generate_struct(
    strukt: &StructEntity,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> GeneratedUnit {
    let native = &strukt.native_name;
    let binding = &strukt.binding_name;

    let header = render_header_unit(native, &strukt.filename, true);

    let mut source = render_source_prolog(native, &strukt.dependency);
    source.push_str(&format!(
        "MRI_DEFINE_DATATYPE_REF({native}, \"{binding}\", content::{native});\n"
    ));
    source.push_str("\n\n");

    for member in &strukt.members {
        render_member_accessors(&mut source, strukt, member, schema, diagnostics);
    }

    source.push_str(&format!("void Init{native}Binding() {{\n"));
    source.push_str(&format!(
        "VALUE klass = rb_define_class(\"{binding}\", rb_cObject);\n"
    ));
    source.push_str(&format!(
        "rb_define_alloc_func(klass, MriClassAllocate<&k{native}DataType>);\n"
    ));
    source.push_str("MriDefineMethod(klass, \"engine_id\", MriGetEngineID);\n");
    source.push_str(&format!(
        "MriDefineMethod(klass, \"initialize\", MriCommonStructNew<content::{native}>);\n"
    ));
    for member in &strukt.members {
        source.push_str(&format!(
            "MRI_DECLARE_ATTRIBUTE(klass, \"{}\", {binding}, {});\n",
            member.native_name, member.native_name
        ));
    }
    source.push_str("\n}\n");
    source.push_str("} // namespace binding\n");

    GeneratedUnit {
        header_name: format!("autogen_{}_binding.h", native.to_lowercase()),
        header,
        source_name: format!("autogen_{}_binding.cc", native.to_lowercase()),
        source,
        init_call: format!("Init{native}Binding()"),
    }
}

fn render_member_accessors(
    out: &mut String,
    strukt: &StructEntity,
    member: &crate::schema::StructMember,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) {
    let native = &strukt.native_name;
    let binding = &strukt.binding_name;
    let name = &member.native_name;
    let detail = &member.type_detail;
    let desc = classify(detail);

    // Getter.
    out.push_str(&format!("MRI_METHOD({binding}_Get_{name}) {{\n"));
    out.push_str("if (argc > 0)\nrb_raise(rb_eArgError, \"Too many arguments for struct getter.\");\n");
    out.push_str(&format!(
        "scoped_refptr self_obj = MriGetStructData<content::{native}>(self);\n"
    ));
    match member_get_expr(&desc, detail, name, schema) {
        Some(expr) => out.push_str(&format!("VALUE result = {expr};\n")),
        None => {
            warn_unknown(
                diagnostics,
                &strukt.filename,
                &format!("member `{name}: {}`", member.type_raw),
            );
            out.push_str("VALUE result = Qnil;\n");
        }
    }
    out.push_str("return result;\n}\n\n");

    // Setter.
    out.push_str(&format!("MRI_METHOD({binding}_Put_{name}) {{\n"));
    out.push_str("if (argc > 1)\nrb_raise(rb_eArgError, \"Too many arguments for struct setter.\");\n");
    out.push_str(&format!(
        "scoped_refptr self_obj = MriGetStructData<content::{native}>(self);\n"
    ));
    if let Some(line) = member_put_stmt(&desc, detail, name, schema) {
        out.push_str(&line);
    }
    out.push_str("return self;\n}\n\n");
}

fn member_get_expr(
    desc: &TypeDesc,
    detail: &TypeDetail,
    name: &str,
    schema: &Schema,
) -> Option<String> {
    match desc {
        TypeDesc::Primitive(scalar) => Some(format!(
            "{}(self_obj->{name})",
            scalar_conv(*scalar).to_value
        )),
        TypeDesc::Text => Some(format!("{}(self_obj->{name})", TEXT_CONV.to_value)),
        TypeDesc::Named(type_name) if schema.resolve_enum(None, type_name).is_some() => {
            Some(format!("INT2NUM(self_obj->{name})"))
        }
        TypeDesc::Handle(_) => {
            let target = handle_target(desc)?;
            Some(format!(
                "MriWrapObject<content::{target}>(self_obj->{name}, k{target}DataType)"
            ))
        }
        TypeDesc::Sequence(inner) => match &**inner {
            TypeDesc::Handle(_) => {
                let target = handle_target(inner)?;
                Some(format!(
                    "CXX2RBARRAY<content::{target}>(self_obj->{name}, k{target}DataType)"
                ))
            }
            TypeDesc::Named(element) if schema.resolve_enum(None, element).is_some() => Some(
                format!("CXX2RBARRAY<content::{}>(self_obj->{name})", detail.root_type),
            ),
            TypeDesc::Primitive(_) | TypeDesc::Text => Some(format!(
                "CXX2RBARRAY<{}>(self_obj->{name})",
                detail.root_type
            )),
            _ => None,
        },
        _ => None,
    }
}

fn member_put_stmt(
    desc: &TypeDesc,
    detail: &TypeDetail,
    name: &str,
    schema: &Schema,
) -> Option<String> {
    match desc {
        TypeDesc::Primitive(scalar) => Some(format!(
            "self_obj->{name} = {}(argv[0]);\n",
            scalar_conv(*scalar).from_value
        )),
        TypeDesc::Text => Some(format!(
            "self_obj->{name} = {}(argv[0]);\n",
            TEXT_CONV.from_value
        )),
        TypeDesc::Named(type_name) if schema.resolve_enum(None, type_name).is_some() => Some(
            format!("self_obj->{name} = (content::{type_name})NUM2INT(argv[0]);\n"),
        ),
        TypeDesc::Handle(_) => {
            let target = handle_target(desc)?;
            Some(format!(
                "self_obj->{name} = MriCheckStructData<content::{target}>(argv[0], k{target}DataType);\n"
            ))
        }
        TypeDesc::Sequence(inner) => match &**inner {
            TypeDesc::Handle(_) => {
                let target = handle_target(inner)?;
                Some(format!(
                    "self_obj->{name} = RBARRAY2CXX<content::{target}>(argv[0], k{target}DataType);\n"
                ))
            }
            TypeDesc::Named(element) if schema.resolve_enum(None, element).is_some() => Some(
                format!(
                    "self_obj->{name} = RBARRAY2CXX<content::{}>(argv[0]);\n",
                    detail.root_type
                ),
            ),
            TypeDesc::Primitive(_) | TypeDesc::Text => Some(format!(
                "self_obj->{name} = RBARRAY2CXX<{}>(argv[0]);\n",
                detail.root_type
            )),
            _ => None,
        },
        _ => None,
    }
}
