//! Declaration scanner for annotated interface headers.
//!
//! A single-pass, line-oriented state machine. Each `/*--urge(...)--*/`
//! annotation arms the scanner for exactly one following declaration: a class
//! or struct opener, an enum body, an attribute or marker macro, a member
//! signature or a callback alias. Multi-line constructs are accumulated in
//! the state variant that owns them; once a state is entered it consumes every
//! line until its terminator. Unannotated lines never match anything and are
//! dropped, which is what lets full C++ headers pass through untouched.

use lazy_static::lazy_static;
use regex::Regex;

use crate::annotation::AnnotationMap;
use crate::dependency::{class_dependencies, struct_dependencies};
use crate::diagnostics::{
    Diagnostic, Diagnostics, DIAG_BAD_ATTRIBUTE_SHAPE, DIAG_BAD_CLASS_SHAPE,
    DIAG_BAD_CLOSURE_SHAPE, DIAG_BAD_ENUM_SHAPE, DIAG_BAD_METHOD_SHAPE, DIAG_BAD_STRUCT_SHAPE,
    DIAG_MALFORMED_ANNOTATION, DIAG_MISSING_BINDING_NAME, DIAG_ORPHAN_DECLARATION,
    DIAG_OVERLOAD_ARITY_CLASH,
};
use crate::schema::{
    AttributeEntity, ClassEntity, ClosureEntity, Entity, EnumEntity, MethodEntity, ParamEntity,
    StructEntity, StructMember,
};
use crate::types::{resolve_declarator, resolve_type, split_top_level};

/// Parameter types that carry engine context rather than script arguments;
/// they never cross the binding boundary.
const CONTEXT_PARAM_PREFIXES: &[&str] = &["ExecutionContext", "ExceptionState"];

lazy_static! {
    static ref CLASS_OBJECT: Regex =
        Regex::new(r"class\s+\w+\((\w+)\)").expect("valid pattern");
    static ref CLASS_LEGACY: Regex =
        Regex::new(r"class\s+(?:[A-Z][A-Z0-9_]*\s+)?(\w+)\s*:\s*public").expect("valid pattern");
    static ref STRUCT_OBJECT: Regex =
        Regex::new(r"struct\s+\w+\((\w+)\)").expect("valid pattern");
    static ref STRUCT_PLAIN: Regex = Regex::new(r"struct\s+(\w+)").expect("valid pattern");
    static ref ENUM_HEADER: Regex =
        Regex::new(r"enum\s+(?:class\s+|struct\s+)?(\w+)\s*(?::\s*(\w+))?\s*\{")
            .expect("valid pattern");
    static ref ENUM_CONSTANT: Regex =
        Regex::new(r"^([A-Z_][A-Z0-9_]*)").expect("valid pattern");
    static ref CLOSURE_ALIAS: Regex =
        Regex::new(r"using\s+(\w+)\s*=\s*[\w:]+<(.*)>\s*;").expect("valid pattern");
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// One variant per accumulation mode; each carries only the buffer it needs.
#[derive(Debug)]
enum ScanState {
    /// No annotation armed; lines are ignored until a sentinel appears.
    Idle,
    /// An annotation was decoded; the next recognized declaration consumes it.
    AwaitingDecl,
    /// Accumulating a multi-line annotation until `--*/`.
    Comment { buf: String },
    /// Accumulating a class opener until `{`.
    ClassSignature { buf: String },
    /// Accumulating an enum body until `};`.
    EnumBody { lines: Vec<String> },
    /// Accumulating a struct body until `};`.
    StructBody { lines: Vec<String> },
    /// Accumulating an attribute macro until `;`.
    AttributeMacro { buf: String },
    /// Accumulating a method signature until `;`.
    MemberSignature { buf: String },
    /// Accumulating a callback alias until `;`.
    ClosureAlias { buf: String },
}

#[derive(Debug)]
pub struct ScanOutput {
    pub entities: Vec<Entity>,
    pub diagnostics: Diagnostics,
}

/// Scans one header's text into schema entities plus diagnostics.
pub fn scan_header(source: &str, file: &str) -> ScanOutput {
    let mut scanner = Scanner::new(file);
    for line in source.lines() {
        scanner.line += 1;
        scanner.process_line(line.trim());
    }
    scanner.finish()
}

struct Scanner {
    file: String,
    line: u32,
    construct_line: u32,
    state: ScanState,
    pending: Option<AnnotationMap>,
    current_class: Option<ClassEntity>,
    entities: Vec<Entity>,
    diagnostics: Diagnostics,
}

impl Scanner {
    fn new(file: &str) -> Self {
        Scanner {
            file: file.to_string(),
            line: 0,
            construct_line: 0,
            state: ScanState::Idle,
            pending: None,
            current_class: None,
            entities: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    fn finish(mut self) -> ScanOutput {
        self.finalize_current_class();
        ScanOutput {
            entities: self.entities,
            diagnostics: self.diagnostics,
        }
    }

    // ───────────────────────────────────────────────────────────────────────
    // Line dispatch
    // ───────────────────────────────────────────────────────────────────────

    fn process_line(&mut self, line: &str) {
        match std::mem::replace(&mut self.state, ScanState::Idle) {
            ScanState::Comment { mut buf } => {
                buf.push_str(line);
                if line.contains("--*/") {
                    self.decode_annotation(&buf);
                } else {
                    self.state = ScanState::Comment { buf };
                }
            }
            ScanState::ClassSignature { mut buf } => {
                buf.push_str(line);
                if line.contains('{') {
                    self.begin_class(&buf);
                } else {
                    self.state = ScanState::ClassSignature { buf };
                }
            }
            ScanState::EnumBody { mut lines } => {
                lines.push(line.to_string());
                if line.contains("};") {
                    self.build_enum(&lines);
                } else {
                    self.state = ScanState::EnumBody { lines };
                }
            }
            ScanState::StructBody { mut lines } => {
                lines.push(line.to_string());
                if line.contains("};") {
                    self.build_struct(&lines);
                } else {
                    self.state = ScanState::StructBody { lines };
                }
            }
            ScanState::AttributeMacro { mut buf } => {
                buf.push_str(line);
                if line.contains(';') {
                    self.build_attribute(&buf);
                } else {
                    self.state = ScanState::AttributeMacro { buf };
                }
            }
            ScanState::MemberSignature { mut buf } => {
                buf.push_str(line);
                if line.contains(';') {
                    self.build_method(&buf);
                } else {
                    self.state = ScanState::MemberSignature { buf };
                }
            }
            ScanState::ClosureAlias { mut buf } => {
                buf.push_str(line);
                if line.contains(';') {
                    self.build_closure(&buf);
                } else {
                    self.state = ScanState::ClosureAlias { buf };
                }
            }
            state @ (ScanState::Idle | ScanState::AwaitingDecl) => {
                self.state = state;
                self.process_declaration(line);
            }
        }
    }

    fn process_declaration(&mut self, line: &str) {
        if line.starts_with("/*--urge") {
            self.construct_line = self.line;
            if line.contains("--*/") {
                self.decode_annotation(line);
            } else {
                self.state = ScanState::Comment {
                    buf: line.to_string(),
                };
            }
            return;
        }

        if !matches!(self.state, ScanState::AwaitingDecl) {
            return;
        }

        self.construct_line = self.line;

        if line.starts_with("class") {
            if line.contains('{') {
                self.begin_class(line);
            } else {
                self.state = ScanState::ClassSignature {
                    buf: line.to_string(),
                };
            }
            return;
        }

        if line.starts_with("enum") {
            // Engine coding style puts every enum body on multiple lines.
            self.state = ScanState::EnumBody {
                lines: vec![line.to_string()],
            };
            return;
        }

        if line.starts_with("struct") {
            self.state = ScanState::StructBody {
                lines: vec![line.to_string()],
            };
            return;
        }

        if line.starts_with("URGE_EXPORT_SERIALIZABLE") {
            self.set_class_flag(|class| class.is_serializable = true);
            return;
        }
        if line.starts_with("URGE_EXPORT_COMPARABLE") {
            self.set_class_flag(|class| class.is_comparable = true);
            return;
        }
        if line.starts_with("URGE_EXPORT_DISPOSABLE") {
            self.set_class_flag(|class| class.is_disposable = true);
            return;
        }

        if line.starts_with("URGE_EXPORT_ATTRIBUTE") || line.starts_with("URGE_EXPORT_STATIC_ATTRIBUTE")
        {
            if line.contains(';') {
                self.build_attribute(line);
            } else {
                self.state = ScanState::AttributeMacro {
                    buf: line.to_string(),
                };
            }
            return;
        }

        if line.starts_with("virtual") || line.starts_with("static") {
            if line.contains(';') {
                self.build_method(line);
            } else {
                self.state = ScanState::MemberSignature {
                    buf: line.to_string(),
                };
            }
            return;
        }

        if line.starts_with("using") {
            if line.contains(';') {
                self.build_closure(line);
            } else {
                self.state = ScanState::ClosureAlias {
                    buf: line.to_string(),
                };
            }
            return;
        }

        // Not a recognized declaration shape; stay armed. Interface headers
        // interleave access specifiers and destructors between the annotation
        // and the declaration it governs.
        self.state = ScanState::AwaitingDecl;
    }

    // ───────────────────────────────────────────────────────────────────────
    // Entity builders
    // ───────────────────────────────────────────────────────────────────────

    fn decode_annotation(&mut self, buffer: &str) {
        match AnnotationMap::decode(buffer) {
            Some(map) => {
                self.pending = Some(map);
                self.state = ScanState::AwaitingDecl;
            }
            None => {
                self.error(DIAG_MALFORMED_ANNOTATION, format!("cannot decode `{buffer}`"));
                self.state = ScanState::Idle;
            }
        }
    }

    fn take_annotation(&mut self) -> AnnotationMap {
        self.pending.take().unwrap_or_default()
    }

    fn binding_name_for(&mut self, annotation: &AnnotationMap, native: &str) -> String {
        match annotation.get("name") {
            Some(name) => name.to_string(),
            None => {
                self.warn(
                    DIAG_MISSING_BINDING_NAME,
                    format!("`{native}` has no name: entry; exporting as `{native}`"),
                );
                native.to_string()
            }
        }
    }

    fn begin_class(&mut self, signature: &str) {
        self.state = ScanState::Idle;
        let annotation = self.take_annotation();
        let native = CLASS_OBJECT
            .captures(signature)
            .or_else(|| CLASS_LEGACY.captures(signature))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let Some(native) = native else {
            self.error(
                DIAG_BAD_CLASS_SHAPE,
                format!("unrecognized class opener `{signature}`"),
            );
            return;
        };

        self.finalize_current_class();

        let binding = self.binding_name_for(&annotation, &native);
        let mut class = ClassEntity::new(native, binding);
        class.is_module = annotation.flag("is_module");
        class.filename = self.file.clone();
        self.current_class = Some(class);
    }

    fn finalize_current_class(&mut self) {
        if let Some(mut class) = self.current_class.take() {
            class.dependency = class_dependencies(&class);
            self.entities.push(Entity::Class(class));
        }
    }

    fn set_class_flag(&mut self, apply: impl FnOnce(&mut ClassEntity)) {
        self.state = ScanState::Idle;
        self.take_annotation();
        match self.current_class.as_mut() {
            Some(class) => apply(class),
            None => self.error(
                DIAG_ORPHAN_DECLARATION,
                "marker macro outside of a class body",
            ),
        }
    }

    fn build_enum(&mut self, lines: &[String]) {
        self.state = ScanState::Idle;
        let annotation = self.take_annotation();

        let Some(header) = ENUM_HEADER.captures(&lines[0]) else {
            self.error(
                DIAG_BAD_ENUM_SHAPE,
                format!("unrecognized enum opener `{}`", lines[0]),
            );
            return;
        };
        let native = header[1].to_string();
        let range = header.get(2).map(|m| m.as_str().to_string());

        let mut body = String::new();
        for line in &lines[1..] {
            if line.starts_with("};") {
                break;
            }
            if line.starts_with("//") {
                continue;
            }
            body.push_str(line);
        }

        let mut constants = Vec::new();
        for item in body.split(',') {
            if let Some(captures) = ENUM_CONSTANT.captures(item.trim()) {
                constants.push(captures[1].to_string());
            }
        }

        let binding = self.binding_name_for(&annotation, &native);
        let entity = EnumEntity {
            native_name: native,
            binding_name: binding,
            range,
            constants,
        };

        match self.current_class.as_mut() {
            Some(class) => class.enums.push(entity),
            None => self.error(DIAG_ORPHAN_DECLARATION, "enum outside of a class body"),
        }
    }

    fn build_struct(&mut self, lines: &[String]) {
        self.state = ScanState::Idle;
        let annotation = self.take_annotation();

        let top_level = STRUCT_OBJECT.captures(&lines[0]);
        let native = top_level
            .as_ref()
            .map(|c| c[1].to_string())
            .or_else(|| STRUCT_PLAIN.captures(&lines[0]).map(|c| c[1].to_string()));

        let Some(native) = native else {
            self.error(
                DIAG_BAD_STRUCT_SHAPE,
                format!("unrecognized struct opener `{}`", lines[0]),
            );
            return;
        };

        let mut body = String::new();
        for line in &lines[1..] {
            if line.starts_with("};") {
                break;
            }
            if line.starts_with("//") {
                continue;
            }
            // A constructor ends the member block.
            if line.starts_with(&format!("{native}(")) {
                break;
            }
            body.push_str(line);
        }

        let mut members = Vec::new();
        for declaration in body.split(';') {
            let declaration = declaration.trim();
            if declaration.is_empty() {
                continue;
            }
            let (decl, default_value) = match declaration.split_once('=') {
                Some((d, v)) => (d.trim(), Some(v.trim().to_string())),
                None => (declaration, None),
            };
            let (type_raw, type_detail, member_name) = resolve_declarator(decl);
            members.push(StructMember {
                native_name: member_name,
                type_raw,
                type_detail,
                default_value,
            });
        }

        let binding = self.binding_name_for(&annotation, &native);
        let entity = StructEntity {
            dependency: struct_dependencies(&native, &members),
            native_name: native,
            binding_name: binding,
            members,
            filename: self.file.clone(),
        };

        if top_level.is_some() {
            self.entities.push(Entity::Struct(entity));
        } else {
            match self.current_class.as_mut() {
                Some(class) => class.structs.push(entity),
                None => self.entities.push(Entity::Struct(entity)),
            }
        }
    }

    fn build_attribute(&mut self, buffer: &str) {
        self.state = ScanState::Idle;
        let annotation = self.take_annotation();

        let Some(open) = buffer.find('(') else {
            self.error(
                DIAG_BAD_ATTRIBUTE_SHAPE,
                format!("unrecognized attribute macro `{buffer}`"),
            );
            return;
        };
        let close = buffer.rfind(')').unwrap_or(buffer.len());
        let inner = &buffer[open + 1..close];

        let parts: Vec<&str> = split_top_level(inner, ',').iter().map(|p| p.trim()).collect();
        if parts.len() != 2 || parts[0].is_empty() {
            self.error(
                DIAG_BAD_ATTRIBUTE_SHAPE,
                format!("attribute macro takes (Name, type), got `{inner}`"),
            );
            return;
        }

        let native = parts[0].to_string();
        let (type_raw, type_detail) = resolve_type(parts[1]);
        let binding = annotation
            .get("name")
            .map(str::to_string)
            .unwrap_or_else(|| native.clone());

        let entity = AttributeEntity {
            binding_name: binding,
            native_name: native,
            type_raw,
            type_detail,
            is_static: buffer.trim_start().starts_with("URGE_EXPORT_STATIC_ATTRIBUTE"),
        };

        match self.current_class.as_mut() {
            Some(class) => class.attributes.push(entity),
            None => self.error(DIAG_ORPHAN_DECLARATION, "attribute outside of a class body"),
        }
    }

    fn build_method(&mut self, buffer: &str) {
        self.state = ScanState::Idle;
        let annotation = self.take_annotation();

        let Some((declaration, raw_params)) = split_signature(buffer) else {
            self.error(
                DIAG_BAD_METHOD_SHAPE,
                format!("unrecognized method signature `{buffer}`"),
            );
            return;
        };

        let tokens: Vec<&str> = declaration.split_whitespace().collect();
        if tokens.len() < 3 {
            self.error(
                DIAG_BAD_METHOD_SHAPE,
                format!("method declaration too short: `{declaration}`"),
            );
            return;
        }
        let is_static = tokens[0] == "static";
        let native = tokens[tokens.len() - 1].to_string();
        let return_text = tokens[1..tokens.len() - 1].join(" ");
        let (return_type_raw, return_type_detail) = resolve_type(&return_text);

        let optional_defaults = annotation.optional_defaults();
        let mut params = Vec::new();
        for piece in split_top_level(raw_params, ',') {
            let piece = piece.trim();
            if piece.is_empty()
                || CONTEXT_PARAM_PREFIXES
                    .iter()
                    .any(|prefix| piece.starts_with(prefix))
            {
                continue;
            }
            let (type_raw, type_detail, param_name) = resolve_declarator(piece);
            let default_value = optional_defaults
                .iter()
                .find(|(name, _)| *name == param_name)
                .map(|(_, value)| value.clone());
            params.push(ParamEntity {
                is_optional: default_value.is_some(),
                native_name: param_name,
                type_raw,
                type_detail,
                default_value,
            });
        }

        let binding = self.binding_name_for(&annotation, &native);
        let method = MethodEntity {
            binding_name: binding,
            native_name: native.clone(),
            is_static,
            return_type_raw,
            return_type_detail,
            params: vec![params],
        };

        match self.current_class.as_mut() {
            Some(class) => {
                if let Err(arity) = class.merge_method(method) {
                    let message = format!(
                        "overload of `{native}` repeats parameter count {arity}; \
                         argument-count dispatch cannot tell the variants apart"
                    );
                    self.error(DIAG_OVERLOAD_ARITY_CLASH, message);
                }
            }
            None => self.error(DIAG_ORPHAN_DECLARATION, "method outside of a class body"),
        }
    }

    fn build_closure(&mut self, buffer: &str) {
        self.state = ScanState::Idle;
        let annotation = self.take_annotation();

        let parsed = CLOSURE_ALIAS.captures(buffer).and_then(|captures| {
            let native = captures[1].to_string();
            let signature = captures[2].to_string();
            let open = signature.find('(')?;
            let close = signature.rfind(')')?;
            let return_text = signature[..open].trim().to_string();
            let args_text = signature[open + 1..close].to_string();
            Some((native, return_text, args_text))
        });

        let Some((native, return_text, args_text)) = parsed else {
            self.error(
                DIAG_BAD_CLOSURE_SHAPE,
                format!("unrecognized callback alias `{buffer}`"),
            );
            return;
        };

        let (return_type_raw, return_type_detail) = resolve_type(&return_text);
        let mut params = Vec::new();
        for piece in split_top_level(&args_text, ',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            let (type_raw, type_detail, param_name) = resolve_declarator(piece);
            params.push(ParamEntity {
                native_name: param_name,
                type_raw,
                type_detail,
                is_optional: false,
                default_value: None,
            });
        }

        let binding = self.binding_name_for(&annotation, &native);
        let entity = ClosureEntity {
            native_name: native,
            binding_name: binding,
            return_type_raw,
            return_type_detail,
            params,
        };

        match self.current_class.as_mut() {
            Some(class) => class.closures.push(entity),
            None => self.error(DIAG_ORPHAN_DECLARATION, "callback alias outside of a class body"),
        }
    }

    // ───────────────────────────────────────────────────────────────────────
    // Diagnostics
    // ───────────────────────────────────────────────────────────────────────

    fn error(&mut self, code: &str, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::error(code, message, &self.file, self.construct_line));
    }

    fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::warning(code, message, &self.file, self.construct_line));
    }
}

/// Splits a method signature into its declaration text and the parameter
/// list between the outermost parentheses.
fn split_signature(buffer: &str) -> Option<(&str, &str)> {
    let open = buffer.find('(')?;
    let mut depth = 0i32;
    for (idx, ch) in buffer[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&buffer[..open], &buffer[open + 1..open + idx]));
                }
            }
            _ => {}
        }
    }
    None
}
