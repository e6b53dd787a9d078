#[cfg(test)]
mod tests {
    use crate::diagnostics::{
        Severity, DIAG_MISSING_BINDING_NAME, DIAG_ORPHAN_DECLARATION, DIAG_OVERLOAD_ARITY_CLASH,
    };
    use crate::scanner::scan_header;
    use crate::schema::Entity;

    const WIDGET_HEADER: &str = r#"
// Copyright header of the engine.

#ifndef CONTENT_PUBLIC_ENGINE_WIDGET_H_
#define CONTENT_PUBLIC_ENGINE_WIDGET_H_

namespace content {

/*--urge(name:Widget)--*/
class URGE_OBJECT(Widget) {
 public:
  virtual ~Widget() = default;

  /*--urge(name:State)--*/
  enum State {
    STATE_IDLE = 0,
    STATE_ACTIVE,
    STATE_DISPOSED,
  };

  /*--urge(name:initialize)--*/
  static scoped_refptr<Widget> New(ExecutionContext* execution_context,
                                   uint32_t width,
                                   uint32_t height,
                                   ExceptionState& exception_state);

  /*--urge(name:initialize)--*/
  static scoped_refptr<Widget> New(ExecutionContext* execution_context,
                                   const std::string& label,
                                   uint32_t width,
                                   uint32_t height,
                                   ExceptionState& exception_state);

  /*--urge(serializable)--*/
  URGE_EXPORT_SERIALIZABLE(Widget);

  /*--urge(name:area)--*/
  virtual scoped_refptr<Rect> GetArea(ExceptionState& exception_state) = 0;

  /*--urge(name:fill,optional:opacity=255)--*/
  virtual void Fill(scoped_refptr<Color> color,
                    uint32_t opacity,
                    ExceptionState& exception_state) = 0;

  /*--urge(name:mode)--*/
  virtual void SetMode(State mode, ExceptionState& exception_state) = 0;

  /*--urge(name:visible)--*/
  URGE_EXPORT_ATTRIBUTE(Visible, bool);
};

}  // namespace content

#endif  //! CONTENT_PUBLIC_ENGINE_WIDGET_H_
"#;

    #[test]
    fn test_widget_header_scan() {
        let output = scan_header(WIDGET_HEADER, "engine_widget.h");
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.entities.len(), 1);

        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.native_name, "Widget");
        assert_eq!(class.binding_name, "Widget");
        assert!(class.is_serializable);
        assert!(!class.is_module);
        assert_eq!(class.filename, "engine_widget.h");

        // New merged into one overload set; area, fill, mode stay separate.
        assert_eq!(class.methods.len(), 4);
        let new_method = &class.methods[0];
        assert_eq!(new_method.native_name, "New");
        assert_eq!(new_method.binding_name, "initialize");
        assert!(new_method.is_static);
        assert_eq!(new_method.params.len(), 2);
        assert_eq!(new_method.params[0].len(), 2);
        assert_eq!(new_method.params[1].len(), 3);

        assert_eq!(class.attributes.len(), 1);
        assert_eq!(class.attributes[0].binding_name, "visible");
        assert_eq!(class.attributes[0].native_name, "Visible");
        assert_eq!(class.attributes[0].type_detail.root_type, "bool");
    }

    #[test]
    fn test_context_parameters_are_dropped() {
        let output = scan_header(WIDGET_HEADER, "engine_widget.h");
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        for method in &class.methods {
            for variant in &method.params {
                for param in variant {
                    assert!(!param.type_raw.starts_with("ExecutionContext"));
                    assert!(!param.type_raw.starts_with("ExceptionState"));
                }
            }
        }
    }

    #[test]
    fn test_enum_constants_keep_declaration_order() {
        let output = scan_header(WIDGET_HEADER, "engine_widget.h");
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.enums.len(), 1);
        assert_eq!(class.enums[0].native_name, "State");
        assert_eq!(
            class.enums[0].constants,
            vec!["STATE_IDLE", "STATE_ACTIVE", "STATE_DISPOSED"]
        );
    }

    #[test]
    fn test_dependencies_are_sorted_and_include_self() {
        let output = scan_header(WIDGET_HEADER, "engine_widget.h");
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.dependency, vec!["Color", "Rect", "Widget"]);
    }

    #[test]
    fn test_optional_parameters_from_annotation() {
        let output = scan_header(WIDGET_HEADER, "engine_widget.h");
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        let fill = class
            .methods
            .iter()
            .find(|m| m.native_name == "Fill")
            .expect("Fill scanned");
        let variant = &fill.params[0];
        assert_eq!(variant.len(), 2);
        assert!(!variant[0].is_optional);
        assert!(variant[1].is_optional);
        assert_eq!(variant[1].default_value.as_deref(), Some("255"));
    }

    #[test]
    fn test_legacy_opener_matches_macro_opener() {
        let legacy = "\
/*--urge(name:Sprite)--*/
class URGE_RUNTIME_API Sprite : public base::RefCounted<Sprite> {
 public:
  /*--urge(name:flash)--*/
  virtual void Flash(ExceptionState& exception_state) = 0;
};
";
        let current = "\
/*--urge(name:Sprite)--*/
class URGE_OBJECT(Sprite) {
 public:
  /*--urge(name:flash)--*/
  virtual void Flash(ExceptionState& exception_state) = 0;
};
";
        let from_legacy = scan_header(legacy, "engine_sprite.h");
        let from_current = scan_header(current, "engine_sprite.h");
        assert!(from_legacy.diagnostics.is_empty());
        assert!(from_current.diagnostics.is_empty());

        let (Entity::Class(a), Entity::Class(b)) =
            (&from_legacy.entities[0], &from_current.entities[0])
        else {
            panic!("expected class entities");
        };
        assert_eq!(a.native_name, b.native_name);
        assert_eq!(a.methods.len(), b.methods.len());
        assert_eq!(a.methods[0].native_name, b.methods[0].native_name);
    }

    #[test]
    fn test_unannotated_declarations_are_ignored() {
        let source = "\
class PlainHelper {
 public:
  virtual void NotExported(ExceptionState& exception_state) = 0;
};
";
        let output = scan_header(source, "helper.h");
        assert!(output.entities.is_empty());
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_annotation_arms_exactly_one_declaration() {
        let source = "\
/*--urge(name:Rect)--*/
class URGE_OBJECT(Rect) {
 public:
  virtual ~Rect() = default;

  /*--urge(name:set)--*/
  virtual void Set(int32_t x, ExceptionState& exception_state) = 0;

  virtual void NotBound(ExceptionState& exception_state) = 0;
};
";
        let output = scan_header(source, "engine_rect.h");
        assert!(output.diagnostics.is_empty());

        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        // The destructor after the opener and the unannotated method after
        // `Set` fall through without arming anything.
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].native_name, "Set");
    }

    #[test]
    fn test_marker_macros_set_their_flags() {
        let source = "\
/*--urge(name:Bitmap)--*/
class URGE_OBJECT(Bitmap) {
 public:
  /*--urge(serializable)--*/
  URGE_EXPORT_SERIALIZABLE(Bitmap);

  /*--urge(comparable)--*/
  URGE_EXPORT_COMPARABLE(Bitmap);

  /*--urge(disposable)--*/
  URGE_EXPORT_DISPOSABLE(Bitmap);
};
";
        let output = scan_header(source, "engine_bitmap.h");
        assert!(output.diagnostics.is_empty());

        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert!(class.is_serializable);
        assert!(class.is_comparable);
        assert!(class.is_disposable);
    }

    #[test]
    fn test_equal_arity_overload_is_an_error() {
        let source = "\
/*--urge(name:Table)--*/
class URGE_OBJECT(Table) {
 public:
  /*--urge(name:resize)--*/
  virtual void Resize(int32_t xsize, ExceptionState& exception_state) = 0;

  /*--urge(name:resize)--*/
  virtual void Resize(uint32_t other, ExceptionState& exception_state) = 0;
};
";
        let output = scan_header(source, "engine_table.h");
        assert!(output.diagnostics.has_errors());
        let clash = output
            .diagnostics
            .iter()
            .find(|d| d.code == DIAG_OVERLOAD_ARITY_CLASH)
            .expect("arity clash reported");
        assert_eq!(clash.severity, Severity::Error);
        assert_eq!(clash.file, "engine_table.h");

        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].params.len(), 1);
    }

    #[test]
    fn test_missing_binding_name_warns_and_falls_back() {
        let source = "\
/*--urge()--*/
class URGE_OBJECT(Timer) {
 public:
  /*--urge()--*/
  virtual void Reset(ExceptionState& exception_state) = 0;
};
";
        let output = scan_header(source, "engine_timer.h");
        assert!(!output.diagnostics.has_errors());
        assert_eq!(
            output
                .diagnostics
                .iter()
                .filter(|d| d.code == DIAG_MISSING_BINDING_NAME)
                .count(),
            2
        );

        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.binding_name, "Timer");
        assert_eq!(class.methods[0].binding_name, "Reset");
    }

    #[test]
    fn test_marker_macro_without_class_is_orphaned() {
        let source = "\
/*--urge(serializable)--*/
URGE_EXPORT_SERIALIZABLE(Nothing);
";
        let output = scan_header(source, "stray.h");
        assert!(output.diagnostics.has_errors());
        assert!(output
            .diagnostics
            .iter()
            .any(|d| d.code == DIAG_ORPHAN_DECLARATION));
    }

    #[test]
    fn test_top_level_struct_entity() {
        let source = "\
/*--urge(name:ColorData)--*/
struct URGE_OBJECT(ColorData) {
  uint32_t red;
  uint32_t green;
  std::string label = \"none\";
};
";
        let output = scan_header(source, "engine_colordata.h");
        assert!(output.diagnostics.is_empty());
        let Entity::Struct(strukt) = &output.entities[0] else {
            panic!("expected a struct entity");
        };
        assert_eq!(strukt.native_name, "ColorData");
        assert_eq!(strukt.members.len(), 3);
        assert_eq!(strukt.members[0].native_name, "red");
        assert_eq!(strukt.members[2].native_name, "label");
        assert_eq!(strukt.members[2].default_value.as_deref(), Some("\"none\""));
        assert_eq!(strukt.dependency, vec!["ColorData"]);
    }

    #[test]
    fn test_nested_struct_and_constructor_cutoff() {
        let source = "\
/*--urge(name:Plane)--*/
class URGE_OBJECT(Plane) {
 public:
  /*--urge(name:Info)--*/
  struct Info {
    uint32_t depth;
    Info() : depth(0) {}
  };
};
";
        let output = scan_header(source, "engine_plane.h");
        assert!(output.diagnostics.is_empty());
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.structs.len(), 1);
        assert_eq!(class.structs[0].native_name, "Info");
        assert_eq!(class.structs[0].members.len(), 1);
    }

    #[test]
    fn test_closure_alias_signature() {
        let source = "\
/*--urge(name:Viewport)--*/
class URGE_OBJECT(Viewport) {
 public:
  /*--urge(name:render_callback)--*/
  using RenderCallback = base::RepeatingCallback<void(scoped_refptr<Viewport> target)>;
};
";
        let output = scan_header(source, "engine_viewport.h");
        assert!(output.diagnostics.is_empty());
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.closures.len(), 1);
        let closure = class
            .find_closure("RenderCallback")
            .expect("closure resolvable by native name");
        assert_eq!(closure.native_name, "RenderCallback");
        assert_eq!(closure.return_type_detail.root_type, "void");
        assert_eq!(closure.params.len(), 1);
        assert_eq!(closure.params[0].native_name, "target");
        assert_eq!(closure.params[0].type_detail.root_type, "Viewport");
        // Closure signatures feed the dependency set.
        assert_eq!(class.dependency, vec!["Viewport"]);
    }

    #[test]
    fn test_multiline_annotation_decodes() {
        let source = "\
/*--urge(name:Screen,
         is_module)--*/
class URGE_OBJECT(Screen) {
};
";
        let output = scan_header(source, "engine_screen.h");
        assert!(output.diagnostics.is_empty());
        let Entity::Class(class) = &output.entities[0] else {
            panic!("expected a class entity");
        };
        assert_eq!(class.binding_name, "Screen");
        assert!(class.is_module);
    }
}
