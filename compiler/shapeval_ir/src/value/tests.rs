use super::*;
use crate::Ty;
use pretty_assertions::assert_eq;

#[test]
fn object_writes_are_visible_through_every_handle() {
    let outer = ObjectRef::new("Outer").with_field("Val1", 25);
    let alias = outer.clone();

    alias.set("Val1", 7);

    assert_eq!(outer.get("Val1"), Some(Value::Int(7)));
}

#[test]
fn missing_field_reads_none() {
    let outer = ObjectRef::new("Outer");
    assert!(outer.get("Val1").is_none());
}

#[test]
fn objects_compare_by_identity() {
    let a = ObjectRef::new("Outer").with_field("Val1", 1);
    let b = ObjectRef::new("Outer").with_field("Val1", 1);

    assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
    assert_ne!(Value::from(a), Value::from(b));
}

#[test]
fn scalars_compare_structurally() {
    assert_eq!(Value::from(5), Value::Int(5));
    assert_eq!(Value::from("hi"), Value::string("hi"));
    assert_ne!(Value::Int(5), Value::Float(5.0));
    assert_eq!(Value::Null, Value::Null);
}

#[test]
fn literal_rendering_keeps_kinds_apart() {
    assert_eq!(Value::Int(5).to_string(), "5");
    assert_eq!(Value::Float(5.0).to_string(), "5.0");
    assert_eq!(Value::string("a\"b").to_string(), r#""a\"b""#);
    assert_eq!(Value::Bool(false).to_string(), "false");
    assert_eq!(Value::Null.to_string(), "null");
}

#[test]
fn object_rendering_shows_class_not_contents() {
    let outer = ObjectRef::new("Outer").with_field("Val1", 25);
    let rendered = Value::from(outer).to_string();

    assert!(rendered.starts_with("<Outer@"));
    assert!(!rendered.contains("25"));
}

mod types {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn static_type_of_literals() {
        assert_eq!(Ty::of(&Value::Int(1)), Ty::Int);
        assert_eq!(Ty::of(&Value::Null), Ty::Any);
        assert_eq!(Ty::of(&ObjectRef::new("Inner").into()), Ty::named("Inner"));
    }

    #[test]
    fn named_types_accept_matching_objects_and_null() {
        let ty = Ty::named("Outer");
        assert!(ty.accepts(&ObjectRef::new("Outer").into()));
        assert!(ty.accepts(&Value::Null));
        assert!(!ty.accepts(&ObjectRef::new("Inner").into()));
        assert!(!ty.accepts(&Value::Int(1)));
    }

    #[test]
    fn any_accepts_everything() {
        assert!(Ty::Any.accepts(&Value::Int(1)));
        assert!(Ty::Any.accepts(&Value::Null));
        assert!(Ty::Any.accepts(&ObjectRef::new("Outer").into()));
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(Ty::Float.convert(Value::Int(3)).unwrap(), Value::Float(3.0));
        assert_eq!(Ty::Int.convert(Value::Float(-2.9)).unwrap(), Value::Int(-2));
        assert!(Ty::Int.convert(Value::Float(f64::NAN)).is_err());
        assert!(Ty::Int.convert(Value::Float(1e300)).is_err());
    }

    #[test]
    fn invalid_conversion_reports_both_types() {
        let err = Ty::named("Outer").convert(Value::Int(1)).unwrap_err();
        assert_eq!(
            err,
            crate::RuntimeError::InvalidCast {
                from: Ty::Int,
                to: Ty::named("Outer"),
            }
        );
    }

    #[test]
    fn static_conversion_rules() {
        assert!(Ty::Int.can_convert_from(&Ty::Float));
        assert!(Ty::named("Outer").can_convert_from(&Ty::Any));
        assert!(!Ty::named("Outer").can_convert_from(&Ty::named("Inner")));
        assert!(!Ty::Bool.can_convert_from(&Ty::Int));
    }
}
