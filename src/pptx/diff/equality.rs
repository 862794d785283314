//! Structural equality primitives for shape properties.
//!
//! Typed properties (transforms) compare field by field; the open-ended
//! DrawingML payloads compare through [`deep_equal`], which never panics on
//! differing internal shapes — a solid fill against a no-fill is simply
//! unequal via the mismatched type discriminator.
use crate::pptx::shapes::{GroupTransform, Transform};
use serde_json::Value;

/// Generic recursive structural equality over JSON-like values.
///
/// Rules:
/// - identical reference: equal (fast path);
/// - scalars: equal iff same kind and same value (`1` vs `"1"` is unequal,
///   and null never equals an object);
/// - arrays: equal iff same length and element-wise equal, in order; an
///   array never equals an object, even one with matching numeric keys;
/// - objects: equal iff same key count, symmetric key sets, and recursively
///   equal values. Nesting is unbounded.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    if std::ptr::eq(a, b) {
        return true;
    }

    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_equal(a, b))
        },
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(key, value)| {
                    y.get(key).is_some_and(|other| deep_equal(value, other))
                })
        },
        // Mismatched kinds.
        _ => false,
    }
}

/// Compare two optional transforms field by field.
pub fn is_transform_equal(a: Option<&Transform>, b: Option<&Transform>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Compare two optional group transforms, including the child coordinate
/// mapping.
pub fn is_group_transform_equal(a: Option<&GroupTransform>, b: Option<&GroupTransform>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Optional-aware deep comparison shared by the value-shaped properties.
fn is_opt_value_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => deep_equal(a, b),
        _ => false,
    }
}

/// Compare two optional fill payloads.
#[inline]
pub fn is_fill_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    is_opt_value_equal(a, b)
}

/// Compare two optional line payloads.
#[inline]
pub fn is_line_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    is_opt_value_equal(a, b)
}

/// Compare two optional text bodies.
#[inline]
pub fn is_text_body_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    is_opt_value_equal(a, b)
}

/// Compare two optional effect lists.
#[inline]
pub fn is_effects_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    is_opt_value_equal(a, b)
}

/// Compare two optional geometry payloads.
#[inline]
pub fn is_geometry_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    is_opt_value_equal(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_deep_equal_scalars() {
        assert!(deep_equal(&json!(1), &json!(1)));
        assert!(deep_equal(&json!("a"), &json!("a")));
        assert!(deep_equal(&Value::Null, &Value::Null));
        assert!(!deep_equal(&json!(1), &json!("1")));
        assert!(!deep_equal(&json!(1), &json!(2)));
        assert!(!deep_equal(&json!(true), &json!(1)));
    }

    #[test]
    fn test_deep_equal_arrays() {
        assert!(deep_equal(&json!([1, 2, 3]), &json!([1, 2, 3])));
        assert!(!deep_equal(&json!([1, 2, 3]), &json!([1, 2])));
        assert!(!deep_equal(&json!([1, 2, 3]), &json!([3, 2, 1])));
    }

    #[test]
    fn test_deep_equal_objects() {
        assert!(deep_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 2})));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn test_deep_equal_kind_mismatches() {
        assert!(!deep_equal(&Value::Null, &json!({})));
        assert!(!deep_equal(&json!([1]), &json!({"0": 1})));
        assert!(!deep_equal(&json!([]), &json!({})));
    }

    #[test]
    fn test_deep_equal_nested() {
        let a = json!({"fill": {"type": "solid", "color": {"rgb": "FF0000"}}, "stops": [1, [2, 3]]});
        let b = json!({"stops": [1, [2, 3]], "fill": {"color": {"rgb": "FF0000"}, "type": "solid"}});
        assert!(deep_equal(&a, &b));

        let c = json!({"fill": {"type": "none"}, "stops": [1, [2, 3]]});
        assert!(!deep_equal(&a, &c));
    }

    #[test]
    fn test_transform_predicate_absence_rules() {
        let t = Transform { x: 1, ..Default::default() };
        assert!(is_transform_equal(None, None));
        assert!(!is_transform_equal(Some(&t), None));
        assert!(!is_transform_equal(None, Some(&t)));
        assert!(is_transform_equal(Some(&t), Some(&t.clone())));

        let moved = Transform { x: 2, ..t };
        assert!(!is_transform_equal(Some(&t), Some(&moved)));
    }

    #[test]
    fn test_fill_predicate_discriminator_mismatch() {
        let solid = json!({"tag": "a:solidFill"});
        let none = json!({"tag": "a:noFill"});
        assert!(!is_fill_equal(Some(&solid), Some(&none)));
        assert!(is_fill_equal(Some(&solid), Some(&solid.clone())));
        assert!(is_fill_equal(None, None));
        assert!(!is_fill_equal(Some(&solid), None));
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn test_deep_equal_is_reflexive(value in value_strategy()) {
            prop_assert!(deep_equal(&value, &value.clone()));
        }

        #[test]
        fn test_deep_equal_is_symmetric(a in value_strategy(), b in value_strategy()) {
            prop_assert_eq!(deep_equal(&a, &b), deep_equal(&b, &a));
        }
    }
}
