use precheck::{Value, bind, normalize};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
    ]
}

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,6}", 0..8)
        .prop_map(|set| set.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Binding pairs the common prefix and nothing else
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn binds_min_len(names in arb_names(), values in prop::collection::vec(arb_value(), 0..10)) {
        let env = bind(names.as_slice(), values.as_slice());
        let bound = names.len().min(values.len());
        prop_assert_eq!(env.len(), bound);
        for (i, name) in names.iter().enumerate() {
            if i < bound {
                prop_assert_eq!(env.get(name), Some(&values[i]));
            } else {
                prop_assert!(!env.contains(name));
            }
        }
    }

    #[test]
    fn binding_is_deterministic(names in arb_names(), values in prop::collection::vec(arb_value(), 0..10)) {
        prop_assert_eq!(bind(names.as_slice(), &values), bind(names.as_slice(), &values));
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("null".to_owned()),
        Just("nil".to_owned()),
        Just("nullable".to_owned()),
        Just("==".to_owned()),
        Just("!=".to_owned()),
        Just("&&".to_owned()),
        Just("'null'".to_owned()),
        Just("/null/".to_owned()),
        "[a-z_]{1,6}",
        "[0-9]{1,3}",
    ]
}

fn arb_expression() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_token(), 0..12).prop_map(|tokens| tokens.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn normalize_is_idempotent(expr in arb_expression()) {
        let once = normalize(&expr).into_owned();
        let twice = normalize(&once).into_owned();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_leaves_no_bare_null(expr in arb_expression()) {
        let out = normalize(&expr);
        for word in out.split(' ') {
            prop_assert_ne!(word, "null");
        }
    }

    #[test]
    fn normalize_without_null_is_identity(expr in "[a-z0-9 =!&|<>()'.]{0,40}") {
        prop_assume!(!expr.contains("null"));
        let out = normalize(&expr);
        prop_assert_eq!(out.as_ref(), expr.as_str());
    }

    #[test]
    fn normalize_preserves_other_tokens(expr in arb_expression()) {
        let original: Vec<&str> = expr.split(' ').collect();
        let out = normalize(&expr).into_owned();
        let rewritten: Vec<&str> = out.split(' ').collect();
        prop_assert_eq!(original.len(), rewritten.len());
        for (a, b) in original.iter().zip(&rewritten) {
            if *a == "null" {
                prop_assert_eq!(*b, "nil");
            } else {
                prop_assert_eq!(a, b);
            }
        }
    }
}
