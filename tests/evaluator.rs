use precheck::{
    Config, Environment, EvalError, Evaluator, ExpressionEvaluator, FunctionRegistry, Unbound,
    Value,
};

fn eval(expression: &str, env: &Environment) -> Result<bool, EvalError> {
    ExpressionEvaluator::default().evaluate(expression, env)
}

fn user() -> Value {
    Value::object([
        ("name", Value::from("ann")),
        ("age", Value::from(30_i64)),
        (
            "address",
            Value::object([("city", Value::from("Hangzhou")), ("zip", Value::Nil)]),
        ),
    ])
}

#[test]
fn nested_field_access() {
    let env = Environment::new().with("user", user());
    assert_eq!(eval("user.age >= 18", &env), Ok(true));
    assert_eq!(eval("user.address.city == 'Hangzhou'", &env), Ok(true));
    assert_eq!(eval("user.address.zip == nil", &env), Ok(true));
    assert_eq!(eval("user.address.zip.code == nil", &env), Ok(true));
}

#[test]
fn missing_field_faults_by_default() {
    let env = Environment::new().with("user", user());
    assert_eq!(
        eval("user.gender == 'f'", &env),
        Err(EvalError::MissingField {
            path: "user.gender".into(),
            field: "gender".into(),
        })
    );
}

#[test]
fn field_of_scalar_always_faults() {
    let evaluator = ExpressionEvaluator::new(&Config::default().with_unbound(Unbound::Nil));
    let env = Environment::new().with("age", 3_i64);
    assert!(matches!(
        evaluator.evaluate("age.years > 1", &env),
        Err(EvalError::NotAnObject { .. })
    ));
}

#[test]
fn int_float_cross_compare() {
    let env = Environment::new()
        .with("price", 9.5_f64)
        .with("qty", 3_i64);
    assert_eq!(eval("price > 9", &env), Ok(true));
    assert_eq!(eval("qty == 3.0", &env), Ok(true));
    assert_eq!(eval("qty < 2.5", &env), Ok(false));

    let env = Environment::new().with("big", 9_007_199_254_740_993_i64);
    assert_eq!(eval("big == 9007199254740992.0", &env), Ok(false));
    assert_eq!(eval("big > 9007199254740992.0", &env), Ok(true));
}

#[test]
fn nan_is_never_equal() {
    let env = Environment::new().with("x", f64::NAN);
    assert_eq!(eval("x == x", &env), Ok(false));
    assert_eq!(eval("x != x", &env), Ok(true));
    assert_eq!(eval("x > 1", &env), Ok(false));
}

#[test]
fn infinity_compares() {
    let env = Environment::new().with("x", f64::INFINITY);
    assert_eq!(eval("x > 1000000", &env), Ok(true));
}

#[test]
fn string_comparisons() {
    let env = Environment::new()
        .with("date", "2019-12-21")
        .with("empty", "");
    assert_eq!(eval("date > '2019-12-20'", &env), Ok(true));
    assert_eq!(eval("empty == ''", &env), Ok(true));
    assert_eq!(eval("empty != nil", &env), Ok(true));
}

#[test]
fn string_against_number_uses_text() {
    let env = Environment::new().with("code", "42");
    assert_eq!(eval("code == 42", &env), Ok(true));
    assert_eq!(eval("code < 5", &env), Ok(true));
}

#[test]
fn bool_comparisons() {
    let env = Environment::new().with("banned", false);
    assert_eq!(eval("banned == false", &env), Ok(true));
    assert_eq!(eval("!banned", &env), Ok(true));
    assert_eq!(eval("banned < true", &env), Ok(true));
}

#[test]
fn list_and_object_equality_only() {
    let env = Environment::new()
        .with("tags", vec!["a", "b"])
        .with("other", vec!["a", "b"])
        .with("u", user());
    assert_eq!(eval("tags == other", &env), Ok(true));
    assert_eq!(eval("u == u", &env), Ok(true));
    assert!(matches!(
        eval("tags > other", &env),
        Err(EvalError::TypeMismatch { .. })
    ));
    assert!(matches!(
        eval("tags == 1", &env),
        Err(EvalError::TypeMismatch { .. })
    ));
}

#[test]
fn nil_orders_below_everything() {
    let env = Environment::new().with("n", Value::Nil);
    assert_eq!(eval("n < 0", &env), Ok(true));
    assert_eq!(eval("n < ''", &env), Ok(true));
    assert_eq!(eval("n < false", &env), Ok(true));
    assert_eq!(eval("n >= nil", &env), Ok(true));
}

#[test]
fn logical_operators_require_bools() {
    let env = Environment::new().with("name", "ann");
    assert_eq!(
        eval("name || true", &env),
        Err(EvalError::NotBoolean { found: "string" })
    );
    assert_eq!(
        eval("!name", &env),
        Err(EvalError::NotBoolean { found: "string" })
    );
}

#[test]
fn precedence_and_grouping() {
    let env = Environment::new()
        .with("a", true)
        .with("b", false)
        .with("c", false);
    assert_eq!(eval("a || b && c", &env), Ok(true));
    assert_eq!(eval("(a || b) && c", &env), Ok(false));
    assert_eq!(eval("!a || !b", &env), Ok(true));
}

#[test]
fn string_functions_in_rules() {
    let env = Environment::new()
        .with("phone", "13800138000")
        .with("name", "张三");
    assert_eq!(eval(r#"string.startsWith(phone, "1")"#, &env), Ok(true));
    assert_eq!(eval(r#"string.endsWith(phone, "000")"#, &env), Ok(true));
    assert_eq!(eval(r#"string.contains(phone, "0013")"#, &env), Ok(true));
    assert_eq!(eval("string.length(name) == 2", &env), Ok(true));
    assert_eq!(eval("string.indexOf(phone, '8') == 2", &env), Ok(true));
    assert_eq!(
        eval("string.substring(phone, 0, 3) == '138'", &env),
        Ok(true)
    );
}

#[test]
fn unknown_function_faults() {
    let env = Environment::new().with("s", "x");
    assert_eq!(
        eval("string.reverse(s) == 'x'", &env),
        Err(EvalError::UnknownFunction {
            name: "string.reverse".into(),
        })
    );
}

#[test]
fn custom_function_table() {
    fn is_even(name: &str, args: &[Value]) -> Result<Value, EvalError> {
        match args {
            [Value::Int(n)] => Ok(Value::Bool(n % 2 == 0)),
            _ => Err(EvalError::InvalidArgument {
                function: name.to_owned(),
                reason: "expected one int".into(),
            }),
        }
    }
    let mut functions = FunctionRegistry::standard();
    functions.register("math.isEven", is_even);
    let evaluator = ExpressionEvaluator::default().with_functions(functions);
    let env = Environment::new().with("n", 4_i64);
    assert_eq!(evaluator.evaluate("math.isEven(n)", &env), Ok(true));
    assert!(evaluator.functions().contains("string.length"));
}

#[test]
fn regex_with_unicode_class() {
    let env = Environment::new().with("name", "张三丰");
    assert_eq!(
        eval(r"name =~ /[\x{4e00}-\x{9fa5}]{2,4}/", &env),
        Ok(true)
    );
}

#[test]
fn deep_nesting_is_limited() {
    let env = Environment::new().with("a", true);
    let deep = format!("{}a{}", "(".repeat(10), ")".repeat(10));
    assert_eq!(eval(&deep, &env), Ok(true));

    let negations = format!("{}a", "!".repeat(100));
    assert_eq!(
        eval(&negations, &env),
        Err(EvalError::TooDeep { limit: 64 })
    );
}

#[test]
fn very_deep_nesting_faults_without_overflow() {
    let env = Environment::new().with("a", true);
    let parens = format!("{}a{}", "(".repeat(5000), ")".repeat(5000));
    assert_eq!(eval(&parens, &env), Err(EvalError::TooDeep { limit: 64 }));

    let negations = format!("{}a", "!".repeat(5000));
    assert_eq!(
        eval(&negations, &env),
        Err(EvalError::TooDeep { limit: 64 })
    );

    let mixed = "!(".repeat(3000) + "a" + &")".repeat(3000);
    assert_eq!(eval(&mixed, &env), Err(EvalError::TooDeep { limit: 64 }));

    let chain = vec!["a"; 5000].join(" && ");
    assert_eq!(eval(&chain, &env), Err(EvalError::TooDeep { limit: 64 }));
}

#[test]
fn nesting_limit_follows_config() {
    let env = Environment::new().with("a", true);
    let nested = format!("{}a{}", "(".repeat(20), ")".repeat(20));
    assert_eq!(eval(&nested, &env), Ok(true));

    let shallow = ExpressionEvaluator::new(&Config::default().with_max_depth(8));
    assert_eq!(
        shallow.evaluate(&nested, &env),
        Err(EvalError::TooDeep { limit: 8 })
    );
    assert_eq!(shallow.evaluate("(a && a) || !a", &env), Ok(true));
}

#[test]
fn evaluation_is_repeatable() {
    let env = Environment::new().with("user", user());
    let evaluator = ExpressionEvaluator::default();
    let first = evaluator.evaluate("user.age > 18 && user.name != nil", &env);
    for _ in 0..5 {
        assert_eq!(
            evaluator.evaluate("user.age > 18 && user.name != nil", &env),
            first
        );
    }
}
