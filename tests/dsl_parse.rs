use std::io::Write as _;

use precheck::{Config, Interceptor, LoadError, Registry, RegistryError, Value};

const USERS: &str = r#"
# user endpoints
site user.simple(name, age, phone):
    check name != null               => "name is required"
    check age > 18                   => "must be older than 18"
    check phone =~ /^1[0-9]{10}$/    => "bad phone number"

site user.delete(id):
    check id != null
"#;

#[test]
fn dsl_parse_and_check() {
    let registry = Registry::from_dsl(USERS, Interceptor::default()).unwrap();
    assert_eq!(registry.len(), 2);

    let ok = [
        Value::from("ann"),
        Value::from(30_i64),
        Value::from("13800138000"),
    ];
    assert!(registry.check("user.simple", &ok).is_ok());

    let young = [
        Value::from("ann"),
        Value::from(16_i64),
        Value::from("13800138000"),
    ];
    let err = registry.check("user.simple", &young).unwrap_err();
    assert_eq!(err.message(), "must be older than 18");
}

#[test]
fn dsl_check_without_message_uses_default() {
    let interceptor = Interceptor::new(Config::default().with_default_message("invalid request"));
    let registry = Registry::from_dsl(USERS, interceptor).unwrap();
    let err = registry.check("user.delete", &[Value::Nil]).unwrap_err();
    assert_eq!(err.message(), "invalid request");
}

#[test]
fn dsl_call_runs_body() {
    let registry = Registry::from_dsl(USERS, Interceptor::default()).unwrap();
    let deleted = registry.call("user.delete", &[Value::from(7_i64)], || true);
    assert_eq!(deleted, Ok(true));
}

#[test]
fn dsl_message_containing_arrow() {
    let dsl = "site s(a):\n    check a > 1 => \"a => must exceed 1\"\n";
    let registry = Registry::from_dsl(dsl, Interceptor::default()).unwrap();
    let err = registry.check("s", &[Value::from(0_i64)]).unwrap_err();
    assert!(err.is_client_fault());
    assert_eq!(err.message(), "a => must exceed 1");
}

#[test]
fn dsl_comment_after_message() {
    let dsl = "site s(a):\n    check a > 1 => \"too small\" # lower bound\n";
    let registry = Registry::from_dsl(dsl, Interceptor::default()).unwrap();
    assert!(registry.check("s", &[Value::from(2_i64)]).is_ok());
    let err = registry.check("s", &[Value::from(0_i64)]).unwrap_err();
    assert!(err.is_client_fault());
    assert_eq!(err.message(), "too small");
}

#[test]
fn dsl_deeply_nested_rule_faults() {
    let dsl = format!(
        "site s(a):\n    check {}a > 1{} => \"too deep\"\n",
        "(".repeat(4000),
        ")".repeat(4000)
    );
    let registry = Registry::from_dsl(&dsl, Interceptor::default()).unwrap();
    let err = registry.check("s", &[Value::from(2_i64)]).unwrap_err();
    assert!(!err.is_client_fault());
}

#[test]
fn dsl_expressions_are_not_validated_at_load() {
    let dsl = "site broken(a):\n    check a > => \"never parsed at load\"\n";
    let registry = Registry::from_dsl(dsl, Interceptor::default()).unwrap();
    let err = registry.check("broken", &[Value::from(1_i64)]).unwrap_err();
    assert!(!err.is_client_fault());
}

#[test]
fn dsl_duplicate_site() {
    let dsl = "site a(x):\n    check x > 1\nsite a(y):\n    check y > 1\n";
    let err = Registry::from_dsl(dsl, Interceptor::default()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Registry(RegistryError::DuplicateSite { .. })
    ));
}

#[test]
fn dsl_duplicate_parameter() {
    let dsl = "site a(x, x):\n    check x > 1\n";
    let err = Registry::from_dsl(dsl, Interceptor::default()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Registry(RegistryError::DuplicateParameter { .. })
    ));
}

#[test]
fn dsl_syntax_error() {
    let err = Registry::from_dsl("site a(x)\n    check x > 1\n", Interceptor::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn dsl_from_file() {
    let path = std::env::temp_dir().join(format!("precheck-{}.precheck", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(USERS.as_bytes()).unwrap();
    }
    let registry = Registry::from_file(&path, Interceptor::default()).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert!(registry.site("user.simple").is_some());
}

#[test]
fn dsl_missing_file() {
    let err = Registry::from_file("/nonexistent/users.precheck", Interceptor::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}
