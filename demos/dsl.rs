use precheck::{Interceptor, Registry, Value};

fn main() {
    let registry = Registry::from_dsl(include_str!("users.precheck"), Interceptor::default())
        .expect("failed to load call sites");

    let mut names: Vec<&str> = registry.names().collect();
    names.sort_unstable();
    println!("loaded: {}", names.join(", "));

    let register = registry.guard("user.register", |(name, age, phone): (&str, i64, &str)| {
        format!("{name} ({age}) registered with {phone}")
    });

    for args in [
        ("ann", 30, "13800138000"),
        ("bob", 30, "23800138000"),
        ("", 30, "13800138000"),
    ] {
        match register.call(args) {
            Ok(message) => println!("{message}"),
            Err(err) => println!("rejected: {}", err.message()),
        }
    }

    let deleted = registry.call("user.delete", &[Value::Nil], || "deleted");
    println!("{deleted:?}");
}
