use precheck::boundary::report;
use precheck::{CallSite, Interceptor, Value, patterns};

fn main() {
    let site = CallSite::new("user.simple", ["name", "age", "phone"])
        .check("name != null", "name is required")
        .check("age > 18", "must be older than 18")
        .check(format!("phone =~ /{}/", patterns::PHONE), "bad phone number");

    let interceptor = Interceptor::default();

    let calls = [
        vec![Value::from("ann"), Value::from(30), Value::from("13800138000")],
        vec![Value::from("bob"), Value::from(16), Value::from("13800138000")],
        vec![Value::from("eve"), Value::from(40), Value::from("12345")],
    ];

    for values in &calls {
        let result = interceptor.invoke(&site, values, || format!("registered {}", values[0]));
        match result {
            Ok(message) => println!("{message}"),
            Err(err) => println!("rejected: {}", report(&err)),
        }
    }

    let report = interceptor.check_detailed(&site, &calls[1]);
    println!("{report}");
}
