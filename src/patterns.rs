//! Regular expressions for common request fields.
//!
//! Anchored, and free of `/` so they can be spliced into a regex literal:
//!
//! ```
//! use precheck::{CallSite, Interceptor, Value, patterns};
//!
//! let site = CallSite::new("user.bind", ["phone"])
//!     .check(format!("phone =~ /{}/", patterns::PHONE), "bad phone number");
//! let interceptor = Interceptor::default();
//! assert!(interceptor.check(&site, &[Value::from("13800138000")]).is_ok());
//! assert!(interceptor.check(&site, &[Value::from("1380013")]).is_err());
//! ```

/// 4 to 20 CJK characters, ASCII letters or digits.
pub const USER_NAME: &str = r"^[\x{4e00}-\x{9fa5}A-Za-z0-9]{4,20}$";

/// Mainland mobile number: `1` followed by ten digits.
pub const PHONE: &str = r"^1[0-9]{10}$";

pub const MAIL: &str = r"^[a-zA-Z0-9_.-]+@[a-zA-Z0-9_-]+(\.[a-zA-Z0-9_-]{2,})+$";

/// 6 to 15 ASCII letters or digits.
pub const PASSWORD: &str = r"^[A-Za-z0-9]{6,15}$";

pub const WORD_NUMBER: &str = r"^[A-Za-z0-9]+$";

/// At least 13 digits.
pub const BANK_CARD: &str = r"^[0-9]{13,}$";

/// `yyyy-MM-dd`
pub const DATE: &str = r"^[1-9][0-9]{3}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$";

/// `yyyy-MM-dd HH:mm:ss`
pub const DATE_TIME: &str = r"^[1-9][0-9]{3}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])\s([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]$";
