//! An implementation of [JSON Type Definition](https://tools.ietf.org/html/rfc8927)
//! (JTD), a schema language for JSON.
//!
//! This crate lets you:
//!
//! 1. Parse a JTD schema (given as [`serde_json::Value`]) into [`Schema`], and
//!    check that it's well-formed with [`Schema::verify`].
//! 2. Validate input data against a schema with [`validate`], which produces a
//!    set of [`ValidationError`]s -- each identifying both where in the input
//!    and where in the schema a validation failure happened.
//!
//! ```
//! use jtd_validate::{Schema, ValidateOptions};
//! use serde_json::json;
//!
//! let schema = Schema::from_value(&json!({
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "uint32" }
//!     }
//! }))
//! .and_then(Schema::verify)
//! .expect("schema should be well-formed");
//!
//! let errors = jtd_validate::validate(
//!     &schema,
//!     &json!({ "age": "43" }),
//!     ValidateOptions::new(),
//! )
//! .expect("validation should not fault");
//!
//! assert_eq!(2, errors.len());
//! ```
//!
//! # Security considerations
//!
//! If you're running [`validate`] with untrusted schemas (untrusted *input*
//! is fine), then be aware of this security consideration from RFC 8927:
//!
//! > Implementations that evaluate user-inputted schemas SHOULD implement
//! > mechanisms to detect and abort circular references that might cause a
//! > naive implementation to go into an infinite loop. Without such
//! > mechanisms, implementations may be vulnerable to denial-of-service
//! > attacks.
//!
//! This crate supports that "detect and abort" mechanism via
//! [`ValidateOptions::with_max_depth`].

mod schema;
mod validate;

pub use schema::*;
pub use validate::*;
