use crate::{Schema, Type};
use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;

/// Options accepted by [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    max_depth: usize,
    max_errors: usize,
}

impl ValidateOptions {
    /// Constructs a new set of options with all default values -- no limit
    /// on `ref` depth, and no limit on the number of errors returned.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of `ref` frames [`validate`] will follow
    /// before giving up with [`ValidateFault::MaxDepthExceeded`].
    ///
    /// This exists to guard against schemas with circular `ref` chains, such
    /// as:
    ///
    /// ```json
    /// { "ref": "loop", "definitions": { "loop": { "ref": "loop" } } }
    /// ```
    ///
    /// Self-referential schemas are often legitimate -- for instance, to
    /// describe a recursive data structure -- so this isn't rejected by
    /// [`Schema::verify`]. It's instead up to the caller of [`validate`] to
    /// decide how deep is too deep.
    ///
    /// The default of `0` means no limit is enforced. An instance validated
    /// against a schema with a true infinite loop will eventually overflow
    /// the stack.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum number of [`ValidationError`]s [`validate`] will
    /// collect before stopping early.
    ///
    /// If all you need to know is whether an instance is valid at all,
    /// `with_max_errors(1)` avoids the cost of finding every violation.
    ///
    /// The default of `0` means every error is returned.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// A fault raised by [`validate`] that aborts validation entirely, as
/// opposed to an ordinary [`ValidationError`] that just gets collected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidateFault {
    /// The schema's `ref` chain is deeper than the
    /// [`ValidateOptions::with_max_depth`] bound allows.
    ///
    /// ```
    /// use jtd_validate::{Schema, ValidateFault, ValidateOptions};
    /// use serde_json::json;
    ///
    /// let schema = Schema::from_value(&json!({
    ///     "definitions": { "loop": { "ref": "loop" } },
    ///     "ref": "loop",
    /// }))
    /// .and_then(Schema::verify)
    /// .unwrap();
    ///
    /// assert_eq!(
    ///     ValidateFault::MaxDepthExceeded,
    ///     jtd_validate::validate(&schema, &json!(null), ValidateOptions::new().with_max_depth(3))
    ///         .unwrap_err(),
    /// );
    /// ```
    #[error("max depth exceeded")]
    MaxDepthExceeded,
}

/// A single validation error returned by [`validate`].
///
/// This corresponds to a validation error indicator in RFC 8927, Section 3.2:
/// a pair of paths, one locating the part of the instance that was rejected,
/// and one locating the part of the schema that rejected it.
///
/// To avoid copying path segments that are borrowed straight out of the
/// schema or instance, this struct holds [`Cow`]s. Use
/// [`ValidationError::into_owned_paths`] if owned `Vec<String>`s are more
/// convenient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError<'a> {
    /// A path to the part of the instance that was rejected.
    pub instance_path: Vec<Cow<'a, str>>,

    /// A path to the part of the schema that rejected it.
    pub schema_path: Vec<Cow<'a, str>>,
}

impl<'a> ValidationError<'a> {
    /// Converts this error into a plain `(instance_path, schema_path)` pair
    /// of owned `Vec<String>`s.
    pub fn into_owned_paths(self) -> (Vec<String>, Vec<String>) {
        (
            self.instance_path.into_iter().map(Cow::into_owned).collect(),
            self.schema_path.into_iter().map(Cow::into_owned).collect(),
        )
    }
}

/// Validates `instance` against `schema`, returning every validation error
/// found.
///
/// `schema` must already have passed [`Schema::verify`]; this function does
/// not re-check schema well-formedness.
///
/// The order and exact set of errors returned is specified by the JSON Type
/// Definition conformance test suite, and is considered part of this crate's
/// contract.
///
/// ```
/// use jtd_validate::{Schema, ValidateOptions};
/// use serde_json::json;
///
/// let schema = Schema::from_value(&json!({ "elements": { "type": "uint8" } }))
///     .and_then(Schema::verify)
///     .unwrap();
///
/// let instance = json!(["a", "b", "c"]);
///
/// // By default, every error is returned.
/// let errors = jtd_validate::validate(&schema, &instance, ValidateOptions::new()).unwrap();
/// assert_eq!(3, errors.len());
///
/// // with_max_errors caps how many are collected.
/// let errors = jtd_validate::validate(
///     &schema,
///     &instance,
///     ValidateOptions::new().with_max_errors(1),
/// )
/// .unwrap();
/// assert_eq!(1, errors.len());
/// ```
pub fn validate<'a>(
    schema: &'a Schema,
    instance: &'a Value,
    options: ValidateOptions,
) -> Result<Vec<ValidationError<'a>>, ValidateFault> {
    let mut state = ValidationState::new(schema, options);

    match state.walk(schema, None, instance) {
        Ok(()) | Err(WalkAbort::MaxErrorsReached) => Ok(state.into_errors()),
        Err(WalkAbort::MaxDepthExceeded) => Err(ValidateFault::MaxDepthExceeded),
    }
}

/// The mutable state threaded through one call to [`validate`]: the two path
/// stacks (instance tokens, and one frame of schema tokens per `ref` hop) and
/// the accumulated errors.
struct ValidationState<'a> {
    root_schema: &'a Schema,
    options: ValidateOptions,
    instance_tokens: Vec<Cow<'a, str>>,
    schema_token_frames: Vec<Vec<Cow<'a, str>>>,
    errors: Vec<ValidationError<'a>>,
}

/// An internal, non-local exit from the recursive walk. Neither variant is
/// a [`std::error::Error`]: [`WalkAbort::MaxErrorsReached`] is converted
/// into a normal return by [`validate`], and [`WalkAbort::MaxDepthExceeded`]
/// becomes [`ValidateFault::MaxDepthExceeded`].
enum WalkAbort {
    MaxErrorsReached,
    MaxDepthExceeded,
}

impl<'a> ValidationState<'a> {
    fn new(root_schema: &'a Schema, options: ValidateOptions) -> Self {
        Self {
            root_schema,
            options,
            instance_tokens: vec![],
            schema_token_frames: vec![vec![]],
            errors: vec![],
        }
    }

    fn into_errors(self) -> Vec<ValidationError<'a>> {
        self.errors
    }

    fn walk(
        &mut self,
        schema: &'a Schema,
        parent_tag: Option<&'a str>,
        instance: &'a Value,
    ) -> Result<(), WalkAbort> {
        if instance.is_null() && schema.nullable() {
            return Ok(());
        }

        match schema {
            Schema::Empty { .. } => {}

            Schema::Ref { ref_, .. } => {
                self.schema_token_frames
                    .push(vec!["definitions".into(), ref_.into()]);

                if self.schema_token_frames.len() == self.options.max_depth {
                    return Err(WalkAbort::MaxDepthExceeded);
                }

                self.walk(&self.root_schema.definitions()[ref_], None, instance)?;
                self.schema_token_frames.pop();
            }

            Schema::Type { type_, .. } => {
                self.push_schema_token("type");

                match type_ {
                    Type::Boolean => {
                        if !instance.is_boolean() {
                            self.push_error()?;
                        }
                    }
                    Type::Float32 | Type::Float64 => {
                        if !instance.is_number() {
                            self.push_error()?;
                        }
                    }
                    Type::Int8 => self.check_int_range(instance, -128.0, 127.0)?,
                    Type::Uint8 => self.check_int_range(instance, 0.0, 255.0)?,
                    Type::Int16 => self.check_int_range(instance, -32768.0, 32767.0)?,
                    Type::Uint16 => self.check_int_range(instance, 0.0, 65535.0)?,
                    Type::Int32 => self.check_int_range(instance, -2147483648.0, 2147483647.0)?,
                    Type::Uint32 => self.check_int_range(instance, 0.0, 4294967295.0)?,
                    Type::String => {
                        if !instance.is_string() {
                            self.push_error()?;
                        }
                    }
                    Type::Timestamp => {
                        if let Some(s) = instance.as_str() {
                            if DateTime::parse_from_rfc3339(s).is_err() {
                                self.push_error()?;
                            }
                        } else {
                            self.push_error()?;
                        }
                    }
                }

                self.pop_schema_token();
            }

            Schema::Enum { enum_, .. } => {
                self.push_schema_token("enum");

                match instance.as_str() {
                    Some(s) if enum_.contains(s) => {}
                    _ => self.push_error()?,
                }

                self.pop_schema_token();
            }

            Schema::Elements { elements, .. } => {
                self.push_schema_token("elements");

                if let Some(arr) = instance.as_array() {
                    for (i, sub_instance) in arr.iter().enumerate() {
                        self.instance_tokens.push(Cow::Owned(i.to_string()));
                        self.walk(elements, None, sub_instance)?;
                        self.pop_instance_token();
                    }
                } else {
                    self.push_error()?;
                }

                self.pop_schema_token();
            }

            Schema::Properties {
                properties,
                optional_properties,
                properties_is_present,
                additional_properties,
                ..
            } => {
                if let Some(obj) = instance.as_object() {
                    self.push_schema_token("properties");
                    for (name, sub_schema) in properties {
                        self.push_schema_token(name);
                        if let Some(sub_instance) = obj.get(name) {
                            self.push_instance_token(name);
                            self.walk(sub_schema, None, sub_instance)?;
                            self.pop_instance_token();
                        } else {
                            self.push_error()?;
                        }
                        self.pop_schema_token();
                    }
                    self.pop_schema_token();

                    self.push_schema_token("optionalProperties");
                    for (name, sub_schema) in optional_properties {
                        self.push_schema_token(name);
                        if let Some(sub_instance) = obj.get(name) {
                            self.push_instance_token(name);
                            self.walk(sub_schema, None, sub_instance)?;
                            self.pop_instance_token();
                        }
                        self.pop_schema_token();
                    }
                    self.pop_schema_token();

                    if !*additional_properties {
                        for name in obj.keys() {
                            if parent_tag != Some(name)
                                && !properties.contains_key(name)
                                && !optional_properties.contains_key(name)
                            {
                                self.push_instance_token(name);
                                self.push_error()?;
                                self.pop_instance_token();
                            }
                        }
                    }
                } else {
                    self.push_schema_token(if *properties_is_present {
                        "properties"
                    } else {
                        "optionalProperties"
                    });
                    self.push_error()?;
                    self.pop_schema_token();
                }
            }

            Schema::Values { values, .. } => {
                self.push_schema_token("values");

                if let Some(obj) = instance.as_object() {
                    for (name, sub_instance) in obj {
                        self.push_instance_token(name);
                        self.walk(values, None, sub_instance)?;
                        self.pop_instance_token();
                    }
                } else {
                    self.push_error()?;
                }

                self.pop_schema_token();
            }

            Schema::Discriminator {
                discriminator,
                mapping,
                ..
            } => {
                if let Some(obj) = instance.as_object() {
                    if let Some(tag) = obj.get(discriminator) {
                        if let Some(tag) = tag.as_str() {
                            if let Some(mapped_schema) = mapping.get(tag) {
                                self.push_schema_token("mapping");
                                self.push_schema_token(tag);
                                self.walk(mapped_schema, Some(discriminator), instance)?;
                                self.pop_schema_token();
                                self.pop_schema_token();
                            } else {
                                self.push_schema_token("mapping");
                                self.push_instance_token(discriminator);
                                self.push_error()?;
                                self.pop_instance_token();
                                self.pop_schema_token();
                            }
                        } else {
                            self.push_schema_token("discriminator");
                            self.push_instance_token(discriminator);
                            self.push_error()?;
                            self.pop_instance_token();
                            self.pop_schema_token();
                        }
                    } else {
                        self.push_schema_token("discriminator");
                        self.push_error()?;
                        self.pop_schema_token();
                    }
                } else {
                    self.push_schema_token("discriminator");
                    self.push_error()?;
                    self.pop_schema_token();
                }
            }
        }

        Ok(())
    }

    fn check_int_range(&mut self, instance: &Value, min: f64, max: f64) -> Result<(), WalkAbort> {
        match instance.as_f64() {
            Some(val) if val.fract() == 0.0 && val >= min && val <= max => Ok(()),
            _ => self.push_error(),
        }
    }

    fn push_error(&mut self) -> Result<(), WalkAbort> {
        self.errors.push(ValidationError {
            instance_path: self.instance_tokens.clone(),
            schema_path: self.schema_token_frames.last().unwrap().clone(),
        });

        if self.options.max_errors == self.errors.len() {
            Err(WalkAbort::MaxErrorsReached)
        } else {
            Ok(())
        }
    }

    fn push_schema_token(&mut self, token: &'a str) {
        self.schema_token_frames.last_mut().unwrap().push(token.into());
    }

    fn pop_schema_token(&mut self) {
        self.schema_token_frames.last_mut().unwrap().pop().unwrap();
    }

    fn push_instance_token(&mut self, token: &'a str) {
        self.instance_tokens.push(token.into());
    }

    fn pop_instance_token(&mut self) {
        self.instance_tokens.pop().unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Schema;
    use serde_json::json;

    fn schema(value: serde_json::Value) -> Schema {
        Schema::from_value(&value).and_then(Schema::verify).unwrap()
    }

    #[test]
    fn empty_schema_accepts_everything() {
        let schema = schema(json!({}));
        for instance in [json!(null), json!(5), json!("hi"), json!([1, 2]), json!({"a": 1})] {
            assert_eq!(
                Vec::<ValidationError>::new(),
                validate(&schema, &instance, ValidateOptions::new()).unwrap()
            );
        }
    }

    #[test]
    fn string_type_accepts_string() {
        let schema = schema(json!({ "type": "string" }));
        assert_eq!(
            Vec::<ValidationError>::new(),
            validate(&schema, &json!("hello"), ValidateOptions::new()).unwrap()
        );
    }

    #[test]
    fn uint8_rejects_out_of_range() {
        let schema = schema(json!({ "type": "uint8" }));
        assert_eq!(
            vec![ValidationError {
                instance_path: vec![],
                schema_path: vec!["type".into()],
            }],
            validate(&schema, &json!(300), ValidateOptions::new()).unwrap()
        );
    }

    #[test]
    fn elements_max_errors_caps_and_orders() {
        let schema = schema(json!({ "elements": { "type": "string" } }));
        let instance = json!([null, null, null, null]);

        let errors = validate(
            &schema,
            &instance,
            ValidateOptions::new().with_max_errors(3),
        )
        .unwrap();

        assert_eq!(3, errors.len());
        for (i, error) in errors.iter().enumerate() {
            assert_eq!(vec![Cow::<str>::Owned(i.to_string())], error.instance_path);
            assert_eq!(vec!["elements".into(), "type".into()], error.schema_path);
        }
    }

    #[test]
    fn properties_reports_missing_and_mismatched() {
        let schema = schema(json!({
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "uint32" }
            }
        }));

        let errors = validate(&schema, &json!({ "age": "43" }), ValidateOptions::new()).unwrap();

        assert_eq!(
            vec![
                ValidationError {
                    instance_path: vec!["age".into()],
                    schema_path: vec!["properties".into(), "age".into(), "type".into()],
                },
                ValidationError {
                    instance_path: vec![],
                    schema_path: vec!["properties".into(), "name".into()],
                },
            ],
            errors,
        );
    }

    #[test]
    fn additional_properties_rejected_unless_declared() {
        let schema = schema(json!({ "properties": { "a": {} } }));
        let errors = validate(&schema, &json!({ "a": 1, "b": 2 }), ValidateOptions::new()).unwrap();

        assert_eq!(
            vec![ValidationError {
                instance_path: vec!["b".into()],
                schema_path: vec![],
            }],
            errors,
        );
    }

    #[test]
    fn discriminator_accepts_matching_tag() {
        let schema = schema(json!({
            "discriminator": "kind",
            "mapping": {
                "cat": { "properties": { "sound": { "type": "string" } } }
            }
        }));

        assert_eq!(
            Vec::<ValidationError>::new(),
            validate(
                &schema,
                &json!({ "kind": "cat", "sound": "meow" }),
                ValidateOptions::new()
            )
            .unwrap()
        );
    }

    #[test]
    fn discriminator_rejects_unknown_tag() {
        let schema = schema(json!({
            "discriminator": "kind",
            "mapping": {
                "cat": { "properties": { "sound": { "type": "string" } } }
            }
        }));

        assert_eq!(
            vec![ValidationError {
                instance_path: vec!["kind".into()],
                schema_path: vec!["mapping".into()],
            }],
            validate(&schema, &json!({ "kind": "dog" }), ValidateOptions::new()).unwrap()
        );
    }

    #[test]
    fn max_depth_exceeded_on_recursive_ref() {
        let schema = schema(json!({
            "definitions": { "loop": { "ref": "loop" } },
            "ref": "loop",
        }));

        assert_eq!(
            ValidateFault::MaxDepthExceeded,
            validate(
                &schema,
                &json!(null),
                ValidateOptions::new().with_max_depth(32)
            )
            .unwrap_err()
        );
    }

    #[test]
    fn nullable_short_circuits_every_form() {
        let schema = schema(json!({ "type": "string", "nullable": true }));
        assert_eq!(
            Vec::<ValidationError>::new(),
            validate(&schema, &json!(null), ValidateOptions::new()).unwrap()
        );
    }

    #[test]
    fn errors_are_serializable_to_wire_format() {
        let schema = schema(json!({ "type": "uint8" }));
        let errors = validate(&schema, &json!(300), ValidateOptions::new()).unwrap();

        assert_eq!(
            json!([{ "instancePath": [], "schemaPath": ["type"] }]),
            serde_json::to_value(&errors).unwrap()
        );
    }
}
