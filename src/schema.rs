use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A convenience alias for the JSON Type Definition `definitions` keyword value.
pub type Definitions = BTreeMap<String, Schema>;

/// A convenience alias for the JSON Type Definition `metadata` keyword value.
pub type Metadata = BTreeMap<String, Value>;

/// A pattern-matching-friendly representation of a JSON Type Definition schema.
///
/// Each variant of this enum corresponds to one of the eight
/// "[forms](https://tools.ietf.org/html/rfc8927#section-2.2)" a schema may
/// take on. All of the forms share the following fields:
///
/// * `definitions` corresponds to the JTD keyword of the same name. This is
///   only legal on the root schema; a non-root schema with definitions set
///   makes [`Schema::verify`] return [`SchemaError::NonRootDefinitions`].
/// * `metadata` corresponds to the JTD keyword of the same name. It is
///   opaque to validation -- it exists to carry information such as code
///   generation hints.
///
/// Except for [`Schema::Empty`], every form also carries `nullable`. It is
/// omitted from [`Schema::Empty`] because it would be redundant: the empty
/// form already accepts `null`.
///
/// A [`Schema`] produced by [`Schema::from_value`] has already been checked
/// for legal keyword combinations and well-typed keyword values, but it may
/// still contain dangling `ref`s, non-root `definitions`, or other
/// cross-referencing problems. Call [`Schema::verify`] to check those before
/// calling [`validate`][`crate::validate`] against it.
#[derive(Clone, Debug, PartialEq)]
pub enum Schema {
    /// The [empty](https://tools.ietf.org/html/rfc8927#section-2.2.1) form.
    ///
    /// Accepts any input.
    Empty {
        definitions: Definitions,
        metadata: Metadata,
    },

    /// The [ref](https://tools.ietf.org/html/rfc8927#section-2.2.2) form.
    ///
    /// Accepts whatever the definition it names accepts.
    Ref {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,

        /// The name of the definition being referred to.
        ref_: String,
    },

    /// The [type](https://tools.ietf.org/html/rfc8927#section-2.2.3) form.
    ///
    /// Accepts JSON values of a particular primitive [`Type`].
    Type {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,
        type_: Type,
    },

    /// The [enum](https://tools.ietf.org/html/rfc8927#section-2.2.4) form.
    ///
    /// Accepts JSON strings within a fixed set of values.
    Enum {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,
        enum_: BTreeSet<String>,
    },

    /// The [elements](https://tools.ietf.org/html/rfc8927#section-2.2.5) form.
    ///
    /// Accepts JSON arrays whose elements all satisfy a sub-schema.
    Elements {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,
        elements: Box<Schema>,
    },

    /// The [properties](https://tools.ietf.org/html/rfc8927#section-2.2.6)
    /// form.
    ///
    /// Accepts JSON objects used as "structs".
    Properties {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,

        /// The required members of the object, and the schema each must
        /// satisfy.
        properties: BTreeMap<String, Schema>,

        /// The optional members of the object, and the schema each must
        /// satisfy if present.
        optional_properties: BTreeMap<String, Schema>,

        /// Whether the `properties` keyword was present on the schema.
        ///
        /// This has no bearing on whether an instance is valid. It exists
        /// only so that, when an instance isn't an object at all, the
        /// returned `schema_path` can point at `properties` or
        /// `optionalProperties` as appropriate -- whichever keyword the
        /// schema actually declared. See RFC 8927, Section 3.3.6.
        properties_is_present: bool,

        /// Whether object members outside `properties` and
        /// `optional_properties` are permitted.
        additional_properties: bool,
    },

    /// The [values](https://tools.ietf.org/html/rfc8927#section-2.2.7) form.
    ///
    /// Accepts JSON objects used as "dictionaries"; every value must satisfy
    /// a sub-schema.
    Values {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,
        values: Box<Schema>,
    },

    /// The [discriminator](https://tools.ietf.org/html/rfc8927#section-2.2.8)
    /// form.
    ///
    /// Accepts JSON objects used as tagged unions.
    Discriminator {
        definitions: Definitions,
        metadata: Metadata,
        nullable: bool,

        /// The name of the object member that selects which sub-schema in
        /// `mapping` applies.
        discriminator: String,

        /// The sub-schema to use for each possible value of `discriminator`.
        /// Every value here must be of the properties form, must not be
        /// nullable, and must not redeclare `discriminator` itself.
        mapping: BTreeMap<String, Schema>,
    },
}

/// The values [`Schema::Type::type_`] may take on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Type {
    /// Either JSON `true` or `false`.
    Boolean,
    /// A JSON number with zero fractional part within the range of [`i8`].
    Int8,
    /// A JSON number with zero fractional part within the range of [`u8`].
    Uint8,
    /// A JSON number with zero fractional part within the range of [`i16`].
    Int16,
    /// A JSON number with zero fractional part within the range of [`u16`].
    Uint16,
    /// A JSON number with zero fractional part within the range of [`i32`].
    Int32,
    /// A JSON number with zero fractional part within the range of [`u32`].
    Uint32,
    /// Any JSON number.
    Float32,
    /// Any JSON number.
    Float64,
    /// A JSON string.
    String,
    /// A JSON string holding an RFC 3339 date-time.
    Timestamp,
}

impl Type {
    fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "boolean" => Type::Boolean,
            "int8" => Type::Int8,
            "uint8" => Type::Uint8,
            "int16" => Type::Int16,
            "uint16" => Type::Uint16,
            "int32" => Type::Int32,
            "uint32" => Type::Uint32,
            "float32" => Type::Float32,
            "float64" => Type::Float64,
            "string" => Type::String,
            "timestamp" => Type::Timestamp,
            _ => return None,
        })
    }
}

/// The discriminant of a [`Schema`], as defined by RFC 8927, Section 2.2.
///
/// Every [`Schema`] variant maps onto exactly one [`Form`]; this just exists
/// as a convenience for callers who want to switch on the form without
/// matching the full enum (for instance, when reporting diagnostics).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    Empty,
    Ref,
    Type,
    Enum,
    Elements,
    Properties,
    Values,
    Discriminator,
}

/// Errors that may arise from [`Schema::from_value`] or [`Schema::verify`].
///
/// The JSON Type Definition keywords recognized by this crate are:
/// `metadata`, `nullable`, `definitions`, `ref`, `type`, `enum`, `elements`,
/// `properties`, `optionalProperties`, `additionalProperties`, `values`,
/// `discriminator`, and `mapping`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A keyword's value didn't have the JSON shape that keyword requires.
    ///
    /// ```
    /// use jtd_validate::{Schema, SchemaError};
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     Err(SchemaError::TypeMismatch { keyword: "nullable", expected: "boolean" }),
    ///     Schema::from_value(&json!({ "nullable": "yes" })),
    /// );
    /// ```
    #[error("expected {expected} for keyword {keyword:?}")]
    TypeMismatch {
        keyword: &'static str,
        expected: &'static str,
    },

    /// The schema object had a key that isn't a JSON Type Definition keyword.
    ///
    /// ```
    /// use jtd_validate::{Schema, SchemaError};
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     Err(SchemaError::IllegalKeyword("minimum".to_owned())),
    ///     Schema::from_value(&json!({ "minimum": 5 })),
    /// );
    /// ```
    #[error("keyword not recognized by JSON Type Definition: {0:?}")]
    IllegalKeyword(String),

    /// The schema used an invalid combination of keywords.
    ///
    /// ```
    /// use jtd_validate::{Schema, SchemaError};
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     Err(SchemaError::InvalidForm),
    ///     Schema::from_value(&json!({ "type": "uint8", "enum": ["a"] })),
    /// );
    /// ```
    #[error("schema uses an invalid combination of keywords")]
    InvalidForm,

    /// A non-root schema had non-empty `definitions`.
    #[error("\"definitions\" is only allowed on the root schema")]
    NonRootDefinitions,

    /// A `ref` named a definition that doesn't exist.
    #[error("ref to nonexistent definition: {0:?}")]
    DanglingRef(String),

    /// A `type` keyword's value isn't one of the eleven JTD primitive types.
    #[error("not a recognized JSON Type Definition type: {0:?}")]
    InvalidType(String),

    /// An `enum` keyword was malformed. See [`InvalidEnumReason`].
    #[error("invalid enum: {0}")]
    InvalidEnum(InvalidEnumReason),

    /// The same member name appeared in both `properties` and
    /// `optionalProperties`.
    #[error("property repeated in optionalProperties: {0:?}")]
    RepeatedProperty(String),

    /// A `mapping` value was malformed. See [`InvalidMappingReason`].
    #[error("invalid mapping: {0}")]
    InvalidMapping(InvalidMappingReason),
}

/// Sub-reasons for [`SchemaError::InvalidEnum`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidEnumReason {
    /// `enum` was present but empty.
    #[error("enum must not be empty")]
    Empty,
    /// The same value appeared twice in `enum`.
    #[error("enum value repeated: {0:?}")]
    Duplicate(String),
}

/// Sub-reasons for [`SchemaError::InvalidMapping`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidMappingReason {
    /// A `mapping` value wasn't of the properties form.
    #[error("mapping values must be of the properties form")]
    NonPropertiesForm,
    /// A `mapping` value had `nullable` set to `true`.
    #[error("mapping values must not be nullable")]
    Nullable,
    /// A `mapping` value's `properties` or `optionalProperties` redeclared
    /// the discriminator member.
    #[error("discriminator redefined in mapping: {0:?}")]
    DiscriminatorShadowed(String),
}

const KEYWORDS: [&str; 13] = [
    "metadata",
    "nullable",
    "definitions",
    "ref",
    "type",
    "enum",
    "elements",
    "properties",
    "optionalProperties",
    "additionalProperties",
    "values",
    "discriminator",
    "mapping",
];

// Index of valid form "signatures" -- i.e. combinations of the presence of
// the keywords (in order):
//
// ref type enum elements properties optionalProperties additionalProperties
// values discriminator mapping
//
// "definitions", "nullable", and "metadata" are excluded, since they don't
// restrict which form a schema may take.
const VALID_FORM_SIGNATURES: [[bool; 10]; 13] = [
    // Empty form
    [
        false, false, false, false, false, false, false, false, false, false,
    ],
    // Ref form
    [
        true, false, false, false, false, false, false, false, false, false,
    ],
    // Type form
    [
        false, true, false, false, false, false, false, false, false, false,
    ],
    // Enum form
    [
        false, false, true, false, false, false, false, false, false, false,
    ],
    // Elements form
    [
        false, false, false, true, false, false, false, false, false, false,
    ],
    // Properties form -- properties or optionalProperties or both, and never
    // additionalProperties on its own
    [
        false, false, false, false, true, false, false, false, false, false,
    ],
    [
        false, false, false, false, false, true, false, false, false, false,
    ],
    [
        false, false, false, false, true, true, false, false, false, false,
    ],
    [
        false, false, false, false, true, false, true, false, false, false,
    ],
    [
        false, false, false, false, false, true, true, false, false, false,
    ],
    [
        false, false, false, false, true, true, true, false, false, false,
    ],
    // Values form
    [
        false, false, false, false, false, false, false, true, false, false,
    ],
    // Discriminator form
    [
        false, false, false, false, false, false, false, false, true, true,
    ],
];

impl Schema {
    /// Parses a [`Schema`] out of a [`serde_json::Value`].
    ///
    /// This checks that the value is shaped like a JTD schema -- that it's a
    /// JSON object, that it uses only recognized keywords, that those
    /// keywords' values have the right JSON shape, and that it uses a legal
    /// combination of keywords.
    ///
    /// It does *not* check cross-referencing constraints, such as whether a
    /// `ref` actually names a definition that exists, or whether
    /// `definitions` appears outside the root. Use [`Schema::verify`] for
    /// that, after parsing.
    ///
    /// ```
    /// use jtd_validate::{Schema, Type};
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     Schema::Type {
    ///         definitions: Default::default(),
    ///         metadata: Default::default(),
    ///         nullable: false,
    ///         type_: Type::Uint8,
    ///     },
    ///     Schema::from_value(&json!({ "type": "uint8" })).unwrap(),
    /// );
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let obj = value.as_object().ok_or(SchemaError::TypeMismatch {
            keyword: "<schema>",
            expected: "object",
        })?;

        for key in obj.keys() {
            if !KEYWORDS.contains(&key.as_str()) {
                return Err(SchemaError::IllegalKeyword(key.clone()));
            }
        }

        let metadata = match obj.get("metadata") {
            Some(v) => v
                .as_object()
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .ok_or(SchemaError::TypeMismatch {
                    keyword: "metadata",
                    expected: "object",
                })?,
            None => Metadata::new(),
        };

        let nullable = match obj.get("nullable") {
            Some(v) => v.as_bool().ok_or(SchemaError::TypeMismatch {
                keyword: "nullable",
                expected: "boolean",
            })?,
            None => false,
        };

        let mut definitions = Definitions::new();
        if let Some(v) = obj.get("definitions") {
            let map = v.as_object().ok_or(SchemaError::TypeMismatch {
                keyword: "definitions",
                expected: "object",
            })?;
            for (name, sub_value) in map {
                definitions.insert(name.clone(), Self::from_value(sub_value)?);
            }
        }

        let ref_ = match obj.get("ref") {
            Some(v) => Some(
                v.as_str()
                    .ok_or(SchemaError::TypeMismatch {
                        keyword: "ref",
                        expected: "string",
                    })?
                    .to_owned(),
            ),
            None => None,
        };

        let type_raw = match obj.get("type") {
            Some(v) => Some(v.as_str().ok_or(SchemaError::TypeMismatch {
                keyword: "type",
                expected: "string",
            })?),
            None => None,
        };

        let enum_raw = obj.get("enum");
        let elements_raw = obj.get("elements");
        let properties_raw = obj.get("properties");
        let optional_properties_raw = obj.get("optionalProperties");

        let additional_properties = match obj.get("additionalProperties") {
            Some(v) => v.as_bool().ok_or(SchemaError::TypeMismatch {
                keyword: "additionalProperties",
                expected: "boolean",
            })?,
            None => false,
        };

        let values_raw = obj.get("values");

        let discriminator = match obj.get("discriminator") {
            Some(v) => Some(
                v.as_str()
                    .ok_or(SchemaError::TypeMismatch {
                        keyword: "discriminator",
                        expected: "string",
                    })?
                    .to_owned(),
            ),
            None => None,
        };

        let mapping_raw = obj.get("mapping");

        let form_signature = [
            ref_.is_some(),
            type_raw.is_some(),
            enum_raw.is_some(),
            elements_raw.is_some(),
            properties_raw.is_some(),
            optional_properties_raw.is_some(),
            obj.contains_key("additionalProperties"),
            values_raw.is_some(),
            discriminator.is_some(),
            mapping_raw.is_some(),
        ];

        if !VALID_FORM_SIGNATURES.contains(&form_signature) {
            return Err(SchemaError::InvalidForm);
        }

        // From here on, the presence of a keyword determines the form. We
        // handle the forms in the standard order, falling back to Empty.
        if let Some(ref_) = ref_ {
            return Ok(Schema::Ref {
                definitions,
                metadata,
                nullable,
                ref_,
            });
        }

        if let Some(type_raw) = type_raw {
            let type_ = Type::from_keyword(type_raw)
                .ok_or_else(|| SchemaError::InvalidType(type_raw.to_owned()))?;

            return Ok(Schema::Type {
                definitions,
                metadata,
                nullable,
                type_,
            });
        }

        if let Some(enum_raw) = enum_raw {
            let values = enum_raw.as_array().ok_or(SchemaError::TypeMismatch {
                keyword: "enum",
                expected: "array",
            })?;

            // Built up by hand, rather than via collect(), so that a
            // repeated value can be reported instead of silently dropped.
            let mut enum_ = BTreeSet::new();
            for value in values {
                let s = value.as_str().ok_or(SchemaError::TypeMismatch {
                    keyword: "enum",
                    expected: "array of strings",
                })?;

                if !enum_.insert(s.to_owned()) {
                    return Err(SchemaError::InvalidEnum(InvalidEnumReason::Duplicate(
                        s.to_owned(),
                    )));
                }
            }

            return Ok(Schema::Enum {
                definitions,
                metadata,
                nullable,
                enum_,
            });
        }

        if let Some(elements_raw) = elements_raw {
            return Ok(Schema::Elements {
                definitions,
                metadata,
                nullable,
                elements: Box::new(Self::from_value(elements_raw)?),
            });
        }

        if properties_raw.is_some() || optional_properties_raw.is_some() {
            let properties_is_present = properties_raw.is_some();

            let mut properties = BTreeMap::new();
            if let Some(v) = properties_raw {
                let map = v.as_object().ok_or(SchemaError::TypeMismatch {
                    keyword: "properties",
                    expected: "object",
                })?;
                for (name, sub_value) in map {
                    properties.insert(name.clone(), Self::from_value(sub_value)?);
                }
            }

            let mut optional_properties = BTreeMap::new();
            if let Some(v) = optional_properties_raw {
                let map = v.as_object().ok_or(SchemaError::TypeMismatch {
                    keyword: "optionalProperties",
                    expected: "object",
                })?;
                for (name, sub_value) in map {
                    optional_properties.insert(name.clone(), Self::from_value(sub_value)?);
                }
            }

            return Ok(Schema::Properties {
                definitions,
                metadata,
                nullable,
                properties,
                optional_properties,
                properties_is_present,
                additional_properties,
            });
        }

        if let Some(values_raw) = values_raw {
            return Ok(Schema::Values {
                definitions,
                metadata,
                nullable,
                values: Box::new(Self::from_value(values_raw)?),
            });
        }

        if let Some(discriminator) = discriminator {
            // Safe: the form signature check above guarantees mapping is
            // present whenever discriminator is.
            let map = mapping_raw.unwrap().as_object().ok_or(SchemaError::TypeMismatch {
                keyword: "mapping",
                expected: "object",
            })?;

            let mut mapping = BTreeMap::new();
            for (name, sub_value) in map {
                mapping.insert(name.clone(), Self::from_value(sub_value)?);
            }

            return Ok(Schema::Discriminator {
                definitions,
                metadata,
                nullable,
                discriminator,
                mapping,
            });
        }

        Ok(Schema::Empty {
            definitions,
            metadata,
        })
    }

    /// Checks that a [`Schema`] is well-formed: that `ref`s resolve, that
    /// `definitions` only appears at the root, that `enum` is non-empty,
    /// that `properties` and `optionalProperties` don't overlap, and that
    /// `mapping` values are well-formed.
    ///
    /// Returns the schema unchanged on success, so this can be chained onto
    /// [`Schema::from_value`].
    ///
    /// ```
    /// use jtd_validate::{Schema, SchemaError};
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     Err(SchemaError::DanglingRef("foo".to_owned())),
    ///     Schema::from_value(&json!({ "ref": "foo" }))
    ///         .and_then(Schema::verify),
    /// );
    /// ```
    pub fn verify(self) -> Result<Self, SchemaError> {
        self.verify_against(None)?;
        Ok(self)
    }

    fn verify_against(&self, root: Option<&Self>) -> Result<(), SchemaError> {
        let sub_root = root.or(Some(self));

        if root.is_some() && !self.definitions().is_empty() {
            return Err(SchemaError::NonRootDefinitions);
        }

        for sub_schema in self.definitions().values() {
            sub_schema.verify_against(sub_root)?;
        }

        match self {
            Self::Empty { .. } => {}
            Self::Ref { ref_, .. } => {
                if !sub_root.unwrap().definitions().contains_key(ref_) {
                    return Err(SchemaError::DanglingRef(ref_.clone()));
                }
            }
            Self::Type { .. } => {}
            Self::Enum { enum_, .. } => {
                if enum_.is_empty() {
                    return Err(SchemaError::InvalidEnum(InvalidEnumReason::Empty));
                }
            }
            Self::Elements { elements, .. } => {
                elements.verify_against(sub_root)?;
            }
            Self::Properties {
                properties,
                optional_properties,
                ..
            } => {
                for key in properties.keys() {
                    if optional_properties.contains_key(key) {
                        return Err(SchemaError::RepeatedProperty(key.clone()));
                    }
                }

                for sub_schema in properties.values() {
                    sub_schema.verify_against(sub_root)?;
                }

                for sub_schema in optional_properties.values() {
                    sub_schema.verify_against(sub_root)?;
                }
            }
            Self::Values { values, .. } => {
                values.verify_against(sub_root)?;
            }
            Self::Discriminator {
                discriminator,
                mapping,
                ..
            } => {
                for sub_schema in mapping.values() {
                    if let Self::Properties {
                        nullable,
                        properties,
                        optional_properties,
                        ..
                    } = sub_schema
                    {
                        if *nullable {
                            return Err(SchemaError::InvalidMapping(InvalidMappingReason::Nullable));
                        }

                        if properties.contains_key(discriminator)
                            || optional_properties.contains_key(discriminator)
                        {
                            return Err(SchemaError::InvalidMapping(
                                InvalidMappingReason::DiscriminatorShadowed(discriminator.clone()),
                            ));
                        }
                    } else {
                        return Err(SchemaError::InvalidMapping(
                            InvalidMappingReason::NonPropertiesForm,
                        ));
                    }

                    sub_schema.verify_against(sub_root)?;
                }
            }
        }

        Ok(())
    }

    /// Returns the [`Form`] this schema takes on.
    ///
    /// ```
    /// use jtd_validate::{Form, Schema};
    /// use serde_json::json;
    ///
    /// assert_eq!(
    ///     Form::Elements,
    ///     Schema::from_value(&json!({ "elements": {} })).unwrap().form(),
    /// );
    /// ```
    pub fn form(&self) -> Form {
        match self {
            Self::Empty { .. } => Form::Empty,
            Self::Ref { .. } => Form::Ref,
            Self::Type { .. } => Form::Type,
            Self::Enum { .. } => Form::Enum,
            Self::Elements { .. } => Form::Elements,
            Self::Properties { .. } => Form::Properties,
            Self::Values { .. } => Form::Values,
            Self::Discriminator { .. } => Form::Discriminator,
        }
    }

    /// Gets the schema's `definitions`.
    pub fn definitions(&self) -> &Definitions {
        match self {
            Self::Empty { definitions, .. } => definitions,
            Self::Ref { definitions, .. } => definitions,
            Self::Type { definitions, .. } => definitions,
            Self::Enum { definitions, .. } => definitions,
            Self::Elements { definitions, .. } => definitions,
            Self::Properties { definitions, .. } => definitions,
            Self::Values { definitions, .. } => definitions,
            Self::Discriminator { definitions, .. } => definitions,
        }
    }

    /// Gets the schema's `metadata`.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Self::Empty { metadata, .. } => metadata,
            Self::Ref { metadata, .. } => metadata,
            Self::Type { metadata, .. } => metadata,
            Self::Enum { metadata, .. } => metadata,
            Self::Elements { metadata, .. } => metadata,
            Self::Properties { metadata, .. } => metadata,
            Self::Values { metadata, .. } => metadata,
            Self::Discriminator { metadata, .. } => metadata,
        }
    }

    /// Gets whether the schema accepts `null`.
    ///
    /// Always `true` for [`Schema::Empty`], since the empty form accepts
    /// `null` regardless.
    pub fn nullable(&self) -> bool {
        match self {
            Self::Empty { .. } => true,
            Self::Ref { nullable, .. } => *nullable,
            Self::Type { nullable, .. } => *nullable,
            Self::Enum { nullable, .. } => *nullable,
            Self::Elements { nullable, .. } => *nullable,
            Self::Properties { nullable, .. } => *nullable,
            Self::Values { nullable, .. } => *nullable,
            Self::Discriminator { nullable, .. } => *nullable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object() {
        assert_eq!(
            Err(SchemaError::TypeMismatch {
                keyword: "<schema>",
                expected: "object"
            }),
            Schema::from_value(&json!(5)),
        );
    }

    #[test]
    fn rejects_illegal_keyword() {
        assert_eq!(
            Err(SchemaError::IllegalKeyword("minimum".to_owned())),
            Schema::from_value(&json!({ "minimum": 5 })),
        );
    }

    #[test]
    fn rejects_bad_keyword_combination() {
        assert_eq!(
            Err(SchemaError::InvalidForm),
            Schema::from_value(&json!({ "type": "uint8", "enum": ["a"] })),
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert_eq!(
            Err(SchemaError::InvalidType("uint64".to_owned())),
            Schema::from_value(&json!({ "type": "uint64" })),
        );
    }

    #[test]
    fn rejects_duplicate_enum_value() {
        assert_eq!(
            Err(SchemaError::InvalidEnum(InvalidEnumReason::Duplicate(
                "foo".to_owned()
            ))),
            Schema::from_value(&json!({ "enum": ["foo", "bar", "foo"] })),
        );
    }

    #[test]
    fn rejects_empty_enum_at_verify() {
        let schema = Schema::from_value(&json!({ "enum": [] })).unwrap();
        assert_eq!(
            Err(SchemaError::InvalidEnum(InvalidEnumReason::Empty)),
            schema.verify(),
        );
    }

    #[test]
    fn rejects_dangling_ref() {
        let schema = Schema::from_value(&json!({ "ref": "foo" })).unwrap();
        assert_eq!(
            Err(SchemaError::DanglingRef("foo".to_owned())),
            schema.verify(),
        );
    }

    #[test]
    fn rejects_non_root_definitions() {
        let schema = Schema::from_value(&json!({
            "elements": {
                "definitions": { "foo": {} }
            }
        }))
        .unwrap();

        assert_eq!(Err(SchemaError::NonRootDefinitions), schema.verify());
    }

    #[test]
    fn rejects_repeated_property() {
        let schema = Schema::from_value(&json!({
            "properties": { "foo": {} },
            "optionalProperties": { "foo": {} }
        }))
        .unwrap();

        assert_eq!(
            Err(SchemaError::RepeatedProperty("foo".to_owned())),
            schema.verify(),
        );
    }

    #[test]
    fn rejects_nullable_mapping() {
        let schema = Schema::from_value(&json!({
            "discriminator": "kind",
            "mapping": {
                "a": { "nullable": true, "properties": {} }
            }
        }))
        .unwrap();

        assert_eq!(
            Err(SchemaError::InvalidMapping(InvalidMappingReason::Nullable)),
            schema.verify(),
        );
    }

    #[test]
    fn rejects_non_properties_mapping() {
        let schema = Schema::from_value(&json!({
            "discriminator": "kind",
            "mapping": { "a": {} }
        }))
        .unwrap();

        assert_eq!(
            Err(SchemaError::InvalidMapping(
                InvalidMappingReason::NonPropertiesForm
            )),
            schema.verify(),
        );
    }

    #[test]
    fn rejects_shadowed_discriminator() {
        let schema = Schema::from_value(&json!({
            "discriminator": "kind",
            "mapping": {
                "a": { "properties": { "kind": {} } }
            }
        }))
        .unwrap();

        assert_eq!(
            Err(SchemaError::InvalidMapping(
                InvalidMappingReason::DiscriminatorShadowed("kind".to_owned())
            )),
            schema.verify(),
        );
    }

    #[test]
    fn accepts_well_formed_schema() {
        let schema = Schema::from_value(&json!({
            "definitions": {
                "coord": { "properties": { "x": { "type": "float64" }, "y": { "type": "float64" } } }
            },
            "properties": {
                "name": { "type": "string" },
                "position": { "ref": "coord" }
            },
            "optionalProperties": {
                "age": { "type": "uint32" }
            }
        }))
        .unwrap();

        assert!(schema.clone().verify().is_ok());
        assert_eq!(Form::Properties, schema.form());
    }

    #[test]
    fn verify_is_idempotent() {
        let schema = Schema::from_value(&json!({ "type": "string" }))
            .unwrap()
            .verify()
            .unwrap();

        assert_eq!(schema.clone().verify().unwrap(), schema.verify().unwrap());
    }
}
