//! Encoding and decoding of tagged unions.

use std::cell::RefCell;

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::TaggedUnion;
use crate::error::{CodecError, Discriminator, MalformedVariantError, UnknownVariantError};
use crate::naming::to_snake_case;

// ─────────────────────────────────────────────────────────────────────────────
// Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Encodes a union into a JSON object with the discriminator as first key.
///
/// An ordinary field sharing the discriminator's name is replaced by the
/// declared discriminator. Top-level keys go through the snake-case policy.
pub fn encode_value<U: TaggedUnion>(value: &U) -> Result<Value, CodecError> {
    let descriptor = U::descriptor()?;
    let field = descriptor.field();
    let discriminator = value.discriminator();

    let fields = match value.encode_fields()? {
        Value::Object(map) => map,
        other => {
            return Err(MalformedVariantError {
                union: U::NAME,
                variant: value.variant_name(),
                discriminator,
                detail: format!("variant serialized to {} instead of an object", kind(&other)),
            }
            .into());
        }
    };

    let mut object = Map::with_capacity(fields.len() + 1);
    object.insert(field.to_string(), Value::String(discriminator.to_string()));
    for (key, v) in fields {
        let key = to_snake_case(&key).into_owned();
        if key != field {
            object.insert(key, v);
        }
    }

    Ok(Value::Object(object))
}

/// Encodes a union into a JSON string.
pub fn encode<U: TaggedUnion>(value: &U) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&encode_value(value)?)?)
}

/// Encodes a union into JSON bytes.
pub fn encode_to_vec<U: TaggedUnion>(value: &U) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(&encode_value(value)?)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Decodes a union from an already parsed JSON value.
///
/// The discriminator is read before anything else; only the selected
/// variant's decoder ever sees the payload. Object keys at every depth go
/// through the snake-case policy first, and two keys that normalise to the
/// same name make the payload malformed.
pub fn decode_value<U: TaggedUnion>(value: Value) -> Result<U, CodecError> {
    let descriptor = U::descriptor()?;
    let field = descriptor.field();

    let object = match value {
        Value::Object(map) => map,
        other => {
            return Err(CodecError::ExpectedObject {
                union: U::NAME,
                found: kind(&other),
            });
        }
    };

    let tag = match object.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(unknown::<U>(field, Discriminator::Value(other.to_string()))),
        None => return Err(unknown::<U>(field, Discriminator::Missing)),
    };

    let Some(variant) = descriptor.lookup(&tag) else {
        return Err(unknown::<U>(field, Discriminator::Value(tag)));
    };

    let malformed = |detail: String| -> CodecError {
        MalformedVariantError {
            union: U::NAME,
            variant: variant.name(),
            discriminator: variant.discriminator(),
            detail,
        }
        .into()
    };

    let payload = normalize_keys(Value::Object(object)).map_err(malformed)?;
    variant
        .decode(payload)
        .map_err(|e| malformed(e.to_string()))
}

/// Decodes a union from a JSON string.
pub fn decode<U: TaggedUnion>(input: &str) -> Result<U, CodecError> {
    decode_value(serde_json::from_str(input)?)
}

/// Decodes a union from JSON bytes.
pub fn decode_slice<U: TaggedUnion>(input: &[u8]) -> Result<U, CodecError> {
    decode_value(serde_json::from_slice(input)?)
}

/// Decodes a JSON array of unions, dispatching every element independently.
///
/// The first failing element fails the whole array.
pub fn decode_array<U: TaggedUnion>(value: Value) -> Result<Vec<U>, CodecError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(CodecError::ExpectedArray {
                union: U::NAME,
                found: kind(&other),
            });
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            decode_value::<U>(item).inspect_err(|e| {
                tracing::debug!(union = U::NAME, index, error = %e, "array element rejected");
            })
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Whole payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Serializes any payload (typically a request DTO carrying unions) to JSON bytes.
pub fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserializes any payload (typically a response DTO carrying unions) from JSON bytes.
///
/// A union failing anywhere inside the payload is reported as
/// [`CodecError::UnknownVariant`] or [`CodecError::MalformedVariant`], not as
/// a plain JSON error.
pub fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, CodecError> {
    with_union_errors(|| serde_json::from_slice(input))
}

/// Deserializes any payload from a JSON string.
pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, CodecError> {
    with_union_errors(|| serde_json::from_str(input))
}

thread_local! {
    // Typed failure of the outermost union decoded through serde, which can
    // only carry a message.
    static UNION_FAILURE: RefCell<Option<CodecError>> = const { RefCell::new(None) };
}

fn take_union_failure() -> Option<CodecError> {
    UNION_FAILURE.with(|slot| slot.borrow_mut().take())
}

fn with_union_errors<T>(
    parse: impl FnOnce() -> Result<T, serde_json::Error>,
) -> Result<T, CodecError> {
    take_union_failure();
    let result = parse();
    let failure = take_union_failure();
    result.map_err(|e| match failure {
        Some(typed) if e.is_data() => typed,
        _ => CodecError::Json(e),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// serde glue used by `tagged_union!`
// ─────────────────────────────────────────────────────────────────────────────

#[doc(hidden)]
pub fn serialize_union<U, S>(value: &U, serializer: S) -> Result<S::Ok, S::Error>
where
    U: TaggedUnion,
    S: Serializer,
{
    encode_value(value)
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

#[doc(hidden)]
pub fn deserialize_union<'de, U, D>(deserializer: D) -> Result<U, D::Error>
where
    U: TaggedUnion,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode_value(value).map_err(|e| {
        let error = D::Error::custom(&e);
        UNION_FAILURE.with(|slot| *slot.borrow_mut() = Some(e));
        error
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn unknown<U: TaggedUnion>(field: &'static str, discriminator: Discriminator) -> CodecError {
    tracing::debug!(union = U::NAME, field, %discriminator, "unrecognised discriminator");
    UnknownVariantError {
        union: U::NAME,
        field,
        discriminator,
    }
    .into()
}

fn normalize_keys(value: Value) -> Result<Value, String> {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                let snake = to_snake_case(&key).into_owned();
                if out.contains_key(&snake) {
                    return Err(format!(
                        "key `{}` collides with another key normalised to `{}`",
                        key, snake
                    ));
                }
                out.insert(snake, normalize_keys(v)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .into_iter()
            .map(normalize_keys)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
