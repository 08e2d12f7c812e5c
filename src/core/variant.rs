//! Purpose: Two-phase discriminator decoding and tag-injecting encoding for variant families.
//! Exports: `VariantFamily`, `Discriminator`, `decode`, `decode_raw`, `decode_seq`, `decode_list`,
//!          `encode`, `serialize`, `deserialize`, `structural`, `structural_tree`,
//!          `trace_children`.
//! Role: The only place a JSON tag is mapped to a concrete Rust type.
//! Invariants: The tag is peeked first; the concrete type is never inferred from field shape.
//! Invariants: Unknown tags and missing/non-string tags are errors, never a default variant.
//! Invariants: A discriminator field repeated within one object is a malformed envelope.
//! Invariants: Sequences keep document order; no reordering or deduplication.
//! Invariants: Decoding is a pure function of the input bytes.

use super::error::{ApiResult, Error, ErrorKind};
use serde::de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// One discriminator dialect of a family: the field carrying the tag and the tag table.
pub struct Discriminator<K: 'static> {
    pub field: &'static str,
    pub resolve: fn(&str) -> Option<K>,
    pub tag: fn(K) -> &'static str,
}

/// A closed set of concrete types selected at runtime by a JSON discriminator.
pub trait VariantFamily: Sized {
    type Kind: Copy + fmt::Debug + 'static;

    const FAMILY: &'static str;
    /// Discriminators accepted on decode, highest precedence first.
    const DECODE: &'static [Discriminator<Self::Kind>];
    /// Discriminator written on encode.
    const ENCODE: Discriminator<Self::Kind>;

    fn kind(&self) -> Self::Kind;

    /// Fully decodes `raw` into the concrete type already selected by `kind`.
    fn decode_kind(kind: Self::Kind, raw: &RawValue) -> ApiResult<Self>;

    /// Serializes the concrete variant's own fields, without any discriminator.
    fn encode_fields(&self) -> serde_json::Result<Value>;
}

pub fn decode<F: VariantFamily>(json: &str) -> ApiResult<F> {
    let raw: &RawValue = serde_json::from_str(json).map_err(|err| {
        malformed::<F>("envelope is not valid JSON").with_source(err)
    })?;
    decode_raw(raw)
}

pub fn decode_raw<F: VariantFamily>(raw: &RawValue) -> ApiResult<F> {
    let kind = resolve::<F>(raw)?;
    F::decode_kind(kind, raw)
}

/// Decodes a JSON array element-wise, failing on the first bad element.
pub fn decode_seq<F: VariantFamily>(json: &str) -> ApiResult<Vec<F>> {
    let items: Vec<Box<RawValue>> = serde_json::from_str(json).map_err(|err| {
        Error::new(ErrorKind::Decode)
            .with_message("expected a JSON array")
            .with_family(F::FAMILY)
            .with_source(err)
    })?;
    decode_list(&items)
}

pub fn decode_list<F: VariantFamily>(items: &[Box<RawValue>]) -> ApiResult<Vec<F>> {
    items.iter().map(|raw| decode_raw::<F>(raw)).collect()
}

/// Decodes `raw` into `T` with serde, tagging failures with the family and variant.
pub fn structural<F, T>(kind: F::Kind, raw: &RawValue) -> ApiResult<T>
where
    F: VariantFamily,
    T: DeserializeOwned,
{
    serde_json::from_str(raw.get()).map_err(|err| {
        let variant = variant_name::<F>(kind);
        Error::new(ErrorKind::Decode)
            .with_message(format!("invalid {variant} payload"))
            .with_family(F::FAMILY)
            .with_variant(variant)
            .with_source(err)
    })
}

/// Like `structural`, for variants that hold child lists of family `C` under `fields`.
///
/// Children decode through `C`'s serde impl in the same pass. When that pass fails, the lists are
/// walked again with the family decoder so an error inside a child keeps its own kind.
pub fn structural_tree<F, C, T>(kind: F::Kind, raw: &RawValue, fields: &[&str]) -> ApiResult<T>
where
    F: VariantFamily,
    C: VariantFamily,
    T: DeserializeOwned,
{
    structural::<F, T>(kind, raw).or_else(|err| {
        trace_children::<C>(raw.get(), fields)?;
        Err(err)
    })
}

/// Decodes the child lists named by `fields` of a JSON object through family `C`.
///
/// Returns the first child error. Fields that are absent, `null`, or not arrays are skipped.
pub fn trace_children<C: VariantFamily>(json: &str, fields: &[&str]) -> ApiResult<()> {
    let Ok(envelope) = serde_json::from_str::<HashMap<String, Box<RawValue>>>(json) else {
        return Ok(());
    };
    for field in fields {
        let Some(value) = envelope.get(*field) else {
            continue;
        };
        if let Ok(Some(items)) = serde_json::from_str::<Option<Vec<Box<RawValue>>>>(value.get()) {
            decode_list::<C>(&items)?;
        }
    }
    Ok(())
}

pub fn encode<F: VariantFamily>(value: &F) -> ApiResult<Value> {
    let kind = value.kind();
    let fields = value.encode_fields().map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode variant fields")
            .with_family(F::FAMILY)
            .with_variant(variant_name::<F>(kind))
            .with_source(err)
    })?;
    let mut map = match fields {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => {
            return Err(Error::new(ErrorKind::Internal)
                .with_message("variant fields must encode to a JSON object")
                .with_family(F::FAMILY)
                .with_variant(variant_name::<F>(kind)));
        }
    };
    map.insert(
        F::ENCODE.field.to_string(),
        Value::String((F::ENCODE.tag)(kind).to_string()),
    );
    Ok(Value::Object(map))
}

/// `Serialize` body for family enums.
pub fn serialize<F, S>(value: &F, serializer: S) -> Result<S::Ok, S::Error>
where
    F: VariantFamily,
    S: Serializer,
{
    encode(value)
        .map_err(serde::ser::Error::custom)?
        .serialize(serializer)
}

/// `Deserialize` body for family enums; plain serde goes through the same tag lookup.
pub fn deserialize<'de, F, D>(deserializer: D) -> Result<F, D::Error>
where
    F: VariantFamily,
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    decode_raw(&raw).map_err(serde::de::Error::custom)
}

fn variant_name<F: VariantFamily>(kind: F::Kind) -> &'static str {
    F::DECODE.first().map_or(F::ENCODE.tag, |d| d.tag)(kind)
}

fn malformed<F: VariantFamily>(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::MalformedEnvelope)
        .with_message(message)
        .with_family(F::FAMILY)
}

fn resolve<F: VariantFamily>(raw: &RawValue) -> ApiResult<F::Kind> {
    let mut de = serde_json::Deserializer::from_str(raw.get());
    let peek = de
        .deserialize_map(TagPeek {
            discriminators: F::DECODE,
        })
        .map_err(|err| malformed::<F>("envelope is not a JSON object").with_source(err))?;

    if let Some(field) = peek.repeated {
        let message = format!("discriminator field `{field}` appears more than once");
        return Err(malformed::<F>(message));
    }
    let Some((index, value)) = peek.found else {
        let fields: Vec<&str> = F::DECODE.iter().map(|d| d.field).collect();
        return Err(malformed::<F>(format!(
            "missing discriminator field `{}`",
            fields.join("` or `")
        )));
    };
    let discriminator = &F::DECODE[index];
    let Value::String(tag) = value else {
        return Err(malformed::<F>(format!(
            "discriminator field `{}` must be a string",
            discriminator.field
        )));
    };
    (discriminator.resolve)(&tag).ok_or_else(|| {
        Error::new(ErrorKind::UnknownVariant)
            .with_message(format!("unknown `{}` value", discriminator.field))
            .with_family(F::FAMILY)
            .with_variant(tag)
    })
}

/// Scans top-level keys only, skipping every value except the discriminator candidates.
struct TagPeek<K: 'static> {
    discriminators: &'static [Discriminator<K>],
}

struct Peeked {
    /// Index of the best discriminator present, with its raw value.
    found: Option<(usize, Value)>,
    repeated: Option<&'static str>,
}

impl<'de, K: 'static> Visitor<'de> for TagPeek<K> {
    type Value = Peeked;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found: Option<(usize, Value)> = None;
        let mut seen = vec![false; self.discriminators.len()];
        let mut repeated = None;
        while let Some(key) = map.next_key::<String>()? {
            let position = self.discriminators.iter().position(|d| d.field == key);
            if let Some(index) = position {
                if seen[index] {
                    repeated.get_or_insert(self.discriminators[index].field);
                }
                seen[index] = true;
            }
            match position {
                Some(index) if found.as_ref().is_none_or(|(best, _)| index < *best) => {
                    found = Some((index, map.next_value::<Value>()?));
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(Peeked { found, repeated })
    }
}

#[cfg(test)]
mod tests {
    use super::{Discriminator, VariantFamily, decode, decode_seq, encode, structural};
    use crate::core::error::{ApiResult, ErrorKind};
    use serde::{Deserialize, Serialize};
    use serde_json::value::RawValue;
    use serde_json::{Value, json};

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum ShapeKind {
        Circle,
        Square,
    }

    impl ShapeKind {
        fn from_tag(tag: &str) -> Option<Self> {
            match tag {
                "Circle" => Some(Self::Circle),
                "Square" => Some(Self::Square),
                _ => None,
            }
        }

        fn tag(self) -> &'static str {
            match self {
                Self::Circle => "Circle",
                Self::Square => "Square",
            }
        }

        fn from_lower(tag: &str) -> Option<Self> {
            match tag {
                "circle" => Some(Self::Circle),
                "square" => Some(Self::Square),
                _ => None,
            }
        }

        fn lower(self) -> &'static str {
            match self {
                Self::Circle => "circle",
                Self::Square => "square",
            }
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Circle {
        radius: u32,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Square {
        side: u32,
    }

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(Circle),
        Square(Square),
    }

    const SHAPE: Discriminator<ShapeKind> = Discriminator {
        field: "kind",
        resolve: ShapeKind::from_tag,
        tag: ShapeKind::tag,
    };

    const SHAPE_LOWER: Discriminator<ShapeKind> = Discriminator {
        field: "@type",
        resolve: ShapeKind::from_lower,
        tag: ShapeKind::lower,
    };

    impl VariantFamily for Shape {
        type Kind = ShapeKind;

        const FAMILY: &'static str = "Shape";
        const DECODE: &'static [Discriminator<ShapeKind>] = &[SHAPE, SHAPE_LOWER];
        const ENCODE: Discriminator<ShapeKind> = SHAPE_LOWER;

        fn kind(&self) -> ShapeKind {
            match self {
                Shape::Circle(_) => ShapeKind::Circle,
                Shape::Square(_) => ShapeKind::Square,
            }
        }

        fn decode_kind(kind: ShapeKind, raw: &RawValue) -> ApiResult<Self> {
            Ok(match kind {
                ShapeKind::Circle => Shape::Circle(structural::<Self, _>(kind, raw)?),
                ShapeKind::Square => Shape::Square(structural::<Self, _>(kind, raw)?),
            })
        }

        fn encode_fields(&self) -> serde_json::Result<Value> {
            match self {
                Shape::Circle(c) => serde_json::to_value(c),
                Shape::Square(s) => serde_json::to_value(s),
            }
        }
    }

    #[test]
    fn decodes_by_tag_not_by_shape() {
        let shape: Shape = decode(r#"{"kind":"Square","radius":3,"side":4}"#).expect("decode");
        assert_eq!(shape, Shape::Square(Square { side: 4 }));
    }

    #[test]
    fn primary_discriminator_wins_over_secondary() {
        let shape: Shape =
            decode(r#"{"@type":"circle","kind":"Square","side":2,"radius":1}"#).expect("decode");
        assert_eq!(shape, Shape::Square(Square { side: 2 }));
    }

    #[test]
    fn secondary_discriminator_is_accepted() {
        let shape: Shape = decode(r#"{"@type":"circle","radius":7}"#).expect("decode");
        assert_eq!(shape, Shape::Circle(Circle { radius: 7 }));
    }

    #[test]
    fn unknown_tag_is_reported_with_value() {
        let err = decode::<Shape>(r#"{"kind":"Hexagon"}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
        assert_eq!(err.variant(), Some("Hexagon"));
        assert_eq!(err.family(), Some("Shape"));
    }

    #[test]
    fn tag_casing_is_exact() {
        let err = decode::<Shape>(r#"{"kind":"circle","radius":1}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    }

    #[test]
    fn missing_or_non_string_tag_is_malformed() {
        let err = decode::<Shape>(r#"{"radius":1}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);

        let err = decode::<Shape>(r#"{"kind":3,"radius":1}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);

        let err = decode::<Shape>(r#"["kind","Circle"]"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);

        let err = decode::<Shape>(r#"{"kind":"Circle""#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
    }

    #[test]
    fn repeated_discriminator_is_malformed() {
        let err =
            decode::<Shape>(r#"{"kind":"Circle","radius":1,"kind":"Square"}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
        assert!(err.message().is_some_and(|m| m.contains("`kind`")));

        let err = decode::<Shape>(r#"{"@type":"circle","kind":"Square","@type":"circle"}"#)
            .expect_err("err");
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);

        let shape: Shape =
            decode(r#"{"kind":"Square","@type":"circle","side":3}"#).expect("decode");
        assert_eq!(shape, Shape::Square(Square { side: 3 }));
    }

    #[test]
    fn structural_failure_names_the_variant() {
        let err = decode::<Shape>(r#"{"kind":"Circle","radius":"big"}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.family(), Some("Shape"));
        assert_eq!(err.variant(), Some("Circle"));
    }

    #[test]
    fn sequence_preserves_order_and_fails_whole() {
        let shapes: Vec<Shape> = decode_seq(
            r#"[{"kind":"Square","side":1},{"kind":"Circle","radius":2},{"kind":"Square","side":1}]"#,
        )
        .expect("decode");
        assert_eq!(
            shapes,
            vec![
                Shape::Square(Square { side: 1 }),
                Shape::Circle(Circle { radius: 2 }),
                Shape::Square(Square { side: 1 }),
            ]
        );

        let err = decode_seq::<Shape>(r#"[{"kind":"Square","side":1},{"kind":"Oval"}]"#)
            .expect_err("err");
        assert_eq!(err.kind(), ErrorKind::UnknownVariant);

        let err = decode_seq::<Shape>(r#"{"kind":"Square","side":1}"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn encode_injects_the_encode_discriminator() {
        let value = encode(&Shape::Circle(Circle { radius: 5 })).expect("encode");
        assert_eq!(value, json!({"@type": "circle", "radius": 5}));

        let back: Shape = decode(&value.to_string()).expect("decode");
        assert_eq!(back, Shape::Circle(Circle { radius: 5 }));
    }
}
