//! Purpose: Decode successful response bodies into their declared Rust types.
//! Exports: `FromJson`, `decode_json`, `decode_tree`.
//! Role: Seam the transport calls; picks structural decode or the variant decoder per type.
//! Invariants: Variant-family targets never bypass the variant decoder, including through serde.

use super::error::{ApiResult, Error, ErrorKind};
use super::variant::{VariantFamily, trace_children};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

/// A type the transport can produce from a 2xx JSON body.
pub trait FromJson: Sized {
    fn from_json(body: &str) -> ApiResult<Self>;
}

pub fn decode_json<T: DeserializeOwned>(body: &str, what: &'static str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|err| {
        Error::new(ErrorKind::Decode)
            .with_message(format!("invalid {what} json"))
            .with_source(err)
    })
}

/// Decodes a record whose `fields` hold lists of family `C`.
///
/// A failure inside a child surfaces with the child's own kind and family.
pub fn decode_tree<T, C>(body: &str, what: &'static str, fields: &[&str]) -> ApiResult<T>
where
    T: DeserializeOwned,
    C: VariantFamily,
{
    decode_json(body, what).or_else(|err| {
        trace_children::<C>(body, fields)?;
        Err(err)
    })
}

/// `deserialize_with` helper: a JSON `null` decodes as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(body: &str) -> ApiResult<Self> {
        let items: Vec<Box<RawValue>> = decode_json(body, "array")?;
        items.iter().map(|raw| T::from_json(raw.get())).collect()
    }
}

impl FromJson for serde_json::Value {
    fn from_json(body: &str) -> ApiResult<Self> {
        decode_json(body, "response")
    }
}

/// Plain records: decoded directly with serde.
macro_rules! structural_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::core::body::FromJson for $ty {
                fn from_json(body: &str) -> $crate::core::error::ApiResult<Self> {
                    $crate::core::body::decode_json(body, stringify!($ty))
                }
            }
        )*
    };
}

/// Variant families: routed through the discriminator decoder.
macro_rules! variant_json {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::core::body::FromJson for $ty {
                fn from_json(body: &str) -> $crate::core::error::ApiResult<Self> {
                    $crate::core::variant::decode(body)
                }
            }

            impl ::serde::Serialize for $ty {
                fn serialize<S: ::serde::Serializer>(
                    &self,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    $crate::core::variant::serialize(self, serializer)
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $ty {
                fn deserialize<D: ::serde::Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Self, D::Error> {
                    $crate::core::variant::deserialize(deserializer)
                }
            }
        )*
    };
}

pub(crate) use structural_json;
pub(crate) use variant_json;
