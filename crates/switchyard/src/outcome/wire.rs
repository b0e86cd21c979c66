//! Serde representation of [`Outcome`].
//!
//! The `ok` flag selects which of `value` or `error` is meaningful. The
//! payload is deserialised directly into `T`/`E`, so unit and optional
//! payloads survive the round trip.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use super::Outcome;

const FIELDS: &[&str] = &["ok", "value", "error"];

impl<T, E> Serialize for Outcome<T, E>
where
    T: Serialize,
    E: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Self::Success(value) => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("value", value)?;
            }
            Self::Failure(error) => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

impl<'de, T, E> Deserialize<'de> for Outcome<T, E>
where
    T: Deserialize<'de>,
    E: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_struct(
            "Outcome",
            FIELDS,
            OutcomeVisitor {
                marker: PhantomData,
            },
        )
    }
}

struct OutcomeVisitor<T, E> {
    marker: PhantomData<fn() -> (T, E)>,
}

impl<'de, T, E> Visitor<'de> for OutcomeVisitor<T, E>
where
    T: Deserialize<'de>,
    E: Deserialize<'de>,
{
    type Value = Outcome<T, E>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an outcome object with an `ok` flag")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut ok: Option<bool> = None;
        let mut value: Option<T> = None;
        let mut error: Option<E> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "ok" => {
                    if ok.is_some() {
                        return Err(de::Error::duplicate_field("ok"));
                    }
                    ok = Some(map.next_value()?);
                }
                "value" => {
                    if value.is_some() {
                        return Err(de::Error::duplicate_field("value"));
                    }
                    value = Some(map.next_value()?);
                }
                "error" => {
                    if error.is_some() {
                        return Err(de::Error::duplicate_field("error"));
                    }
                    error = Some(map.next_value()?);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        match ok {
            Some(true) => value
                .map(Outcome::Success)
                .ok_or_else(|| de::Error::missing_field("value")),
            Some(false) => error
                .map(Outcome::Failure)
                .ok_or_else(|| de::Error::missing_field("error")),
            None => Err(de::Error::missing_field("ok")),
        }
    }
}
