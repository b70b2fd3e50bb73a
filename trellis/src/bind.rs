//! Request body binding.
//!
//! The binder decodes raw request values into typed structures through
//! `serde`: [`bind_json`] deserializes a JSON body directly, [`bind_form`]
//! parses an urlencoded body (falling back to the query string) into
//! [`FormValues`] and deserializes from there. Binding is a collaborator of
//! the dispatch core, not part of it - action handlers call it explicitly.

use crate::context::RenderContext;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use thiserror::Error;

/// Errors produced while binding request values.
#[derive(Error, Debug)]
pub enum BindError {
    /// JSON (de)serialization failed.
    #[error("json binding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The request body was not valid UTF-8.
    #[error("request body is not valid utf-8")]
    BodyEncoding,
}

/// Decoded urlencoded key/value pairs, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: Vec<(String, String)>,
}

impl FormValues {
    /// Parse an `application/x-www-form-urlencoded` payload or query string.
    ///
    /// `+` decodes to a space; percent-sequences that fail to decode are
    /// kept verbatim rather than dropped.
    pub fn parse(raw: &str) -> Self {
        let values = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self { values }
    }

    /// The first value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All values for `name`, in document order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.values
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over every pair in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no pairs were decoded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn decode(raw: &str) -> String {
    let plus_decoded = raw.replace('+', " ");
    let percent_decoded = urlencoding::decode(&plus_decoded).map(Cow::into_owned).ok();
    percent_decoded.unwrap_or(plus_decoded)
}

/// Decode the request's JSON body into `T`.
pub fn bind_json<T: DeserializeOwned>(ctx: &RenderContext) -> Result<T, BindError> {
    Ok(serde_json::from_slice(ctx.request().body())?)
}

/// Decode the request's urlencoded body into `T`.
///
/// An empty body falls back to the query string, so GET-submitted forms bind
/// the same way as POSTs.
pub fn bind_form<T: DeserializeOwned>(ctx: &RenderContext) -> Result<T, BindError> {
    let body = ctx.request().body();
    let raw = if body.is_empty() {
        ctx.request().query().unwrap_or_default().to_string()
    } else {
        std::str::from_utf8(body)
            .map_err(|_| BindError::BodyEncoding)?
            .to_string()
    };
    from_values(&FormValues::parse(&raw))
}

/// Deserialize `T` from decoded form values.
///
/// Form values are untyped strings, so each value is first coerced to the
/// scalar it parses as (bool, integer, float, else string); if the target
/// type rejects that shape, a second pass binds every value as a plain
/// string. Later duplicates of a key overwrite earlier ones.
pub fn from_values<T: DeserializeOwned>(values: &FormValues) -> Result<T, BindError> {
    let coerced = to_object(values, true);
    match serde_json::from_value(coerced) {
        Ok(bound) => Ok(bound),
        Err(first_err) => match serde_json::from_value(to_object(values, false)) {
            Ok(bound) => Ok(bound),
            Err(_) => Err(BindError::Json(first_err)),
        },
    }
}

fn to_object(values: &FormValues, coerce_scalars: bool) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    for (key, value) in values.iter() {
        let value = if coerce_scalars {
            coerce(value)
        } else {
            serde_json::Value::String(value.to_string())
        };
        object.insert(key.to_string(), value);
    }
    serde_json::Value::Object(object)
}

fn coerce(raw: &str) -> serde_json::Value {
    if let Ok(boolean) = raw.parse::<bool>() {
        return serde_json::Value::Bool(boolean);
    }
    if let Ok(integer) = raw.parse::<i64>() {
        return serde_json::Value::Number(integer.into());
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return serde_json::Value::Number(number);
        }
    }
    serde_json::Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::{FormValues, from_values};
    use serde::Deserialize;

    #[test]
    fn parse_decodes_plus_and_percent() {
        let values = FormValues::parse("name=Ada+Lovelace&note=a%26b&flag");
        assert_eq!(values.get("name"), Some("Ada Lovelace"));
        assert_eq!(values.get("note"), Some("a&b"));
        assert_eq!(values.get("flag"), Some(""));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn parse_keeps_duplicates_in_order() {
        let values = FormValues::parse("tag=a&tag=b");
        assert_eq!(values.get("tag"), Some("a"));
        assert_eq!(values.get_all("tag").collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn binds_typed_struct() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Query {
            term: String,
            page: u32,
            exact: bool,
        }

        let values = FormValues::parse("term=rust&page=3&exact=true");
        let query: Query = from_values(&values).unwrap();
        assert_eq!(
            query,
            Query {
                term: "rust".to_string(),
                page: 3,
                exact: true,
            }
        );
    }

    #[test]
    fn binds_all_string_struct_with_numeric_values() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Address {
            street: String,
            zip: String,
        }

        let values = FormValues::parse("street=5+Main&zip=02134");
        let address: Address = from_values(&values).unwrap();
        assert_eq!(address.zip, "02134");
    }

    #[test]
    fn missing_required_field_fails() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Query {
            term: String,
        }

        let values = FormValues::parse("other=1");
        assert!(from_values::<Query>(&values).is_err());
    }
}
