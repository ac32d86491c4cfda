//! Lenient deserializers for the hotel API's JSON.
//!
//! The API is loose about types: ids and counts may be numbers or numeric
//! strings, and list columns (service dates, attached documents) are
//! returned as JSON-encoded strings rather than arrays.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(u64),
    Text(String),
}

/// Integer given either as a JSON number or as a numeric string
pub fn lenient_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + FromStr,
    <T as TryFrom<u64>>::Error: Display,
    <T as FromStr>::Err: Display,
{
    match IntOrText::deserialize(deserializer)? {
        IntOrText::Int(n) => T::try_from(n).map_err(de::Error::custom),
        IntOrText::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

/// Null becomes an empty string
pub fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged, bound = "T: DeserializeOwned")]
enum ListOrEncoded<T> {
    List(Vec<T>),
    Encoded(String),
}

/// A list given either as a JSON array or as a string holding one.
/// Null and blank strings are an empty list.
pub fn json_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<ListOrEncoded<T>>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(ListOrEncoded::List(items)) => Ok(items),
        Some(ListOrEncoded::Encoded(raw)) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(ListOrEncoded::Encoded(raw)) => serde_json::from_str(&raw).map_err(de::Error::custom),
    }
}

/// Set of `YYYY-MM-DD` dates, in any form [`json_list`] accepts
pub fn date_set<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let dates: Vec<NaiveDate> = json_list(deserializer)?;
    Ok(dates.into_iter().collect())
}
