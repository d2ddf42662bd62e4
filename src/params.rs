use std::borrow::Cow;
use std::collections::{btree_map, BTreeMap, HashMap};

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::DecodeError;

/// Decoded request parameters, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.0.retain(|k, v| f(k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Join `key=value` pairs with `&` in key order, without any escaping.
    pub(crate) fn to_sorted_plain(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<Params> for HashMap<String, String> {
    fn from(params: Params) -> Self {
        params.0.into_iter().collect()
    }
}

/// Query or body parameters as supplied by the caller: either key/value
/// pairs or an already-encoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawParams {
    Pairs(Vec<(String, String)>),
    Encoded(String),
}

impl RawParams {
    /// Decode into a [`Params`] mapping. Later duplicates win.
    pub fn normalize(self) -> Result<Params, DecodeError> {
        match self {
            RawParams::Pairs(pairs) => Ok(pairs.into_iter().collect()),
            RawParams::Encoded(encoded) => parse_utf8_qsl(&encoded),
        }
    }

    /// Encode for sending verbatim as a request body.
    pub(crate) fn into_body(self) -> String {
        match self {
            RawParams::Pairs(pairs) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs)
                .finish(),
            RawParams::Encoded(encoded) => encoded,
        }
    }
}

impl From<&str> for RawParams {
    fn from(encoded: &str) -> Self {
        RawParams::Encoded(encoded.to_owned())
    }
}

impl From<String> for RawParams {
    fn from(encoded: String) -> Self {
        RawParams::Encoded(encoded)
    }
}

impl<K, V> From<Vec<(K, V)>> for RawParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        RawParams::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> From<&[(K, V)]> for RawParams
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from(pairs: &[(K, V)]) -> Self {
        RawParams::Pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RawParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        RawParams::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for RawParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        RawParams::Pairs(
            map.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> From<BTreeMap<K, V>> for RawParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        RawParams::Pairs(
            map.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Params> for RawParams {
    fn from(params: Params) -> Self {
        RawParams::Pairs(params.into_iter().collect())
    }
}

/// Parse a query string into decoded UTF-8 key/value pairs.
///
/// `+` is read as a space and percent-encoded octets are decoded as UTF-8.
/// A pair without `=` maps to an empty value; empty segments are skipped.
///
/// # Errors
/// Fails if a decoded key or value is not valid UTF-8.
pub fn parse_utf8_qsl(query: &str) -> Result<Params, DecodeError> {
    let mut params = Params::new();
    for pair in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key)?, decode_component(value)?);
    }
    Ok(params)
}

fn decode_component(component: &str) -> Result<String, DecodeError> {
    let spaced: Cow<str> = if component.contains('+') {
        Cow::Owned(component.replace('+', " "))
    } else {
        Cow::Borrowed(component)
    };
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|source| DecodeError {
            input: component.to_owned(),
            source,
        })
}
