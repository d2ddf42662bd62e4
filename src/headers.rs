use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Result};

/// A map keyed by header names, compared ignoring ASCII case.
///
/// Iteration yields entries in insertion order, under the casing the key had
/// when it was first inserted. Updating an existing entry through a
/// differently-cased key replaces the value and keeps the original casing.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        CaseInsensitiveMap {
            entries: Vec::new(),
        }
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        Default::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.position(key) {
            Some(i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or overwrite, returning the previous value if any.
    pub fn insert<K>(&mut self, key: K, value: V) -> Option<V>
    where
        K: Into<String>,
    {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Insert `value` only if `key` is absent, then return the stored value.
    pub fn set_default<K>(&mut self, key: K, value: V) -> &mut V
    where
        K: Into<String>,
    {
        let key = key.into();
        let index = match self.position(&key) {
            Some(i) => i,
            None => {
                self.entries.push((key, value));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V: AsRef<str>> CaseInsensitiveMap<V> {
    /// Convert into reqwest's header map.
    ///
    /// # Errors
    /// Fails if a name or a value is not a valid HTTP header.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(self.len());
        for (key, value) in self.iter() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| Error::InvalidHeader(key.to_owned()))?;
            let value = HeaderValue::from_str(value.as_ref())
                .map_err(|_| Error::InvalidHeader(key.to_owned()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

impl<K, V> Extend<(K, V)> for CaseInsensitiveMap<V>
where
    K: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for CaseInsensitiveMap<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CaseInsensitiveMap::new();
        map.extend(iter);
        map
    }
}

impl<V> IntoIterator for CaseInsensitiveMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: PartialEq> PartialEq for CaseInsensitiveMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<V: Eq> Eq for CaseInsensitiveMap<V> {}
