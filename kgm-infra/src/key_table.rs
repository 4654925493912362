use std::collections::{HashMap, hash_map};

/// Content hash to decryption key mapping dumped from the key database.
///
/// Built once before any worker starts and only read afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyTable {
    inner: HashMap<String, String>,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the key for a raw content hash. Hashes which are not valid
    /// utf-8 never match since every stored id is text.
    pub fn get(&self, hash: &[u8]) -> Option<&str> {
        let hash = std::str::from_utf8(hash).ok()?;
        self.inner.get(hash).map(|x| x.as_str())
    }

    pub fn insert(&mut self, hash: String, key: String) -> Option<String> {
        self.inner.insert(hash, key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.inner.iter()
    }
}

impl FromIterator<(String, String)> for KeyTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, String)> for KeyTable {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.inner.extend(iter);
    }
}

impl<'a> IntoIterator for &'a KeyTable {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
