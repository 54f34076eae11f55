//! Values tables and the resolvers that turn a decoded value index into
//! whatever the caller wants back.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::config::value_bits_for;

/// Maps a value index to a value.
///
/// The codec only ever stores indices; a resolver decides whether a lookup
/// returns the index itself or the property value it points at.
pub trait ValueResolver {
    /// The type returned by lookups.
    type Value;

    /// Resolves `index`, or returns `None` when the index is unknown.
    fn resolve(&self, index: u32) -> Option<Self::Value>;
}

/// Resolver returning the raw value index.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexResolver;

impl ValueResolver for IndexResolver {
    type Value = u32;

    fn resolve(&self, index: u32) -> Option<u32> {
        Some(index)
    }
}

impl<V: Clone> ValueResolver for [V] {
    type Value = V;

    fn resolve(&self, index: u32) -> Option<V> {
        self.get(index as usize).cloned()
    }
}

impl<V: Clone> ValueResolver for Vec<V> {
    type Value = V;

    fn resolve(&self, index: u32) -> Option<V> {
        self.as_slice().resolve(index)
    }
}

impl<R: ValueResolver + ?Sized> ValueResolver for &R {
    type Value = R::Value;

    fn resolve(&self, index: u32) -> Option<R::Value> {
        (**self).resolve(index)
    }
}

/// Ordered distinct values, indexed by value index.
///
/// Values are numbered in the order they are first interned, so a table
/// built by scanning keys upward gives low indices to the values that
/// appear first. Serializes as a plain sequence of values.
#[derive(Debug, Clone)]
pub struct ValueTable<V> {
    values: Vec<V>,
    index: HashMap<V, u32>,
}

impl<V> Default for ValueTable<V> {
    fn default() -> Self {
        Self { values: Vec::new(), index: HashMap::new() }
    }
}

impl<V> ValueTable<V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value at `index`.
    pub fn get(&self, index: u32) -> Option<&V> {
        self.values.get(index as usize)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no value was interned yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bits needed for a value index into this table.
    pub fn value_bits(&self) -> u8 {
        value_bits_for(self.values.len())
    }

    /// Returns the values in index order.
    pub fn as_slice(&self) -> &[V] {
        &self.values
    }

    /// Consumes the table, returning the values in index order.
    pub fn into_vec(self) -> Vec<V> {
        self.values
    }
}

impl<V: Eq + Hash + Clone> ValueTable<V> {
    /// Creates a table from values that are already in index order.
    /// A repeated value keeps its first index for [`ValueTable::index_of`].
    pub fn from_vec(values: Vec<V>) -> Self {
        let mut index = HashMap::with_capacity(values.len());
        for (position, value) in values.iter().enumerate() {
            index.entry(value.clone()).or_insert(position as u32);
        }
        Self { values, index }
    }

    /// Returns the index of `value`, appending it if it is new.
    pub fn intern(&mut self, value: V) -> u32 {
        if let Some(&index) = self.index.get(&value) {
            return index;
        }
        let index = self.values.len() as u32;
        self.index.insert(value.clone(), index);
        self.values.push(value);
        index
    }

    /// Returns the index of `value`, if it was interned.
    pub fn index_of(&self, value: &V) -> Option<u32> {
        self.index.get(value).copied()
    }
}

impl<V: PartialEq> PartialEq for ValueTable<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<V: Eq> Eq for ValueTable<V> {}

impl<V: Clone> ValueResolver for ValueTable<V> {
    type Value = V;

    fn resolve(&self, index: u32) -> Option<V> {
        self.get(index).cloned()
    }
}

impl<V: Eq + Hash + Clone> FromIterator<V> for ValueTable<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for ValueTable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de, V> Deserialize<'de> for ValueTable<V>
where
    V: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<V>::deserialize(deserializer).map(Self::from_vec)
    }
}
