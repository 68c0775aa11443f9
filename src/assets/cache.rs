//! Name-keyed deduplicating stores used during one import.
//!
//! At most one instance exists per name; every lookup of that name hands out
//! the same `Arc`. Entries are never evicted and iterate in insertion order.
//! Population is single-threaded (`&mut self`).

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::resources::{Material, SharedMaterial, Texture};

pub struct NamedCache<T> {
    entries: Vec<Arc<T>>,
    lookup: FxHashMap<String, usize>,
}

impl<T> Default for NamedCache<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            lookup: FxHashMap::default(),
        }
    }
}

impl<T> NamedCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `name`, building it with `factory` on a miss.
    pub fn get_or_create(&mut self, name: &str, factory: impl FnOnce() -> T) -> Arc<T> {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        self.push(name, Arc::new(factory()))
    }

    /// Fallible variant of [`get_or_create`](Self::get_or_create). A failed
    /// factory inserts nothing.
    pub fn try_get_or_create<E>(&mut self, name: &str, factory: impl FnOnce() -> Result<T, E>) -> Result<Arc<T>, E> {
        if let Some(existing) = self.get(name) {
            return Ok(existing);
        }
        Ok(self.push(name, Arc::new(factory()?)))
    }

    /// Inserts `value` unless `name` is taken; the first insertion wins and
    /// is returned either way.
    pub fn insert(&mut self, name: &str, value: Arc<T>) -> Arc<T> {
        if let Some(existing) = self.get(name) {
            return existing;
        }
        self.push(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.lookup.get(name).map(|&i| self.entries[i].clone())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter()
    }

    fn push(&mut self, name: &str, value: Arc<T>) -> Arc<T> {
        self.lookup.insert(name.to_string(), self.entries.len());
        self.entries.push(value.clone());
        value
    }
}

/// The two caches an import populates.
#[derive(Default)]
pub struct MaterialTextureCache {
    pub materials: NamedCache<RwLock<Material>>,
    pub textures: NamedCache<Texture>,
}

impl MaterialTextureCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn material(&self, name: &str) -> Option<SharedMaterial> {
        self.materials.get(name)
    }

    #[must_use]
    pub fn texture(&self, name: &str) -> Option<Arc<Texture>> {
        self.textures.get(name)
    }
}

impl std::fmt::Debug for MaterialTextureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialTextureCache")
            .field("materials", &self.materials.len())
            .field("textures", &self.textures.len())
            .finish()
    }
}
