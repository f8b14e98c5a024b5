//! Keyed entity cache for relational lookups

use std::collections::HashMap;

use crate::models::Keyed;

/// An id-to-entity map used as the canonical cache when one collection
/// references another (projects pointing at organizations). Views resolve
/// references through the index instead of scanning whichever list copy they
/// happen to hold.
pub struct EntityIndex<T: Keyed> {
    map: HashMap<String, T>,
}

impl<T: Keyed> EntityIndex<T> {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Build an index from a fetched collection
    pub fn from_items<I: IntoIterator<Item = T>>(items: I) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert(item);
        }
        index
    }

    pub fn insert(&mut self, item: T) {
        self.map.insert(item.key().to_string(), item);
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        self.map.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.map.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.map.values()
    }
}

impl<T: Keyed> Default for EntityIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> FromIterator<T> for EntityIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Organization;
    use serde_json::json;

    #[test]
    fn resolves_references_by_id() {
        let orgs: Vec<Organization> = serde_json::from_value(json!([
            {"id": "o1", "name": "Acme", "slug": "acme"},
            {"id": "o2", "name": "Globex", "slug": "globex"}
        ]))
        .unwrap();

        let index: EntityIndex<Organization> = orgs.into_iter().collect();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("o1").map(|o| o.name.as_str()), Some("Acme"));
        assert!(index.get("o3").is_none());
    }
}
