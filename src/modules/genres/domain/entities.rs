/// Genre entities shared by the catalog mapper and the title cache
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl Genre {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// In-memory id -> name lookup built from the genre table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreTable {
    names: HashMap<i64, String>,
}

impl GenreTable {
    pub fn new(genres: impl IntoIterator<Item = Genre>) -> Self {
        Self {
            names: genres.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(|name| name.as_str())
    }

    /// Resolve ids in their given order; unknown ids are dropped so that no
    /// association ever points at a genre missing from the table
    pub fn resolve(&self, ids: &[i64]) -> Vec<Genre> {
        ids.iter()
            .filter_map(|id| self.name_of(*id).map(|name| Genre::new(*id, name)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Genres sorted by id
    pub fn to_vec(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self
            .names
            .iter()
            .map(|(id, name)| Genre::new(*id, name.clone()))
            .collect();
        genres.sort_by_key(|g| g.id);
        genres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_order_and_drops_unknown() {
        let table = GenreTable::new(vec![
            Genre::new(28, "Action"),
            Genre::new(16, "Animation"),
            Genre::new(35, "Comedy"),
        ]);

        let resolved = table.resolve(&[35, 999, 28]);
        assert_eq!(
            resolved,
            vec![Genre::new(35, "Comedy"), Genre::new(28, "Action")]
        );
    }

    #[test]
    fn test_to_vec_is_sorted() {
        let table = GenreTable::new(vec![Genre::new(80, "Crime"), Genre::new(12, "Adventure")]);
        let ids: Vec<i64> = table.to_vec().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![12, 80]);
        assert_eq!(table.len(), 2);
    }
}
