/// Diesel row models for the genres table
use crate::modules::genres::domain::Genre;
use diesel::sql_types::{BigInt, Text};
use diesel::QueryableByName;

#[derive(QueryableByName, Debug, Clone)]
pub struct GenreModel {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Text)]
    pub name: String,
}

impl GenreModel {
    pub fn to_genre(self) -> Genre {
        Genre::new(self.id, self.name)
    }
}

/// Helper struct for COUNT queries
#[derive(QueryableByName, Debug)]
pub struct CountResult {
    #[diesel(sql_type = BigInt)]
    pub count: i64,
}
