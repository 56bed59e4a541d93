use super::models::{TmdbGenre, TmdbTitle};
use crate::modules::catalog::domain::TitleItem;
use crate::modules::genres::{Genre, GenreTable};
use crate::shared::domain::value_objects::MediaType;

/// Maps TMDB listing entries into domain titles
#[derive(Debug, Clone, Default)]
pub struct TmdbMapper;

impl TmdbMapper {
    pub fn new() -> Self {
        Self
    }

    /// Map one listing entry.
    ///
    /// The entry's own `media_type` wins over `fallback`; entries that are
    /// neither movie nor TV (people in mixed results) map to `None`.
    pub fn map_title(
        &self,
        item: TmdbTitle,
        fallback: Option<MediaType>,
        genres: &GenreTable,
    ) -> Option<TitleItem> {
        let media_type = match item.media_type.as_deref() {
            Some(raw) => raw.parse::<MediaType>().ok()?,
            None => fallback?,
        };

        let (name, release_date) = match media_type {
            MediaType::Movie => (
                item.title.or(item.name),
                item.release_date.or(item.first_air_date),
            ),
            MediaType::Tv => (
                item.name.or(item.title),
                item.first_air_date.or(item.release_date),
            ),
        };

        Some(TitleItem {
            media_id: item.id,
            media_type,
            name: name.unwrap_or_default(),
            overview: item.overview.unwrap_or_default(),
            popularity: item.popularity.unwrap_or_default(),
            poster_path: item.poster_path.filter(|p| !p.is_empty()),
            release_date: release_date.filter(|d| !d.is_empty()),
            vote_count: item.vote_count.unwrap_or_default(),
            vote_average: item.vote_average.unwrap_or_default(),
            genres: genres.resolve(&item.genre_ids),
            is_watchlisted: false,
        })
    }

    pub fn map_titles(
        &self,
        items: Vec<TmdbTitle>,
        fallback: Option<MediaType>,
        genres: &GenreTable,
    ) -> Vec<TitleItem> {
        items
            .into_iter()
            .filter_map(|item| self.map_title(item, fallback, genres))
            .collect()
    }

    pub fn map_genres(&self, genres: Vec<TmdbGenre>) -> Vec<Genre> {
        genres
            .into_iter()
            .map(|g| Genre::new(g.id, g.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i64, media_type: Option<&str>) -> TmdbTitle {
        TmdbTitle {
            id,
            media_type: media_type.map(str::to_string),
            title: Some("Arrival".to_string()),
            name: Some("Arrival (series)".to_string()),
            overview: None,
            popularity: Some(12.5),
            poster_path: Some(String::new()),
            release_date: Some("2016-11-11".to_string()),
            first_air_date: Some("2017-01-01".to_string()),
            vote_count: Some(15000),
            vote_average: Some(7.6),
            genre_ids: vec![18, 878, 404],
        }
    }

    fn genres() -> GenreTable {
        GenreTable::new(vec![
            Genre::new(18, "Drama"),
            Genre::new(878, "Science Fiction"),
        ])
    }

    #[test]
    fn test_movie_fields_are_picked() {
        let mapped = TmdbMapper::new()
            .map_title(raw(329865, None), Some(MediaType::Movie), &genres())
            .unwrap();

        assert_eq!(mapped.media_type, MediaType::Movie);
        assert_eq!(mapped.name, "Arrival");
        assert_eq!(mapped.release_date.as_deref(), Some("2016-11-11"));
        assert_eq!(mapped.poster_path, None);
        assert_eq!(mapped.overview, "");
        assert_eq!(
            mapped.genres.iter().map(|g| g.id).collect::<Vec<_>>(),
            vec![18, 878]
        );
    }

    #[test]
    fn test_item_media_type_overrides_fallback() {
        let mapped = TmdbMapper::new()
            .map_title(raw(1, Some("tv")), Some(MediaType::Movie), &genres())
            .unwrap();
        assert_eq!(mapped.media_type, MediaType::Tv);
        assert_eq!(mapped.name, "Arrival (series)");
        assert_eq!(mapped.release_date.as_deref(), Some("2017-01-01"));
    }

    #[test]
    fn test_people_are_skipped() {
        let mapper = TmdbMapper::new();
        let items = vec![raw(1, Some("person")), raw(2, Some("movie")), raw(3, None)];
        let mapped = mapper.map_titles(items, None, &genres());
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].media_id, 2);
    }
}
