use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::debug;

use crate::models::{
    DESCRIPTION_MAX_LEN, NewMovie, POSTER_URL_MAX_LEN, SearchCandidate, TITLE_MAX_LEN,
};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("movie catalog request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("movie catalog response is missing {0}")]
    MissingField(&'static str),

    #[error("movie catalog returned an unreadable release date {0:?}")]
    InvalidReleaseDate(String),

    #[error("movie catalog {field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Request URLs carry the `api_key` query parameter, so they never reach the error text.
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN),
        )));
        Self { client, api_key, base_url, image_base_url, limiter }
    }

    pub async fn search_movies(&self, query: &str) -> CatalogResult<Vec<SearchCandidate>> {
        self.limiter.until_ready().await;

        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));
        let resp: SearchResponse = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(query = %query, results = resp.results.len(), "catalog search");
        Ok(resp.results)
    }

    pub async fn movie_details(&self, catalog_id: i64) -> CatalogResult<NewMovie> {
        self.limiter.until_ready().await;

        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), catalog_id);
        let details: MovieDetails = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(catalog_id = catalog_id, title = %details.title, "catalog details");

        let poster_path = details.poster_path.ok_or(CatalogError::MissingField("poster_path"))?;
        let release_date =
            details.release_date.ok_or(CatalogError::MissingField("release_date"))?;
        let poster_url = format!("{}{}", self.image_base_url.trim_end_matches('/'), poster_path);

        check_len("title", &details.title, TITLE_MAX_LEN)?;
        check_len("poster URL", &poster_url, POSTER_URL_MAX_LEN)?;

        Ok(NewMovie {
            title: details.title,
            year: parse_release_year(&release_date)?,
            description: truncate_chars(details.overview.unwrap_or_default(), DESCRIPTION_MAX_LEN),
            poster_url,
        })
    }
}

/// The year is whatever precedes the first `-` of the upstream `YYYY-MM-DD` string.
pub fn parse_release_year(release_date: &str) -> CatalogResult<i32> {
    release_date
        .split('-')
        .next()
        .and_then(|year| year.trim().parse().ok())
        .ok_or_else(|| CatalogError::InvalidReleaseDate(release_date.to_string()))
}

fn check_len(field: &'static str, value: &str, max: usize) -> CatalogResult<()> {
    if value.chars().count() > max {
        return Err(CatalogError::TooLong { field, max });
    }
    Ok(())
}

/// Overviews longer than the column are cut rather than refused.
fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchCandidate>,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    title: String,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new(
            reqwest::Client::new(),
            "test-key".to_string(),
            server.uri(),
            "https://image.tmdb.org/t/p/w500".to_string(),
            100,
        )
    }

    #[test]
    fn release_year_is_first_segment() {
        assert_eq!(parse_release_year("1999-03-31").unwrap(), 1999);
        assert_eq!(parse_release_year("2010").unwrap(), 2010);
        assert!(matches!(parse_release_year(""), Err(CatalogError::InvalidReleaseDate(_))));
        assert!(matches!(parse_release_year("soon-ish"), Err(CatalogError::InvalidReleaseDate(_))));
    }

    #[tokio::test]
    async fn search_sends_key_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("query", "Inception"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    {"id": 27205, "title": "Inception", "release_date": "2010-07-15",
                     "overview": "Dreams.", "poster_path": "/inception.jpg", "popularity": 80.1},
                    {"id": 613092, "title": "Inception: The Cobol Job"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).search_movies("Inception").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 27205);
        assert_eq!(results[0].release_year(), Some("2010"));
        assert_eq!(results[1].release_date, None);
        assert_eq!(results[1].release_year(), None);
    }

    #[tokio::test]
    async fn details_map_into_new_movie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/603"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-31",
                "overview": "A hacker learns the truth.",
                "poster_path": "/matrix.jpg"
            })))
            .mount(&server)
            .await;

        let movie = client_for(&server).movie_details(603).await.unwrap();

        assert_eq!(
            movie,
            NewMovie {
                title: "The Matrix".to_string(),
                year: 1999,
                description: "A hacker learns the truth.".to_string(),
                poster_url: "https://image.tmdb.org/t/p/w500/matrix.jpg".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn details_without_poster_are_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Lost Film",
                "release_date": "1920-01-01",
                "overview": "",
                "poster_path": null
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).movie_details(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::MissingField("poster_path")), "{err:?}");
    }

    #[tokio::test]
    async fn upstream_error_status_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/movie"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).search_movies("anything").await.unwrap_err();
        assert!(matches!(err, CatalogError::Request(_)), "{err:?}");
        assert!(err.to_string().contains("401"), "{err}");
        assert!(!err.to_string().contains("test-key"), "{err}");
        assert!(!format!("{err:?}").contains("test-key"), "{err:?}");
    }

    #[tokio::test]
    async fn long_overview_is_cut_to_column_width() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Epic",
                "release_date": "2001-12-19",
                "overview": "é".repeat(DESCRIPTION_MAX_LEN + 40),
                "poster_path": "/epic.jpg"
            })))
            .mount(&server)
            .await;

        let movie = client_for(&server).movie_details(3).await.unwrap();
        assert_eq!(movie.description.chars().count(), DESCRIPTION_MAX_LEN);
    }

    #[tokio::test]
    async fn overlong_title_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "t".repeat(TITLE_MAX_LEN + 1),
                "release_date": "2001-12-19",
                "overview": "Long name.",
                "poster_path": "/long.jpg"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).movie_details(4).await.unwrap_err();
        assert!(matches!(err, CatalogError::TooLong { field: "title", max: TITLE_MAX_LEN }));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
        assert_eq!(truncate_chars("short".to_string(), 10), "short");
    }

    #[tokio::test]
    async fn malformed_body_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let res = client_for(&server).movie_details(2).await;
        assert!(matches!(res, Err(CatalogError::Request(_))), "{res:?}");
    }
}
