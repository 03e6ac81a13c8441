use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    entities::{Coordinates, Page},
    error::{upstream_error, Error},
};

pub const DEFAULT_API_BASE: &str = "https://en.wikipedia.org";
pub const SEARCH_RADIUS: u32 = 10000;
pub const SEARCH_LIMIT: u32 = 50;

#[derive(Deserialize)]
struct Response {
    query: Query,
}

// Page keys are arbitrary ids and carry no meaning.
#[derive(Deserialize)]
struct Query {
    pages: HashMap<String, Page>,
}

#[derive(Clone, Debug)]
pub struct WikipediaClient {
    api_base: String,
    client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// One geosearch round trip, pages sorted by title. No retries.
    #[tracing::instrument(skip(self))]
    pub async fn find_nearby_pages(&self, coordinates: Coordinates) -> Result<Vec<Page>, Error> {
        let url = format!("{}/w/api.php", self.api_base);
        let coord = format!("{}|{}", coordinates.latitude, coordinates.longitude);

        let res = self
            .client
            .get(url)
            .query(&[
                ("action", "query"),
                ("generator", "geosearch"),
                ("prop", "coordinates|pageimages|pageterms"),
                ("piprop", "thumbnail"),
                ("wbptterms", "description"),
                ("format", "json"),
            ])
            .query(&[("ggscoord", coord)])
            .query(&[("ggsradius", SEARCH_RADIUS)])
            .query(&[
                ("ggslimit", SEARCH_LIMIT),
                ("colimit", SEARCH_LIMIT),
                ("pilimit", SEARCH_LIMIT),
                ("pithumbsize", 500),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::warn!(status = %res.status(), "geosearch failed");
            return Err(upstream_error());
        }

        let body = res.bytes().await?;

        decode_pages(&body)
    }
}

pub fn decode_pages(body: &[u8]) -> Result<Vec<Page>, Error> {
    let data: Response = serde_json::from_slice(body).map_err(|err| {
        tracing::warn!(?err, "undecodable geosearch response");
        upstream_error()
    })?;

    let mut pages: Vec<Page> = data.query.pages.into_values().collect();
    pages.sort();

    Ok(pages)
}

#[test]
fn decodes_values_sorted_by_title() {
    let body = br#"{
        "batchcomplete": "",
        "query": {
            "pages": {
                "1": {"pageid": 1, "ns": 0, "title": "B"},
                "2": {"pageid": 2, "ns": 0, "title": "A", "terms": {"description": ["d"]}}
            }
        }
    }"#;

    let pages = decode_pages(body).unwrap();

    let summary: Vec<(&str, &str)> = pages
        .iter()
        .map(|page| (page.title.as_str(), page.description()))
        .collect();
    assert_eq!(summary, vec![("A", "d"), ("B", "no further information")]);
}

#[test]
fn truncated_body_is_an_upstream_error() {
    let err = decode_pages(br#"{"query": {"pages": {"1": {"pageid": 1, "ti"#).unwrap_err();
    assert_eq!(err.code, 4);
}

#[test]
fn missing_query_is_an_upstream_error() {
    let err = decode_pages(br#"{"batchcomplete": ""}"#).unwrap_err();
    assert_eq!(err.code, 4);
}

#[cfg(test)]
mod server_tests {
    use std::net::{SocketAddr, TcpListener};

    use axum::{extract::Query, http::StatusCode, routing::get, Router};

    use super::*;

    fn spawn(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        addr
    }

    async fn geosearch(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
        let expected = [
            ("action", "query"),
            ("generator", "geosearch"),
            ("ggscoord", "51.5|-0.12"),
            ("ggsradius", "10000"),
            ("ggslimit", "50"),
            ("wbptterms", "description"),
            ("format", "json"),
        ];
        for (key, value) in expected {
            if params.get(key).map(String::as_str) != Some(value) {
                return (StatusCode::BAD_REQUEST, format!("bad {}", key));
            }
        }

        (
            StatusCode::OK,
            r#"{"query":{"pages":{"9":{"pageid":9,"title":"Westminster"},"3":{"pageid":3,"title":"Big Ben","terms":{"description":["clock tower"]}}}}}"#.into(),
        )
    }

    #[tokio::test]
    async fn fetches_and_sorts_nearby_pages() {
        let addr = spawn(Router::new().route("/w/api.php", get(geosearch)));
        let client = WikipediaClient::new(format!("http://{}/", addr));

        let pages = client
            .find_nearby_pages(Coordinates {
                latitude: 51.5,
                longitude: -0.12,
            })
            .await
            .unwrap();

        let titles: Vec<&str> = pages.iter().map(|page| page.title.as_str()).collect();
        assert_eq!(titles, vec!["Big Ben", "Westminster"]);
        assert_eq!(pages[0].description(), "clock tower");
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let addr = spawn(Router::new().route(
            "/w/api.php",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "{}") }),
        ));
        let client = WikipediaClient::new(format!("http://{}", addr));

        let err = client
            .find_nearby_pages(Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, 4);
    }
}
