mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use crate::api::API;
use crate::error::{server_error, Error};
use crate::server::handlers::{locations, session};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/unlock", post(session::unlock))
        .route("/region", get(session::find_region).put(session::update_region))
        .route(
            "/places",
            get(locations::list)
                .post(locations::create)
                .delete(locations::delete_all),
        )
        .route("/places/:id", put(locations::update))
        .route("/places/:id/nearby", get(locations::nearby))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(
    api: T,
    addr: SocketAddr,
) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(server_error)?
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde_json::{json, Value};

    use super::*;
    use crate::engine::test_engine;

    struct TestServer {
        base: String,
        client: reqwest::Client,
        _dir: tempfile::TempDir,
    }

    impl TestServer {
        fn start() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let app = router(test_engine(dir.path()));

            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::Server::from_tcp(listener)
                    .unwrap()
                    .serve(app.into_make_service())
                    .await
                    .unwrap();
            });

            Self {
                base: format!("http://{}", addr),
                client: reqwest::Client::new(),
                _dir: dir,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }

        async fn unlock(&self) {
            let res = self
                .client
                .post(self.url("/unlock"))
                .json(&json!({ "passcode": "1234" }))
                .send()
                .await
                .unwrap();
            let body: Value = res.json().await.unwrap();
            assert_eq!(body, json!({ "unlocked": true }));
        }
    }

    #[tokio::test]
    async fn places_are_locked_until_unlock() {
        let server = TestServer::start();

        let res = server.client.get(server.url("/places")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 401);

        let res = server.client.get(server.url("/region")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 401);

        let res = server
            .client
            .post(server.url("/unlock"))
            .json(&json!({ "passcode": "nope" }))
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body,
            json!({ "unlocked": false, "message": "Authentication Failed" })
        );

        server.unlock().await;

        let res = server.client.get(server.url("/places")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn add_edit_and_clear_places() {
        let server = TestServer::start();
        server.unlock().await;

        let res = server
            .client
            .put(server.url("/region"))
            .json(&json!({
                "center": { "latitude": 41.9, "longitude": 12.5 },
                "span": { "latitude_delta": 1.0, "longitude_delta": 1.0 },
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);

        let res = server.client.post(server.url("/places")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let added: Value = res.json().await.unwrap();
        assert_eq!(added["name"], "new location");
        assert_eq!(added["latitude"], 41.9);

        let res = server.client.post(server.url("/places")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 409);

        let res = server
            .client
            .put(server.url(&format!("/places/{}", added["id"].as_str().unwrap())))
            .json(&json!({ "name": "Rome", "description": "eternal" }))
            .send()
            .await
            .unwrap();
        let edited: Value = res.json().await.unwrap();
        assert_eq!(edited["name"], "Rome");
        assert_ne!(edited["id"], added["id"]);

        let res = server.client.get(server.url("/places")).send().await.unwrap();
        let list: Value = res.json().await.unwrap();
        assert_eq!(list, json!([edited]));

        let res = server
            .client
            .delete(server.url("/places"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 204);

        let res = server.client.get(server.url("/places")).send().await.unwrap();
        let list: Value = res.json().await.unwrap();
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn nearby_reports_failed_state() {
        let server = TestServer::start();
        server.unlock().await;

        let res = server.client.post(server.url("/places")).send().await.unwrap();
        let added: Value = res.json().await.unwrap();

        let res = server
            .client
            .get(server.url(&format!(
                "/places/{}/nearby",
                added["id"].as_str().unwrap()
            )))
            .send()
            .await
            .unwrap();
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "state": "failed" }));
    }
}
