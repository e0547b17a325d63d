#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::{get, EndpointExt, Route};
use poem_openapi::{OpenApi, OpenApiService};

use crate::utils::config::{Config, GreetingVariant};
use crate::utils::store::GreetingStore;

use self::fixed_greeting_get::FixedGreetingApi;
use self::fixed_greetings_list::FixedGreetingsListApi;
use self::greeting_create::CreateGreetingApi;
use self::greeting_get::GetGreetingApi;
use self::greetings_list::ListGreetingsApi;
use self::pages::PageRenderer;

pub mod error_translator;
pub mod fixed_greeting_get;
pub mod fixed_greetings_list;
pub mod greeting_create;
pub mod greeting_get;
pub mod greetings_list;
pub mod pages;

// ***************************************************************************
//                                Constants
// ***************************************************************************
pub const DEFAULT_NAME : &str = "World";
const API_PREFIX       : &str = "/api";
const SERVER_VERSION   : &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// format_greeting:
// ---------------------------------------------------------------------------
pub fn format_greeting(name: &str) -> String {
    format!("Hello, {}!", name)
}

// ---------------------------------------------------------------------------
// build_app:
// ---------------------------------------------------------------------------
/** Assemble the route tree.  Only the configured greeting variant is mounted
 * under /api since both variants claim the same paths.  The pages are always
 * mounted.
 */
pub fn build_app(config: &Config, store: Arc<dyn GreetingStore>, pages: PageRenderer) -> Route {
    let app = match config.greeting_variant {
        GreetingVariant::Persistent => {
            let endpoints = (GetGreetingApi::new(store.clone()),
                             ListGreetingsApi::new(store.clone()),
                             CreateGreetingApi::new(store));
            mount_api(endpoints, config)
        },
        GreetingVariant::Fixed => mount_api((FixedGreetingApi, FixedGreetingsListApi), config),
    };

    app.at("/", get(pages::home).data(pages.clone()))
       .at("/about", get(pages::about).data(pages))
}

// ---------------------------------------------------------------------------
// mount_api:
// ---------------------------------------------------------------------------
fn mount_api<T>(endpoints: T, config: &Config) -> Route
where
    T: OpenApi + Send + Sync + 'static,
{
    // Assign base URL.
    let api_url = format!("{}:{}{}", config.http_addr, config.http_port, API_PREFIX);
    let api_service =
        OpenApiService::new(endpoints, config.title.clone(), SERVER_VERSION).server(api_url);

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();
    let ui = api_service.swagger_ui();

    Route::new()
        .nest(API_PREFIX, api_service)
        .nest("/docs", ui)
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml)
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::db_types::Greeting;
    use crate::utils::store::MemoryGreetingStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use poem::http::StatusCode;
    use poem::test::{TestClient, TestResponse};

    fn app_with(variant: GreetingVariant, store: Arc<dyn GreetingStore>) -> Route {
        let config = Config {greeting_variant: variant, ..Config::new()};
        build_app(&config, store, PageRenderer::new().unwrap())
    }

    fn persistent_app() -> (Route, Arc<MemoryGreetingStore>) {
        let store = Arc::new(MemoryGreetingStore::new());
        (app_with(GreetingVariant::Persistent, store.clone()), store)
    }

    fn fixed_app() -> Route {
        app_with(GreetingVariant::Fixed, Arc::new(MemoryGreetingStore::new()))
    }

    // Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl GreetingStore for BrokenStore {
        async fn save(&self, _greeting: Greeting) -> anyhow::Result<Greeting> {
            Err(anyhow!("database is locked"))
        }
        async fn find_all(&self) -> anyhow::Result<Vec<Greeting>> {
            Err(anyhow!("database is locked"))
        }
    }

    async fn body_text(resp: TestResponse) -> String {
        resp.0.into_body().into_string().await.unwrap()
    }

    async fn body_json(resp: TestResponse) -> serde_json::Value {
        serde_json::from_str(&body_text(resp).await).unwrap()
    }

    // ---------------------- persistent variant ----------------------
    #[tokio::test]
    async fn greeting_endpoint() {
        let (app, _) = persistent_app();
        let cli = TestClient::new(app);

        let resp = cli.get("/api/greeting?name=John").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello, John!").await;
    }

    #[tokio::test]
    async fn greeting_defaults_to_world_and_is_saved() {
        let (app, store) = persistent_app();
        let cli = TestClient::new(app);

        let resp = cli.get("/api/greeting").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello, World!").await;

        let saved = store.find_all().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].content(), "Hello, World!");
    }

    #[tokio::test]
    async fn empty_name_defaults_to_world() {
        let (app, store) = persistent_app();
        let cli = TestClient::new(app);

        let resp = cli.get("/api/greeting?name=").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello, World!").await;

        let saved = store.find_all().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].content(), "Hello, World!");
    }

    #[tokio::test]
    async fn store_failures_are_500() {
        let cli = TestClient::new(app_with(GreetingVariant::Persistent, Arc::new(BrokenStore)));

        let resp = cli.get("/api/greeting?name=Ann").send().await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(resp).await;
        assert!(body.starts_with("ERROR: "), "{}", body);
        assert!(body.contains("database is locked"), "{}", body);

        let resp = cli.get("/api/greetings").send().await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(resp).await;
        assert!(body.starts_with("ERROR: "), "{}", body);

        let resp = cli.post("/api/greeting?content=X").send().await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(resp).await;
        assert!(body.starts_with("ERROR: "), "{}", body);
    }

    #[tokio::test]
    async fn create_then_list() {
        let (app, _) = persistent_app();
        let cli = TestClient::new(app);

        let resp = cli.post("/api/greeting?content=Howdy").send().await;
        resp.assert_status_is_ok();
        let created = body_json(resp).await;
        assert_eq!(created["content"], "Howdy");
        assert_eq!(created["id"], 1);

        cli.get("/api/greeting?name=Ann").send().await.assert_status_is_ok();

        let resp = cli.get("/api/greetings").send().await;
        resp.assert_status_is_ok();
        let list = body_json(resp).await;
        let contents: Vec<&str> = list.as_array().unwrap().iter()
            .map(|g| g["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["Howdy", "Hello, Ann!"]);
    }

    #[tokio::test]
    async fn create_requires_content() {
        let (app, store) = persistent_app();
        let cli = TestClient::new(app);

        let resp = cli.post("/api/greeting").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert!(store.find_all().await.unwrap().is_empty());
    }

    // ------------------------ fixed variant -------------------------
    #[tokio::test]
    async fn fixed_greeting_endpoint() {
        let cli = TestClient::new(fixed_app());

        let resp = cli.get("/api/greeting?name=Bud").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("Hello, Bud!").await;
    }

    #[tokio::test]
    async fn fixed_empty_name_is_400() {
        let cli = TestClient::new(fixed_app());

        let resp = cli.get("/api/greeting?name=").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        resp.assert_text("Name cannot be empty").await;
    }

    #[tokio::test]
    async fn fixed_name_is_required() {
        let cli = TestClient::new(fixed_app());

        let resp = cli.get("/api/greeting").send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn fixed_list_is_constant() {
        let cli = TestClient::new(fixed_app());

        for _ in 0..2 {
            let resp = cli.get("/api/greetings").send().await;
            resp.assert_status_is_ok();
            assert_eq!(body_json(resp).await,
                       serde_json::json!(["Hello, World!", "Hello, Spring Boot!", "Hello, Thymeleaf!"]));
        }
    }

    // ----------------------------- pages ----------------------------
    #[tokio::test]
    async fn home_and_about_pages() {
        let (app, _) = persistent_app();
        let cli = TestClient::new(app);

        let resp = cli.get("/").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("text/html; charset=utf-8");
        let body = body_text(resp).await;
        assert!(body.contains(pages::HOME_MESSAGE));

        let resp = cli.get("/about").send().await;
        resp.assert_status_is_ok();
        let body = body_text(resp).await;
        assert!(body.contains(pages::ABOUT_MESSAGE));
    }

    #[tokio::test]
    async fn debug_request_logging_on_every_handler() {
        // Raising the level makes each handler assemble its debug record.
        log::set_max_level(log::LevelFilter::Debug);

        let cli = TestClient::new(fixed_app());
        cli.get("/api/greetings").send().await.assert_status_is_ok();
        cli.get("/").send().await.assert_status_is_ok();
        cli.get("/about").send().await.assert_status_is_ok();

        let (app, _) = persistent_app();
        let cli = TestClient::new(app);
        cli.get("/api/greetings").send().await.assert_status_is_ok();
    }

    #[tokio::test]
    async fn spec_is_served() {
        let cli = TestClient::new(fixed_app());

        let resp = cli.get("/spec").send().await;
        resp.assert_status_is_ok();
        let spec = body_json(resp).await;
        assert!(spec["paths"]["/greeting"]["get"].is_object());
    }
}
