use std::{collections::HashMap, sync::Arc};

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use catalog_core::{
    CatalogClient, CatalogController, CatalogEndpoints, CatalogSource, RecordingSurface, ViewMode,
};
use serde_json::{json, Value};
use shared::domain::{SortSelection, HIGH_TO_LOW};
use tokio::net::TcpListener;

async fn list() -> Json<Value> {
    Json(json!({
        "products": [
            {"id": 1, "title": "A", "price": 5, "thumbnail": "x.png", "images": []},
            {"id": 2, "title": "B", "price": 12.75, "thumbnail": "", "images": ["b-1.png"]},
            {"id": 3, "title": "C", "price": 0.5, "images": []}
        ],
        "total": 3, "skip": 0, "limit": 30
    }))
}

async fn search(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("q").map(String::as_str) {
        Some("boom") => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))),
        Some("b c") => (
            StatusCode::OK,
            Json(json!({
                "products": [
                    {"title": "B", "price": 12.75, "images": ["b-1.png"]},
                    {"title": "C", "price": 0.5, "images": []}
                ]
            })),
        ),
        _ => (StatusCode::OK, Json(json!({ "products": [] }))),
    }
}

async fn spawn_catalog() -> anyhow::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/products", get(list))
        .route("/products/search", get(search));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn controller_for(mode: ViewMode) -> CatalogController {
    let base = spawn_catalog().await.expect("spawn catalog");
    let source: Arc<dyn CatalogSource> = Arc::new(CatalogClient::new(CatalogEndpoints {
        list_url: format!("{base}/products"),
        search_url: format!("{base}/products/search"),
        search_param: "q".to_string(),
    }));
    CatalogController::new(source, mode, SortSelection::default())
}

#[tokio::test]
async fn plain_listing_renders_cards_in_server_order() {
    let mut controller = controller_for(ViewMode::Plain).await;
    let mut surface = RecordingSurface::new();

    controller.load();
    controller.settle(&mut surface).await;

    assert_eq!(surface.titles(), ["A", "B", "C"]);
    let first = &surface.cards[0];
    assert_eq!(first.image_src, "x.png");
    assert_eq!(first.alt, "A");
    assert_eq!(first.price, "$5");
    assert_eq!(surface.cards[1].image_src, "b-1.png");
    assert_eq!(surface.cards[2].image_src, "");
    assert_eq!(surface.cards[2].price, "$0.5");
}

#[tokio::test]
async fn sortable_view_searches_then_resorts_locally() {
    let mut controller = controller_for(ViewMode::Sortable).await;
    let mut surface = RecordingSurface::new();

    controller.load();
    controller.settle(&mut surface).await;
    assert_eq!(surface.titles(), ["C", "A", "B"]);

    controller.submit("b c", &mut surface).expect("valid term");
    controller.settle(&mut surface).await;
    assert_eq!(surface.titles(), ["C", "B"]);

    assert!(controller.change_sort(SortSelection::new(HIGH_TO_LOW), &mut surface));
    assert_eq!(surface.titles(), ["B", "C"]);
    assert_eq!(controller.in_flight(), 0);
}

#[tokio::test]
async fn search_outage_replaces_display_with_error() {
    let mut controller = controller_for(ViewMode::Sortable).await;
    let mut surface = RecordingSurface::new();

    controller.load();
    controller.settle(&mut surface).await;
    controller.submit("boom", &mut surface).expect("valid term");
    let applied = controller.settle(&mut surface).await;

    assert_eq!(applied.len(), 1);
    assert!(applied[0].is_err());
    assert!(surface.cards.is_empty());
    assert_eq!(surface.notice.as_deref(), Some("Error searching products."));
    assert_eq!(controller.state().current().len(), 3);
}

#[tokio::test]
async fn unknown_term_shows_no_products_notice() {
    let mut controller = controller_for(ViewMode::Sortable).await;
    let mut surface = RecordingSurface::new();

    controller.submit("nothing-here", &mut surface).expect("valid term");
    controller.settle(&mut surface).await;

    assert_eq!(surface.notice.as_deref(), Some("No products found."));
}
