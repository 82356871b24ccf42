//! Integration tests for the public portfolio showcase.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use server_core::common::PortfolioItemId;
use server_core::domains::portfolio::PortfolioItem;
use server_core::kernel::TestDependencies;
use server_core::server::{build_app, AppState};
use test_context::test_context;
use tower::ServiceExt;

use crate::common::{new_portfolio_item, TestHarness};

fn app(ctx: &TestHarness) -> axum::Router {
    build_app(
        AppState {
            db_pool: ctx.db_pool.clone(),
            deps: Arc::new(TestDependencies::new().server_deps()),
        },
        None,
        None,
    )
}

async fn get_json(ctx: &TestHarness, uri: &str) -> (StatusCode, Value) {
    let response = app(ctx)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test_context(TestHarness)]
#[tokio::test]
async fn seeded_items_follow_sort_order(ctx: &TestHarness) {
    let items = PortfolioItem::list_public(&ctx.db_pool).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Onlayn do'kon uchun veb-sayt",
            "Restoran buyurtma boti",
            "Mijozlarni qo'llab-quvvatlash chatboti"
        ]
    );
    assert_eq!(items[0].technologies.0, vec!["React", "Node.js", "PostgreSQL"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn equal_sort_order_lists_latest_completed_first(ctx: &TestHarness) {
    let mut older = new_portfolio_item("Eski loyiha", 50, false, true);
    older.completed_at = Some(chrono::Utc::now() - chrono::Duration::days(400));
    PortfolioItem::create(&older, &ctx.db_pool).await.unwrap();
    PortfolioItem::create(&new_portfolio_item("Yangi loyiha", 50, false, true), &ctx.db_pool)
        .await
        .unwrap();

    let items = PortfolioItem::list_public(&ctx.db_pool).await.unwrap();
    assert_eq!(items[0].title, "Yangi loyiha");
    assert_eq!(items[1].title, "Eski loyiha");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn featured_list_is_public_only_and_capped(ctx: &TestHarness) {
    for n in 0..7 {
        let item = new_portfolio_item(&format!("Tanlangan {n}"), 10 + n, true, true);
        PortfolioItem::create(&item, &ctx.db_pool).await.unwrap();
    }
    let hidden = new_portfolio_item("Yashirin", 100, true, false);
    PortfolioItem::create(&hidden, &ctx.db_pool).await.unwrap();

    let featured = PortfolioItem::list_featured(&ctx.db_pool).await.unwrap();

    assert_eq!(featured.len(), 6);
    assert!(featured.iter().all(|i| i.is_public && i.featured));
    assert_eq!(featured[0].title, "Tanlangan 6");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn hidden_item_is_only_visible_to_admin_listing(ctx: &TestHarness) {
    let hidden = PortfolioItem::create(
        &new_portfolio_item("Maxfiy mijoz", 0, false, false),
        &ctx.db_pool,
    )
    .await
    .unwrap();

    let public = PortfolioItem::find_public_by_id(hidden.id, &ctx.db_pool)
        .await
        .unwrap();
    assert!(public.is_none());

    let all = PortfolioItem::list_all(&ctx.db_pool).await.unwrap();
    assert!(all.iter().any(|i| i.id == hidden.id));
    assert_eq!(all.len(), 4);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn update_keeps_absent_fields(ctx: &TestHarness) {
    let item = PortfolioItem::create(&new_portfolio_item("Avval", 0, false, true), &ctx.db_pool)
        .await
        .unwrap();
    let changes = serde_json::from_str(r#"{"title": "Keyin", "featured": true}"#).unwrap();

    let updated = PortfolioItem::update(item.id, &changes, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "Keyin");
    assert!(updated.featured);
    assert_eq!(updated.description, item.description);
    assert_eq!(updated.completed_at, item.completed_at);
    assert!(updated.updated_at >= item.updated_at);

    let missing = PortfolioItem::update(PortfolioItemId::new(), &changes, &ctx.db_pool)
        .await
        .unwrap();
    assert!(missing.is_none());
}

// =============================================================================
// HTTP
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn portfolio_endpoints_serve_public_items(ctx: &TestHarness) {
    let (status, body) = get_json(ctx, "/api/portfolio").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert!(body[0]["imageUrl"].is_string());
    assert!(body[0]["completedAt"].is_string());

    let (status, body) = get_json(ctx, "/api/portfolio/featured").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get_json(ctx, "/api/portfolio/0190a000-0000-7000-8000-000000000102").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Restoran buyurtma boti");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn portfolio_item_not_found_cases(ctx: &TestHarness) {
    let hidden = PortfolioItem::create(
        &new_portfolio_item("Yashirin", 0, false, false),
        &ctx.db_pool,
    )
    .await
    .unwrap();

    for uri in [
        format!("/api/portfolio/{}", hidden.id),
        format!("/api/portfolio/{}", PortfolioItemId::new()),
        "/api/portfolio/not-a-uuid".to_string(),
    ] {
        let (status, body) = get_json(ctx, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["message"], "Portfolio item not found");
    }
}
