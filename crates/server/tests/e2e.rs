use std::net::SocketAddr;

use axum::{body::Body, http::Request, Router};
use chrono::Utc;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait, MockDatabase, QueryFilter, Set};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use configs::StorageConfig;
use models::{area, shop, shop_category};
use server::{routes, startup};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

fn storage() -> StorageConfig {
    StorageConfig { image_base_dir: format!("target/test-data/{}", Uuid::new_v4()), ..Default::default() }
}

/// Router over a mock database whose queries all fail: only routes that never touch it succeed.
fn offline_app() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection refused".into()), DbErr::Custom("connection refused".into())])
        .into_connection();
    let storage = storage();
    let state = startup::build_state(db, &storage);
    routes::build_router(state, &storage.image_base_dir, cors())
}

async fn call(app: Router, req: Request<Body>) -> anyhow::Result<(u16, Value)> {
    let res = app.oneshot(req).await?;
    let status = res.status().as_u16();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn multipart(method: &str, uri: &str, parts: &[(&str, &str)]) -> anyhow::Result<Request<Body>> {
    let mut body = String::new();
    for (name, value) in parts {
        body.push_str(&format!("--XBOUNDARY\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"));
    }
    body.push_str("--XBOUNDARY--\r\n");
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "multipart/form-data; boundary=XBOUNDARY")
        .body(Body::from(body))?)
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let (status, body) = call(offline_app(), Request::builder().uri("/health").body(Body::empty())?).await?;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn openapi_document_served() -> anyhow::Result<()> {
    let (status, body) = call(offline_app(), Request::builder().uri("/api-docs/openapi.json").body(Body::empty())?).await?;
    assert_eq!(status, 200);
    assert!(body["paths"]["/shopadmin/shops"].is_object());
    Ok(())
}

#[tokio::test]
async fn register_without_shop_is_null_shop() -> anyhow::Result<()> {
    let req = multipart("POST", "/shopadmin/shops", &[("note", "no shop here")])?;
    let (status, body) = call(offline_app(), req).await?;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["state"], "NULL_SHOP");
    assert_eq!(body["stateCode"], -1003);
    Ok(())
}

#[tokio::test]
async fn modify_with_malformed_shop_json_is_bad_request() -> anyhow::Result<()> {
    let req = multipart("PUT", "/shopadmin/shops/5", &[("shopStr", "{not json")])?;
    let (status, body) = call(offline_app(), req).await?;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["errMsg"].as_str().unwrap_or_default().contains("shopStr"));
    Ok(())
}

#[tokio::test]
async fn register_incomplete_shop_is_bad_request() -> anyhow::Result<()> {
    let req = multipart("POST", "/shopadmin/shops", &[("shopStr", r#"{"shopName":"Only A Name"}"#)])?;
    let (status, _) = call(offline_app(), req).await?;
    assert_eq!(status, 400);
    Ok(())
}

#[tokio::test]
async fn list_with_unknown_status_is_bad_request() -> anyhow::Result<()> {
    let req = Request::builder().uri("/shopadmin/shops?enableStatus=42").body(Body::empty())?;
    let (status, _) = call(offline_app(), req).await?;
    assert_eq!(status, 400);
    Ok(())
}

#[tokio::test]
async fn list_with_failing_queries_is_inner_error() -> anyhow::Result<()> {
    let req = Request::builder().uri("/shopadmin/shops?pageIndex=1&pageSize=5").body(Body::empty())?;
    let (status, body) = call(offline_app(), req).await?;
    assert_eq!(status, 200);
    assert_eq!(body["state"], "INNER_ERROR");
    assert_eq!(body["success"], false);
    assert!(body.get("shopList").is_none());
    assert!(body.get("count").is_none());
    Ok(())
}

#[tokio::test]
async fn init_info_with_failing_queries_is_server_error() -> anyhow::Result<()> {
    let req = Request::builder().uri("/shopadmin/shop-init-info").body(Body::empty())?;
    let (status, body) = call(offline_app(), req).await?;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    Ok(())
}

struct TestApp {
    base_url: String,
    db: DatabaseConnection,
}

async fn start_server() -> anyhow::Result<TestApp> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env or env var.");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    let storage = storage();
    let state = startup::build_state(db.clone(), &storage);
    let app = routes::build_router(state, &storage.image_base_dir, cors());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(TestApp { base_url, db })
}

#[tokio::test]
async fn e2e_shop_lifecycle() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let app = match start_server().await {
        Ok(a) => a,
        Err(_) => return Ok(()),
    };
    let c = reqwest::Client::new();

    let now = Utc::now().into();
    let a = area::ActiveModel {
        area_name: Set(format!("e2e_area_{}", Uuid::new_v4())),
        area_desc: Set(None),
        priority: Set(1),
        create_time: Set(now),
        last_edit_time: Set(now),
        ..Default::default()
    }
    .insert(&app.db)
    .await?;
    let category = |name: String, parent_id: Option<i64>| shop_category::ActiveModel {
        shop_category_name: Set(name),
        shop_category_desc: Set(None),
        shop_category_img: Set(None),
        priority: Set(1),
        parent_id: Set(parent_id),
        create_time: Set(now),
        last_edit_time: Set(now),
        ..Default::default()
    };
    let parent = category(format!("e2e_parent_{}", Uuid::new_v4()), None).insert(&app.db).await?;
    let child = category(format!("e2e_child_{}", Uuid::new_v4()), Some(parent.shop_category_id)).insert(&app.db).await?;

    // init info offers the sub-category
    let init: Value = c.get(format!("{}/shopadmin/shop-init-info", app.base_url)).send().await?.json().await?;
    assert_eq!(init["success"], true);
    let cats = init["shopCategoryList"].as_array().cloned().unwrap_or_default();
    assert!(cats.iter().any(|x| x["shopCategoryId"] == child.shop_category_id));
    assert!(!cats.iter().any(|x| x["shopCategoryId"] == parent.shop_category_id));

    // register with image
    let shop_str = json!({
        "shopName": "e2e noodle bar",
        "areaId": a.area_id,
        "shopCategoryId": child.shop_category_id,
        "ownerId": 1,
        "phone": "0571-1234"
    });
    let form = reqwest::multipart::Form::new()
        .text("shopStr", shop_str.to_string())
        .part("shopImg", reqwest::multipart::Part::bytes(vec![0xFFu8, 0xD8, 0xFF]).file_name("front.jpg"));
    let res = c.post(format!("{}/shopadmin/shops", app.base_url)).multipart(form).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created: Value = res.json().await?;
    assert_eq!(created["success"], true);
    assert_eq!(created["state"], "CHECK");
    let id = created["shop"]["shopId"].as_i64().unwrap_or_default();
    let img = created["shop"]["shopImg"].as_str().unwrap_or_default().to_string();
    assert!(img.starts_with(&format!("upload/item/shop/{id}/")));

    // the stored image is served back
    let res = c.get(format!("{}/images/{}", app.base_url, img)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // lookup
    let res = c.get(format!("{}/shopadmin/shops/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let found: Value = res.json().await?;
    assert_eq!(found["shop"]["shopName"], "e2e noodle bar");
    assert_eq!(found["shop"]["enableStatus"], "CHECK");

    // modify name only
    let form = reqwest::multipart::Form::new().text("shopStr", json!({"shopName": "e2e noodle palace"}).to_string());
    let modified: Value = c.put(format!("{}/shopadmin/shops/{}", app.base_url, id)).multipart(form).send().await?.json().await?;
    assert_eq!(modified["state"], "SUCCESS");
    assert_eq!(modified["shop"]["shopName"], "e2e noodle palace");
    assert_eq!(modified["shop"]["shopImg"], img.as_str());

    // list by parent category and name
    let url = format!(
        "{}/shopadmin/shops?pageIndex=1&pageSize=10&parentCategoryId={}&shopName=palace",
        app.base_url, parent.shop_category_id
    );
    let page: Value = c.get(url).send().await?.json().await?;
    assert_eq!(page["success"], true);
    assert_eq!(page["count"], 1);
    assert_eq!(page["shopList"][0]["shopId"], id);

    // missing shop
    let res = c.get(format!("{}/shopadmin/shops/{}", app.base_url, i64::MAX)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    shop::Entity::delete_many().filter(shop::Column::AreaId.eq(a.area_id)).exec(&app.db).await?;
    shop_category::Entity::delete_by_id(child.shop_category_id).exec(&app.db).await?;
    shop_category::Entity::delete_by_id(parent.shop_category_id).exec(&app.db).await?;
    area::Entity::delete_by_id(a.area_id).exec(&app.db).await?;
    Ok(())
}
