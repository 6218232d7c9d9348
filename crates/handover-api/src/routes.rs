use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use handover_core::convert::EXPORT_FILE_NAME;
use handover_core::models::{OTHERS_DEVICE_TYPE, STANDARD_DEVICE_TYPES};
use handover_core::requisition::render_requisition;
use handover_core::services::HandoverStore;
use handover_core::util::format_timestamp;
use handover_core::{Handover, HandoverDraft, HandoverId};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AdminAccount, AdminUser, LoginRequest};
use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    store: HandoverStore,
    admin: Arc<AdminAccount>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: HandoverStore) -> Self {
        Self {
            admin: Arc::new(AdminAccount::from_config(&config)),
            store,
            config,
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/api/health", get(health))
        .route("/api/login", post(login))
        .route("/api/device-types", get(device_types))
        .route("/api/assets", get(list_assets).post(create_asset))
        .route("/api/assets/import", post(import_assets))
        .route("/api/assets/import/csv", post(import_assets_csv))
        .route("/api/assets/export", get(export_assets))
        .route(
            "/api/assets/{id}",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
        .route("/api/assets/{id}/requisition", get(asset_requisition))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: format_timestamp(Utc::now()),
    })
}

/// Device types offered by the handover form, `Others` last
async fn device_types() -> Json<Vec<&'static str>> {
    let mut types = STANDARD_DEVICE_TYPES.to_vec();
    types.push(OTHERS_DEVICE_TYPE);
    Json(types)
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    user: AdminUser,
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;
    let user = state.admin.login(&request)?.clone();
    tracing::info!(username = %user.username, "Admin logged in");
    Ok(Json(LoginResponse { user }))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    q: Option<String>,
}

async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Handover>>, AppError> {
    let handovers = match query.q.as_deref() {
        Some(q) if !q.trim().is_empty() => state.store.search(q).await?,
        _ => state.store.list().await?,
    };
    Ok(Json(handovers))
}

async fn create_asset(
    State(state): State<AppState>,
    payload: Result<Json<HandoverDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Handover>), AppError> {
    let Json(draft) = payload?;
    let handover = state.store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(handover)))
}

async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Handover>, AppError> {
    let handover = state.store.get(&HandoverId::from(id)).await?;
    Ok(Json(handover))
}

async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HandoverDraft>, JsonRejection>,
) -> Result<Json<Handover>, AppError> {
    let Json(draft) = payload?;
    let handover = state.store.update(&HandoverId::from(id), draft).await?;
    Ok(Json(handover))
}

async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete(&HandoverId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ImportRequest {
    #[serde(default)]
    assets: Vec<HandoverDraft>,
}

#[derive(Debug, Serialize)]
struct ImportResponse {
    inserted: usize,
}

async fn import_assets(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    let Json(request) = payload?;
    if request.assets.is_empty() {
        return Err(AppError::bad_request("Assets array is required."));
    }

    let report = state.store.bulk_create(request.assets).await;
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            inserted: report.inserted,
        }),
    ))
}

async fn import_assets_csv(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    let text = std::str::from_utf8(&body)
        .map_err(|_| AppError::bad_request("CSV body is not valid UTF-8."))?;

    let report = state.store.import_csv(text).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            inserted: report.inserted,
        }),
    ))
}

async fn export_assets(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = state.store.export_csv().await?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ),
    ];
    Ok((headers, csv))
}

async fn asset_requisition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let handover = state.store.get(&HandoverId::from(id)).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_requisition(&handover),
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use handover_core::services::StoreOptions;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn app_with(options: StoreOptions) -> Router {
        let config = Arc::new(AppConfig::from_lookup(|_| None).unwrap());
        let store = HandoverStore::open_in_memory(options).await.unwrap();
        app_router(AppState::new(config, store))
    }

    async fn app() -> Router {
        app_with(StoreOptions::default()).await
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn payload() -> Value {
        json!({
            "staffDetails": {
                "fullName": "Ama Mensah",
                "staffId": "EMP042",
                "position": "Accountant",
                "department": "Finance",
                "dateTime": "2024-03-01T09:30"
            },
            "devices": [
                { "deviceType": "Laptop", "brand": "HP", "model": "EliteBook 840", "serialNumber": "5CG1" },
                { "deviceType": "Others", "customDeviceType": "Tablet-X", "brand": "Acme", "model": "T1", "serialNumber": "T-9" }
            ],
            "termsAccepted": true,
            "signatures": {
                "staffSignature": "data:image/png;base64,AAA",
                "adminSignature": "data:image/png;base64,BBB"
            },
            "submittedAt": "2024-03-01T09:30:00.000Z"
        })
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn health_reports_ok() {
        let response = app().await.oneshot(empty_request("GET", "/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn device_types_end_with_others() {
        let response = app()
            .await
            .oneshot(empty_request("GET", "/api/device-types"))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!(["Laptop", "Monitor", "Keyboard", "Mouse", "Others"])
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn login_status_codes() {
        let app = app().await;

        let ok = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/login",
                &json!({ "username": "admin", "password": "admin123" }),
            ))
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(body_json(ok).await["user"]["fullName"], "IT Administrator");

        let missing = app
            .clone()
            .oneshot(json_request("POST", "/api/login", &json!({ "username": "admin" })))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let wrong = app
            .oneshot(json_request(
                "POST",
                "/api/login",
                &json!({ "username": "admin", "password": "nope" }),
            ))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await["message"], "Invalid credentials.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_get_update_delete() {
        let app = app().await;

        let created = app
            .clone()
            .oneshot(json_request("POST", "/api/assets", &payload()))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["devices"][1]["deviceType"], "Tablet-X");

        let fetched = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/assets/{id}")))
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(body_json(fetched).await, created);

        let mut changed = payload();
        changed["staffDetails"]["department"] = json!("Treasury");
        let updated = app
            .clone()
            .oneshot(json_request("PUT", &format!("/api/assets/{id}"), &changed))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(
            body_json(updated).await["staffDetails"]["department"],
            "Treasury"
        );

        let deleted = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/assets/{id}")))
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let gone = app
            .oneshot(empty_request("GET", &format!("/api/assets/{id}")))
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(gone).await["message"], "Asset not found.");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_reports_every_invalid_field() {
        let mut invalid = payload();
        invalid["termsAccepted"] = json!(false);
        invalid["signatures"]["adminSignature"] = json!("");

        let response = app()
            .await
            .oneshot(json_request("POST", "/api/assets", &invalid))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let fields: Vec<&str> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|field| field["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["termsAccepted", "signatures.adminSignature"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/assets")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid payload"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn json_import_counts_inserted_items() {
        let app = app().await;

        let empty = app
            .clone()
            .oneshot(json_request("POST", "/api/assets/import", &json!({ "assets": [] })))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(empty).await["message"], "Assets array is required.");

        let mut broken = payload();
        broken["devices"] = json!([]);
        let imported = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/assets/import",
                &json!({ "assets": [payload(), broken] }),
            ))
            .await
            .unwrap();
        assert_eq!(imported.status(), StatusCode::CREATED);
        assert_eq!(body_json(imported).await, json!({ "inserted": 1 }));

        let listed = app.oneshot(empty_request("GET", "/api/assets")).await.unwrap();
        assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_filters_by_query() {
        let app = app().await;
        app.clone()
            .oneshot(json_request("POST", "/api/assets", &payload()))
            .await
            .unwrap();

        let hit = app
            .clone()
            .oneshot(empty_request("GET", "/api/assets?q=elitebook"))
            .await
            .unwrap();
        assert_eq!(body_json(hit).await.as_array().unwrap().len(), 1);

        let miss = app
            .oneshot(empty_request("GET", "/api/assets?q=thinkpad"))
            .await
            .unwrap();
        assert!(body_json(miss).await.as_array().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn export_is_csv_attachment() {
        let app = app().await;
        app.clone()
            .oneshot(json_request("POST", "/api/assets", &payload()))
            .await
            .unwrap();

        let response = app
            .oneshot(empty_request("GET", "/api/assets/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"asset_handovers.csv\""
        );
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));

        let text = body_text(response).await;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("HandoverID,StaffName"));
        assert!(lines[2].contains(",Tablet-X,Acme,T1,T-9"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn csv_import_round_trips_with_waiver() {
        let app = app_with(StoreOptions {
            require_signatures_on_import: false,
        })
        .await;

        let csv = "HandoverID,StaffName,StaffID,StaffPosition,StaffDepartment,HandoverDate,DeviceType,Brand,Model,SerialNumber\n\
                   H1,Ama Mensah,EMP042,Accountant,Finance,2024-03-01T09:30:00.000Z,Laptop,HP,EliteBook,SN1\n\
                   H1,Ama Mensah,EMP042,Accountant,Finance,2024-03-01T09:30:00.000Z,Mouse,HP,M1,SN2\n\
                   ,Kofi Boateng,EMP043,Clerk,Finance,2024-03-02T09:30:00.000Z,Monitor,Dell,P24,SN3\n";
        let request = Request::builder()
            .method("POST")
            .uri("/api/assets/import/csv")
            .header(header::CONTENT_TYPE, "text/csv")
            .body(Body::from(csv))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({ "inserted": 2 }));

        let fetched = app
            .oneshot(empty_request("GET", "/api/assets/H1"))
            .await
            .unwrap();
        assert_eq!(body_json(fetched).await["devices"].as_array().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn malformed_csv_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/assets/import/csv")
            .body(Body::from("HandoverID,StaffName\n\"H1,Ama\n"))
            .unwrap();

        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"]
            .as_str()
            .unwrap()
            .contains("unterminated quoted field"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn requisition_is_plain_text() {
        let app = app().await;
        let created = app
            .clone()
            .oneshot(json_request("POST", "/api/assets", &payload()))
            .await
            .unwrap();
        let id = body_json(created).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(empty_request("GET", &format!("/api/assets/{id}/requisition")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("- Full Name: Ama Mensah"));
        assert!(text.contains("- Date of Issue: March 1, 2024"));
    }
}
