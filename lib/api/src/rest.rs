use actix_cors::Cors;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use nexin_catalog::ModelManager;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub const SERVICE_NAME: &str = "Nexin ML Recommendation API";
pub const ADMIN_TOKEN_HEADER: &str = "X-ADMIN-TOKEN";

/// HTTP-facing settings
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    pub port: u16,
    /// Reload secret. `None` rejects every reload.
    pub admin_token: Option<String>,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
}

pub struct ApiState {
    pub manager: Arc<ModelManager>,
    pub admin_token: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    products_loaded: usize,
}

#[derive(Serialize)]
struct ReloadResponse {
    reloaded: bool,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(manager: Arc<ModelManager>, config: ApiConfig) -> std::io::Result<()> {
        let port = config.port;
        let state = web::Data::new(ApiState {
            manager,
            admin_token: config.admin_token.clone(),
        });
        let origins = config.cors_origins.clone();

        info!("Starting HTTP server on port {}", port);
        HttpServer::new(move || {
            App::new()
                .wrap(cors(&origins))
                .app_data(state.clone())
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register the service routes. Expects `web::Data<ApiState>` in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health))
        .route("/recommend", web::post().to(recommend))
        .route("/reload", web::post().to(reload));
}

fn cors(origins: &[String]) -> Cors {
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": SERVICE_NAME,
        "status": "running"
    })))
}

async fn health(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    let status = if state.manager.is_ready() {
        "ML Service Running"
    } else {
        "ML Service Not Ready"
    };
    Ok(HttpResponse::Ok().json(HealthResponse {
        status,
        products_loaded: state.manager.products_loaded(),
    }))
}

async fn recommend(state: web::Data<ApiState>, body: web::Bytes) -> ActixResult<HttpResponse> {
    let product_id = parse_product_id(&body);
    let ids = state.manager.recommend(&product_id);
    Ok(HttpResponse::Ok().json(ids.as_slice()))
}

async fn reload(state: web::Data<ApiState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match (state.admin_token.as_deref(), provided) {
        (Some(expected), Some(token)) if token == expected => {
            let reloaded = state.manager.rebuild().await;
            Ok(HttpResponse::Ok().json(ReloadResponse { reloaded }))
        }
        _ => {
            warn!("Rejected unauthorized reload request");
            Ok(HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Unauthorized"
            })))
        }
    }
}

/// `product_id` from a JSON body; strings and numbers are accepted, anything
/// else (including an unparseable body) becomes "".
pub fn parse_product_id(body: &[u8]) -> String {
    let payload: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    match payload.get("product_id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
