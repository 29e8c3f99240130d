use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use modelmatch_engine::{EngineError, MatchEngine};
use modelmatch_schema::RawRecord;
use serde::Deserialize;
use std::sync::Arc;

/// Largest accepted dataset upload
const MAX_DATASET_BYTES: usize = 256 * 1024 * 1024;

#[derive(Deserialize)]
struct MatchParams {
    top_n: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(engine: Arc<MatchEngine>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(engine.clone()))
                .configure(routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register every route; expects `web::Data<Arc<MatchEngine>>` in app data
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(MAX_DATASET_BYTES))
        .route("/health", web::get().to(health))
        .route("/snapshot", web::get().to(get_snapshot))
        .route("/snapshot", web::put().to(load_snapshot))
        .route("/models/{id}/matches", web::get().to(get_matches))
        .route("/models/{id}/explain", web::get().to(explain_matches));
}

fn error_response(err: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        EngineError::NotFound(_) => HttpResponse::NotFound().json(body),
        EngineError::NoSnapshot => HttpResponse::ServiceUnavailable().json(body),
        EngineError::InvalidTopN
        | EngineError::EmptyDataset
        | EngineError::Schema(_)
        | EngineError::Index(_) => HttpResponse::BadRequest().json(body),
        EngineError::Inconsistent(_) | EngineError::InvalidConfig(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

async fn get_snapshot(engine: web::Data<Arc<MatchEngine>>) -> ActixResult<HttpResponse> {
    match engine.snapshot() {
        Some(snapshot) => Ok(HttpResponse::Ok().json(snapshot.info())),
        None => Ok(error_response(&EngineError::NoSnapshot)),
    }
}

async fn load_snapshot(
    engine: web::Data<Arc<MatchEngine>>,
    records: web::Json<Vec<RawRecord>>,
) -> ActixResult<HttpResponse> {
    let records = records.into_inner();
    tracing::info!(records = records.len(), "dataset upload received");
    let engine = engine.get_ref().clone();

    let loaded = web::block(move || engine.load(&records)).await?;
    match loaded {
        Ok(snapshot) => Ok(HttpResponse::Ok().json(snapshot.info())),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_matches(
    engine: web::Data<Arc<MatchEngine>>,
    path: web::Path<String>,
    params: web::Query<MatchParams>,
) -> ActixResult<HttpResponse> {
    let model_id = path.into_inner();
    let top_n = params.top_n.unwrap_or(engine.config().default_top_n);

    match engine.recommend(&model_id, top_n) {
        Ok(recommendation) => Ok(HttpResponse::Ok().json(recommendation)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn explain_matches(
    engine: web::Data<Arc<MatchEngine>>,
    path: web::Path<String>,
    params: web::Query<MatchParams>,
) -> ActixResult<HttpResponse> {
    let model_id = path.into_inner();
    let top_n = params.top_n.unwrap_or(engine.config().default_top_n);

    match engine.explain(&model_id, top_n).await {
        Ok(explained) => Ok(HttpResponse::Ok().json(explained)),
        Err(e) => Ok(error_response(&e)),
    }
}
