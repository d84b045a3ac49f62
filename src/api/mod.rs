pub mod routes;

use actix_web::web;

use crate::infrastructure::database::Database;

/// État partagé entre les workers actix
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

/// Configure toutes les routes de l'API
pub fn config(cfg: &mut web::ServiceConfig) {
    // Endpoint de santé
    cfg.service(web::resource("/health").route(web::get().to(health_check)));

    cfg.service(routes::auth::login)
        // Routes protégées par session (extracteur `CurrentUser`)
        .service(routes::instructions::instructions)
        .service(routes::labels::record_label)
        .service(routes::labels::list_labels);
}

/// Endpoint de santé pour monitoring
async fn health_check() -> impl actix_web::Responder {
    actix_web::HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
