pub mod error;
pub mod routes;

use axum::Router;
use db::DBService;
use services::services::{line_api::LineApi, telegram_api::TelegramApi};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub line: LineApi,
    pub telegram: TelegramApi,
}

impl AppState {
    pub fn new(db: DBService) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            line: LineApi::new()?,
            telegram: TelegramApi::new()?,
        })
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
