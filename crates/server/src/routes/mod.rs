pub mod clients;
pub mod dashboard;
pub mod departments;
pub mod health;
pub mod line;
pub mod managers;
pub mod projects;
pub mod tasks;
pub mod telegram;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(projects::router())
        .merge(tasks::router())
        .merge(clients::router())
        .merge(managers::router())
        .merge(departments::router())
        .merge(dashboard::router())
        .merge(line::router())
        .merge(telegram::router())
}
