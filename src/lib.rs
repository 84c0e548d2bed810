pub mod config;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

use deadpool_postgres::Pool;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pg_pool: Pool,
    pub config: AppConfig,
}
