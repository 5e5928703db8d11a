pub mod client;
pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod models;
pub mod routes;
pub mod service;
pub mod utils;

#[cfg(test)]
mod testing;

use config::Config;
use db::DBClient;

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: DBClient,
}
