pub mod app_state;
pub mod auth;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod generation;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod quiz;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub mod test_utils;
