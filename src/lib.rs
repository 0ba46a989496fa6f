pub mod api;
pub mod auth;
pub mod error;
pub mod fallback;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;
