//! Product catalog REST service.
//!
//! `routes` -> `handlers` -> `services` -> `repository`, with `error`
//! turning every failure into one JSON error shape.

pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
