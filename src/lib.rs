//! Car API server library.
//!
//! A REST API for user registration/log-in and a soft-deletable car
//! inventory, backed by MySQL. Every request borrows exactly one pooled
//! connection for its whole lifetime; see [`middleware::connection`].

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
