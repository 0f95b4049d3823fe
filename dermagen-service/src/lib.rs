//! DermaGen gateway: validates synthetic lesion image requests, forwards them
//! to the inference service and keeps an in-memory record of what was generated.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
