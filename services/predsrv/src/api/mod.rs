//! HTTP handlers

pub mod health_handlers;
pub mod predict_handlers;
