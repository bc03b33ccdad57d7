pub mod auth;
pub mod configuration;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod person;
pub mod request_log;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod validators;
