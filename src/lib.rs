pub mod configuration;
pub mod domain;
pub mod models;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
