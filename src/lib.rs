#![warn(rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod healthcheck;
pub mod middleware;
pub mod observability;
pub mod port;
pub mod snapshot;
pub mod store;
pub mod test_support;

pub use config::{Settings, get_configuration};
pub use error::ObservabilityError;
pub use healthcheck::{healthcheck, healthcheck_with_port};
pub use observability::Observability;
