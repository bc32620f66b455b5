pub mod config;
pub mod errors;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError, Environment, Runtime};
pub use errors::ApiError;
pub use routes::build_router;
pub use state::AppState;
