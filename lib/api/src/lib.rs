pub mod rest;

pub use rest::{routes, ApiConfig, ApiState, RestApi, ADMIN_TOKEN_HEADER, SERVICE_NAME};
