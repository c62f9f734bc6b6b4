mod api_server;
mod auth;
mod error;
mod request_context;

pub use api_server::{router, ApiServer, ApiState};
pub use auth::{api_key_middleware, authorize, API_KEY_HEADER};
pub use error::ApiError;
pub use request_context::RequestContext;
