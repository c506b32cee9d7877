pub mod chain;
pub mod compress;
pub mod config;
pub mod error;
pub mod manager;
pub mod response;
pub mod traits;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;

/// 미들웨어 체인을 통과하는 요청 타입
pub type Request = hyper::Request<Incoming>;

/// 미들웨어 체인을 통과하는 응답 타입
pub type Response = hyper::Response<Full<Bytes>>;

pub use chain::MiddlewareChain;
pub use config::{MiddlewareConfig, MiddlewareType};
pub use error::MiddlewareError;
pub use manager::MiddlewareManager;
pub use response::handle_middleware_error;
pub use traits::Middleware;
