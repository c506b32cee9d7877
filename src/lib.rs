//! Response Compress는 hyper 기반 서버에서 응답 본문을 gzip으로 압축하는
//! 미들웨어입니다.
//!
//! # 주요 기능
//!
//! - Content-Type / Accept-Encoding / 상태 코드 / 본문 크기 기반 압축 판정
//! - 제한된 워커 풀을 통한 압축 오프로드
//! - Content-Encoding, Content-Length, Vary 헤더 관리
//!
//! # 예제
//!
//! ```
//! use response_compress::middleware::compress::{CompressConfig, CompressMiddleware};
//! use response_compress::middleware::MiddlewareChain;
//!
//! let config = CompressConfig::default();
//! let mut chain = MiddlewareChain::new();
//! chain.add(CompressMiddleware::new(config).unwrap());
//! ```
//!
//! # 설정
//!
//! ```
//! use std::collections::HashMap;
//! use response_compress::middleware::compress::CompressConfig;
//!
//! let mut settings = HashMap::new();
//! settings.insert("compress.level".to_string(), "9".to_string());
//! settings.insert("compress.minSize".to_string(), "1024".to_string());
//!
//! let config = CompressConfig::from_flat_map(&settings).unwrap();
//! assert_eq!(config.level, 9);
//! ```

pub mod logging;
pub mod middleware;
pub mod server;
pub mod settings;
