use tracing::debug;
use hyper::HeaderMap;
use crate::middleware::compress::{CompressConfig, CompressMiddleware};
use super::{Middleware, MiddlewareChain, MiddlewareConfig, MiddlewareError, Request, Response};
use super::config::MiddlewareType;
use std::collections::HashMap;

/// 미들웨어 설정으로부터 미들웨어 인스턴스를 생성합니다.
fn create_middleware(config: &MiddlewareConfig) -> Result<Box<dyn Middleware>, MiddlewareError> {
    debug!("미들웨어 생성 시작: type={:?}, settings={:?}", config.middleware_type, config.settings);

    match config.middleware_type {
        MiddlewareType::Compress => {
            let compress_config = CompressConfig::from_flat_map(&config.string_settings())?;
            Ok(Box::new(CompressMiddleware::new(compress_config)?))
        }
    }
}

#[derive(Default)]
pub struct MiddlewareManager {
    chain: MiddlewareChain,
}

impl MiddlewareManager {
    /// 설정으로부터 미들웨어 체인을 구성합니다.
    ///
    /// 설정 오류는 건너뛰지 않고 곧바로 반환합니다.
    pub fn new(middleware_configs: &HashMap<String, MiddlewareConfig>) -> Result<Self, MiddlewareError> {
        let mut chain = MiddlewareChain::new();

        // 정렬을 위해 Vec으로 변환
        let mut ordered_configs: Vec<_> = middleware_configs.iter()
            .filter(|(_, config)| config.enabled)
            .collect();
        ordered_configs.sort_by_key(|(_, config)| config.order);

        // 미들웨어 생성 및 체인에 추가
        for (name, config) in ordered_configs {
            let middleware = create_middleware(config).map_err(|e| MiddlewareError::Execution {
                middleware: name.clone(),
                message: e.to_string(),
            })?;
            chain.add_boxed(middleware);
        }

        Ok(Self { chain })
    }

    pub async fn handle_request(&self, req: Request) -> Result<Request, MiddlewareError> {
        self.chain.handle_request(req).await
    }

    pub async fn handle_response(
        &self,
        req_headers: &HeaderMap,
        res: Response,
    ) -> Result<Response, MiddlewareError> {
        self.chain.handle_response(req_headers, res).await
    }
}
