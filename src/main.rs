use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;
use response_compress::logging::init_logging;
use response_compress::middleware::{MiddlewareConfig, MiddlewareManager, MiddlewareType};
use response_compress::server::{RequestHandler, ServerListener};
use response_compress::settings::Settings;

#[tokio::main]
async fn main() {
    let mut settings = match Settings::load().await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings.logging);

    // 미들웨어 설정이 없으면 기본 압축 미들웨어를 사용
    if settings.middleware.is_empty() {
        settings.middleware.insert(
            "compress".to_string(),
            MiddlewareConfig {
                middleware_type: MiddlewareType::Compress,
                enabled: true,
                order: 0,
                settings: HashMap::new(),
            },
        );
    }

    let manager = match MiddlewareManager::new(&settings.middleware) {
        Ok(manager) => manager,
        Err(e) => {
            error!(error = %e, "미들웨어 초기화 실패");
            std::process::exit(1);
        }
    };

    let handler = Arc::new(RequestHandler::new(manager));

    let listener = match ServerListener::new(&settings.server).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, "서버 초기화 실패");
            std::process::exit(1);
        }
    };

    if let Err(e) = listener.run(handler).await {
        error!(error = %e, "서버 실행 실패");
        std::process::exit(1);
    }
}
