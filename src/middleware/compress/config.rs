use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use crate::middleware::MiddlewareError;

/// gzip 압축 미들웨어 설정
///
/// # TOML 예시
///
/// ```toml
/// [middlewares.compress]
/// middleware_type = "compress"
///
/// [middlewares.compress.settings]
/// "compress.level" = "6"
/// "compress.minSize" = "500"
/// "compress.mimeTypes" = "text/html, application/json"
/// "compress.workers" = "4"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompressConfig {
    /// 압축 대상 Content-Type 집합
    #[serde(default = "default_mime_types")]
    pub mime_types: HashSet<String>,

    /// gzip 압축 레벨 (1-9)
    #[serde(default = "default_level")]
    pub level: u32,

    /// 압축을 시도할 최소 본문 크기 (바이트)
    #[serde(default = "default_min_size")]
    pub min_size: usize,

    /// 동시에 실행할 압축 작업 수 상한
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_mime_types() -> HashSet<String> {
    [
        "text/html",
        "text/css",
        "text/xml",
        "application/json",
        "application/javascript",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_level() -> u32 {
    6
}

fn default_min_size() -> usize {
    500
}

fn default_workers() -> usize {
    4
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            mime_types: default_mime_types(),
            level: default_level(),
            min_size: default_min_size(),
            workers: default_workers(),
        }
    }
}

impl CompressConfig {
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 9;

    /// 평탄화된 설정 맵에서 설정을 파싱합니다.
    ///
    /// 키 형식: `compress.level`, `compress.minSize`,
    /// `compress.mimeTypes` (쉼표 구분), `compress.workers`
    pub fn from_flat_map(settings: &HashMap<String, String>) -> Result<Self, MiddlewareError> {
        let mut config = Self::default();

        for (key, value) in settings {
            match key.as_str() {
                "compress.mimeTypes" => {
                    config.mime_types = value.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                "compress.level" => {
                    config.level = value.parse().map_err(|_| {
                        MiddlewareError::InvalidFormat(format!("잘못된 압축 레벨: {}", value))
                    })?;
                }
                "compress.minSize" => {
                    config.min_size = value.parse().map_err(|_| {
                        MiddlewareError::InvalidFormat(format!("잘못된 최소 크기: {}", value))
                    })?;
                }
                "compress.workers" => {
                    config.workers = value.parse().map_err(|_| {
                        MiddlewareError::InvalidFormat(format!("잘못된 워커 수: {}", value))
                    })?;
                }
                _ => continue,
            }
        }

        Ok(config)
    }

    /// 설정 유효성을 검증합니다.
    ///
    /// 범위를 벗어난 값은 조정하지 않고 오류로 처리합니다.
    pub fn validate(&self) -> Result<(), MiddlewareError> {
        if self.level < Self::MIN_LEVEL || self.level > Self::MAX_LEVEL {
            return Err(MiddlewareError::Config(format!(
                "압축 레벨은 {}-{} 범위여야 합니다: {}",
                Self::MIN_LEVEL,
                Self::MAX_LEVEL,
                self.level
            )));
        }

        if self.mime_types.is_empty() {
            return Err(MiddlewareError::Config(
                "압축 대상 MIME 타입이 비어 있습니다".to_string(),
            ));
        }

        for mime in &self.mime_types {
            if !mime.contains('/') {
                return Err(MiddlewareError::Config(format!("잘못된 MIME 타입: {}", mime)));
            }
        }

        if self.workers == 0 {
            return Err(MiddlewareError::Config(
                "워커 수는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}
