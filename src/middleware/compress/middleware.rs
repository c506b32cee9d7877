use crate::middleware::{Middleware, MiddlewareError, Request, Response};
use super::config::CompressConfig;
use super::worker::CompressionWorkers;
use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::header::{self, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use tracing::{debug, warn};

/// gzip 압축 미들웨어
///
/// 압축 조건을 모두 만족하는 응답의 본문을 gzip으로 교체하고
/// Content-Encoding, Content-Length, Vary 헤더를 갱신합니다.
/// 조건을 하나라도 만족하지 않으면 응답을 그대로 통과시킵니다.
pub struct CompressMiddleware {
    config: CompressConfig,
    workers: CompressionWorkers,
}

impl CompressMiddleware {
    /// 설정을 검증한 뒤 미들웨어를 생성합니다.
    pub fn new(config: CompressConfig) -> Result<Self, MiddlewareError> {
        config.validate()?;
        let workers = CompressionWorkers::new(config.workers);
        Ok(Self { config, workers })
    }

    /// 응답 압축 여부를 판정합니다.
    ///
    /// 본문 길이를 모르는 경우(`None`)는 크기 조건을 통과한 것으로
    /// 간주합니다. 알려진 길이가 최소 크기 미만일 때만 제외됩니다.
    fn is_eligible(
        &self,
        accept_encoding: Option<&str>,
        status: StatusCode,
        content_type: Option<&str>,
        content_length: Option<usize>,
        already_encoded: bool,
    ) -> bool {
        // 파라미터를 제외한 기본 Content-Type으로 판정
        let base_type = match content_type {
            Some(value) => value.split(';').next().unwrap_or("").trim(),
            None => return false,
        };
        if !self.config.mime_types.contains(base_type) {
            return false;
        }

        let accepts_gzip = accept_encoding
            .map(|value| value.to_lowercase().contains("gzip"))
            .unwrap_or(false);
        if !accepts_gzip {
            return false;
        }

        if !status.is_success() {
            return false;
        }

        if let Some(length) = content_length {
            if length < self.config.min_size {
                return false;
            }
        }

        if already_encoded {
            return false;
        }

        true
    }

    /// Vary 헤더에 Accept-Encoding 토큰을 병합합니다.
    ///
    /// 기존 값의 표기와 다른 토큰은 보존하고, 이미 토큰이 포함된 경우
    /// 값을 변경하지 않습니다.
    fn merge_vary(headers: &mut HeaderMap) {
        let existing = match headers.get(header::VARY) {
            Some(value) => match value.to_str() {
                Ok(value) => value.to_string(),
                // 읽을 수 없는 값은 건드리지 않는다
                Err(_) => return,
            },
            None => {
                headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
                return;
            }
        };

        if existing.to_lowercase().contains("accept-encoding") {
            return;
        }

        let merged = format!("{}, Accept-Encoding", existing);
        if let Ok(merged) = HeaderValue::from_str(&merged) {
            headers.insert(header::VARY, merged);
        }
    }
}

#[async_trait]
impl Middleware for CompressMiddleware {
    fn name(&self) -> &str {
        "compress"
    }

    async fn handle_request(&self, req: Request) -> Result<Request, MiddlewareError> {
        Ok(req)
    }

    async fn handle_response(
        &self,
        req_headers: &HeaderMap,
        res: Response,
    ) -> Result<Response, MiddlewareError> {
        let accept_encoding = req_headers
            .get(header::ACCEPT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        let (mut parts, body) = res.into_parts();
        let body = body
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .unwrap_or_default();

        let content_type = parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let already_encoded = parts.headers.contains_key(header::CONTENT_ENCODING);

        if !self.is_eligible(
            accept_encoding.as_deref(),
            parts.status,
            content_type.as_deref(),
            Some(body.len()),
            already_encoded,
        ) {
            return Ok(Response::from_parts(parts, Full::new(body)));
        }

        match self.workers.compress(body.clone(), self.config.level).await {
            Ok(compressed) => {
                debug!(
                    original = body.len(),
                    compressed = compressed.len(),
                    level = self.config.level,
                    "응답 본문 압축 완료"
                );

                parts.headers.insert(
                    header::CONTENT_ENCODING,
                    HeaderValue::from_static("gzip"),
                );
                parts
                    .headers
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(compressed.len()));
                Self::merge_vary(&mut parts.headers);

                Ok(Response::from_parts(parts, Full::new(compressed)))
            }
            Err(e) => {
                // 압축 실패 시 원본 응답을 그대로 반환 (재시도 없음)
                warn!(error = %e, "압축 실패, 원본 응답 유지");
                Ok(Response::from_parts(parts, Full::new(body)))
            }
        }
    }
}
