use std::convert::Infallible;
use std::time::Instant;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Request, Response, StatusCode};
use tracing::error;
use uuid::Uuid;
use crate::logging::{log_request, RequestLog};
use crate::middleware::{handle_middleware_error, MiddlewareManager};

pub struct RequestHandler {
    middleware_manager: MiddlewareManager,
}

impl RequestHandler {
    pub fn new(middleware_manager: MiddlewareManager) -> Self {
        Self { middleware_manager }
    }

    pub async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let start = Instant::now();
        let mut log = RequestLog::new(Uuid::new_v4().to_string());
        log.with_request(&req);

        // 1. 요청 미들웨어 처리
        let req = match self.middleware_manager.handle_request(req).await {
            Ok(req) => req,
            Err(e) => {
                error!(error = %e, "요청 미들웨어 처리 실패");
                log.with_error(&e);
                return Ok(handle_middleware_error(e));
            }
        };

        // 2. 데모 라우팅
        let req_headers = req.headers().clone();
        let response = demo_response(&req);

        // 3. 응답 미들웨어 처리
        let response = match self.middleware_manager
            .handle_response(&req_headers, response).await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "응답 미들웨어 처리 실패");
                log.with_error(&e);
                handle_middleware_error(e)
            }
        };

        log.with_response(&response);
        log.duration_ms = start.elapsed().as_millis() as u64;
        log_request(&log);

        Ok(response)
    }

    pub async fn handle_connection<I>(
        &self,
        io: I,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        I: hyper::rt::Read + hyper::rt::Write + Send + Unpin + 'static,
    {
        http1::Builder::new()
            .serve_connection(
                io,
                service_fn(|req| self.handle_request(req)),
            )
            .await
            .map_err(|e| e.into())
    }
}

/// 데모 라우트를 처리합니다.
///
/// 압축 대상/비대상 응답을 만들어 미들웨어 동작을 확인하는 용도입니다.
fn demo_response<B>(req: &Request<B>) -> Response<Full<Bytes>> {
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        [""] => html_response(StatusCode::OK, "h".repeat(501)),

        ["html", length] => match length.parse::<usize>() {
            Ok(length) => html_response(StatusCode::OK, "h".repeat(length)),
            Err(_) => not_found(),
        },

        ["html", "status", status] => match status.parse::<u16>().ok()
            .and_then(|status| StatusCode::from_u16(status).ok())
        {
            Some(status) => html_response(status, "h".repeat(501)),
            None => not_found(),
        },

        ["html", "vary", vary] => {
            let mut response = html_response(StatusCode::OK, "h".repeat(501));
            match vary.parse::<header::HeaderValue>() {
                Ok(value) => {
                    response.headers_mut().insert(header::VARY, value);
                    response
                }
                Err(_) => not_found(),
            }
        }

        ["json", length] => match length.parse::<usize>() {
            Ok(length) => {
                let payload = "b".repeat(length.saturating_sub(8));
                json_response(serde_json::json!({ "a": payload }))
            }
            Err(_) => not_found(),
        },

        ["ping", count] => match count.parse::<usize>() {
            Ok(count) => json_response(serde_json::json!({
                "success": true,
                "result": vec!["pong"; count],
            })),
            Err(_) => not_found(),
        },

        ["other", length] => match length.parse::<usize>() {
            Ok(length) => {
                let content_type = query_param(req, "content_type")
                    .unwrap_or_else(|| "text/plain".to_string());
                body_response(StatusCode::OK, &content_type, "h".repeat(length))
            }
            Err(_) => not_found(),
        },

        _ => not_found(),
    }
}

fn query_param<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.uri().query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn html_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    body_response(status, "text/html; charset=utf-8", body)
}

fn json_response(value: serde_json::Value) -> Response<Full<Bytes>> {
    body_response(StatusCode::OK, "application/json", value.to_string())
}

fn body_response(status: StatusCode, content_type: &str, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            error!(error = %e, "응답 생성 실패");
            Response::new(Full::new(Bytes::from("Internal Server Error")))
        })
}

fn not_found() -> Response<Full<Bytes>> {
    body_response(StatusCode::NOT_FOUND, "text/plain", "Not Found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_html_route_body_length() {
        let response = demo_response(&get("/html/501"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "501"
        );
    }

    #[test]
    fn test_json_route_serialized_length() {
        let response = demo_response(&get("/json/500"));

        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        // {"a":"bb...b"} 형태로 직렬화되어 전체 길이가 요청 길이와 같다
        assert_eq!(
            response.headers().get(header::CONTENT_LENGTH).unwrap(),
            "500"
        );
    }

    #[test]
    fn test_status_route() {
        let response = demo_response(&get("/html/status/400"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_vary_route_sets_header() {
        let response = demo_response(&get("/html/vary/Referer"));
        assert_eq!(response.headers().get(header::VARY).unwrap(), "Referer");
    }

    #[test]
    fn test_other_route_takes_content_type_from_query() {
        let response = demo_response(&get("/other/501?content_type=text/css"));
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/css"
        );
    }

    #[test]
    fn test_unknown_route_is_not_found() {
        let response = demo_response(&get("/missing"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
