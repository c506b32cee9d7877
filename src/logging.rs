use tracing::{error, info, span, warn, Level};
use tracing_subscriber::EnvFilter;
use crate::settings::{LogFormat, LogSettings};

pub fn init_logging(settings: &LogSettings) {
    let filter = EnvFilter::from_default_env()
        .add_directive(settings.level.into())
        .add_directive("response_compress=debug".parse().unwrap());

    match settings.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .init(),
    }
}

#[derive(Debug)]
pub struct RequestLog {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub content_encoding: Option<String>,
    pub response_bytes: Option<usize>,
    pub error: Option<String>,
}

impl RequestLog {
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            method: String::new(),
            path: String::new(),
            status_code: 0,
            duration_ms: 0,
            content_encoding: None,
            response_bytes: None,
            error: None,
        }
    }

    pub fn with_request<B>(&mut self, req: &hyper::Request<B>) {
        self.method = req.method().to_string();
        self.path = req.uri().path().to_string();

        info!(
            request_id = %self.request_id,
            method = %self.method,
            path = %self.path,
            "Received request"
        );
    }

    pub fn with_response<B>(&mut self, res: &hyper::Response<B>) {
        self.status_code = res.status().as_u16();
        self.content_encoding = res
            .headers()
            .get(hyper::header::CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        self.response_bytes = res
            .headers()
            .get(hyper::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());
    }

    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        let error_msg = error.to_string();
        error!(
            request_id = %self.request_id,
            error = %error_msg,
            "Request error occurred"
        );
        self.error = Some(error_msg);
    }
}

pub fn log_request(log: &RequestLog) {
    let level = if log.error.is_some() {
        Level::ERROR
    } else if log.status_code >= 400 {
        Level::WARN
    } else {
        Level::INFO
    };

    let span = span!(
        Level::INFO,
        "request",
        request_id = %log.request_id,
        method = %log.method,
        path = %log.path,
        status = %log.status_code,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(
            error = ?log.error,
            "Request failed"
        ),
        Level::WARN => warn!(
            encoding = ?log.content_encoding,
            bytes = ?log.response_bytes,
            "Request completed with warning"
        ),
        _ => info!(
            encoding = ?log.content_encoding,
            bytes = ?log.response_bytes,
            "Request completed successfully"
        ),
    }
}
