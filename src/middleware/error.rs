
#[derive(Debug, thiserror::Error)]
pub enum MiddlewareError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("압축 실패: {0}")]
    Compression(String),

    #[error("형식 오류: {0}")]
    InvalidFormat(String),

    #[error("미들웨어 {middleware} 생성 실패: {message}")]
    Execution {
        middleware: String,
        message: String,
    },
}
