use super::{Middleware, MiddlewareError, Request, Response};
use hyper::HeaderMap;
use tracing::debug;

#[derive(Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Box::new(middleware));
    }

    pub fn add_boxed(&mut self, middleware: Box<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub async fn handle_request(&self, mut request: Request) -> Result<Request, MiddlewareError> {
        for middleware in &self.middlewares {
            debug!(middleware = middleware.name(), "요청 미들웨어 실행");
            request = middleware.handle_request(request).await?;
        }
        Ok(request)
    }

    pub async fn handle_response(
        &self,
        req_headers: &HeaderMap,
        mut response: Response,
    ) -> Result<Response, MiddlewareError> {
        // 응답은 역순으로 처리
        for middleware in self.middlewares.iter().rev() {
            debug!(middleware = middleware.name(), "응답 미들웨어 실행");
            response = middleware.handle_response(req_headers, response).await?;
        }
        Ok(response)
    }
}
