use std::sync::Arc;
use bytes::Bytes;
use tokio::sync::Semaphore;
use crate::middleware::MiddlewareError;
use super::encoder;

/// 압축 작업을 실행하는 제한된 워커 풀
///
/// 동시에 실행되는 압축 작업 수를 세마포어로 제한해 큰 본문 압축이
/// 같은 실행 컨텍스트를 공유하는 다른 요청 처리를 막지 않도록 합니다.
#[derive(Debug, Clone)]
pub struct CompressionWorkers {
    semaphore: Arc<Semaphore>,
}

impl CompressionWorkers {
    pub fn new(size: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
        }
    }

    /// 워커 슬롯을 확보한 뒤 블로킹 스레드에서 압축을 실행합니다.
    ///
    /// 슬롯은 클로저 안으로 이동하므로 호출 측 요청이 취소되어도
    /// 작업이 끝나는 시점에 풀로 반환됩니다.
    pub async fn compress(&self, data: Bytes, level: u32) -> Result<Bytes, MiddlewareError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| MiddlewareError::Compression(format!("워커 풀이 닫혔습니다: {}", e)))?;

        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            encoder::gzip_compress(&data, level)
        });

        match task.await {
            Ok(Ok(compressed)) => Ok(compressed),
            Ok(Err(e)) => Err(MiddlewareError::Compression(e.to_string())),
            Err(e) => Err(MiddlewareError::Compression(format!("압축 작업 실패: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_compress_returns_valid_gzip() {
        let workers = CompressionWorkers::new(1);
        let data = Bytes::from("h".repeat(600));

        let compressed = workers.compress(data.clone(), 6).await.unwrap();
        assert!(compressed.len() < data.len());
    }

    #[tokio::test]
    async fn test_jobs_exceeding_pool_size_all_complete() {
        let workers = CompressionWorkers::new(2);
        let data = Bytes::from("h".repeat(4096));

        let jobs: Vec<_> = (0..8)
            .map(|_| {
                let workers = workers.clone();
                let data = data.clone();
                tokio::spawn(async move { workers.compress(data, 6).await })
            })
            .collect();

        for job in jobs {
            let compressed = job.await.unwrap().unwrap();
            assert!(!compressed.is_empty());
        }
    }
}
