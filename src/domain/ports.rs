use crate::domain::model::{CleanupResult, FrameHandle, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait CleanupSettings: Send + Sync {
    fn source(&self) -> &str;
    fn fields(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn max_iterations(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, data: Vec<Record>) -> Result<CleanupResult>;
    async fn load(&self, result: CleanupResult) -> Result<Vec<String>>;
}

/// 宿主的畫格排程器（瀏覽器中即 requestAnimationFrame）
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Must be a no-op for handles that already fired or were cancelled.
    fn cancel_frame(&mut self, handle: FrameHandle);
}
