use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct CleanupEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CleanupEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract → transform → load and returns the written output paths.
    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::info!("🚀 Starting benefit cleanup");

        let raw_data = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", raw_data.len());

        let result = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "🧹 Cleaned {} fields across {} of {} records",
            result.changed_fields,
            result.changed_records,
            result.records.len()
        );

        let outputs = self.pipeline.load(result).await?;
        for path in &outputs {
            tracing::info!("📁 Wrote {}", path);
        }

        Ok(outputs)
    }
}
