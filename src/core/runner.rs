use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct DrawRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> DrawRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🎄 Starting Secret Santa draw...");

        // Extract
        tracing::info!("Reading participants...");
        let input = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} participants and {} previous assignments",
            input.participants.len(),
            input.prior.len()
        );

        // Transform
        tracing::info!("Drawing assignments...");
        let result = self.pipeline.transform(input).await?;
        tracing::info!(
            "Drew {} assignments in {} attempt(s)",
            result.assignment.len(),
            result.attempts_used
        );

        // Load
        tracing::info!("Saving assignments...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
