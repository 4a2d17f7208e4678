use crate::core::{Pipeline, RunOutcome};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting vocabulary build");

        // Select
        let Some(source) = self.pipeline.select_source()? else {
            tracing::info!("No source file found among candidates");
            return Ok(RunOutcome::NoSource);
        };
        tracing::info!("📄 Using source {} ({})", source.path, source.format);

        // Extract
        let raw = self.pipeline.extract(&source)?;
        tracing::info!("Extracted {} raw records", raw.len());

        // Transform
        let transformed = self.pipeline.transform(raw)?;
        tracing::info!(
            "Normalized {} records ({} dropped)",
            transformed.items.len(),
            transformed.dropped
        );

        if transformed.items.is_empty() {
            return Ok(RunOutcome::NoItems { source });
        }

        // Load
        let outcome = self.pipeline.load(transformed)?;
        Ok(RunOutcome::Loaded { source, outcome })
    }
}
