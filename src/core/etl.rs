use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order and returns the path of the
    /// written file. Nothing is written unless every earlier stage succeeded.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting listing export");

        let extraction = self.pipeline.extract().await?;
        println!("zillow region id: {}", extraction.region_id);
        println!("zillow listings in region found: {}", extraction.listings.len());

        let transformed = self.pipeline.transform(extraction).await?;
        tracing::info!("Flattened {} records", transformed.records.len());

        let output_path = self.pipeline.load(transformed).await?;
        println!("output file: {}", output_path);

        Ok(output_path)
    }
}
