use crate::core::enricher::fetch_enrichment;
use crate::core::flatten::flatten;
use crate::core::http::build_client;
use crate::core::paginator::fetch_all;
use crate::core::region::resolve_region;
use crate::core::writer::{output_filename, render_delimited};
use crate::core::{ConfigProvider, Extraction, Pipeline, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// Region lookup, paginated search, optional enrichment and file output for
/// one city.
pub struct ListingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ListingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = build_client(config.settings())?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ListingPipeline<S, C> {
    async fn extract(&self) -> Result<Extraction> {
        let settings = self.config.settings();

        let region_id = match self.config.region_id() {
            Some(region_id) => {
                tracing::debug!("Using region id {} from the command line", region_id);
                region_id.to_string()
            }
            None => {
                resolve_region(&self.client, settings, self.config.state(), self.config.city())
                    .await?
            }
        };

        let listings = fetch_all(&self.client, settings, &region_id).await?;

        Ok(Extraction {
            region_id,
            listings,
        })
    }

    async fn transform(&self, data: Extraction) -> Result<TransformResult> {
        let settings = self.config.settings();
        let mut records = Vec::with_capacity(data.listings.len());

        for listing in &data.listings {
            let record = if self.config.enrich() {
                let enrichment = fetch_enrichment(&self.client, settings, listing).await?;
                flatten(listing, Some(&enrichment))
            } else {
                flatten(listing, None)
            };
            records.push(record);
        }

        Ok(TransformResult {
            region_id: data.region_id,
            records,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        if result.records.is_empty() {
            return Err(EtlError::EmptyDataset);
        }

        let filename = output_filename(
            self.config.city(),
            self.config.state(),
            &result.region_id,
            self.config.file_extension(),
        );
        let data = render_delimited(&result.records, self.config.delimiter())?;

        tracing::debug!("Writing {} rows ({} bytes) to {}", result.records.len(), data.len(), filename);
        self.storage.write_file(&filename, &data).await?;

        Ok(self.storage.display_path(&filename))
    }
}
