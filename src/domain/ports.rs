use crate::config::toml_config::Settings;
use crate::domain::model::{Extraction, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location of `path` as reported to the user.
    fn display_path(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn state(&self) -> &str;
    fn city(&self) -> &str;
    /// Pre-resolved region id; when set the region lookup is skipped.
    fn region_id(&self) -> Option<&str>;
    fn enrich(&self) -> bool;
    fn delimiter(&self) -> u8;
    fn file_extension(&self) -> &str;
    fn settings(&self) -> &Settings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, data: Extraction) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
