use crate::domain::model::{ColumnNames, DrawInput, DrawResult};
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

pub trait ConfigProvider: Send + Sync {
    fn participants_path(&self) -> &str;
    fn previous_results_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_name(&self) -> String;
    fn output_formats(&self) -> &[String];
    fn max_attempts(&self) -> usize;
    fn seed(&self) -> Option<u64>;
    fn timeout_seconds(&self) -> Option<u64>;

    fn column_names(&self) -> ColumnNames {
        ColumnNames::default()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DrawInput>;
    async fn transform(&self, input: DrawInput) -> Result<DrawResult>;
    async fn load(&self, result: DrawResult) -> Result<String>;
}
