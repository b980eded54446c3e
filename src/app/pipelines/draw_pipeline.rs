use crate::adapters::{parse_participants, parse_prior_assignments, OutputFormat, Table};
use crate::core::engine::AssignmentEngine;
use crate::core::events::{EventLog, Tee, TracingObserver};
use crate::core::{ConfigProvider, DrawInput, DrawResult, Pipeline, PriorAssignments, Storage};
use crate::utils::error::{Result, SantaError};
use std::path::Path;
use std::time::Duration;

/// 讀名單、抽籤、寫出結果
pub struct DrawPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DrawPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn read_table(&self, path: &str) -> Result<Table> {
        let data = self.storage.read_file(path).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), path);
        Table::from_bytes(path, &data)
    }
}

/// 在目前執行緒上跑完整個抽籤，事件同時寫入 tracing 並統計嘗試次數
pub fn run_draw(input: &DrawInput, max_attempts: usize, seed: Option<u64>) -> Result<DrawResult> {
    let mut engine = AssignmentEngine::from_seed_option(seed);
    let mut observer = Tee::new(TracingObserver, EventLog::new());

    let assignment = engine.generate(
        &input.participants,
        &input.prior,
        max_attempts,
        &mut observer,
    )?;
    let attempts_used = observer.second.attempts_used().unwrap_or(0);

    Ok(DrawResult {
        assignment,
        attempts_used,
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for DrawPipeline<S, C> {
    async fn extract(&self) -> Result<DrawInput> {
        let columns = self.config.column_names();

        let roster_path = self.config.participants_path();
        tracing::info!("📋 Reading participants from: {}", roster_path);
        let table = self.read_table(roster_path).await?;
        let participants = parse_participants(&table, roster_path, &columns)?;

        if participants.len() < 2 {
            tracing::warn!(
                "⚠️ Only {} participant(s); no valid draw exists",
                participants.len()
            );
        }

        let prior = match self.config.previous_results_path() {
            Some(path) => {
                tracing::info!("📜 Reading previous results from: {}", path);
                let table = self.read_table(path).await?;
                parse_prior_assignments(&table, path, &columns)?
            }
            None => {
                tracing::info!("No previous results given, only self-draws are excluded");
                PriorAssignments::new()
            }
        };

        let unmatched = prior.unmatched_givers(&participants);
        if !unmatched.is_empty() {
            tracing::debug!(
                "Ignoring previous results for people not in this year's list: {}",
                unmatched.join(", ")
            );
        }

        Ok(DrawInput {
            participants,
            prior,
        })
    }

    async fn transform(&self, input: DrawInput) -> Result<DrawResult> {
        let max_attempts = self.config.max_attempts();
        let seed = self.config.seed();

        tracing::debug!(
            "Drawing for {} participants (max attempts: {}, seed: {:?})",
            input.participants.len(),
            max_attempts,
            seed
        );

        let Some(seconds) = self.config.timeout_seconds() else {
            return run_draw(&input, max_attempts, seed);
        };

        // 引擎本身是同步的，逾時保護放在 blocking 執行緒外層
        let task = tokio::task::spawn_blocking(move || run_draw(&input, max_attempts, seed));
        match tokio::time::timeout(Duration::from_secs(seconds), task).await {
            Ok(joined) => joined.map_err(|e| SantaError::ProcessingError {
                message: format!("Draw task failed: {}", e),
            })?,
            Err(_) => Err(SantaError::TimeoutError { seconds }),
        }
    }

    async fn load(&self, result: DrawResult) -> Result<String> {
        let output_name = self.config.output_name();

        // 先把所有格式都產生好，任何一個失敗就一個檔案都不寫
        let mut rendered = Vec::new();
        for format in self.config.output_formats() {
            let format: OutputFormat = format.parse()?;
            let data = format.render(&result.assignment)?;

            let file_name = format!("{}.{}", output_name, format.extension());
            let output_path = Path::new(self.config.output_path())
                .join(file_name)
                .to_string_lossy()
                .into_owned();
            rendered.push((output_path, data));
        }

        let mut written = Vec::with_capacity(rendered.len());
        for (output_path, data) in rendered {
            tracing::debug!("Writing {} bytes to {}", data.len(), output_path);
            self.storage.write_file(&output_path, &data).await?;
            written.push(output_path);
        }

        Ok(written.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ColumnNames;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, content: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), content.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SantaError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        previous: Option<String>,
        formats: Vec<String>,
        max_attempts: usize,
        timeout: Option<u64>,
    }

    impl TestConfig {
        fn new() -> Self {
            Self {
                previous: None,
                formats: vec!["csv".to_string()],
                max_attempts: 1000,
                timeout: None,
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn participants_path(&self) -> &str {
            "roster.csv"
        }

        fn previous_results_path(&self) -> Option<&str> {
            self.previous.as_deref()
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_name(&self) -> String {
            "draw".to_string()
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn max_attempts(&self) -> usize {
            self.max_attempts
        }

        fn seed(&self) -> Option<u64> {
            Some(2024)
        }

        fn timeout_seconds(&self) -> Option<u64> {
            self.timeout
        }

        fn column_names(&self) -> ColumnNames {
            ColumnNames::default()
        }
    }

    const ROSTER: &str = "Employee_Name,Employee_EmailID\n\
                          Alice,alice@example.com\n\
                          Bob,bob@example.com\n\
                          Carol,carol@example.com\n\
                          Dave,dave@example.com\n";

    #[tokio::test]
    async fn test_extract_reads_roster_and_previous_results() {
        let storage = MockStorage::new();
        storage.put("roster.csv", ROSTER).await;
        storage
            .put(
                "2023.csv",
                "Employee_Name,Secret_Child_Name\nAlice,Bob\nGhost,Carol\n",
            )
            .await;

        let mut config = TestConfig::new();
        config.previous = Some("2023.csv".to_string());
        let pipeline = DrawPipeline::new(storage, config);

        let input = pipeline.extract().await.unwrap();

        assert_eq!(input.participants.len(), 4);
        assert_eq!(input.prior.receiver_for("Alice"), Some("Bob"));
        assert_eq!(input.prior.receiver_for("Ghost"), Some("Carol"));
    }

    #[tokio::test]
    async fn test_extract_missing_roster() {
        let pipeline = DrawPipeline::new(MockStorage::new(), TestConfig::new());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, SantaError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_respects_previous_results() {
        let storage = MockStorage::new();
        storage.put("roster.csv", ROSTER).await;
        storage
            .put("2023.csv", "Employee_Name,Secret_Child_Name\nAlice,Bob\n")
            .await;

        let mut config = TestConfig::new();
        config.previous = Some("2023.csv".to_string());
        let pipeline = DrawPipeline::new(storage, config);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.assignment.len(), 4);
        assert!(result.attempts_used >= 1);
        let alice_gets = result.assignment.receiver_for("Alice").unwrap();
        assert_ne!(alice_gets.name(), "Bob");
        assert_ne!(alice_gets.name(), "Alice");
    }

    #[tokio::test]
    async fn test_transform_with_timeout_guard() {
        let storage = MockStorage::new();
        storage.put("roster.csv", ROSTER).await;

        let mut config = TestConfig::new();
        config.timeout = Some(30);
        let pipeline = DrawPipeline::new(storage, config);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        assert_eq!(result.assignment.len(), 4);
    }

    #[tokio::test]
    async fn test_transform_exhausted() {
        let storage = MockStorage::new();
        storage
            .put(
                "roster.csv",
                "Employee_Name,Employee_EmailID\nAlice,a@example.com\nBob,b@example.com\n",
            )
            .await;
        storage
            .put(
                "2023.csv",
                "Employee_Name,Secret_Child_Name\nAlice,Bob\nBob,Alice\n",
            )
            .await;

        let mut config = TestConfig::new();
        config.previous = Some("2023.csv".to_string());
        config.max_attempts = 25;
        let pipeline = DrawPipeline::new(storage, config);

        let input = pipeline.extract().await.unwrap();
        let err = pipeline.transform(input).await.unwrap_err();

        assert!(matches!(
            err,
            SantaError::AssignmentExhausted(ref e) if e.max_attempts == 25
        ));
    }

    #[tokio::test]
    async fn test_load_writes_every_format() {
        let storage = MockStorage::new();
        storage.put("roster.csv", ROSTER).await;

        let mut config = TestConfig::new();
        config.formats = vec!["csv".to_string(), "json".to_string()];
        let pipeline = DrawPipeline::new(storage.clone(), config);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        let written = pipeline.load(result).await.unwrap();

        let csv_path = Path::new("out").join("draw.csv").to_string_lossy().into_owned();
        let json_path = Path::new("out").join("draw.json").to_string_lossy().into_owned();
        assert_eq!(written, format!("{}, {}", csv_path, json_path));

        let csv = String::from_utf8(storage.get_file(&csv_path).await.unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 5);
        assert!(storage.get_file(&json_path).await.is_some());
    }

    #[tokio::test]
    async fn test_load_renders_everything_before_writing() {
        let storage = MockStorage::new();
        storage.put("roster.csv", ROSTER).await;

        let mut config = TestConfig::new();
        config.formats = vec!["csv".to_string(), "xml".to_string()];
        let pipeline = DrawPipeline::new(storage.clone(), config);

        let input = pipeline.extract().await.unwrap();
        let result = pipeline.transform(input).await.unwrap();
        let err = pipeline.load(result).await.unwrap_err();

        assert!(matches!(
            err,
            SantaError::InvalidConfigValueError { ref value, .. } if value == "xml"
        ));
        // csv 排在前面也不能先寫出去
        let csv_path = Path::new("out").join("draw.csv").to_string_lossy().into_owned();
        assert!(storage.get_file(&csv_path).await.is_none());
        assert_eq!(storage.files.lock().await.len(), 1);
    }
}
