use crate::core::normalizer::TextNormalizer;
use crate::core::{CleanupResult, CleanupSettings, Pipeline, Record, Storage};
use crate::domain::model::CleanupReport;
use crate::utils::error::{KitError, Result};
use crate::utils::validation::is_remote_source;
use reqwest::Client;
use serde_json::Value;

pub const CSV_FILENAME: &str = "cleaned.csv";
pub const JSON_FILENAME: &str = "cleaned.json";
pub const REPORT_FILENAME: &str = "report.json";

/// 清單欄位在 CSV 中以此分隔
const LIST_SEPARATOR: &str = " | ";

/// 讀取活動資料、清理指定的文字欄位並輸出 CSV / JSON
pub struct BenefitCleanupPipeline<S: Storage, C: CleanupSettings> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: CleanupSettings> BenefitCleanupPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn fetch_payload(&self) -> Result<Value> {
        let source = self.config.source();

        if is_remote_source(source) {
            tracing::debug!("Fetching campaigns from: {}", source);
            let response = self.client.get(source).send().await?;
            let status = response.status();
            tracing::debug!("Source response status: {}", status);

            if !status.is_success() {
                return Err(KitError::SourceError {
                    source_name: source.to_string(),
                    message: format!("HTTP status {}", status),
                });
            }
            Ok(response.json().await?)
        } else {
            tracing::debug!("Reading campaigns from file: {}", source);
            let bytes = self.storage.read_file(source).await?;
            Ok(serde_json::from_slice(&bytes)?)
        }
    }

    fn output_file(&self, name: &str) -> String {
        let base = self.config.output_path().trim_end_matches('/');
        if base.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", base, name)
        }
    }

    fn render_csv(&self, result: &CleanupResult) -> Result<Vec<u8>> {
        let columns: Vec<&String> = result.fields.iter().filter(|f| *f != "id").collect();

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut header = vec!["id"];
        header.extend(columns.iter().map(|c| c.as_str()));
        writer.write_record(&header)?;

        for record in &result.records {
            let mut row = vec![record.id().unwrap_or_default()];
            row.extend(columns.iter().map(|c| csv_cell(record.data.get(c.as_str()))));
            writer.write_record(&row)?;
        }

        writer.into_inner().map_err(|e| KitError::ProcessingError {
            message: format!("Failed to finish CSV output: {}", e),
        })
    }
}

/// Accepts a bare array, an envelope with a `data` or `campaigns` array, or a
/// single object.
pub fn records_from_payload(source: &str, payload: Value) -> Result<Vec<Record>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            let envelope = ["data", "campaigns"]
                .iter()
                .find(|key| matches!(obj.get(**key), Some(Value::Array(_))))
                .copied();
            match envelope.and_then(|key| obj.remove(key)) {
                Some(Value::Array(items)) => items,
                _ => vec![Value::Object(obj)],
            }
        }
        other => {
            return Err(KitError::SourceError {
                source_name: source.to_string(),
                message: format!("expected a JSON array or object, got {}", json_kind(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Object(obj) => records.push(Record::new(obj)),
            other => tracing::warn!("Skipping non-object entry ({})", json_kind(&other)),
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Some(other) => other.to_string(),
    }
}

fn clean_field(normalizer: &TextNormalizer, value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            normalizer
                .clean_each(items)
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        other => Value::String(normalizer.clean(other)),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: CleanupSettings> Pipeline for BenefitCleanupPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let payload = self.fetch_payload().await?;
        let records = records_from_payload(self.config.source(), payload)?;
        tracing::debug!("Extracted {} campaign records", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<Record>) -> Result<CleanupResult> {
        let normalizer = TextNormalizer::new(self.config.max_iterations());
        let fields = self.config.fields().to_vec();
        let mut records = Vec::with_capacity(data.len());
        let mut changed_records = 0;
        let mut changed_fields = 0;

        for mut record in data {
            let mut record_changed = false;

            for field in &fields {
                let cleaned = match record.data.get(field) {
                    None | Some(Value::Null) => continue,
                    Some(original) => {
                        let cleaned = clean_field(&normalizer, original);
                        if cleaned == *original {
                            continue;
                        }
                        cleaned
                    }
                };
                tracing::trace!("Cleaned field '{}' of record {:?}", field, record.id());
                record.data.insert(field.clone(), cleaned);
                changed_fields += 1;
                record_changed = true;
            }

            if record_changed {
                changed_records += 1;
            }
            records.push(record);
        }

        Ok(CleanupResult {
            records,
            fields,
            changed_records,
            changed_fields,
        })
    }

    async fn load(&self, result: CleanupResult) -> Result<Vec<String>> {
        let mut outputs = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    let path = self.output_file(CSV_FILENAME);
                    let data = self.render_csv(&result)?;
                    self.storage.write_file(&path, &data).await?;
                    outputs.push(path);
                }
                "json" => {
                    let path = self.output_file(JSON_FILENAME);
                    let data = serde_json::to_vec_pretty(&result.records)?;
                    self.storage.write_file(&path, &data).await?;
                    outputs.push(path);
                }
                other => {
                    return Err(KitError::InvalidConfigValueError {
                        field: "cleanup.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format. Valid formats: csv, json".to_string(),
                    })
                }
            }
        }

        let report = CleanupReport {
            total_records: result.records.len(),
            changed_records: result.changed_records,
            changed_fields: result.changed_fields,
            fields: result.fields.clone(),
            outputs: outputs.clone(),
            generated_at: chrono::Utc::now(),
        };
        let report_path = self.output_file(REPORT_FILENAME);
        self.storage
            .write_file(&report_path, &serde_json::to_vec_pretty(&report)?)
            .await?;
        outputs.push(report_path);

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &[u8]) {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                KitError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.put(path, data).await;
            Ok(())
        }
    }

    struct MockConfig {
        source: String,
        fields: Vec<String>,
        output_path: String,
        output_formats: Vec<String>,
    }

    impl MockConfig {
        fn new(source: String) -> Self {
            Self {
                source,
                fields: vec!["title".to_string(), "benefits".to_string()],
                output_path: "out".to_string(),
                output_formats: vec!["csv".to_string(), "json".to_string()],
            }
        }
    }

    impl CleanupSettings for MockConfig {
        fn source(&self) -> &str {
            &self.source
        }

        fn fields(&self) -> &[String] {
            &self.fields
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn max_iterations(&self) -> usize {
            10
        }
    }

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_extract_from_file_source() {
        let storage = MockStorage::default();
        storage
            .put("campaigns.json", br#"[{"id": 1, "title": "Water"}, 7]"#)
            .await;
        let pipeline =
            BenefitCleanupPipeline::new(storage, MockConfig::new("campaigns.json".to_string()));

        let records = pipeline.extract().await.unwrap();

        // 非物件的項目會被略過
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_extract_from_http_envelope() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/campaigns");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "success": true,
                    "data": [{"id": "a"}, {"id": "b"}]
                }));
        });

        let pipeline = BenefitCleanupPipeline::new(
            MockStorage::default(),
            MockConfig::new(server.url("/api/campaigns")),
        );

        let records = pipeline.extract().await.unwrap();

        api_mock.assert();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_extract_http_failure_is_source_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/api/campaigns");
            then.status(503);
        });

        let pipeline = BenefitCleanupPipeline::new(
            MockStorage::default(),
            MockConfig::new(server.url("/api/campaigns")),
        );

        let err = pipeline.extract().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, KitError::SourceError { .. }));
    }

    #[test]
    fn test_records_from_payload_shapes() {
        let single = records_from_payload("s", json!({"id": 3, "title": "x"})).unwrap();
        assert_eq!(single.len(), 1);

        let campaigns = records_from_payload("s", json!({"campaigns": [{"id": 1}]})).unwrap();
        assert_eq!(campaigns[0].id().as_deref(), Some("1"));

        let err = records_from_payload("s", json!("text")).unwrap_err();
        assert!(err.to_string().contains("string"));
    }

    #[tokio::test]
    async fn test_transform_cleans_configured_fields() {
        let pipeline = BenefitCleanupPipeline::new(
            MockStorage::default(),
            MockConfig::new("unused.json".to_string()),
        );
        let input = vec![
            record(json!({
                "id": 1,
                "title": "\"Clean Water\"",
                "benefits": ["[\"Helps kids (मुलांना मदत)\"]", "", "Books"],
                "description": "\"untouched\""
            })),
            record(json!({"id": 2, "title": "Already clean", "benefits": null})),
        ];

        let result = pipeline.transform(input).await.unwrap();

        assert_eq!(result.changed_records, 1);
        assert_eq!(result.changed_fields, 2);
        let first = &result.records[0].data;
        assert_eq!(first["title"], json!("Clean Water"));
        assert_eq!(first["benefits"], json!(["Helps kids (मुलांना मदत)", "Books"]));
        assert_eq!(first["description"], json!("\"untouched\""));
        assert_eq!(result.records[1].data["benefits"], Value::Null);
    }

    #[tokio::test]
    async fn test_load_writes_csv_json_and_report() {
        let storage = MockStorage::default();
        let pipeline =
            BenefitCleanupPipeline::new(storage.clone(), MockConfig::new("x.json".to_string()));
        let result = CleanupResult {
            records: vec![record(json!({
                "id": 9,
                "title": "School kits",
                "benefits": ["Books", "Uniforms"]
            }))],
            fields: vec!["title".to_string(), "benefits".to_string()],
            changed_records: 1,
            changed_fields: 2,
        };

        let outputs = pipeline.load(result).await.unwrap();

        assert_eq!(
            outputs,
            vec!["out/cleaned.csv", "out/cleaned.json", "out/report.json"]
        );

        let csv = String::from_utf8(storage.get_file("out/cleaned.csv").await.unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,title,benefits");
        assert_eq!(lines[1], "9,School kits,Books | Uniforms");

        let report: CleanupReport =
            serde_json::from_slice(&storage.get_file("out/report.json").await.unwrap()).unwrap();
        assert_eq!(report.total_records, 1);
        assert_eq!(report.changed_fields, 2);
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_format() {
        let mut config = MockConfig::new("x.json".to_string());
        config.output_formats = vec!["xml".to_string()];
        let pipeline = BenefitCleanupPipeline::new(MockStorage::default(), config);
        let result = CleanupResult {
            records: vec![],
            fields: vec![],
            changed_records: 0,
            changed_fields: 0,
        };

        let err = pipeline.load(result).await.unwrap_err();
        assert!(matches!(err, KitError::InvalidConfigValueError { .. }));
    }
}
