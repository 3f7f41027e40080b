use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 一筆從後端取回的活動資料，欄位內容由後端決定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

impl Record {
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// 記錄識別碼，依序嘗試 `id`、`_id`、`slug`
    pub fn id(&self) -> Option<String> {
        ["id", "_id", "slug"]
            .iter()
            .filter_map(|key| self.data.get(*key))
            .find_map(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}

#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub records: Vec<Record>,
    pub fields: Vec<String>,
    pub changed_records: usize,
    pub changed_fields: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub total_records: usize,
    pub changed_records: usize,
    pub changed_fields: usize,
    pub fields: Vec<String>,
    pub outputs: Vec<String>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// 一個已排程的畫格回呼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// 計數動畫對外可觀察的三個值
#[derive(Debug, Clone, PartialEq)]
pub struct CountUpState {
    pub display_value: String,
    pub raw_value: f64,
    pub is_animating: bool,
}
