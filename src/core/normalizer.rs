//! Collapses text that went through several layers of JSON encoding or
//! escaping (for example a benefit string stored as `"[\"Helps children\"]"`)
//! back into the single string a donor should see.

use serde_json::{Map, Value};

pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// 物件中代表文字內容的欄位，依序嘗試
const CANONICAL_FIELDS: [&str; 3] = ["text", "value", "content"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub passes: usize,
    /// false when the iteration cap stopped the loop
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextNormalizer {
    max_iterations: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

/// 使用預設上限清理任意值
pub fn clean_text(value: &Value) -> String {
    TextNormalizer::default().clean(value)
}

impl TextNormalizer {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn clean(&self, value: &Value) -> String {
        self.clean_with_report(value).text
    }

    /// An absent value cleans to the empty string.
    pub fn clean_optional(&self, value: Option<&Value>) -> String {
        value.map(|v| self.clean(v)).unwrap_or_default()
    }

    pub fn clean_str(&self, text: &str) -> String {
        self.run(text.to_string()).text
    }

    /// 逐一清理清單中的每個元素，並移除清理後為空的項目
    pub fn clean_each(&self, values: &[Value]) -> Vec<String> {
        values
            .iter()
            .map(|value| self.clean(value))
            .filter(|text| !text.is_empty())
            .collect()
    }

    pub fn clean_with_report(&self, value: &Value) -> Normalized {
        match primary_text(value) {
            Some(text) => self.run(text),
            None => Normalized {
                text: String::new(),
                passes: 0,
                converged: true,
            },
        }
    }

    fn run(&self, initial: String) -> Normalized {
        let mut current = initial;
        let mut passes = 0;

        while passes < self.max_iterations {
            let next = normalize_pass(&current);
            passes += 1;
            if next == current {
                return Normalized {
                    text: next,
                    passes,
                    converged: true,
                };
            }
            current = next;
        }

        tracing::warn!(
            "Text normalization stopped after {} passes without reaching a stable string",
            passes
        );
        Normalized {
            text: current.trim().to_string(),
            passes,
            converged: false,
        }
    }
}

/// 取出值所代表的「主要」文字；陣列只取第一個元素
fn primary_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(primary_text),
        Value::Object(map) => match canonical_field(map) {
            Some(field) => primary_text(field),
            None => Some(value.to_string()),
        },
    }
}

fn canonical_field(map: &Map<String, Value>) -> Option<&Value> {
    CANONICAL_FIELDS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn normalize_pass(input: &str) -> String {
    let trimmed = input.trim();

    // 一層 JSON 字串編碼：直接解碼
    if trimmed.starts_with('"') {
        if let Ok(decoded) = serde_json::from_str::<String>(trimmed) {
            return decoded.trim().to_string();
        }
    }

    // 先剝掉引號，讓被引號包住的陣列仍能以 JSON 解析
    let unquoted = strip_quote_wrappers(trimmed);
    if let Some(parsed) = parse_structured(unquoted) {
        return parsed;
    }

    let unwrapped = strip_wrappers(unquoted);
    let unescaped = unescape(unwrapped);
    let collapsed = collapse_whitespace(&unescaped);
    strip_stray_edges(&collapsed).to_string()
}

/// Parses text that looks like a JSON array or object and descends into its
/// primary item. Returns `None` when the text is not valid JSON.
fn parse_structured(text: &str) -> Option<String> {
    if !(text.starts_with('[') || text.starts_with('{')) {
        return None;
    }
    // 解析失敗時改走純文字清理
    let parsed = serde_json::from_str::<Value>(text).ok()?;
    Some(match &parsed {
        Value::Object(map) if canonical_field(map).is_none() => text.to_string(),
        _ => primary_text(&parsed)
            .map(|inner| inner.trim().to_string())
            .unwrap_or_default(),
    })
}

fn strip_quote_wrappers(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let bytes = current.as_bytes();
        if bytes.len() < 2 {
            return current;
        }
        match (bytes[0], bytes[bytes.len() - 1]) {
            (b'"', b'"') | (b'\'', b'\'') => {
                current = current[1..current.len() - 1].trim();
            }
            _ => return current,
        }
    }
}

fn strip_wrappers(text: &str) -> &str {
    let mut current = text.trim();
    loop {
        let bytes = current.as_bytes();
        if bytes.len() < 2 {
            return current;
        }
        match (bytes[0], bytes[bytes.len() - 1]) {
            (b'[', b']') | (b'"', b'"') | (b'\'', b'\'') => {
                current = current[1..current.len() - 1].trim();
            }
            _ => return current,
        }
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let replacement = match chars.peek() {
            Some('"') => Some('"'),
            Some('\'') => Some('\''),
            Some('\\') => Some('\\'),
            Some('n') => Some('\n'),
            Some('r') => Some('\r'),
            Some('t') => Some('\t'),
            _ => None,
        };
        match replacement {
            Some(r) => {
                chars.next();
                out.push(r);
            }
            None => out.push(c),
        }
    }

    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 移除頭尾殘留的反斜線、逗號，以及沒有配對的引號或括號
fn strip_stray_edges(text: &str) -> &str {
    let mut current = text;
    loop {
        let before = current.len();
        current = current.trim_matches(|c: char| c.is_whitespace() || c == ',' || c == '\\');

        if current.starts_with('"') && current.matches('"').count() % 2 == 1 {
            current = &current[1..];
        } else if current.starts_with(']')
            || (current.starts_with('[') && current.matches('[').count() > current.matches(']').count())
        {
            current = &current[1..];
        }

        if current.ends_with('"') && current.matches('"').count() % 2 == 1 {
            current = &current[..current.len() - 1];
        } else if current.ends_with('[')
            || (current.ends_with(']') && current.matches(']').count() > current.matches('[').count())
        {
            current = &current[..current.len() - 1];
        }

        if current.len() == before {
            return current;
        }
    }
}
