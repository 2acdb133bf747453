use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// 1 ページあたりの取得件数 (固定)
pub const PAGE_SIZE: usize = 10;

/// 検索インデックスの並び順 (新しい順)
pub const SORT_BY_TIMESTAMP_DESC: &str = "timestamp:desc";

/// 検索サービスが付与する内部 ID のフィールド名
pub const SERVICE_ID_FIELD: &str = "_id";

/// `page` (1 始まり) の先頭ヒットのオフセット
pub fn page_offset(page: u32) -> usize {
    (page.saturating_sub(1) as usize) * PAGE_SIZE
}

/// 検索結果の 1 件
///
/// `id` 以外のフィールドは表示側が必要な分だけ読む (`title`, `image`, `timestamp`)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Builds a record from a raw search hit, renaming `_id` to `id`.
    ///
    /// `_id` wins over an `id` field already in the hit; a hit without `_id`
    /// keeps its own `id` field. Returns `None` when the
    /// hit is not an object or carries no usable identifier.
    pub fn from_hit(hit: Value) -> Option<Self> {
        let Value::Object(mut fields) = hit else {
            return None;
        };

        // `_id` が優先。残った `id` はシリアライズ時に重複キーになる
        let raw_id = match fields.remove(SERVICE_ID_FIELD) {
            Some(service_id) => {
                fields.remove("id");
                service_id
            }
            None => fields.remove("id")?,
        };
        let id = id_to_string(&raw_id)?;

        Some(Self { id, fields })
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn image(&self) -> Option<&str> {
        self.fields.get("image").and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.fields.get("timestamp").and_then(parse_timestamp)
    }

    /// Image width/height when the index stores them.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        let width = self.fields.get("image_width").and_then(Value::as_f64)?;
        let height = self.fields.get("image_height").and_then(Value::as_f64)?;
        if width > 0.0 && height > 0.0 {
            Some((width, height))
        } else {
            None
        }
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts unix seconds, unix milliseconds, RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(from_unix),
        Value::String(s) => {
            if let Ok(n) = s.parse::<i64>() {
                return from_unix(n);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        _ => None,
    }
}

fn from_unix(n: i64) -> Option<DateTime<Utc>> {
    // 13 桁ならミリ秒とみなす
    if n.abs() >= 1_000_000_000_000 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}

/// 1 回の検索で得られたページ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub records: Vec<Record>,
    /// Number of hits the service returned, including any dropped as unusable.
    pub hit_count: usize,
    pub has_more: bool,
}

impl ResultPage {
    pub fn from_hits(hits: Vec<Value>) -> Self {
        let hit_count = hits.len();
        let records = hits
            .into_iter()
            .filter_map(|hit| {
                let record = Record::from_hit(hit);
                if record.is_none() {
                    tracing::warn!("Dropping search hit without an identifier");
                }
                record
            })
            .collect();

        Self {
            records,
            hit_count,
            // 0 件、または 1 ページに満たない場合はそれ以上取得しない
            has_more: hit_count >= PAGE_SIZE,
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.hit_count == 0
    }
}

/// いいね状態 API の 1 要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    #[serde(deserialize_with = "deserialize_id")]
    pub solution_id: String,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_to_string(&value).ok_or_else(|| serde::de::Error::custom("solution_id must be a string or number"))
}

/// id -> liked のマップ。クエリのリセット以外では縮まない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LikeStatusMap(HashMap<String, bool>);

impl LikeStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union merge: ids in `statuses` are written, every other entry is kept.
    pub fn merge<I>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = LikeStatus>,
    {
        for status in statuses {
            self.0.insert(status.solution_id, status.is_liked);
        }
    }

    /// Missing ids count as not liked.
    pub fn is_liked(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn get(&self, id: &str) -> Option<bool> {
        self.0.get(id).copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
