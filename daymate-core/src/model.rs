use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::location::Location;

/// Current conditions. Every field may be missing on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temp: Option<f64>,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub humidity: Option<f64>,
    pub wind: Option<f64>,
    pub aqi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    #[serde(default)]
    pub time: String,
    pub temp: Option<f64>,
    #[serde(default)]
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub date: String,
    pub high: Option<f64>,
    pub low: Option<f64>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub icon: String,
}

impl WeatherSnapshot {
    /// `None` unless `value` is an object; inside it, a missing, null or
    /// mistyped field is just absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        Some(WeatherSnapshot {
            temp: number(value.get("temp")),
            condition: text(value.get("condition")),
            icon: text(value.get("icon")),
            humidity: number(value.get("humidity")),
            wind: number(value.get("wind")),
            aqi: number(value.get("aqi")),
        })
    }
}

impl HourlyEntry {
    pub fn from_json(entry: &Value) -> Self {
        HourlyEntry {
            time: text(entry.get("time")).unwrap_or_default(),
            temp: number(entry.get("temp")),
            condition: text(entry.get("condition")).unwrap_or_default(),
        }
    }
}

impl DailyEntry {
    pub fn from_json(entry: &Value) -> Self {
        DailyEntry {
            day: text(entry.get("day")).unwrap_or_default(),
            date: text(entry.get("date")).unwrap_or_default(),
            high: number(entry.get("high")),
            low: number(entry.get("low")),
            condition: text(entry.get("condition")).unwrap_or_default(),
            icon: text(entry.get("icon")).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub url: String,
    pub date: String,
    pub image: String,
    pub source: String,
    pub logo: String,
}

impl NewsItem {
    /// Project an arbitrary JSON entry; missing or falsy fields become `""`
    /// (`"#"` for the url).
    pub fn from_json(entry: &Value) -> Self {
        let or_empty = |key: &str| text(entry.get(key)).unwrap_or_default();

        NewsItem {
            title: or_empty("title"),
            url: text(entry.get("url")).unwrap_or_else(|| "#".to_string()),
            date: or_empty("date"),
            image: or_empty("image"),
            source: or_empty("source"),
            logo: or_empty("logo"),
        }
    }
}

/// Fields of a weather endpoint response after per-field projection.
///
/// `None` (or an empty `news`) means "use the fallback".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherPayload {
    pub current: Option<WeatherSnapshot>,
    pub hourly: Option<Vec<HourlyEntry>>,
    pub daily7: Option<Vec<DailyEntry>>,
    pub aqi: Option<f64>,
    pub recommendation: Option<String>,
    pub news: Vec<NewsItem>,
}

impl WeatherPayload {
    /// Never fails. A top-level field that is absent, falsy or of the wrong
    /// shape is dropped; entries inside a kept list are projected one by one.
    pub fn from_json(body: &Value) -> Self {
        let news = match body.get("news") {
            Some(Value::Array(items)) => items.iter().map(NewsItem::from_json).collect(),
            _ => Vec::new(),
        };

        WeatherPayload {
            current: truthy(body, "current").and_then(WeatherSnapshot::from_json),
            hourly: list(body, "hourly", HourlyEntry::from_json),
            daily7: list(body, "daily7", DailyEntry::from_json),
            aqi: truthy(body, "aqi").and_then(|v| number(Some(v))),
            recommendation: text(body.get("recommendation")),
            news,
        }
    }
}

/// Everything the dashboard shows that comes from a fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayData {
    pub current: Option<WeatherSnapshot>,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
    pub aqi: Option<f64>,
    pub recommendation: String,
    pub news: Vec<NewsItem>,
}

/// Snapshot published to views.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub location: Location,
    pub map_preview_url: String,
    pub now: DateTime<Local>,
    pub loading: bool,
    pub display: DisplayData,
}

impl DashboardState {
    pub fn new(location: Location, map_preview_url: String, now: DateTime<Local>) -> Self {
        Self { location, map_preview_url, now, loading: false, display: DisplayData::default() }
    }
}

/// Script-style truthiness: null, false, 0, NaN and "" are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| is_truthy(v))
}

fn list<T>(body: &Value, key: &str, project: fn(&Value) -> T) -> Option<Vec<T>> {
    match truthy(body, key)? {
        Value::Array(items) => Some(items.iter().map(project).collect()),
        other => {
            tracing::debug!(field = key, value = %other, "ignoring non-list field");
            None
        }
    }
}

/// Numbers, and strings that parse as one.
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value.filter(|v| is_truthy(v))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(_) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_json_semantics() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(42)));
        assert!(is_truthy(&json!("x")));
    }

    #[test]
    fn news_item_defaults_missing_fields() {
        let item = NewsItem::from_json(&json!({ "title": "Flood warning", "source": "Daily Star" }));

        assert_eq!(item.title, "Flood warning");
        assert_eq!(item.source, "Daily Star");
        assert_eq!(item.url, "#");
        assert_eq!(item.logo, "");
        assert_eq!(item.image, "");
        assert_eq!(item.date, "");
    }

    #[test]
    fn news_item_empty_url_becomes_hash() {
        let item = NewsItem::from_json(&json!({ "url": "" }));
        assert_eq!(item.url, "#");
    }

    #[test]
    fn payload_keeps_present_fields() {
        let body = json!({
            "current": { "temp": 31.5, "condition": "Sunny", "icon": "sun.png", "humidity": 40, "wind": 8 },
            "hourly": [{ "time": "1 PM", "temp": 31, "condition": "Sunny" }],
            "daily7": [{ "day": "Mon", "date": "Dec 1", "high": 33, "low": 24, "condition": "Sunny", "icon": "sun.png" }],
            "aqi": 57,
            "recommendation": "Carry water."
        });

        let payload = WeatherPayload::from_json(&body);

        let current = payload.current.expect("current");
        assert_eq!(current.temp, Some(31.5));
        assert_eq!(current.condition.as_deref(), Some("Sunny"));
        assert_eq!(current.aqi, None);
        assert_eq!(payload.hourly.expect("hourly")[0].time, "1 PM");
        assert_eq!(payload.daily7.expect("daily")[0].icon, "sun.png");
        assert_eq!(payload.aqi, Some(57.0));
        assert_eq!(payload.recommendation.as_deref(), Some("Carry water."));
        assert!(payload.news.is_empty());
    }

    #[test]
    fn payload_drops_falsy_and_misshapen_fields() {
        let body = json!({
            "current": null,
            "hourly": "not a list",
            "daily7": { "day": "Mon" },
            "aqi": 0,
            "recommendation": ""
        });

        let payload = WeatherPayload::from_json(&body);

        assert_eq!(payload, WeatherPayload::default());
    }

    #[test]
    fn bad_inner_values_keep_the_server_list() {
        let body = json!({
            "hourly": [
                { "time": "1 PM", "temp": 30, "condition": "Sunny" },
                { "time": "2 PM", "condition": null }
            ],
            "daily7": [{ "day": "Mon", "date": "Dec 1", "high": "hot", "low": 21, "icon": null }]
        });

        let payload = WeatherPayload::from_json(&body);

        let hourly = payload.hourly.expect("hourly");
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].time, "1 PM");
        assert_eq!(hourly[1], HourlyEntry { time: "2 PM".into(), ..HourlyEntry::default() });

        let daily = payload.daily7.expect("daily");
        assert_eq!(
            daily,
            vec![DailyEntry {
                day: "Mon".into(),
                date: "Dec 1".into(),
                high: None,
                low: Some(21.0),
                ..DailyEntry::default()
            }]
        );
    }

    #[test]
    fn snapshot_tolerates_mistyped_fields() {
        let current = WeatherSnapshot::from_json(&json!({
            "temp": 31,
            "humidity": "70",
            "wind": [],
            "condition": null,
            "icon": "sun.png"
        }))
        .expect("object");

        assert_eq!(current.temp, Some(31.0));
        assert_eq!(current.humidity, Some(70.0));
        assert_eq!(current.wind, None);
        assert_eq!(current.condition, None);
        assert_eq!(current.icon.as_deref(), Some("sun.png"));
        assert_eq!(WeatherSnapshot::from_json(&json!("sunny")), None);
    }

    #[test]
    fn payload_keeps_empty_arrays() {
        let payload = WeatherPayload::from_json(&json!({ "hourly": [], "daily7": [] }));

        assert_eq!(payload.hourly, Some(Vec::new()));
        assert_eq!(payload.daily7, Some(Vec::new()));
    }

    #[test]
    fn non_object_body_yields_empty_payload() {
        assert_eq!(WeatherPayload::from_json(&json!([1, 2, 3])), WeatherPayload::default());
    }
}
