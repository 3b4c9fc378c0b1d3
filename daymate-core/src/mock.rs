//! Bundled placeholder data, used when the endpoint fails or omits a field.

use crate::model::{DailyEntry, HourlyEntry, NewsItem, WeatherSnapshot};

pub fn current() -> WeatherSnapshot {
    WeatherSnapshot {
        temp: Some(24.0),
        condition: Some("Rainy".to_string()),
        icon: Some("rain".to_string()),
        humidity: Some(65.0),
        wind: Some(12.0),
        aqi: None,
    }
}

pub fn hourly() -> Vec<HourlyEntry> {
    [
        ("2 PM", 24.0, "Rain"),
        ("3 PM", 23.0, "Rain"),
        ("4 PM", 22.0, "Cloudy"),
        ("5 PM", 21.0, "Cloudy"),
        ("6 PM", 20.0, "Clear"),
        ("7 PM", 19.0, "Clear"),
    ]
    .into_iter()
    .map(|(time, temp, condition)| HourlyEntry {
        time: time.to_string(),
        temp: Some(temp),
        condition: condition.to_string(),
    })
    .collect()
}

pub fn daily7() -> Vec<DailyEntry> {
    [
        ("Thu", "Nov 27", 25.0, 17.0, "Rain"),
        ("Fri", "Nov 28", 23.0, 16.0, "Cloudy"),
        ("Sat", "Nov 29", 22.0, 15.0, "Cloudy"),
        ("Sun", "Nov 30", 24.0, 16.0, "Sunny"),
        ("Mon", "Dec 1", 26.0, 18.0, "Sunny"),
        ("Tue", "Dec 2", 24.0, 17.0, "Partly Cloudy"),
        ("Wed", "Dec 3", 22.0, 15.0, "Rain"),
    ]
    .into_iter()
    .map(|(day, date, high, low, condition)| DailyEntry {
        day: day.to_string(),
        date: date.to_string(),
        high: Some(high),
        low: Some(low),
        condition: condition.to_string(),
        icon: String::new(),
    })
    .collect()
}

/// There is no bundled air-quality value.
pub fn aqi() -> Option<f64> {
    None
}

pub fn news() -> Vec<NewsItem> {
    vec![NewsItem::default()]
}
