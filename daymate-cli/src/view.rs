//! Text rendering of a [`DashboardState`].
//!
//! Rendering never fails on missing data: absent values print a placeholder
//! and empty forecast/news lists print the bundled sample entries.

use daymate_core::{
    DailyEntry, DashboardState, HourlyEntry, NewsItem, WeatherSnapshot,
    clock::{format_date, format_time},
    mock,
};
use std::fmt;

const PLACEHOLDER: &str = "—";
const RULE: &str = "────────────────────────────────────────────────────────────";

/// Whole dashboard: sidebar, main panel, news.
pub struct DashboardView<'a> {
    state: &'a DashboardState,
}

impl<'a> DashboardView<'a> {
    pub fn new(state: &'a DashboardState) -> Self {
        Self { state }
    }

    fn sidebar(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        let current = state.display.current.as_ref();

        writeln!(f, "Map Preview")?;
        writeln!(f, "  {}", state.map_preview_url)?;
        writeln!(f)?;
        writeln!(f, "📍 Location ✏️")?;
        writeln!(f, "  {}", state.location)?;
        writeln!(f)?;
        writeln!(f, "⏰ Date & Time")?;
        writeln!(f, "  {}  {}", format_time(&state.now), format_date(&state.now))?;
        writeln!(f)?;
        writeln!(f, "☁️ Current Weather")?;
        writeln!(
            f,
            "  [{}] {}  {}",
            icon(current),
            number_or(current.and_then(|c| c.temp), "0"),
            text_or(current.and_then(|c| c.condition.as_deref())),
        )?;
        writeln!(
            f,
            "  Air Quality: {}   Wind: {}   Humidity: {}",
            number_or(current.and_then(|c| c.aqi).or(state.display.aqi), PLACEHOLDER),
            number_or(current.and_then(|c| c.wind), PLACEHOLDER),
            number_or(current.and_then(|c| c.humidity), PLACEHOLDER),
        )
    }

    fn main_panel(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display = &self.state.display;

        writeln!(f, "AI Recommendation · Your Smart Day Plan")?;
        writeln!(f, "  {}", display.recommendation)?;
        writeln!(f)?;

        writeln!(f, "☁️ Next 12 Hours")?;
        let sample_hourly;
        let hourly: &[HourlyEntry] = if display.hourly.is_empty() {
            sample_hourly = mock::hourly();
            &sample_hourly
        } else {
            &display.hourly
        };
        for hour in hourly {
            writeln!(
                f,
                "  {:<8} {:>5}  {}",
                hour.time,
                number_or(hour.temp, ""),
                hour.condition
            )?;
        }
        writeln!(f)?;

        writeln!(f, "📅 Next 7 Days Weather Forecast")?;
        let sample_daily;
        let daily: &[DailyEntry] = if display.daily.is_empty() {
            sample_daily = mock::daily7();
            &sample_daily
        } else {
            &display.daily
        };
        for day in daily {
            writeln!(
                f,
                "  {:<4} {:<7} {:>5} / {:<5} {}",
                day.day,
                day.date,
                number_or(day.high, ""),
                number_or(day.low, ""),
                day.condition
            )?;
        }
        Ok(())
    }

    fn news(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📰 Local News")?;

        let sample;
        let news: &[NewsItem] = if self.state.display.news.is_empty() {
            sample = mock::news();
            &sample
        } else {
            &self.state.display.news
        };

        for item in news {
            writeln!(f, "  • {}", item.title)?;
            writeln!(f, "    {}  {}  {}", item.source, item.date, item.url)?;
        }
        Ok(())
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "☀ DayMate")?;
        writeln!(f, "{RULE}")?;
        self.sidebar(f)?;
        writeln!(f, "{RULE}")?;
        self.main_panel(f)?;
        writeln!(f, "{RULE}")?;
        self.news(f)?;
        if self.state.loading {
            writeln!(f, "{RULE}")?;
            writeln!(f, "Loading..")?;
        }
        Ok(())
    }
}

fn icon(current: Option<&WeatherSnapshot>) -> &str {
    current.and_then(|c| c.icon.as_deref()).filter(|i| !i.is_empty()).unwrap_or("clear")
}

fn text_or(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(PLACEHOLDER)
}

/// Zero and missing values both print `fallback`.
fn number_or(value: Option<f64>, fallback: &str) -> String {
    match value {
        Some(v) if v != 0.0 && !v.is_nan() => {
            if v.fract() == 0.0 { format!("{v:.0}") } else { format!("{v}") }
        }
        _ => fallback.to_string(),
    }
}
