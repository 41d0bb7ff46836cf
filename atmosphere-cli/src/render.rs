//! Terminal rendering of a [`ViewState`].
//!
//! Everything here is a pure function of its inputs so the output can be
//! asserted on directly.

use atmosphere_core::{ForecastSeries, Report, ViewState};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

const CHART_HEIGHT: usize = 8;
const COLUMN_WIDTH: usize = 3;
/// An x-axis label every this many points.
const LABEL_EVERY: usize = 4;
const AXIS_MARGIN: usize = 8;

/// Static values with no live data behind them.
pub mod placeholder {
    pub const HUMIDITY: &str = "64%";
    pub const UV_INDEX: &str = "Low";
    pub const SUNRISE: &str = "06:12 AM";
    pub const SUNSET: &str = "08:45 PM";
    pub const RAIN_CHANCE: &str = "12%";
}

/// Backdrop mood derived from the current phase and conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyTheme {
    Loading,
    NoData,
    ClearDay,
    CloudyDay,
    WetDay,
    Night,
}

impl SkyTheme {
    pub fn for_state(state: &ViewState) -> Self {
        match state {
            ViewState::Loading => SkyTheme::Loading,
            ViewState::Ready(report) => {
                let reading = &report.reading;
                match (reading.is_day, reading.weather_code) {
                    (false, _) => SkyTheme::Night,
                    (true, code) if code < 3 => SkyTheme::ClearDay,
                    (true, code) if code < 60 => SkyTheme::CloudyDay,
                    _ => SkyTheme::WetDay,
                }
            }
            ViewState::Idle | ViewState::Failed { .. } => SkyTheme::NoData,
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            SkyTheme::Loading => "· · ·",
            SkyTheme::NoData => "~ ~ ~",
            SkyTheme::ClearDay => "\u{2600} bright skies",
            SkyTheme::CloudyDay => "\u{2601} soft light",
            SkyTheme::WetDay => "\u{2614} grey skies",
            SkyTheme::Night => "\u{263e} night",
        }
    }
}

pub fn render_clock<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{}   {}", now.format("%H:%M:%S"), now.format("%A, %B %-d"))
}

/// Full dashboard: header, conditions, advice, chart, placeholder cards.
pub fn render_dashboard<Tz>(state: &ViewState, now: &DateTime<Tz>, retry_hint: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let theme = SkyTheme::for_state(state);

    let place = state
        .report()
        .and_then(|r| r.reading.location.city.as_deref())
        .unwrap_or("Searching...");

    let _ = writeln!(out, "{}", render_clock(now));
    let _ = writeln!(out, "{}   \u{1f4cd} {}", theme.banner(), place);
    let _ = writeln!(out);

    section(&mut out, "Current conditions", &render_conditions(state, retry_hint));
    section(&mut out, "AI Advisor", &render_advice(state));

    let chart = match state.report() {
        Some(report) if !report.forecast.is_empty() => render_chart(&report.forecast),
        _ => "Awaiting trajectory data...".to_string(),
    };
    section(&mut out, "Next 24 Hours", &chart);

    section(&mut out, "Details (placeholders, not live data)", &render_cards());

    out
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "── {title} ──");
    for line in body.lines() {
        let _ = writeln!(out, "  {line}");
    }
    let _ = writeln!(out);
}

pub fn render_conditions(state: &ViewState, retry_hint: &str) -> String {
    match state {
        ViewState::Idle => "Waiting for the first refresh...".to_string(),
        ViewState::Loading => "Calibrating instruments...".to_string(),
        ViewState::Failed { reason } => {
            format!("Weather Unavailable\n{reason}\n{retry_hint}")
        }
        ViewState::Ready(report) => render_reading(report),
    }
}

fn render_reading(report: &Report) -> String {
    let reading = &report.reading;
    let (label, icon) = reading
        .interpretation()
        .map(|i| (i.label, i.icon))
        .unwrap_or(("", ""));

    let headline = [format!("{}°C", reading.display_temperature()), icon.to_string(), label.to_string()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("  ");

    format!(
        "{headline}\nWind {} km/h · Humidity {}* · UV Index {}*\n* placeholder",
        reading.wind_speed_kmh,
        placeholder::HUMIDITY,
        placeholder::UV_INDEX,
    )
}

pub fn render_advice(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Thinking...".to_string(),
        ViewState::Ready(report) => format!("\"{}\"", report.advice),
        ViewState::Idle | ViewState::Failed { .. } => "No advice yet.".to_string(),
    }
}

/// Area chart, one column per forecast point, y-range padded by 2°C.
pub fn render_chart(series: &ForecastSeries) -> String {
    let temps = series.temperatures();
    if temps.is_empty() {
        return String::new();
    }

    let min = temps.iter().copied().fold(f64::INFINITY, f64::min) - 2.0;
    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 2.0;
    let step = (max - min) / CHART_HEIGHT as f64;

    let mut out = String::new();

    for row in (0..CHART_HEIGHT).rev() {
        let threshold = min + step * row as f64;
        let axis = match row {
            r if r == CHART_HEIGHT - 1 => format!("{max:>5.1}° │"),
            0 => format!("{min:>5.1}° │"),
            _ => format!("{:>width$}│", "", width = AXIS_MARGIN - 1),
        };
        out.push_str(&axis);
        for &t in temps {
            let cell = if t >= threshold { "\u{2588}" } else { " " };
            out.push_str(&cell.repeat(COLUMN_WIDTH));
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{:>width$}└{}",
        "",
        "─".repeat(temps.len() * COLUMN_WIDTH),
        width = AXIS_MARGIN - 1
    );

    let mut labels = " ".repeat(AXIS_MARGIN);
    for (i, label) in series.hour_labels().iter().enumerate() {
        if i % LABEL_EVERY == 0 {
            labels.push_str(&format!("{label:<width$}", width = COLUMN_WIDTH * LABEL_EVERY));
        }
    }
    out.push_str(labels.trim_end());
    out.push('\n');

    out
}

pub fn render_cards() -> String {
    format!(
        "Sunrise {}   Sunset {}   Rain Chance {}",
        placeholder::SUNRISE,
        placeholder::SUNSET,
        placeholder::RAIN_CHANCE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmosphere_core::model::{LocationLabel, WeatherReading};
    use chrono::Utc;

    fn report(code: i32, is_day: bool, hours: usize) -> Report {
        let times = (0..hours).map(|i| format!("2025-01-01T{:02}:00", i % 24)).collect();
        let temps = (0..hours).map(|i| 10.0 + (i as f64)).collect();
        Report {
            reading: WeatherReading {
                temperature_c: 18.5,
                wind_speed_kmh: 10.0,
                weather_code: code,
                is_day,
                observed_at: "2025-01-01T12:00".into(),
                location: LocationLabel::placeholder(),
            },
            forecast: ForecastSeries::from_hourly(times, temps),
            advice: "Take a stroll.".into(),
        }
    }

    fn ready(code: i32, is_day: bool) -> ViewState {
        ViewState::Ready(Box::new(report(code, is_day, 24)))
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 5).unwrap()
    }

    #[test]
    fn clock_shows_time_and_date() {
        assert_eq!(render_clock(&noon()), "12:00:05   Wednesday, January 1");
    }

    #[test]
    fn ready_conditions_show_rounded_temperature_and_label() {
        let text = render_conditions(&ready(2, true), "");
        assert!(text.starts_with("19°C"));
        assert!(text.contains("Partly cloudy"));
        assert!(text.contains("Wind 10 km/h"));
        assert!(text.contains("placeholder"));
    }

    #[test]
    fn unknown_code_renders_without_label() {
        let text = render_conditions(&ready(42, true), "");
        assert!(text.starts_with("19°C\n"));
    }

    #[test]
    fn failed_conditions_show_reason_and_retry() {
        let state = ViewState::Failed { reason: "Failed to fetch weather data".into() };
        let text = render_conditions(&state, "Press Enter to retry.");
        assert_eq!(
            text,
            "Weather Unavailable\nFailed to fetch weather data\nPress Enter to retry."
        );
    }

    #[test]
    fn loading_phase() {
        assert_eq!(render_conditions(&ViewState::Loading, ""), "Calibrating instruments...");
        assert_eq!(render_advice(&ViewState::Loading), "Thinking...");
        assert_eq!(SkyTheme::for_state(&ViewState::Loading), SkyTheme::Loading);
    }

    #[test]
    fn advice_is_quoted_when_ready() {
        assert_eq!(render_advice(&ready(0, true)), "\"Take a stroll.\"");
    }

    #[test]
    fn theme_follows_code_and_day_flag() {
        assert_eq!(SkyTheme::for_state(&ready(1, true)), SkyTheme::ClearDay);
        assert_eq!(SkyTheme::for_state(&ready(45, true)), SkyTheme::CloudyDay);
        assert_eq!(SkyTheme::for_state(&ready(63, true)), SkyTheme::WetDay);
        assert_eq!(SkyTheme::for_state(&ready(0, false)), SkyTheme::Night);
        assert_eq!(SkyTheme::for_state(&ViewState::Idle), SkyTheme::NoData);
    }

    #[test]
    fn chart_has_one_column_per_point() {
        let r = report(0, true, 24);
        let chart = render_chart(&r.forecast);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines.len(), CHART_HEIGHT + 2);
        for row in &lines[..CHART_HEIGHT] {
            let cells: String = row.chars().skip(AXIS_MARGIN).collect();
            assert_eq!(cells.chars().count(), 24 * COLUMN_WIDTH);
        }
        // Warmest point is last, so the top row is filled only at the right edge.
        assert!(lines[0].ends_with("\u{2588}"));
        assert!(lines[0].contains("35.0°"));
        assert!(lines[CHART_HEIGHT - 1].contains(" 8.0°"));
    }

    #[test]
    fn chart_labels_every_fourth_hour() {
        let r = report(0, true, 24);
        let chart = render_chart(&r.forecast);
        let labels = chart.lines().last().unwrap();

        for hour in ["0:00", "4:00", "8:00", "12:00", "16:00", "20:00"] {
            assert!(labels.contains(hour), "missing {hour} in {labels:?}");
        }
        assert!(!labels.contains("1:00 "));
    }

    #[test]
    fn short_series_chart() {
        let r = report(0, true, 10);
        let chart = render_chart(&r.forecast);
        let first = chart.lines().next().unwrap();
        assert_eq!(first.chars().skip(AXIS_MARGIN).count(), 10 * COLUMN_WIDTH);
    }

    #[test]
    fn dashboard_without_data_shows_waiting_chart() {
        let text = render_dashboard(&ViewState::Idle, &noon(), "");
        assert!(text.contains("Awaiting trajectory data..."));
        assert!(text.contains("Searching..."));
        assert!(text.contains("Sunrise 06:12 AM"));
    }

    #[test]
    fn dashboard_when_ready() {
        let text = render_dashboard(&ready(2, true), &noon(), "");
        assert!(text.contains("Current Location"));
        assert!(text.contains("\"Take a stroll.\""));
        assert!(text.contains("Next 24 Hours"));
        assert!(!text.contains("Awaiting trajectory data..."));
    }
}
