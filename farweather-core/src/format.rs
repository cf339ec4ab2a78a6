//! Display formatting for weather values.
//!
//! Pure helpers shared by every front-end surface. Timestamp parsing fails
//! soft: a malformed time renders as the raw string rather than an error.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::model::WeatherData;

/// Rounded metric temperature, e.g. "18°C".
pub fn format_temperature(temp_c: f64) -> String {
    format!("{}°C", temp_c.round() as i64)
}

/// Rounded wind speed in km/h.
pub fn format_wind_speed(speed_kmh: f64) -> String {
    format!("{} km/h", speed_kmh.round() as i64)
}

/// Rounded wind speed in mph.
pub fn format_wind_speed_mph(speed_kmh: f64) -> String {
    format!("{} mph", (speed_kmh * 0.621_371).round() as i64)
}

/// 16-point compass direction for a bearing in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    const DIRECTIONS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let index = ((degrees / 22.5).round() as usize) % 16;
    DIRECTIONS[index]
}

pub fn format_pressure(pressure_hpa: f64) -> String {
    format!("{} hPa", pressure_hpa.round() as i64)
}

pub fn format_humidity(humidity_pct: f64) -> String {
    format!("{}%", humidity_pct.round() as i64)
}

pub fn format_precipitation(precip_mm: f64) -> String {
    format!("{precip_mm:.1} mm")
}

/// Meters below 1 km, otherwise kilometers with one decimal.
pub fn format_visibility(visibility_m: f64) -> String {
    if visibility_m >= 1000.0 {
        format!("{:.1} km", visibility_m / 1000.0)
    } else {
        format!("{} m", visibility_m.round() as i64)
    }
}

/// UV index with its qualitative band.
pub fn format_uv_index(uv: f64) -> String {
    let band = if uv <= 2.0 {
        "Low"
    } else if uv <= 5.0 {
        "Moderate"
    } else if uv <= 7.0 {
        "High"
    } else if uv <= 10.0 {
        "Very High"
    } else {
        "Extreme"
    };
    format!("{uv:.1} ({band})")
}

/// "HH:MM" label for an hourly timestamp such as "2026-08-05T14:00".
pub fn format_hourly_time(iso_time: &str) -> String {
    parse_local(iso_time).map_or_else(|| iso_time.to_string(), |dt| dt.format("%H:%M").to_string())
}

/// Sunrise/sunset share the hourly time shape.
pub fn format_sun_time(iso_time: &str) -> String {
    format_hourly_time(iso_time)
}

/// "Today" / "Tomorrow" / "Wed, Mar 5" label for a daily date.
///
/// `today` is passed in rather than read from the ambient clock so the label
/// is deterministic under test.
pub fn format_daily_date(iso_date: &str, today: NaiveDate) -> String {
    let Ok(date) = NaiveDate::parse_from_str(iso_date, "%Y-%m-%d") else {
        return iso_date.to_string();
    };

    if date == today {
        "Today".to_string()
    } else if date == today.succ_opt().unwrap_or(today) {
        "Tomorrow".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

/// Index of the entry matching `now`'s hour and day, or 0 when absent.
pub fn current_hour_index(hourly_times: &[String], now: NaiveDateTime) -> usize {
    hourly_times
        .iter()
        .position(|t| {
            parse_local(t)
                .is_some_and(|dt| dt.hour() == now.hour() && dt.ordinal() == now.ordinal())
        })
        .unwrap_or(0)
}

pub fn is_day_time(is_day: u8) -> bool {
    is_day == 1
}

/// "Feels 3° cooler" style delta between actual and apparent temperature.
pub fn feels_like_description(actual_c: f64, feels_like_c: f64) -> String {
    let diff = feels_like_c - actual_c;
    if diff.abs() < 2.0 {
        return "Similar to actual".to_string();
    }
    let rounded = diff.abs().round() as i64;
    if diff > 0.0 {
        format!("Feels {rounded}° warmer")
    } else {
        format!("Feels {rounded}° cooler")
    }
}

/// Qualitative air-quality band inferred from visibility in meters.
pub fn air_quality_from_visibility(visibility_m: f64) -> &'static str {
    if visibility_m >= 10_000.0 {
        "Excellent"
    } else if visibility_m >= 7_000.0 {
        "Good"
    } else if visibility_m >= 5_000.0 {
        "Fair"
    } else if visibility_m >= 3_000.0 {
        "Poor"
    } else {
        "Very Poor"
    }
}

/// One row of the hourly outlook.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    pub time: String,
    pub temperature_c: f64,
    pub weather_code: u8,
    pub precipitation_mm: f64,
    pub humidity_pct: f64,
}

/// The next `hours` hourly rows starting at the hour containing `now`.
///
/// Indices are bounds-checked throughout; ragged series yield defaults
/// instead of panicking.
pub fn hourly_outlook(data: &WeatherData, now: NaiveDateTime, hours: usize) -> Vec<HourlyEntry> {
    let hourly = &data.hourly;
    let start = current_hour_index(&hourly.time, now);

    hourly
        .time
        .iter()
        .enumerate()
        .skip(start)
        .take(hours)
        .map(|(i, time)| HourlyEntry {
            time: format_hourly_time(time),
            temperature_c: hourly.temperature_2m.get(i).copied().unwrap_or_default(),
            weather_code: hourly.weather_code.get(i).copied().unwrap_or_default(),
            precipitation_mm: hourly.precipitation.get(i).copied().unwrap_or_default(),
            humidity_pct: hourly
                .relative_humidity_2m
                .get(i)
                .copied()
                .unwrap_or_default(),
        })
        .collect()
}

/// One row of the daily outlook.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub date: String,
    pub weather_code: u8,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub precipitation_mm: f64,
    pub precipitation_probability_pct: f64,
    pub wind_speed_kmh: f64,
    pub sunrise: String,
    pub sunset: String,
}

/// The first `days` daily rows, labeled relative to `today`.
pub fn daily_outlook(data: &WeatherData, today: NaiveDate, days: usize) -> Vec<DailyEntry> {
    let daily = &data.daily;

    daily
        .time
        .iter()
        .enumerate()
        .take(days)
        .map(|(i, date)| DailyEntry {
            date: format_daily_date(date, today),
            weather_code: daily.weather_code.get(i).copied().unwrap_or_default(),
            max_temp_c: daily.temperature_2m_max.get(i).copied().unwrap_or_default(),
            min_temp_c: daily.temperature_2m_min.get(i).copied().unwrap_or_default(),
            precipitation_mm: daily.precipitation_sum.get(i).copied().unwrap_or_default(),
            precipitation_probability_pct: daily
                .precipitation_probability_max
                .get(i)
                .copied()
                .unwrap_or_default(),
            wind_speed_kmh: daily.wind_speed_10m_max.get(i).copied().unwrap_or_default(),
            sunrise: daily.sunrise.get(i).map_or_else(String::new, |s| format_sun_time(s)),
            sunset: daily.sunset.get(i).map_or_else(String::new, |s| format_sun_time(s)),
        })
        .collect()
}

fn parse_local(iso_time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(iso_time, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(iso_time, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
