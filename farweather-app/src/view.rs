//! Plain-text rendering of the forecast views.

use chrono::{NaiveDate, NaiveDateTime};

use farweather_core::conditions::condition_for;
use farweather_core::format::{
    daily_outlook, feels_like_description, format_humidity, format_precipitation, format_pressure,
    format_temperature, format_wind_speed, hourly_outlook, is_day_time, wind_direction,
};
use farweather_core::model::{Location, WeatherData};

const HOURLY_ROWS: usize = 12;
const DAILY_ROWS: usize = 7;

/// The full weather view: current conditions, the next hours, and the week.
pub fn render_weather(location: &Location, data: &WeatherData, now: NaiveDateTime) -> String {
    let mut out = String::new();

    render_current(&mut out, location, data);
    out.push('\n');
    render_hourly(&mut out, data, now);
    out.push('\n');
    render_daily(&mut out, data, now.date());

    out
}

fn render_current(out: &mut String, location: &Location, data: &WeatherData) {
    let current = &data.current;
    let condition = condition_for(current.weather_code);
    let day_night = if is_day_time(current.is_day) { "Day" } else { "Night" };

    out.push_str(&format!("  {}\n", location.display_label()));
    out.push_str(&format!(
        "  {} {}  {}  (feels like {})\n",
        condition.icon,
        condition.description,
        format_temperature(current.temperature_2m),
        format_temperature(current.apparent_temperature),
    ));
    out.push_str(&format!(
        "  {}\n",
        feels_like_description(current.temperature_2m, current.apparent_temperature)
    ));
    out.push_str(&format!(
        "  Humidity {}   Wind {} {}   Pressure {}\n",
        format_humidity(current.relative_humidity_2m),
        format_wind_speed(current.wind_speed_10m),
        wind_direction(current.wind_direction_10m),
        format_pressure(current.pressure_msl),
    ));
    out.push_str(&format!(
        "  Cloud cover {}   Precipitation {}   {}\n",
        format_humidity(current.cloud_cover),
        format_precipitation(current.precipitation),
        day_night,
    ));
}

fn render_hourly(out: &mut String, data: &WeatherData, now: NaiveDateTime) {
    out.push_str("  Next hours\n");
    for entry in hourly_outlook(data, now, HOURLY_ROWS) {
        let condition = condition_for(entry.weather_code);
        out.push_str(&format!(
            "  {:>5}  {} {:>5}  {:>7}  {:>4}\n",
            entry.time,
            condition.icon,
            format_temperature(entry.temperature_c),
            format_precipitation(entry.precipitation_mm),
            format_humidity(entry.humidity_pct),
        ));
    }
}

fn render_daily(out: &mut String, data: &WeatherData, today: NaiveDate) {
    out.push_str("  This week\n");
    for entry in daily_outlook(data, today, DAILY_ROWS) {
        let condition = condition_for(entry.weather_code);
        out.push_str(&format!(
            "  {:<12} {} {:>5} / {:>5}  {:>7} ({}%)  wind {}  {}-{}\n",
            entry.date,
            condition.icon,
            format_temperature(entry.max_temp_c),
            format_temperature(entry.min_temp_c),
            format_precipitation(entry.precipitation_mm),
            entry.precipitation_probability_pct.round() as i64,
            format_wind_speed(entry.wind_speed_kmh),
            entry.sunrise,
            entry.sunset,
        ));
    }
}

/// Compact single-line summary used by the one-shot `show` command header.
pub fn render_summary(data: &WeatherData) -> String {
    let current = &data.current;
    let condition = condition_for(current.weather_code);
    format!(
        "{} {}, {}, humidity {}, wind {}",
        condition.icon,
        condition.description,
        format_temperature(current.temperature_2m),
        format_humidity(current.relative_humidity_2m),
        format_wind_speed(current.wind_speed_10m),
    )
}

/// "6:00 AM" style label for the alert time-window pickers.
pub fn format_hour_12(hour: u8) -> String {
    match hour {
        0 => "12:00 AM".to_string(),
        1..=11 => format!("{hour}:00 AM"),
        12 => "12:00 PM".to_string(),
        _ => format!("{}:00 PM", hour - 12),
    }
}
