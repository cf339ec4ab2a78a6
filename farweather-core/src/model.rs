use serde::{Deserialize, Serialize};

/// A named place with geographic coordinates.
///
/// Exactly one location is "current" at a time; it is owned by the
/// [`WeatherApp`](crate::app::WeatherApp) coordinator and mirrored into the
/// persistence store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// State / region, e.g. "Île-de-France".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            country: None,
            admin1: None,
        }
    }

    /// Whether this location's coordinates are usable.
    pub fn has_valid_coordinates(&self) -> bool {
        validate_coordinates(self.latitude, self.longitude)
    }

    /// "Paris, Île-de-France, France" style label for menus and headers.
    pub fn display_label(&self) -> String {
        let mut label = self.name.clone();
        if let Some(admin1) = &self.admin1 {
            label.push_str(", ");
            label.push_str(admin1);
        }
        if let Some(country) = &self.country {
            label.push_str(", ");
            label.push_str(country);
        }
        label
    }
}

/// True when both values are finite and within standard lat/lon ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

/// One immutable forecast snapshot as returned by the forecast endpoint.
///
/// `hourly` and `daily` are parallel arrays: index `i` of every field array
/// describes the same instant as `time[i]`. A fresh fetch always produces a
/// wholly new snapshot; nothing here is mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherData {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub current: CurrentWeather,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

impl WeatherData {
    /// Check the parallel-array invariant across both series.
    pub fn alignment_ok(&self) -> bool {
        self.hourly.alignment_ok() && self.daily.alignment_ok()
    }
}

/// Point-in-time conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Local ISO-8601 time, e.g. "2026-08-05T14:00".
    pub time: String,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    /// 1 when the sun is up, 0 otherwise.
    pub is_day: u8,
    pub precipitation: f64,
    pub rain: f64,
    pub showers: f64,
    pub snowfall: f64,
    pub weather_code: u8,
    pub cloud_cover: f64,
    pub pressure_msl: f64,
    pub surface_pressure: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub wind_gusts_10m: f64,
}

/// Hour-resolution series for the full forecast window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub relative_humidity_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    #[serde(default)]
    pub precipitation_probability: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub rain: Vec<f64>,
    pub showers: Vec<f64>,
    pub snowfall: Vec<f64>,
    pub weather_code: Vec<u8>,
    pub pressure_msl: Vec<f64>,
    pub cloud_cover: Vec<f64>,
    #[serde(default)]
    pub visibility: Vec<f64>,
    pub wind_speed_10m: Vec<f64>,
    pub wind_direction_10m: Vec<f64>,
    pub wind_gusts_10m: Vec<f64>,
}

impl HourlySeries {
    /// All field arrays must be as long as `time`. Optional arrays
    /// (`precipitation_probability`, `visibility`) may also be empty.
    pub fn alignment_ok(&self) -> bool {
        let n = self.time.len();
        let optional_ok = |v: &Vec<f64>| v.is_empty() || v.len() == n;

        self.temperature_2m.len() == n
            && self.relative_humidity_2m.len() == n
            && self.apparent_temperature.len() == n
            && optional_ok(&self.precipitation_probability)
            && self.precipitation.len() == n
            && self.rain.len() == n
            && self.showers.len() == n
            && self.snowfall.len() == n
            && self.weather_code.len() == n
            && self.pressure_msl.len() == n
            && self.cloud_cover.len() == n
            && optional_ok(&self.visibility)
            && self.wind_speed_10m.len() == n
            && self.wind_direction_10m.len() == n
            && self.wind_gusts_10m.len() == n
    }
}

/// Day-resolution aggregates for the 7-day window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySeries {
    /// Local dates, e.g. "2026-08-05".
    pub time: Vec<String>,
    pub weather_code: Vec<u8>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub apparent_temperature_max: Vec<f64>,
    pub apparent_temperature_min: Vec<f64>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
    pub daylight_duration: Vec<f64>,
    pub sunshine_duration: Vec<f64>,
    pub uv_index_max: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
    pub rain_sum: Vec<f64>,
    pub showers_sum: Vec<f64>,
    pub snowfall_sum: Vec<f64>,
    pub precipitation_hours: Vec<f64>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<f64>,
    pub wind_speed_10m_max: Vec<f64>,
    pub wind_gusts_10m_max: Vec<f64>,
    pub wind_direction_10m_dominant: Vec<f64>,
}

impl DailySeries {
    pub fn alignment_ok(&self) -> bool {
        let n = self.time.len();
        let optional_ok = |v: &Vec<f64>| v.is_empty() || v.len() == n;

        self.weather_code.len() == n
            && self.temperature_2m_max.len() == n
            && self.temperature_2m_min.len() == n
            && self.apparent_temperature_max.len() == n
            && self.apparent_temperature_min.len() == n
            && self.sunrise.len() == n
            && self.sunset.len() == n
            && self.daylight_duration.len() == n
            && self.sunshine_duration.len() == n
            && self.uv_index_max.len() == n
            && self.precipitation_sum.len() == n
            && self.rain_sum.len() == n
            && self.showers_sum.len() == n
            && self.snowfall_sum.len() == n
            && self.precipitation_hours.len() == n
            && optional_ok(&self.precipitation_probability_max)
            && self.wind_speed_10m_max.len() == n
            && self.wind_gusts_10m_max.len() == n
            && self.wind_direction_10m_dominant.len() == n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_in_range_are_valid() {
        assert!(validate_coordinates(0.0, 0.0));
        assert!(validate_coordinates(90.0, 180.0));
        assert!(validate_coordinates(-90.0, -180.0));
        assert!(validate_coordinates(48.8566, 2.3522));
    }

    #[test]
    fn coordinates_out_of_range_are_invalid() {
        assert!(!validate_coordinates(90.1, 0.0));
        assert!(!validate_coordinates(-90.1, 0.0));
        assert!(!validate_coordinates(0.0, 180.1));
        assert!(!validate_coordinates(0.0, -180.1));
    }

    #[test]
    fn non_finite_coordinates_are_invalid() {
        assert!(!validate_coordinates(f64::NAN, 0.0));
        assert!(!validate_coordinates(0.0, f64::NAN));
        assert!(!validate_coordinates(f64::INFINITY, 0.0));
        assert!(!validate_coordinates(0.0, f64::NEG_INFINITY));
    }

    #[test]
    fn display_label_includes_region_and_country() {
        let mut loc = Location::new("Paris", 48.8566, 2.3522);
        assert_eq!(loc.display_label(), "Paris");

        loc.admin1 = Some("Île-de-France".to_string());
        loc.country = Some("France".to_string());
        assert_eq!(loc.display_label(), "Paris, Île-de-France, France");
    }

    #[test]
    fn location_persisted_shape_is_stable() {
        let loc = Location {
            name: "Paris".to_string(),
            latitude: 48.8566,
            longitude: 2.3522,
            country: Some("France".to_string()),
            admin1: None,
        };

        let json = serde_json::to_value(&loc).expect("serialize");
        assert_eq!(json["name"], "Paris");
        assert_eq!(json["country"], "France");
        // Absent optionals are omitted, not null.
        assert!(json.get("admin1").is_none());

        let back: Location = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, loc);
    }

    #[test]
    fn hourly_alignment_detects_ragged_arrays() {
        let mut hourly = HourlySeries {
            time: vec!["2026-08-05T00:00".into(), "2026-08-05T01:00".into()],
            temperature_2m: vec![18.0, 17.5],
            relative_humidity_2m: vec![60.0, 62.0],
            apparent_temperature: vec![17.0, 16.5],
            precipitation_probability: vec![],
            precipitation: vec![0.0, 0.0],
            rain: vec![0.0, 0.0],
            showers: vec![0.0, 0.0],
            snowfall: vec![0.0, 0.0],
            weather_code: vec![0, 1],
            pressure_msl: vec![1013.0, 1013.2],
            cloud_cover: vec![10.0, 20.0],
            visibility: vec![],
            wind_speed_10m: vec![5.0, 6.0],
            wind_direction_10m: vec![90.0, 95.0],
            wind_gusts_10m: vec![9.0, 11.0],
        };
        assert!(hourly.alignment_ok());

        hourly.temperature_2m.pop();
        assert!(!hourly.alignment_ok());
    }

    #[test]
    fn daily_alignment_allows_missing_probability() {
        let daily = DailySeries {
            time: vec!["2026-08-05".into()],
            weather_code: vec![61],
            temperature_2m_max: vec![22.0],
            temperature_2m_min: vec![14.0],
            apparent_temperature_max: vec![21.0],
            apparent_temperature_min: vec![13.0],
            sunrise: vec!["2026-08-05T06:24".into()],
            sunset: vec!["2026-08-05T21:09".into()],
            daylight_duration: vec![53100.0],
            sunshine_duration: vec![32000.0],
            uv_index_max: vec![6.1],
            precipitation_sum: vec![2.4],
            rain_sum: vec![2.4],
            showers_sum: vec![0.0],
            snowfall_sum: vec![0.0],
            precipitation_hours: vec![3.0],
            precipitation_probability_max: vec![],
            wind_speed_10m_max: vec![19.0],
            wind_gusts_10m_max: vec![38.0],
            wind_direction_10m_dominant: vec![240.0],
        };
        assert!(daily.alignment_ok());
    }
}
