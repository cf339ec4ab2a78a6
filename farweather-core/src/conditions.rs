//! WMO weather-code interpretation.
//!
//! Maps the integer weather codes carried by forecast responses to display
//! attributes. Codes outside the table resolve to a placeholder, never an
//! error; forecast rendering must not fail on a code this table has not
//! heard of.

/// Display attributes for one WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub description: &'static str,
    pub icon: &'static str,
    /// Accent color as a hex string, for front-ends that use one.
    pub color: &'static str,
}

const fn cond(description: &'static str, icon: &'static str, color: &'static str) -> Condition {
    Condition { description, icon, color }
}

const UNKNOWN: Condition = cond("Unknown", "❓", "#808080");

/// Look up the condition for a WMO weather code.
///
/// Unknown codes fall back to the "Unknown" placeholder.
pub const fn condition_for(code: u8) -> Condition {
    match code {
        0 => cond("Clear sky", "☀️", "#FFD700"),
        1 => cond("Mainly clear", "🌤️", "#FFA500"),
        2 => cond("Partly cloudy", "⛅", "#87CEEB"),
        3 => cond("Overcast", "☁️", "#B0C4DE"),
        45 => cond("Fog", "🌫️", "#A9A9A9"),
        48 => cond("Depositing rime fog", "🌫️", "#A9A9A9"),
        51 => cond("Light drizzle", "🌦️", "#4682B4"),
        53 => cond("Moderate drizzle", "🌦️", "#4682B4"),
        55 => cond("Dense drizzle", "🌧️", "#4169E1"),
        56 => cond("Light freezing drizzle", "🌨️", "#6495ED"),
        57 => cond("Dense freezing drizzle", "🌨️", "#4169E1"),
        61 => cond("Slight rain", "🌦️", "#4682B4"),
        63 => cond("Moderate rain", "🌧️", "#4169E1"),
        65 => cond("Heavy rain", "🌧️", "#191970"),
        66 => cond("Light freezing rain", "🌨️", "#6495ED"),
        67 => cond("Heavy freezing rain", "🌨️", "#4169E1"),
        71 => cond("Slight snow", "🌨️", "#B0E0E6"),
        73 => cond("Moderate snow", "❄️", "#87CEFA"),
        75 => cond("Heavy snow", "❄️", "#6495ED"),
        77 => cond("Snow grains", "❄️", "#87CEFA"),
        80 => cond("Slight rain showers", "🌦️", "#4682B4"),
        81 => cond("Moderate rain showers", "🌧️", "#4169E1"),
        82 => cond("Violent rain showers", "⛈️", "#191970"),
        85 => cond("Slight snow showers", "🌨️", "#B0E0E6"),
        86 => cond("Heavy snow showers", "❄️", "#6495ED"),
        95 => cond("Thunderstorm", "⛈️", "#8A2BE2"),
        96 => cond("Thunderstorm with hail", "⛈️", "#4B0082"),
        99 => cond("Thunderstorm with heavy hail", "⛈️", "#4B0082"),
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(condition_for(0).description, "Clear sky");
        assert_eq!(condition_for(3).description, "Overcast");
        assert_eq!(condition_for(61).description, "Slight rain");
        assert_eq!(condition_for(95).description, "Thunderstorm");
        assert_eq!(condition_for(99).description, "Thunderstorm with heavy hail");
    }

    #[test]
    fn icons_match_family() {
        assert_eq!(condition_for(0).icon, "☀️");
        assert_eq!(condition_for(65).icon, "🌧️");
        assert_eq!(condition_for(73).icon, "❄️");
        assert_eq!(condition_for(96).icon, "⛈️");
    }

    #[test]
    fn unknown_codes_fall_back_to_placeholder() {
        for code in 0..=u8::MAX {
            let c = condition_for(code);
            // Every code resolves to something displayable.
            assert!(!c.description.is_empty());
            assert!(!c.icon.is_empty());
        }
        assert_eq!(condition_for(4).description, "Unknown");
        assert_eq!(condition_for(100).description, "Unknown");
        assert_eq!(condition_for(255).icon, "❓");
        assert_eq!(condition_for(255).color, "#808080");
    }
}
