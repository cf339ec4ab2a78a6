//! Interactive shell.
//!
//! One loop over the navigation state machine: each iteration renders the
//! active screen, asks for the next action, and feeds the resulting event
//! back into the coordinator.

use anyhow::Result;
use chrono::Local;
use inquire::{Confirm, Select, Text};

use farweather_core::api::alerts::{RainAlertPreferences, RainIntensity};
use farweather_core::app::WeatherApp;
use farweather_core::model::Location;
use farweather_core::search::SearchState;
use farweather_core::state::{NavigationState, PermissionState};

use crate::view;

const ADVANCE_CHOICES: [(u32, &str); 7] = [
    (15, "15 minutes"),
    (30, "30 minutes"),
    (60, "1 hour"),
    (120, "2 hours"),
    (180, "3 hours"),
    (360, "6 hours"),
    (720, "12 hours"),
];

pub struct Shell {
    app: WeatherApp,
}

impl Shell {
    pub fn new(app: WeatherApp) -> Self {
        Self { app }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            let quit = match self.app.navigation() {
                NavigationState::Home => self.home_screen().await?,
                NavigationState::CurrentLocation => self.current_location_screen().await?,
                NavigationState::SearchLocation => self.search_screen().await?,
                NavigationState::WeatherView => self.weather_screen().await?,
            };
            if quit {
                return Ok(());
            }
        }
    }

    async fn home_screen(&mut self) -> Result<bool> {
        const USE_PROFILE: &str = "Use my profile location";
        const SEARCH: &str = "Search for a city";
        const QUIT: &str = "Quit";

        let choice = Select::new(
            "Where would you like the forecast for?",
            vec![USE_PROFILE, SEARCH, QUIT],
        )
        .prompt_skippable()?;

        match choice {
            Some(USE_PROFILE) => {
                println!("Looking up your profile location...");
                if let Err(e) = self.app.request_current_location().await {
                    println!("{e}");
                }
                Ok(false)
            }
            Some(SEARCH) => {
                self.app.start_search();
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    async fn current_location_screen(&mut self) -> Result<bool> {
        const RETRY: &str = "Try again";
        const SEARCH_INSTEAD: &str = "Search for a city instead";
        const BACK: &str = "Back";

        let options = match self.app.permission() {
            PermissionState::Denied => {
                println!("You can add a location in your profile settings, or search manually.");
                vec![SEARCH_INSTEAD, BACK]
            }
            PermissionState::Error => vec![RETRY, SEARCH_INSTEAD, BACK],
            // Success and not-yet-requested never stay on this screen.
            _ => {
                self.app.go_home();
                return Ok(false);
            }
        };

        match Select::new("What next?", options).prompt_skippable()? {
            Some(RETRY) => {
                println!("Looking up your profile location...");
                if let Err(e) = self.app.retry_current_location().await {
                    println!("{e}");
                }
            }
            Some(SEARCH_INSTEAD) => self.app.start_search(),
            _ => self.app.go_home(),
        }
        Ok(false)
    }

    async fn search_screen(&mut self) -> Result<bool> {
        let Some(query) = Text::new("City name:").prompt_skippable()? else {
            self.app.go_home();
            return Ok(false);
        };

        if query.trim().chars().count() < 2 {
            println!("Type at least two characters.");
            return Ok(false);
        }

        self.app.set_search_query(&query);
        let results = match self.settled_search().await {
            SearchState::Ready { results, .. } => results,
            SearchState::Failed { message, .. } => {
                println!("{message}");
                return Ok(false);
            }
            _ => return Ok(false),
        };

        if results.is_empty() {
            println!("No places found for '{}'.", query.trim());
            return Ok(false);
        }

        const SEARCH_AGAIN: &str = "Search again";
        const BACK: &str = "Back";
        let mut options: Vec<String> = results.iter().map(Location::display_label).collect();
        options.push(SEARCH_AGAIN.to_string());
        options.push(BACK.to_string());

        let Some(choice) = Select::new("Pick a place:", options).raw_prompt_skippable()? else {
            self.app.go_home();
            return Ok(false);
        };

        if let Some(location) = results.get(choice.index) {
            self.app.select_location(location.clone());
        } else if choice.value == BACK {
            self.app.go_home();
        }
        // "Search again" simply stays on this screen.
        Ok(false)
    }

    async fn settled_search(&self) -> SearchState {
        let mut rx = self.app.search_updates();
        loop {
            let state = rx.borrow_and_update().clone();
            match state {
                SearchState::Pending { .. } => {
                    if rx.changed().await.is_err() {
                        return SearchState::Idle;
                    }
                }
                other => return other,
            }
        }
    }

    async fn weather_screen(&mut self) -> Result<bool> {
        let Some(location) = self.app.location().cloned() else {
            self.app.clear_location();
            return Ok(false);
        };

        println!("Fetching forecast for {}...", location.name);
        match self.app.weather().await {
            Ok(data) => {
                let now = Local::now().naive_local();
                println!("{}", view::render_weather(&location, &data, now));
            }
            Err(e) => {
                println!("{e}");
                const RETRY: &str = "Try again";
                const CLEAR: &str = "Clear location";
                const QUIT: &str = "Quit";
                return match Select::new("What next?", vec![RETRY, CLEAR, QUIT])
                    .prompt_skippable()?
                {
                    Some(RETRY) => Ok(false),
                    Some(CLEAR) => {
                        self.app.clear_location();
                        Ok(false)
                    }
                    _ => Ok(true),
                };
            }
        }

        const REFRESH: &str = "Refresh forecast";
        const ALERTS: &str = "Rain alerts";
        const CLEAR: &str = "Clear location";
        const QUIT: &str = "Quit";

        match Select::new("What next?", vec![REFRESH, ALERTS, CLEAR, QUIT]).prompt_skippable()? {
            Some(REFRESH) => {
                if let Err(e) = self.app.refresh_weather().await {
                    println!("{e}");
                }
                Ok(false)
            }
            Some(ALERTS) => {
                self.alerts_screen(&location).await?;
                Ok(false)
            }
            Some(CLEAR) => {
                self.app.clear_location();
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    async fn alerts_screen(&mut self, location: &Location) -> Result<()> {
        println!("Rain alerts for {}", location.display_label());

        let mut prefs = match self.app.alert_preferences().await {
            Ok(prefs) => prefs,
            Err(e) => {
                println!("{e}");
                RainAlertPreferences::default()
            }
        };

        let Some(enabled) = Confirm::new("Enable rain alerts?")
            .with_default(prefs.enabled)
            .prompt_skippable()?
        else {
            return Ok(());
        };
        prefs.enabled = enabled;

        if prefs.enabled {
            self.edit_alert_rules(&mut prefs)?;
        }

        const SAVE: &str = "Save settings";
        const CANCEL: &str = "Cancel";
        match Select::new("What next?", vec![SAVE, CANCEL]).prompt_skippable()? {
            Some(SAVE) => {
                match self.app.save_alert_preferences(&prefs).await {
                    Ok(()) => println!("Settings saved."),
                    Err(e) => {
                        println!("{e}");
                        return Ok(());
                    }
                }
                if prefs.enabled {
                    let send_test = Confirm::new("Send a test alert now?")
                        .with_default(false)
                        .prompt_skippable()?
                        .unwrap_or(false);
                    if send_test {
                        match self.app.send_test_alert().await {
                            Ok(()) => println!("Test alert sent. Check your direct messages."),
                            Err(e) => println!("{e}"),
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn edit_alert_rules(&self, prefs: &mut RainAlertPreferences) -> Result<()> {
        let advance_labels: Vec<&str> = ADVANCE_CHOICES.iter().map(|(_, label)| *label).collect();
        let advance_cursor = ADVANCE_CHOICES
            .iter()
            .position(|(minutes, _)| *minutes == prefs.preferences.advance_time)
            .unwrap_or(2);
        if let Some(choice) = Select::new("Alert me this long before rain:", advance_labels)
            .with_starting_cursor(advance_cursor)
            .raw_prompt_skippable()?
        {
            prefs.preferences.advance_time = ADVANCE_CHOICES[choice.index].0;
        }

        let intensities = [RainIntensity::Light, RainIntensity::Moderate, RainIntensity::Heavy];
        let intensity_labels: Vec<String> = intensities
            .iter()
            .map(|i| format!("{}: {}", i.label(), i.description()))
            .collect();
        let intensity_cursor = intensities
            .iter()
            .position(|i| *i == prefs.preferences.minimum_intensity)
            .unwrap_or(0);
        if let Some(choice) = Select::new("Minimum rain intensity:", intensity_labels)
            .with_starting_cursor(intensity_cursor)
            .raw_prompt_skippable()?
        {
            prefs.preferences.minimum_intensity = intensities[choice.index];
        }

        let hour_labels: Vec<String> = (0u8..24).map(view::format_hour_12).collect();
        if let Some(choice) = Select::new("Active from:", hour_labels.clone())
            .with_starting_cursor(usize::from(prefs.preferences.time_window.start_hour))
            .raw_prompt_skippable()?
        {
            prefs.preferences.time_window.start_hour = choice.index as u8;
        }
        if let Some(choice) = Select::new("Active until:", hour_labels)
            .with_starting_cursor(usize::from(prefs.preferences.time_window.end_hour))
            .raw_prompt_skippable()?
        {
            prefs.preferences.time_window.end_hour = choice.index as u8;
        }

        let max_labels: Vec<String> = (1..=10)
            .map(|n| {
                if n == 1 {
                    "1 alert".to_string()
                } else {
                    format!("{n} alerts")
                }
            })
            .collect();
        let max_cursor = usize::from(prefs.preferences.max_alerts_per_day.clamp(1, 10)) - 1;
        if let Some(choice) = Select::new("Maximum alerts per day:", max_labels)
            .with_starting_cursor(max_cursor)
            .raw_prompt_skippable()?
        {
            prefs.preferences.max_alerts_per_day = choice.index as u8 + 1;
        }

        Ok(())
    }
}
