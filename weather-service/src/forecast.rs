use common::errors::AppError;
use common::models::CurrentConditions;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    main: MainReadings,
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

/// Parse an OpenWeatherMap "current weather" body. Unknown fields are ignored.
pub fn parse_conditions(body: &str) -> Result<CurrentConditions, AppError> {
    let response: OpenWeatherResponse = serde_json::from_str(body)?;

    let description = response
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| AppError::malformed("`weather` array is empty"))?;

    Ok(CurrentConditions {
        temp: response.main.temp,
        temp_min: response.main.temp_min,
        temp_max: response.main.temp_max,
        description,
    })
}

pub fn format_conditions(conditions: &CurrentConditions) -> String {
    format!(
        "Temperature: {}°C \n(Min: {}°C, Max: {}°C) \n{}",
        format_celsius(conditions.temp),
        format_celsius(conditions.temp_min),
        format_celsius(conditions.temp_max),
        conditions.description
    )
}

/// Round to two decimals on the exact binary value, ties to even.
pub fn round_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Rounded value in its shortest form, keeping at least one fractional digit.
pub fn format_celsius(value: f64) -> String {
    let rounded = round_hundredths(value);
    // -0.0 would otherwise print as "-0.0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        rounded.to_string()
    }
}
