use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::Value;

use super::city_parameter;
use crate::tool::{string_arg, Tool, ToolResult};

pub const NAME: &str = "get_current_time";

/// Cities with known timezones, matched case-insensitively.
const SUPPORTED_CITIES: &[(&str, Tz)] = &[("new york", chrono_tz::America::New_York)];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z%z";

/// Returns the current time in a specified city.
pub fn get_current_time(city: &str) -> ToolResult {
    get_time_at(city, Utc::now())
}

/// Same as [`get_current_time`] for a fixed instant.
pub fn get_time_at(city: &str, now: DateTime<Utc>) -> ToolResult {
    let normalized = city.to_lowercase();
    let Some((_, tz)) = SUPPORTED_CITIES
        .iter()
        .find(|(name, _)| *name == normalized)
    else {
        return ToolResult::error(format!(
            "Sorry, I don't have timezone information for {}.",
            city
        ));
    };

    let local = now.with_timezone(tz);
    ToolResult::success(format!(
        "The current time in {} is {}",
        city,
        local.format(TIME_FORMAT)
    ))
}

pub fn tool() -> Tool {
    Tool::new(
        NAME,
        "Returns the current time in a specified city.",
        city_parameter("The name of the city for which to retrieve the current time."),
        |args: &Value| {
            let city = string_arg(args, "city")?;
            Ok(get_current_time(city).to_value())
        },
    )
}
