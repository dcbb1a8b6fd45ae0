use serde_json::Value;

use super::city_parameter;
use crate::tool::{string_arg, Tool, ToolResult};

pub const NAME: &str = "get_weather";

const NEW_YORK_REPORT: &str = "The weather in New York is sunny with a temperature of 25 degrees Celsius (77 degrees Fahrenheit).";

/// Retrieves the current weather report for a specified city.
pub fn get_weather(city: &str) -> ToolResult {
    if city.to_lowercase() == "new york" {
        ToolResult::success(NEW_YORK_REPORT)
    } else {
        ToolResult::error(format!(
            "Weather information for '{}' is not available.",
            city
        ))
    }
}

pub fn tool() -> Tool {
    Tool::new(
        NAME,
        "Retrieves the current weather report for a specified city.",
        city_parameter("The name of the city for which to retrieve the weather report."),
        |args: &Value| {
            let city = string_arg(args, "city")?;
            Ok(get_weather(city).to_value())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_supported_city() {
        let expected = ToolResult::success(
            "The weather in New York is sunny with a temperature of 25 degrees Celsius (77 degrees Fahrenheit).",
        );
        assert_eq!(get_weather("New York"), expected);
        assert_eq!(get_weather("NEW york"), expected);
    }

    #[test]
    fn test_unsupported_cities_name_the_city() {
        for city in ["Berlin", "Sao Paulo", "newyork"] {
            assert_eq!(
                get_weather(city),
                ToolResult::error(format!("Weather information for '{}' is not available.", city))
            );
        }
    }

    #[test]
    fn test_tool_invocation() {
        let tool = tool();

        let result = tool.call(&json!({"city": "new york"})).unwrap();
        assert_eq!(result["status"], "success");
        assert!(result.get("error_message").is_none());

        let err = tool.call(&json!({"city": 7})).unwrap_err();
        assert!(err.to_string().contains("city parameter required"));
    }
}
