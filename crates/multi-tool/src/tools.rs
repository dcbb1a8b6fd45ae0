pub mod retrieval;
pub mod time;
pub mod weather;

use std::collections::HashMap;

use serde_json::{json, Value};

/// Parameter table shared by the city lookup tools.
pub(crate) fn city_parameter(description: &str) -> HashMap<String, Value> {
    HashMap::from([(
        "city".to_string(),
        json!({
            "type": "string",
            "description": description,
        }),
    )])
}
