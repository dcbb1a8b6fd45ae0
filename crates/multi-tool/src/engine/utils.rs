use std::io::{BufRead, Lines};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde_json::Value;

use crate::errors::EngineError;

pub const API_VERSION: &str = "v1beta1";

/// Platform calls block until the remote side answers.
pub const REQUEST_TIMEOUT: Option<Duration> = None;

pub fn http_client() -> Result<Client, EngineError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Pass successful responses through, turn anything else into a status error
/// carrying the response body.
pub fn check_status(response: Response) -> Result<Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(EngineError::Status { status, body })
}

/// Last path segment of a platform resource name.
pub fn short_id(resource_name: &str) -> &str {
    resource_name.rsplit('/').next().unwrap_or(resource_name)
}

/// Newline-delimited JSON events read off a streaming response body.
pub struct EventLines<R> {
    lines: Lines<R>,
}

impl<R: BufRead> EventLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for EventLines<R> {
    type Item = Result<Value, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Some(serde_json::from_str(line).map_err(EngineError::from));
        }
    }
}
