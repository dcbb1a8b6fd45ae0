use std::process::Command;

use crate::errors::AuthError;

/// Resolve the bearer token used for platform requests.
///
/// An explicitly configured token wins; otherwise the active gcloud
/// credentials are asked for one.
pub fn access_token(configured: Option<&str>) -> Result<String, AuthError> {
    if let Some(token) = configured {
        return Ok(token.to_string());
    }

    tracing::debug!("requesting access token from gcloud");
    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()?;

    if !output.status.success() {
        return Err(AuthError::Command(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
