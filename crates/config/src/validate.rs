//! Semantic checks on a loaded configuration.

use {secrecy::ExposeSecret, url::Url};

use crate::schema::NetpulseConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "missing", "invalid", "security"
    pub category: &'static str,
    /// Dotted path, e.g. "webex.room_name"
    pub path: &'static str,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.category, self.path, self.message
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: &'static str,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path,
            message: message.into(),
        });
    }
}

fn check_http_url(result: &mut ValidationResult, path: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {},
        Ok(url) => result.push(
            Severity::Error,
            "invalid",
            path,
            format!("expected an http(s) URL, got scheme `{}`", url.scheme()),
        ),
        Err(e) => result.push(
            Severity::Error,
            "invalid",
            path,
            format!("`{value}` is not a URL: {e}"),
        ),
    }
}

/// Validate everything the server needs before it starts.
pub fn validate(config: &NetpulseConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.webex.access_token.expose_secret().trim().is_empty() {
        result.push(
            Severity::Error,
            "missing",
            "webex.access_token",
            "a bot access token is required (set WEBEX_TEAMS_ACCESS_TOKEN)",
        );
    }
    if config.webex.room_name.trim().is_empty() {
        result.push(
            Severity::Warning,
            "missing",
            "webex.room_name",
            "no alert room configured; alerts will be skipped",
        );
    }
    check_http_url(&mut result, "webex.api_base_url", &config.webex.api_base_url);
    if let Some(public_url) = config.webex.public_url.as_deref() {
        check_http_url(&mut result, "webex.public_url", public_url);
    }

    check_http_url(&mut result, "controller.base_url", &config.controller.base_url);
    if config.controller.username.trim().is_empty() {
        result.push(
            Severity::Warning,
            "missing",
            "controller.username",
            "no controller username; device commands will fail",
        );
    }
    if !config.controller.verify_tls {
        result.push(
            Severity::Warning,
            "security",
            "controller.verify_tls",
            "TLS certificate verification is disabled for the controller",
        );
    }

    if let Err(e) = config.alerts.zone() {
        result.push(Severity::Error, "invalid", "alerts.timezone", e);
    }
    if config.upload.attempts == 0 {
        result.push(
            Severity::Error,
            "invalid",
            "upload.attempts",
            "at least one upload attempt is required",
        );
    }

    result
}
