//! Audit logging for security and compliance.
//!
//! Structured audit logging for security-relevant events such as
//! authentication, authorization, and data modifications.
//!
//! # Example
//! ```ignore
//! use axum_helpers::audit::{AuditEvent, AuditOutcome};
//!
//! // Log successful login
//! AuditEvent::new(
//!     Some("user123".to_string()),
//!     "user.login",
//!     None,
//!     AuditOutcome::Success
//! )
//! .with_ip(extract_ip_from_headers(&headers))
//! .with_user_agent(extract_user_agent(&headers))
//! .log();
//! ```

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of an audited action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// Action completed successfully
    Success,
    /// Action failed (e.g., validation error, system error)
    Failure,
    /// Action was denied (e.g., insufficient permissions)
    Denied,
}

/// Structured audit event for security and compliance logging.
///
/// Use the builder pattern to construct audit events with optional fields,
/// then call `.log()` to emit the event to the audit log.
#[derive(Debug, Serialize)]
pub struct AuditEvent {
    /// User who performed the action (if authenticated)
    pub user_id: Option<String>,
    /// Action performed (e.g., "user.login", "product.delete")
    pub action: String,
    /// Resource affected (e.g., "product:123", "order:456")
    pub resource: Option<String>,
    /// Outcome of the action
    pub outcome: AuditOutcome,
    /// Client IP address
    pub ip_address: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Timestamp when the event occurred
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    /// Additional details about the event (JSON)
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    /// Create a new audit event.
    ///
    /// # Arguments
    /// * `user_id` - User who performed the action (None for unauthenticated actions)
    /// * `action` - Action identifier (e.g., "user.login", "product.create")
    /// * `resource` - Resource identifier (e.g., "product:123")
    /// * `outcome` - Success, Failure, or Denied
    pub fn new(
        user_id: Option<String>,
        action: impl Into<String>,
        resource: Option<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            user_id,
            action: action.into(),
            resource,
            outcome,
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
            details: None,
        }
    }

    /// Add the client IP address to the audit event.
    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    /// Add the client user agent to the audit event.
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Attach structured details to the audit event.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit the event to the audit log.
    ///
    /// Events are written to the `audit` tracing target so they can be
    /// routed to a dedicated sink by subscriber configuration.
    pub fn log(self) {
        let payload = serde_json::to_string(&self)
            .unwrap_or_else(|e| format!("{{\"serialization_error\":\"{}\"}}", e));

        tracing::info!(
            target: "audit",
            action = %self.action,
            outcome = ?self.outcome,
            event = %payload,
            "audit event"
        );
    }
}

/// Extract the client IP from proxy headers.
///
/// Checks `X-Forwarded-For` (first hop) then `X-Real-IP`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|forwarded| forwarded.split(',').next())
        .map(|ip| ip.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|ip| ip.to_string())
        })
}

/// Extract the user agent string from headers.
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|ua| ua.to_string())
}
