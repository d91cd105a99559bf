//! Request context carrying the acting user, trace id, and client address.

use chrono::{DateTime, Utc};

use taskflow_auth::Principal;
use taskflow_core::types::TraceId;
use taskflow_entity::user::User;

/// Context for the current operation.
///
/// Built by the caller and passed into every service method so that each
/// operation knows *who* is acting and which trace id its logs carry.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user, absent for anonymous and system calls.
    pub user: Option<User>,
    /// Correlation id for log lines of this operation.
    pub trace_id: TraceId,
    /// Address of the request origin.
    pub ip_address: Option<String>,
    /// When the operation started.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for an authenticated user.
    pub fn authenticated(user: User, ip_address: Option<String>) -> Self {
        Self {
            user: Some(user),
            trace_id: TraceId::generate(),
            ip_address,
            request_time: Utc::now(),
        }
    }

    /// Context without a user, e.g. an unauthenticated request.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            trace_id: TraceId::generate(),
            ip_address: None,
            request_time: Utc::now(),
        }
    }

    /// Context for background work such as the scheduled sweep.
    pub fn system() -> Self {
        Self::anonymous()
    }

    /// Acting username, `"system"` when there is no user.
    pub fn username(&self) -> &str {
        self.user.as_ref().map_or("system", |u| u.username.as_str())
    }

    /// Client address, `"unknown"` when not known.
    pub fn ip(&self) -> &str {
        self.ip_address.as_deref().unwrap_or("unknown")
    }

    /// Id of the acting user.
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().and_then(|u| u.id)
    }
}

impl Principal for RequestContext {
    fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
