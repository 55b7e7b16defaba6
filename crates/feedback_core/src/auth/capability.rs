//! Caller capabilities and host-supplied caller context.

use std::collections::BTreeSet;

/// Capability granted to a caller by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Browse the entry list and open entry details.
    ManageFeedback,
}

impl Capability {
    /// Stable string id used in log records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageFeedback => "manage_feedback",
        }
    }
}

/// Profile of a logged-in caller, used to prefill the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Everything core knows about the caller of one request.
///
/// `session` is the host session token that anti-forgery tokens are bound to.
/// Anonymous visitors still carry a (possibly empty) session value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub session: String,
    pub capabilities: BTreeSet<Capability>,
    pub profile: Option<CallerProfile>,
}

impl CallerContext {
    /// Anonymous caller without capabilities.
    pub fn anonymous(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            ..Self::default()
        }
    }

    /// Caller holding the feedback administration capability.
    pub fn administrator(session: impl Into<String>) -> Self {
        Self::anonymous(session).with_capability(Capability::ManageFeedback)
    }

    /// Grants one more capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Attaches a logged-in profile.
    pub fn with_profile(mut self, profile: CallerProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Returns whether the caller holds `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
