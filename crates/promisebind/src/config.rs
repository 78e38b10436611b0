#![forbid(unsafe_code)]

//! Binder configuration.
//!
//! Defaults reproduce plain last-settled-wins binding with the standard
//! action names. [`BindConfig::from_env`] layers environment overrides on top;
//! the binders only see them when the result is passed to `with_config`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::BindError;

/// Environment variable selecting the [`StalePolicy`].
pub const STALE_POLICY_ENV: &str = "PROMISEBIND_STALE_POLICY";

/// What happens when an older binding settles after a newer one started on
/// the same container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StalePolicy {
    /// Every settlement writes; whichever settles last is what observers see.
    #[default]
    LastSettled,
    /// Only the most recently started binding may write its settlement.
    LatestBinding,
}

impl StalePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastSettled => "last-settled",
            Self::LatestBinding => "latest-binding",
        }
    }
}

impl fmt::Display for StalePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StalePolicy {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-settled" | "last_settled" => Ok(Self::LastSettled),
            "latest-binding" | "latest_binding" => Ok(Self::LatestBinding),
            _ => Err(BindError::Config {
                key: STALE_POLICY_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Settlement handler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    /// Action name for the synchronous pending write.
    pub pending_action: Cow<'static, str>,
    /// Action name for the fulfilment writes.
    pub fulfill_action: Cow<'static, str>,
    /// Action name for the rejection write.
    pub reject_action: Cow<'static, str>,
    /// Precedence between overlapping bindings on one container.
    pub stale_policy: StalePolicy,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            pending_action: Cow::Borrowed("pending-promise"),
            fulfill_action: Cow::Borrowed("fulfill-promise"),
            reject_action: Cow::Borrowed("reject-promise"),
            stale_policy: StalePolicy::LastSettled,
        }
    }
}

impl BindConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, BindError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, BindError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = get_env(STALE_POLICY_ENV).filter(|raw| !raw.trim().is_empty()) {
            config.stale_policy = raw.parse()?;
        }
        Ok(config)
    }

    /// Set the stale-settlement policy.
    #[must_use]
    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    /// Rename the three actions, e.g. to attribute writes to a store.
    #[must_use]
    pub fn with_action_names(
        mut self,
        pending: impl Into<Cow<'static, str>>,
        fulfill: impl Into<Cow<'static, str>>,
        reject: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.pending_action = pending.into();
        self.fulfill_action = fulfill.into();
        self.reject_action = reject.into();
        self
    }
}
