//! Process-wide outbound network policy for generation providers.

use std::sync::{Mutex, OnceLock};

pub const POLICY_ENV: &str = "APPRAISE_NETWORK_POLICY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkPolicy {
    Allow,
    Deny(String),
}

fn state() -> &'static Mutex<NetworkPolicy> {
    static STATE: OnceLock<Mutex<NetworkPolicy>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(NetworkPolicy::Allow))
}

fn current() -> NetworkPolicy {
    match state().lock() {
        Ok(policy) => policy.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Scoped override; the previous policy is restored on drop.
pub struct NetworkPolicyGuard {
    previous: NetworkPolicy,
}

impl NetworkPolicyGuard {
    pub fn set(policy: NetworkPolicy) -> Self {
        let mut guard = match state().lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::mem::replace(&mut *guard, policy);
        Self { previous }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::set(NetworkPolicy::Deny(reason.into()))
    }
}

impl Drop for NetworkPolicyGuard {
    fn drop(&mut self) {
        if let Ok(mut policy) = state().lock() {
            *policy = self.previous.clone();
        }
    }
}

fn effective_policy() -> NetworkPolicy {
    if let Ok(raw) = std::env::var(POLICY_ENV) {
        if raw.trim().eq_ignore_ascii_case("deny") {
            return NetworkPolicy::Deny(format!("{}=deny", POLICY_ENV));
        }
    }
    current()
}

pub fn check_outbound(target: &str) -> anyhow::Result<()> {
    match effective_policy() {
        NetworkPolicy::Allow => Ok(()),
        NetworkPolicy::Deny(reason) => anyhow::bail!(
            "outbound network blocked by policy (target={}): {}",
            target,
            reason
        ),
    }
}
