/// Access policy: decides which senders may print and which may change
/// runtime limits.
///
/// Closed by default: an empty allow-list admits nobody.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use telefax_core::{SenderId, TelefaxError};
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Senders allowed to print.
    pub allowlist: HashSet<SenderId>,
    /// Stricter subset for admin commands. `None` means the allow-list governs admin too.
    pub admins: Option<HashSet<SenderId>>,
}

impl AccessPolicy {
    pub fn new(
        allowlist: impl IntoIterator<Item = SenderId>,
        admins: Option<Vec<SenderId>>,
    ) -> Self {
        Self {
            allowlist: allowlist.into_iter().filter(|s| !s.is_empty()).collect(),
            admins: admins.map(|ids| ids.into_iter().filter(|s| !s.is_empty()).collect()),
        }
    }

    /// Returns `true` iff the sender is explicitly on the allow-list.
    pub fn authorize(&self, sender: &SenderId) -> bool {
        !sender.is_empty() && self.allowlist.contains(sender)
    }

    /// Returns `true` if the sender may run admin commands. Admins must also
    /// be on the allow-list.
    pub fn authorize_admin(&self, sender: &SenderId) -> bool {
        if sender.is_empty() {
            return false;
        }
        match &self.admins {
            Some(admins) => self.allowlist.contains(sender) && admins.contains(sender),
            None => self.allowlist.contains(sender),
        }
    }

    /// Fail fast with [`TelefaxError::Unauthorized`] for senders off the allow-list.
    pub fn check(&self, sender: &SenderId) -> Result<(), TelefaxError> {
        if self.authorize(sender) {
            return Ok(());
        }
        warn!(sender = %sender, "[AccessPolicy] sender not in allowlist");
        Err(TelefaxError::Unauthorized {
            sender: sender.to_string(),
        })
    }

    pub fn check_admin(&self, sender: &SenderId) -> Result<(), TelefaxError> {
        if self.authorize_admin(sender) {
            return Ok(());
        }
        warn!(sender = %sender, "[AccessPolicy] admin action refused");
        Err(TelefaxError::Unauthorized {
            sender: sender.to_string(),
        })
    }

    /// Add an identifier to the allow-list.
    pub fn allow(&mut self, sender: impl Into<SenderId>) {
        let sender = sender.into();
        if !sender.is_empty() {
            self.allowlist.insert(sender);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowlist.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<SenderId> {
        raw.iter().map(|s| SenderId::from(*s)).collect()
    }

    #[test]
    fn test_closed_by_default() {
        let policy = AccessPolicy::default();
        assert!(!policy.authorize(&SenderId::from("U1")));
    }

    #[test]
    fn test_allowlist_enforcement() {
        let mut policy = AccessPolicy::default();
        policy.allow("U1");
        assert!(policy.authorize(&SenderId::from("U1")));
        assert!(!policy.authorize(&SenderId::from("U2")));
    }

    #[test]
    fn test_empty_identity_never_passes() {
        let policy = AccessPolicy::new(ids(&["", "U1"]), None);
        assert!(!policy.authorize(&SenderId::default()));
        assert!(!policy.authorize_admin(&SenderId::default()));
        assert_eq!(policy.allowlist.len(), 1);
    }

    #[test]
    fn test_admin_falls_back_to_allowlist() {
        let policy = AccessPolicy::new(ids(&["U1"]), None);
        assert!(policy.authorize_admin(&SenderId::from("U1")));
        assert!(!policy.authorize_admin(&SenderId::from("U2")));
    }

    #[test]
    fn test_admin_subset() {
        let policy = AccessPolicy::new(ids(&["U1", "U3"]), Some(ids(&["U1"])));
        assert!(policy.authorize_admin(&SenderId::from("U1")));
        assert!(!policy.authorize_admin(&SenderId::from("U3")));
        assert!(policy.authorize(&SenderId::from("U3")));
    }

    #[test]
    fn test_admin_outside_allowlist_is_refused() {
        let policy = AccessPolicy::new(ids(&["U1"]), Some(ids(&["U9"])));
        assert!(!policy.authorize(&SenderId::from("U9")));
        assert!(!policy.authorize_admin(&SenderId::from("U9")));
        assert!(policy.check_admin(&SenderId::from("U9")).is_err());
    }

    #[test]
    fn test_check_returns_unauthorized() {
        let policy = AccessPolicy::new(ids(&["U1"]), None);
        assert!(policy.check(&SenderId::from("U1")).is_ok());
        assert!(matches!(
            policy.check(&SenderId::from("U2")),
            Err(TelefaxError::Unauthorized { .. })
        ));
    }
}
