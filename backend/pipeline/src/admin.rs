use std::sync::Arc;

use telefax_core::{SenderId, SharedLimits, TelefaxError};
use telefax_logging::{PrintEvent, PrintEventLogger};
use telefax_security::AccessPolicy;
use tracing::info;
use uuid::Uuid;

/// Runtime mutation of the copy ceiling, gated by the admin access check.
#[derive(Debug, Clone)]
pub struct AdminControl {
    access: Arc<AccessPolicy>,
    limits: SharedLimits,
}

/// Confirmation of a ceiling change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxCopiesChange {
    pub old: u32,
    pub new: u32,
}

impl AdminControl {
    pub fn new(access: Arc<AccessPolicy>, limits: SharedLimits) -> Self {
        Self { access, limits }
    }

    pub fn limits(&self) -> &SharedLimits {
        &self.limits
    }

    /// Refuse senders who may not change limits.
    pub fn check(&self, sender: &SenderId) -> Result<(), TelefaxError> {
        self.access.check_admin(sender)
    }

    /// Parse `raw` as the new ceiling and install it.
    ///
    /// Authorization is checked before the argument is looked at.
    pub fn set_max_copies(
        &self,
        sender: &SenderId,
        raw: &str,
    ) -> Result<MaxCopiesChange, TelefaxError> {
        self.access.check_admin(sender)?;
        let new_max = parse_max_copies(raw)?;
        let old = self.limits.set_max_copies(new_max)?;

        info!(sender = %sender, old, new = new_max, "Max copies changed");
        PrintEventLogger::log_event(
            Uuid::new_v4(),
            PrintEvent::MaxCopiesChanged {
                sender: sender.to_string(),
                old,
                new: new_max,
            },
        );
        Ok(MaxCopiesChange { old, new: new_max })
    }
}

fn parse_max_copies(raw: &str) -> Result<u32, TelefaxError> {
    let value: i64 = raw.trim().parse().map_err(|_| {
        TelefaxError::InvalidArgument("Invalid number provided. Please enter a whole number.".into())
    })?;
    if value <= 0 {
        return Err(TelefaxError::InvalidArgument(
            "Maximum copies must be a positive number.".into(),
        ));
    }
    u32::try_from(value).map_err(|_| {
        TelefaxError::InvalidArgument(format!("Maximum copies cannot exceed {}.", u32::MAX))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copies::resolve_copies;

    fn control(admins: Option<Vec<SenderId>>) -> AdminControl {
        AdminControl::new(
            Arc::new(AccessPolicy::new([SenderId::from("U1"), SenderId::from("U3")], admins)),
            SharedLimits::new(100),
        )
    }

    #[test]
    fn authorized_sender_changes_ceiling() {
        let admin = control(None);
        let change = admin.set_max_copies(&"U1".into(), "10").unwrap();
        assert_eq!(change, MaxCopiesChange { old: 100, new: 10 });
        assert_eq!(resolve_copies(Some("20 copies"), admin.limits().max_copies()), 10);
    }

    #[test]
    fn unknown_sender_is_unauthorized() {
        let admin = control(None);
        assert!(matches!(
            admin.set_max_copies(&"U2".into(), "10"),
            Err(TelefaxError::Unauthorized { .. })
        ));
        assert_eq!(admin.limits().max_copies(), 100);
    }

    #[test]
    fn admin_subset_is_enforced() {
        let admin = control(Some(vec!["U1".into()]));
        assert!(admin.set_max_copies(&"U3".into(), "5").is_err());
        assert!(admin.set_max_copies(&"U1".into(), "5").is_ok());
    }

    #[test]
    fn admin_off_the_allowlist_is_unauthorized() {
        let admin = AdminControl::new(
            Arc::new(AccessPolicy::new([SenderId::from("U1")], Some(vec!["U9".into()]))),
            SharedLimits::new(100),
        );
        assert!(matches!(
            admin.set_max_copies(&"U9".into(), "5"),
            Err(TelefaxError::Unauthorized { .. })
        ));
        assert_eq!(admin.limits().max_copies(), 100);
    }

    #[test]
    fn rejects_bad_arguments() {
        let admin = control(None);
        for raw in ["0", "-3", "ten", "", "2.5", "99999999999"] {
            assert!(
                matches!(
                    admin.set_max_copies(&"U1".into(), raw),
                    Err(TelefaxError::InvalidArgument(_))
                ),
                "argument {raw:?}"
            );
        }
        assert_eq!(admin.limits().max_copies(), 100);
    }
}
