use strum::{AsRefStr, EnumString};

/// Stored as its variant name in `users.role`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Administrators may waive the policy checks of booking admission.
    pub fn is_privileged(self) -> bool {
        matches!(self, Role::Admin)
    }
}
