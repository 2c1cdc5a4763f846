//! Signed-in actor as seen by the sync layer.

use std::fmt;

/// Opaque identifier of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current identity, owned by the external auth subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    /// Nobody is signed in.
    #[default]
    Absent,
    /// A user is signed in.
    Present(UserId),
}

/// Effect of moving from one identity to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityTransition {
    /// Identity unchanged.
    Unchanged,
    /// `Absent` to `Present`.
    SignedIn,
    /// `Present` to `Absent`.
    SignedOut,
    /// `Present(a)` to `Present(b)`.
    Switched,
}

impl Identity {
    /// Creates a present identity.
    #[must_use]
    pub fn present(id: impl Into<String>) -> Self {
        Self::Present(UserId::new(id))
    }

    /// Returns whether a user is signed in.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns the signed-in user id.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Present(id) => Some(id),
            Self::Absent => None,
        }
    }

    /// Classifies the move from `self` to `next`.
    #[must_use]
    pub fn transition_to(&self, next: &Self) -> IdentityTransition {
        match (self, next) {
            (Self::Absent, Self::Absent) => IdentityTransition::Unchanged,
            (Self::Absent, Self::Present(_)) => IdentityTransition::SignedIn,
            (Self::Present(_), Self::Absent) => IdentityTransition::SignedOut,
            (Self::Present(a), Self::Present(b)) if a == b => IdentityTransition::Unchanged,
            (Self::Present(_), Self::Present(_)) => IdentityTransition::Switched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Identity::Absent, Identity::Absent, IdentityTransition::Unchanged ; "absent_to_absent")]
    #[test_case(Identity::Absent, Identity::present("u1"), IdentityTransition::SignedIn ; "sign_in")]
    #[test_case(Identity::present("u1"), Identity::Absent, IdentityTransition::SignedOut ; "sign_out")]
    #[test_case(Identity::present("u1"), Identity::present("u1"), IdentityTransition::Unchanged ; "same_user")]
    #[test_case(Identity::present("u1"), Identity::present("u2"), IdentityTransition::Switched ; "switch_user")]
    fn test_transition(from: Identity, to: Identity, expected: IdentityTransition) {
        assert_eq!(from.transition_to(&to), expected);
    }

    #[test]
    fn test_default_is_absent() {
        let identity = Identity::default();
        assert!(!identity.is_present());
        assert!(identity.user_id().is_none());
    }
}
