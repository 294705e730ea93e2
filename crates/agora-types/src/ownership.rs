/// Outcome of the ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Single-tier ownership: only the recorded author may mutate a post or
/// comment. No roles, no delegation.
pub fn authorize(acting_user: i64, resource_owner: i64) -> Access {
    if acting_user == resource_owner {
        Access::Allow
    } else {
        Access::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        assert_eq!(authorize(4, 4), Access::Allow);
        assert!(authorize(4, 4).is_allowed());
    }

    #[test]
    fn stranger_is_denied() {
        assert_eq!(authorize(4, 5), Access::Deny);
        assert!(!authorize(5, 4).is_allowed());
    }
}
