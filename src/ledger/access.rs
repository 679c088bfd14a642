use std::collections::HashMap;

use serde::Serialize;

use crate::error::AppError;
use crate::models::address::Address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Org,
    Field,
}

/// Fixed authorization table. Populated once at construction; there is no
/// grant or revoke.
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: HashMap<Address, Role>,
}

impl AccessControl {
    pub fn new(org: Address, field: Address) -> Result<Self, AppError> {
        Self::from_entries([(org, Role::Org), (field, Role::Field)])
    }

    pub fn from_entries<I>(entries: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (Address, Role)>,
    {
        let mut roles = HashMap::new();
        for (address, role) in entries {
            if let Some(existing) = roles.insert(address.clone(), role) {
                if existing != role {
                    return Err(AppError::Internal(format!(
                        "address {address} cannot hold both {existing:?} and {role:?}"
                    )));
                }
            }
        }

        Ok(Self { roles })
    }

    pub fn role_of(&self, address: &Address) -> Option<Role> {
        self.roles.get(address).copied()
    }

    pub fn require_org(&self, caller: &Address) -> Result<(), AppError> {
        self.require(caller, Role::Org, "Only org")
    }

    pub fn require_field(&self, caller: &Address) -> Result<(), AppError> {
        self.require(caller, Role::Field, "Only field")
    }

    fn require(&self, caller: &Address, role: Role, message: &str) -> Result<(), AppError> {
        if self.role_of(caller) == Some(role) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(message.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessControl, Role};
    use crate::error::AppError;
    use crate::models::address::Address;

    fn address(last: char) -> Address {
        format!("0x{}{last}", "0".repeat(39)).parse().unwrap()
    }

    #[test]
    fn only_org_passes_org_gate() {
        let access = AccessControl::new(address('1'), address('2')).unwrap();

        assert!(access.require_org(&address('1')).is_ok());
        assert!(matches!(
            access.require_org(&address('2')),
            Err(AppError::Unauthorized(ref msg)) if msg == "Only org"
        ));
        assert!(matches!(
            access.require_org(&address('9')),
            Err(AppError::Unauthorized(ref msg)) if msg == "Only org"
        ));
    }

    #[test]
    fn only_field_passes_field_gate() {
        let access = AccessControl::new(address('1'), address('2')).unwrap();

        assert!(access.require_field(&address('2')).is_ok());
        assert!(matches!(
            access.require_field(&address('1')),
            Err(AppError::Unauthorized(ref msg)) if msg == "Only field"
        ));
    }

    #[test]
    fn unknown_addresses_have_no_role() {
        let access = AccessControl::new(address('1'), address('2')).unwrap();

        assert_eq!(access.role_of(&address('1')), Some(Role::Org));
        assert_eq!(access.role_of(&address('2')), Some(Role::Field));
        assert_eq!(access.role_of(&address('3')), None);
    }

    #[test]
    fn one_address_cannot_hold_both_roles() {
        assert!(AccessControl::new(address('1'), address('1')).is_err());
    }
}
