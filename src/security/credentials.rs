//! Basic-auth credential check against the configured account.

use crate::config::Credentials;
use crate::security::Role;
use serde::Serialize;
use subtle::ConstantTimeEq;

/// The configured account and the roles it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub credentials: Credentials,
    pub roles: Vec<Role>,
}

/// An authenticated caller, injected into request extensions by the security middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Constant-time byte comparison. A length mismatch still performs one comparison.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

impl Account {
    /// Both username and password are always compared so timing does not reveal which one failed.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        let user_ok = constant_time_eq(username, &self.credentials.username);
        let pass_ok = constant_time_eq(password, &self.credentials.password);
        if user_ok & pass_ok {
            Some(Principal {
                username: self.credentials.username.clone(),
                roles: self.roles.clone(),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            credentials: Credentials {
                username: "admin".into(),
                password: "j7CHmTNmM!".into(),
            },
            roles: vec![Role::User, Role::Admin],
        }
    }

    #[test]
    fn correct_pair_authenticates_with_roles() {
        let principal = account().authenticate("admin", "j7CHmTNmM!").unwrap();
        assert_eq!(principal.username, "admin");
        assert!(principal.has_role(Role::Admin));
        assert!(principal.has_role(Role::User));
    }

    #[test]
    fn wrong_password_or_user_rejected() {
        assert!(account().authenticate("admin", "j7CHmTNmM").is_none());
        assert!(account().authenticate("root", "j7CHmTNmM!").is_none());
        assert!(account().authenticate("", "").is_none());
    }

    #[test]
    fn constant_time_eq_cases() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secreT", "secret"));
        assert!(!constant_time_eq("secret-longer", "secret"));
    }
}
