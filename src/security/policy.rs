//! Method + path rule table deciding which role a request needs.

use crate::config::Credentials;
use crate::security::Account;
use axum::http::Method;
use serde::Serialize;

/// Roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// Ant-style path pattern: an exact path, or `prefix/**` matching the prefix and everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => PathPattern::Prefix(normalize(prefix).to_string()),
            None => PathPattern::Exact(normalize(pattern).to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path = normalize(path);
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Prefix(p) => {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .map(|rest| rest.starts_with('/'))
                        .unwrap_or(false)
            }
        }
    }
}

/// Trailing slashes are not significant, except for the root itself.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub method: Method,
    pub pattern: PathPattern,
    pub role: Role,
}

impl Rule {
    pub fn new(method: Method, pattern: &str, role: Role) -> Self {
        Rule {
            method,
            pattern: PathPattern::parse(pattern),
            role,
        }
    }
}

/// Rule table plus the one account allowed to authenticate. Built once at startup.
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    rules: Vec<Rule>,
    account: Account,
}

impl SecurityPolicy {
    pub fn new(rules: Vec<Rule>, account: Account) -> Self {
        SecurityPolicy { rules, account }
    }

    /// Writes to `/customers` need ADMIN; everything else is public.
    /// The configured account holds USER and ADMIN.
    pub fn customers(credentials: Credentials) -> Self {
        Self::customers_for(Account {
            credentials,
            roles: vec![Role::User, Role::Admin],
        })
    }

    pub fn customers_for(account: Account) -> Self {
        let rules = vec![
            Rule::new(Method::POST, "/customers", Role::Admin),
            Rule::new(Method::PUT, "/customers/**", Role::Admin),
            Rule::new(Method::DELETE, "/customers/**", Role::Admin),
            Rule::new(Method::PATCH, "/customers/**", Role::Admin),
        ];
        SecurityPolicy::new(rules, account)
    }

    /// Role required for a request; `None` means public. First matching rule wins.
    pub fn required_role(&self, method: &Method, path: &str) -> Option<Role> {
        self.rules
            .iter()
            .find(|r| r.method == *method && r.pattern.matches(path))
            .map(|r| r.role)
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SecurityPolicy {
        SecurityPolicy::customers(Credentials {
            username: "admin".into(),
            password: "pw".into(),
        })
    }

    #[test]
    fn reads_are_public() {
        let p = policy();
        for path in ["/", "/customers", "/customers/abc", "/customers/search/findByEmail"] {
            assert_eq!(p.required_role(&Method::GET, path), None, "{path}");
        }
    }

    #[test]
    fn writes_need_admin() {
        let p = policy();
        assert_eq!(p.required_role(&Method::POST, "/customers"), Some(Role::Admin));
        assert_eq!(p.required_role(&Method::PUT, "/customers/abc"), Some(Role::Admin));
        assert_eq!(p.required_role(&Method::PATCH, "/customers/abc"), Some(Role::Admin));
        assert_eq!(p.required_role(&Method::DELETE, "/customers/abc"), Some(Role::Admin));
    }

    #[test]
    fn post_rule_is_exact() {
        let p = policy();
        assert_eq!(p.required_role(&Method::POST, "/customers/"), Some(Role::Admin));
        assert_eq!(p.required_role(&Method::POST, "/customers/abc"), None);
        assert_eq!(p.required_role(&Method::POST, "/other"), None);
    }

    #[test]
    fn prefix_pattern_covers_root_and_descendants_only() {
        let pattern = PathPattern::parse("/customers/**");
        assert!(pattern.matches("/customers"));
        assert!(pattern.matches("/customers/a/b"));
        assert!(!pattern.matches("/customersX"));
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn root_normalizes() {
        assert!(PathPattern::parse("/").matches("/"));
        assert!(PathPattern::parse("/").matches("//"));
    }

    #[test]
    fn default_account_holds_both_roles() {
        assert_eq!(policy().account().roles, vec![Role::User, Role::Admin]);
    }
}
