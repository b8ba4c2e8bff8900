use std::collections::HashSet;

use super::AuthUser;

/// Decides whether an authenticated caller may use the admin surface.
pub trait AdminAuthorizer: Send + Sync {
    fn is_admin(&self, user: &AuthUser) -> bool;
}

/// Admins are the callers whose token email is on a configured list.
pub struct EmailAllowList {
    emails: HashSet<String>,
}

impl EmailAllowList {
    pub fn new<I, E>(emails: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|email| email.as_ref().trim().to_ascii_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
        }
    }
}

impl AdminAuthorizer for EmailAllowList {
    fn is_admin(&self, user: &AuthUser) -> bool {
        user.email
            .as_deref()
            .map(|email| self.emails.contains(&email.trim().to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: Option<&str>) -> AuthUser {
        AuthUser {
            clerk_id: "user_2abc".to_string(),
            email: email.map(str::to_string),
            name: None,
        }
    }

    #[test]
    fn listed_email_is_admin_regardless_of_case() {
        let authorizer = EmailAllowList::new(["admin@bamboo.my"]);
        assert!(authorizer.is_admin(&user(Some("Admin@Bamboo.MY"))));
    }

    #[test]
    fn unlisted_or_missing_email_is_not_admin() {
        let authorizer = EmailAllowList::new(["admin@bamboo.my"]);
        assert!(!authorizer.is_admin(&user(Some("someone@bamboo.my"))));
        assert!(!authorizer.is_admin(&user(None)));
    }

    #[test]
    fn empty_list_admits_nobody() {
        let authorizer = EmailAllowList::new(Vec::<String>::new());
        assert!(!authorizer.is_admin(&user(Some("admin@bamboo.my"))));
    }
}
