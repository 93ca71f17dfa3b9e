//! Role gate deciding which views a viewer may open.

use crate::model::{Role, User};

/// Outcome of checking a viewer against a view's required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Nobody is signed in.
    RedirectToLogin,
    /// Signed in, but with a different role than the view needs.
    RedirectHome,
}

/// Decide whether `user` may open a view that requires `required` (or any
/// signed-in user when `required` is `None`).
pub fn authorize(user: Option<&User>, required: Option<Role>) -> Access {
    match (user, required) {
        (None, _) => Access::RedirectToLogin,
        (Some(user), Some(role)) if user.role != role => Access::RedirectHome,
        _ => Access::Granted,
    }
}

/// The viewer identity supplied from outside (configuration or environment).
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(email: &str, role: Role) -> Self {
        Self {
            user: Some(User {
                id: None,
                email: email.to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role,
                qualification: String::new(),
                interests: String::new(),
            }),
        }
    }

    pub fn check(&self, required: Option<Role>) -> Access {
        authorize(self.user.as_ref(), required)
    }

    /// Like [`Session::check`] but as a `Result` with a message suitable for
    /// showing to the viewer.
    pub fn require(&self, role: Role) -> anyhow::Result<&User> {
        match (self.check(Some(role)), self.user.as_ref()) {
            (Access::Granted, Some(user)) => Ok(user),
            (Access::RedirectHome, Some(user)) => anyhow::bail!(
                "this view requires the {role} role, but {} is signed in as {}",
                user.email,
                user.role
            ),
            _ => anyhow::bail!("not signed in: set a user email and role in careerpath.toml"),
        }
    }
}
