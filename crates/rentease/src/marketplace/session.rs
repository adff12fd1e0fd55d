use super::domain::{Role, User};

/// Identity an operation is performed as. Produced by a successful login and passed
/// explicitly into every identity-dependent service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    username: String,
    role: Role,
}

impl Actor {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self::new(user.username.clone(), user.role)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
