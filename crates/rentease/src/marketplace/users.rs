use std::sync::Arc;

use tracing::{info, warn};

use super::credentials::{hash_password, verify_password};
use super::domain::{ProfileUpdate, PropertyId, Role, SignUpForm, User};
use super::error::MarketplaceError;
use super::repository::UserRepository;
use super::session::Actor;
use super::validation::{validate_profile, validate_sign_up};

/// Account lifecycle and wishlist membership.
pub struct UserService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> UserService<R>
where
    R: UserRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Register a new account with the `User` role and an empty wishlist.
    pub fn sign_up(&self, form: SignUpForm) -> Result<User, MarketplaceError> {
        validate_sign_up(&form)?;

        if self.repository.find_by_username(&form.username)?.is_some() {
            return Err(MarketplaceError::DuplicateUsername(form.username));
        }

        let user = User {
            password_hash: hash_password(&form.password)?,
            username: form.username,
            name: form.name,
            age: form.age,
            email: form.email,
            phone_number: form.phone_number,
            address: form.address,
            role: Role::User,
            wishlist: Vec::new(),
        };

        let stored = self.repository.insert(user)?;
        info!(username = %stored.username, "account created");
        Ok(stored)
    }

    /// Check credentials. A wrong password or unknown username is `Ok(None)`; the reason
    /// is logged but not surfaced so the caller cannot probe for usernames.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Actor>, MarketplaceError> {
        let Some(user) = self.repository.find_by_username(username)? else {
            warn!(username, "login failed: unknown username");
            return Ok(None);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(username, "login failed: password mismatch");
            return Ok(None);
        }

        info!(username, role = user.role.label(), "login succeeded");
        Ok(Some(Actor::from_user(&user)))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, MarketplaceError> {
        Ok(self.repository.find_by_username(username)?)
    }

    /// Append a property to the user's wishlist. Membership is exact identifier equality.
    pub fn add_to_wishlist(
        &self,
        username: &str,
        property_id: PropertyId,
    ) -> Result<(), MarketplaceError> {
        let mut user = self.require(username)?;

        if user.has_wishlisted(&property_id) {
            return Err(MarketplaceError::AlreadyInWishlist(property_id));
        }

        user.wishlist.push(property_id);
        self.repository.update(user)?;
        Ok(())
    }

    /// Remove exactly the matching identifier, keeping the rest in order.
    /// Returns whether anything was removed.
    pub fn remove_from_wishlist(
        &self,
        username: &str,
        property_id: &PropertyId,
    ) -> Result<bool, MarketplaceError> {
        let mut user = self.require(username)?;

        let before = user.wishlist.len();
        user.wishlist.retain(|id| id != property_id);
        if user.wishlist.len() == before {
            return Ok(false);
        }

        self.repository.update(user)?;
        Ok(true)
    }

    /// Apply profile edits to the acting user's own record. Username, role, password
    /// and wishlist are left as stored.
    pub fn update_profile(
        &self,
        actor: &Actor,
        update: ProfileUpdate,
    ) -> Result<User, MarketplaceError> {
        validate_profile(&update)?;

        let mut user = self.require(actor.username())?;
        user.name = update.name;
        user.age = update.age;
        user.email = update.email;
        user.phone_number = update.phone_number;
        user.address = update.address;

        self.repository.update(user.clone())?;
        info!(username = %user.username, "profile updated");
        Ok(user)
    }

    pub fn list_non_admin_users(&self, actor: &Actor) -> Result<Vec<User>, MarketplaceError> {
        if !actor.is_admin() {
            return Err(MarketplaceError::Forbidden {
                action: "list user accounts",
            });
        }

        let mut users = self.repository.list()?;
        users.retain(|user| !user.is_admin());
        Ok(users)
    }

    /// Remove the account record only. Listings and requests are handled by the caller.
    pub fn delete_user_record(&self, username: &str) -> Result<(), MarketplaceError> {
        if self.repository.delete(username)? {
            Ok(())
        } else {
            Err(MarketplaceError::UserNotFound(username.to_string()))
        }
    }

    /// Create the administrator account if it does not exist yet. An existing account with
    /// that username is promoted to admin; its password is left untouched.
    pub fn ensure_admin(&self, username: &str, password: &str) -> Result<User, MarketplaceError> {
        if let Some(mut existing) = self.repository.find_by_username(username)? {
            if !existing.is_admin() {
                existing.role = Role::Admin;
                self.repository.update(existing.clone())?;
                info!(username, "existing account promoted to admin");
            }
            return Ok(existing);
        }

        let admin = User {
            username: username.to_string(),
            password_hash: hash_password(password)?,
            name: "Administrator".to_string(),
            age: 30,
            email: String::new(),
            phone_number: String::new(),
            address: String::new(),
            role: Role::Admin,
            wishlist: Vec::new(),
        };

        let stored = self.repository.insert(admin)?;
        info!(username, "admin account created");
        Ok(stored)
    }

    fn require(&self, username: &str) -> Result<User, MarketplaceError> {
        self.repository
            .find_by_username(username)?
            .ok_or_else(|| MarketplaceError::UserNotFound(username.to_string()))
    }
}
