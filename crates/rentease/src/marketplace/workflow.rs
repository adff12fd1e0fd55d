//! Operations that span accounts, listings and rent requests.

use tracing::{debug, info, warn};

use super::domain::{
    Property, PropertyId, RentRequest, RequestDecision, RequestId, RequestStatus, User,
};
use super::error::MarketplaceError;
use super::properties::{ListingScope, PropertyService};
use super::repository::{PropertyRepository, RequestRepository, UserRepository};
use super::requests::RequestService;
use super::session::Actor;
use super::users::UserService;

/// A rent request joined with what the viewer needs to act on it.
///
/// `property` is `None` when the listing has since been deleted. `tenant` is only
/// resolved for the landlord inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestView {
    pub request: RentRequest,
    pub property: Option<Property>,
    pub tenant: Option<User>,
}

/// One non-admin account with everything it has listed.
#[derive(Debug, Clone, PartialEq)]
pub struct UserOverview {
    pub user: User,
    pub listings: Vec<Property>,
}

/// Summary of an account deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeletionReport {
    pub properties_deleted: u64,
    pub requests_rejected: u64,
}

pub struct RentalWorkflow<U: ?Sized, P: ?Sized, Q: ?Sized> {
    users: UserService<U>,
    properties: PropertyService<P>,
    requests: RequestService<Q>,
    rented_sync_attempts: u32,
}

impl<U, P, Q> RentalWorkflow<U, P, Q>
where
    U: UserRepository + ?Sized,
    P: PropertyRepository + ?Sized,
    Q: RequestRepository + ?Sized,
{
    pub fn new(
        users: UserService<U>,
        properties: PropertyService<P>,
        requests: RequestService<Q>,
        rented_sync_attempts: u32,
    ) -> Self {
        Self {
            users,
            properties,
            requests,
            rented_sync_attempts: rented_sync_attempts.max(1),
        }
    }

    pub fn users(&self) -> &UserService<U> {
        &self.users
    }

    pub fn properties(&self) -> &PropertyService<P> {
        &self.properties
    }

    pub fn requests(&self) -> &RequestService<Q> {
        &self.requests
    }

    /// Ask to rent a listing. The request goes to the listing's landlord and the listing
    /// leaves the tenant's wishlist. Rented listings and repeat pending requests are refused.
    pub fn request_property(
        &self,
        actor: &Actor,
        property_id: &PropertyId,
    ) -> Result<RentRequest, MarketplaceError> {
        let property = self
            .properties
            .find_by_id(property_id)?
            .ok_or_else(|| MarketplaceError::PropertyNotFound(property_id.clone()))?;
        if property.rented {
            return Err(MarketplaceError::PropertyUnavailable(property.id));
        }

        let already_pending = self
            .requests
            .requests_for_tenant(actor.username())?
            .iter()
            .any(|request| {
                request.property_id == property.id && request.status == RequestStatus::Pending
            });
        if already_pending {
            return Err(MarketplaceError::DuplicateRequest(property.id));
        }

        let request =
            self.requests
                .create_request(actor, property.id.clone(), &property.landlord_username)?;

        if self.users.remove_from_wishlist(actor.username(), property_id)? {
            debug!(property_id = %property_id, "requested property removed from wishlist");
        }
        Ok(request)
    }

    /// Accept or reject a pending request addressed to the actor.
    ///
    /// Resolved requests cannot change status. Re-accepting an accepted request whose
    /// listing is still unrented retries the rented flag instead of failing, which is how
    /// a failed [`MarketplaceError::RentalSyncFailed`] acceptance is repaired. Accepting a
    /// second request for a listing that is already taken is
    /// [`MarketplaceError::PropertyUnavailable`].
    pub fn respond_to_request(
        &self,
        actor: &Actor,
        request_id: &RequestId,
        decision: RequestDecision,
    ) -> Result<RentRequest, MarketplaceError> {
        let mut request = self
            .requests
            .find_by_id(request_id)?
            .ok_or_else(|| MarketplaceError::RequestNotFound(request_id.clone()))?;

        if request.landlord_username != actor.username() {
            return Err(MarketplaceError::Forbidden {
                action: "respond to a request addressed to another landlord",
            });
        }

        if request.status.is_terminal() {
            if request.status == RequestStatus::Accepted
                && decision == RequestDecision::Accept
                && self.property_still_unrented(&request.property_id)?
            {
                warn!(request_id = %request.id, "repairing rented flag for accepted request");
                self.sync_rented(&request)?;
                return Ok(request);
            }
            return Err(MarketplaceError::AlreadyResolved {
                id: request.id,
                status: request.status,
            });
        }

        if decision == RequestDecision::Accept && self.rented_to_someone_else(&request)? {
            return Err(MarketplaceError::PropertyUnavailable(request.property_id));
        }

        let status = decision.status();
        self.requests.update_request_status(&request.id, status)?;
        request.status = status;

        if decision == RequestDecision::Accept {
            self.sync_rented(&request)?;
        }
        Ok(request)
    }

    /// Resolve the actor's wishlist in stored order, skipping listings that no longer exist.
    pub fn wishlist(&self, actor: &Actor) -> Result<Vec<Property>, MarketplaceError> {
        let user = self
            .users
            .find_by_username(actor.username())?
            .ok_or_else(|| MarketplaceError::UserNotFound(actor.username().to_string()))?;

        let mut properties = Vec::with_capacity(user.wishlist.len());
        for id in &user.wishlist {
            match self.properties.find_by_id(id)? {
                Some(property) => properties.push(property),
                None => warn!(property_id = %id, "wishlist references a deleted property"),
            }
        }
        Ok(properties)
    }

    pub fn landlord_inbox(&self, actor: &Actor) -> Result<Vec<RequestView>, MarketplaceError> {
        self.requests
            .requests_for_landlord(actor.username())?
            .into_iter()
            .map(|request| {
                let property = self.properties.find_by_id(&request.property_id)?;
                let tenant = self.users.find_by_username(&request.tenant_username)?;
                Ok(RequestView {
                    request,
                    property,
                    tenant,
                })
            })
            .collect()
    }

    pub fn tenant_requests(&self, actor: &Actor) -> Result<Vec<RequestView>, MarketplaceError> {
        self.requests
            .requests_for_tenant(actor.username())?
            .into_iter()
            .map(|request| {
                let property = self.properties.find_by_id(&request.property_id)?;
                Ok(RequestView {
                    request,
                    property,
                    tenant: None,
                })
            })
            .collect()
    }

    /// Every non-admin account with its listings.
    pub fn users_overview(&self, actor: &Actor) -> Result<Vec<UserOverview>, MarketplaceError> {
        self.users
            .list_non_admin_users(actor)?
            .into_iter()
            .map(|user| {
                let listings = self
                    .properties
                    .listed_properties(&ListingScope::OwnedBy(user.username.clone()))?;
                Ok(UserOverview { user, listings })
            })
            .collect()
    }

    /// Delete an account, every listing it owns, and reject the pending requests it is part of.
    pub fn delete_user(
        &self,
        actor: &Actor,
        username: &str,
    ) -> Result<DeletionReport, MarketplaceError> {
        require_admin(actor, "delete user accounts")?;

        let user = self
            .users
            .find_by_username(username)?
            .ok_or_else(|| MarketplaceError::UserNotFound(username.to_string()))?;
        if user.is_admin() {
            return Err(MarketplaceError::Forbidden {
                action: "delete an admin account",
            });
        }

        let properties_deleted = self.properties.delete_all_listed_properties_of_user(username)?;
        let requests_rejected = self.requests.invalidate_pending_for_user(username)?;
        self.users.delete_user_record(username)?;

        info!(
            username,
            admin = actor.username(),
            properties_deleted,
            requests_rejected,
            "user deleted"
        );
        Ok(DeletionReport {
            properties_deleted,
            requests_rejected,
        })
    }

    pub fn pending_properties(&self, actor: &Actor) -> Result<Vec<Property>, MarketplaceError> {
        require_admin(actor, "review pending listings")?;
        self.properties.pending_properties()
    }

    pub fn approve_property(
        &self,
        actor: &Actor,
        property_id: &PropertyId,
    ) -> Result<(), MarketplaceError> {
        require_admin(actor, "approve listings")?;
        self.properties.approve_property(property_id, actor.username())
    }

    fn property_still_unrented(&self, id: &PropertyId) -> Result<bool, MarketplaceError> {
        Ok(self
            .properties
            .find_by_id(id)?
            .is_some_and(|property| !property.rented))
    }

    /// A listing is taken once it is flagged rented or another request for it was accepted.
    fn rented_to_someone_else(&self, request: &RentRequest) -> Result<bool, MarketplaceError> {
        let flagged = self
            .properties
            .find_by_id(&request.property_id)?
            .is_some_and(|property| property.rented);
        if flagged {
            return Ok(true);
        }
        Ok(self
            .requests
            .requests_for_landlord(&request.landlord_username)?
            .iter()
            .any(|other| {
                other.id != request.id
                    && other.property_id == request.property_id
                    && other.status == RequestStatus::Accepted
            }))
    }

    fn sync_rented(&self, request: &RentRequest) -> Result<(), MarketplaceError> {
        let mut attempt = 1;
        loop {
            match self.properties.mark_rented(&request.property_id) {
                Ok(_) => return Ok(()),
                Err(MarketplaceError::Repository(source)) => {
                    if attempt >= self.rented_sync_attempts {
                        return Err(MarketplaceError::RentalSyncFailed {
                            request_id: request.id.clone(),
                            property_id: request.property_id.clone(),
                            source,
                        });
                    }
                    warn!(
                        request_id = %request.id,
                        attempt,
                        error = %source,
                        "marking property rented failed; retrying"
                    );
                    attempt += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }
}

fn require_admin(actor: &Actor, action: &'static str) -> Result<(), MarketplaceError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(MarketplaceError::Forbidden { action })
    }
}
