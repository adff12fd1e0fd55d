use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{ListingDraft, Property, PropertyId};
use super::error::MarketplaceError;
use super::repository::{PropertyFilter, PropertyRepository};
use super::search::SearchCriteria;
use super::session::Actor;
use super::validation::validate_listing;

/// Which listings to retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// Everything the landlord listed, approved or not.
    OwnedBy(String),
    /// Every unrented listing, regardless of owner or approval.
    Available,
}

/// Listing lifecycle: creation, edits with re-approval, moderation and rental status.
pub struct PropertyService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for PropertyService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> PropertyService<R>
where
    R: PropertyRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Persist a new listing owned by the actor. It starts unapproved and unrented.
    pub fn list_property(
        &self,
        actor: &Actor,
        draft: ListingDraft,
    ) -> Result<Property, MarketplaceError> {
        validate_listing(&draft)?;

        let property = Property {
            id: PropertyId::generate(),
            property_type: Some(draft.details.property_type()),
            title: draft.title,
            address: draft.address,
            landlord_username: actor.username().to_string(),
            rent_amount: draft.rent_amount,
            approved: false,
            rented: false,
            details: Some(draft.details),
        };

        let stored = self.repository.insert(property)?;
        info!(
            property_id = %stored.id,
            landlord = %stored.landlord_username,
            property_type = stored.type_label(),
            "property listed"
        );
        Ok(stored)
    }

    pub fn listed_properties(&self, scope: &ListingScope) -> Result<Vec<Property>, MarketplaceError> {
        let filter = match scope {
            ListingScope::OwnedBy(username) => PropertyFilter::OwnedBy(username.clone()),
            ListingScope::Available => PropertyFilter::Unrented,
        };
        Ok(self.repository.find(&filter)?)
    }

    /// Replace the editable fields of a listing the actor owns.
    ///
    /// The landlord and rented flag are kept from the stored record and approval is always
    /// reset, so any edit sends the listing back to moderation.
    pub fn update_listed_property(
        &self,
        actor: &Actor,
        id: &PropertyId,
        draft: ListingDraft,
    ) -> Result<Property, MarketplaceError> {
        validate_listing(&draft)?;

        let stored = self.require(id)?;
        if !stored.is_owned_by(actor.username()) {
            return Err(MarketplaceError::Forbidden {
                action: "edit another landlord's listing",
            });
        }

        let updated = Property {
            id: stored.id,
            property_type: Some(draft.details.property_type()),
            title: draft.title,
            address: draft.address,
            landlord_username: stored.landlord_username,
            rent_amount: draft.rent_amount,
            approved: false,
            rented: stored.rented,
            details: Some(draft.details),
        };

        self.repository.update(updated.clone())?;
        info!(property_id = %updated.id, "property updated; approval reset");
        Ok(updated)
    }

    /// Delete a listing. Only its landlord or an admin may do so.
    pub fn delete_listed_property(
        &self,
        actor: &Actor,
        id: &PropertyId,
    ) -> Result<(), MarketplaceError> {
        let stored = self.require(id)?;
        if !actor.is_admin() && !stored.is_owned_by(actor.username()) {
            return Err(MarketplaceError::Forbidden {
                action: "delete another landlord's listing",
            });
        }

        if !self.repository.delete(id)? {
            return Err(MarketplaceError::PropertyNotFound(id.clone()));
        }
        info!(property_id = %id, actor = actor.username(), "property deleted");
        Ok(())
    }

    pub fn delete_all_listed_properties_of_user(
        &self,
        username: &str,
    ) -> Result<u64, MarketplaceError> {
        let deleted = self.repository.delete_by_landlord(username)?;
        info!(landlord = username, deleted, "listings removed");
        Ok(deleted)
    }

    /// Absent listings are `Ok(None)`; store failures remain errors.
    pub fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, MarketplaceError> {
        Ok(self.repository.find_by_id(id)?)
    }

    pub fn pending_properties(&self) -> Result<Vec<Property>, MarketplaceError> {
        Ok(self.repository.find(&PropertyFilter::PendingApproval)?)
    }

    /// Mark a listing approved. The admin username is only recorded in the log.
    pub fn approve_property(
        &self,
        id: &PropertyId,
        admin_username: &str,
    ) -> Result<(), MarketplaceError> {
        if !self.repository.set_approved(id, true)? {
            return Err(MarketplaceError::PropertyNotFound(id.clone()));
        }
        info!(property_id = %id, admin = admin_username, "property approved");
        Ok(())
    }

    /// Set the rented flag. Repeating the call is harmless; returns whether the listing exists.
    pub fn mark_rented(&self, id: &PropertyId) -> Result<bool, MarketplaceError> {
        let matched = self.repository.set_rented(id, true)?;
        if !matched {
            warn!(property_id = %id, "cannot mark missing property as rented");
        }
        Ok(matched)
    }

    /// Filter the available listings with the search rules in [`SearchCriteria::matches`].
    pub fn search_properties(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Property>, MarketplaceError> {
        let mut properties = self.listed_properties(&ListingScope::Available)?;
        properties.retain(|property| criteria.matches(property));
        Ok(properties)
    }

    fn require(&self, id: &PropertyId) -> Result<Property, MarketplaceError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| MarketplaceError::PropertyNotFound(id.clone()))
    }
}
