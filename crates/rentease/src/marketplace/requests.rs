use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{PropertyId, RentRequest, RequestId, RequestStatus};
use super::error::MarketplaceError;
use super::repository::{RequestFilter, RequestRepository};
use super::session::Actor;

/// Rent request persistence and status changes.
pub struct RequestService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> Clone for RequestService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> RequestService<R>
where
    R: RequestRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record a pending request from the actor for a property owned by `landlord_username`.
    pub fn create_request(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        landlord_username: &str,
    ) -> Result<RentRequest, MarketplaceError> {
        if actor.username() == landlord_username {
            return Err(MarketplaceError::SelfRequest);
        }

        let request = RentRequest {
            id: RequestId::generate(),
            property_id,
            tenant_username: actor.username().to_string(),
            landlord_username: landlord_username.to_string(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(request)?;
        info!(
            request_id = %stored.id,
            property_id = %stored.property_id,
            tenant = %stored.tenant_username,
            "rent request created"
        );
        Ok(stored)
    }

    pub fn requests_for_landlord(&self, landlord: &str) -> Result<Vec<RentRequest>, MarketplaceError> {
        Ok(self
            .repository
            .find(&RequestFilter::Landlord(landlord.to_string()))?)
    }

    pub fn requests_for_tenant(&self, tenant: &str) -> Result<Vec<RentRequest>, MarketplaceError> {
        Ok(self
            .repository
            .find(&RequestFilter::Tenant(tenant.to_string()))?)
    }

    pub fn find_by_id(&self, id: &RequestId) -> Result<Option<RentRequest>, MarketplaceError> {
        Ok(self.repository.find_by_id(id)?)
    }

    /// Persist a status. Callers are responsible for refusing transitions out of a
    /// terminal status; see [`RentalWorkflow::respond_to_request`].
    ///
    /// [`RentalWorkflow::respond_to_request`]: super::workflow::RentalWorkflow::respond_to_request
    pub fn update_request_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
    ) -> Result<(), MarketplaceError> {
        if !self.repository.set_status(id, status)? {
            return Err(MarketplaceError::RequestNotFound(id.clone()));
        }
        info!(request_id = %id, status = status.label(), "request status updated");
        Ok(())
    }

    /// Reject every pending request where the user is tenant or landlord.
    pub fn invalidate_pending_for_user(&self, username: &str) -> Result<u64, MarketplaceError> {
        let pending = self
            .repository
            .find(&RequestFilter::PendingInvolving(username.to_string()))?;

        let mut rejected = 0;
        for request in pending {
            if self.repository.set_status(&request.id, RequestStatus::Rejected)? {
                rejected += 1;
            }
        }

        if rejected > 0 {
            info!(username, rejected, "pending requests invalidated");
        }
        Ok(rejected)
    }
}
