use super::credentials::CredentialError;
use super::domain::{PropertyId, RequestId, RequestStatus};
use super::repository::RepositoryError;
use super::validation::ValidationError;

/// Error raised by the marketplace services.
///
/// Each variant maps to a message the console can show as-is; store failures stay
/// distinguishable from "not found" and validation outcomes.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("property {0} is already in the wishlist")]
    AlreadyInWishlist(PropertyId),
    #[error("you cannot request your own property")]
    SelfRequest,
    #[error("property {0} is already rented")]
    PropertyUnavailable(PropertyId),
    #[error("you already have a pending request for property {0}")]
    DuplicateRequest(PropertyId),
    #[error("user '{0}' not found")]
    UserNotFound(String),
    #[error("property {0} not found")]
    PropertyNotFound(PropertyId),
    #[error("rent request {0} not found")]
    RequestNotFound(RequestId),
    #[error("not permitted to {action}")]
    Forbidden { action: &'static str },
    #[error("rent request {id} is already {}", .status.label())]
    AlreadyResolved { id: RequestId, status: RequestStatus },
    #[error("request {request_id} was accepted but property {property_id} could not be marked rented: {source}")]
    RentalSyncFailed {
        request_id: RequestId,
        property_id: PropertyId,
        #[source]
        source: RepositoryError,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
