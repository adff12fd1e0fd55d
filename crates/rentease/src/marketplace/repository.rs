use super::domain::{Property, PropertyId, RentRequest, RequestId, RequestStatus, User};

/// Storage abstraction for accounts, keyed by username.
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: User) -> Result<User, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    /// Replaces the stored record with the same username.
    fn update(&self, user: User) -> Result<(), RepositoryError>;
    fn delete(&self, username: &str) -> Result<bool, RepositoryError>;
    fn list(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Selection used when listing properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyFilter {
    OwnedBy(String),
    Unrented,
    PendingApproval,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            PropertyFilter::OwnedBy(username) => property.landlord_username == *username,
            PropertyFilter::Unrented => !property.rented,
            PropertyFilter::PendingApproval => !property.approved,
        }
    }
}

/// Storage abstraction for listings.
pub trait PropertyRepository: Send + Sync {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn find(&self, filter: &PropertyFilter) -> Result<Vec<Property>, RepositoryError>;
    /// Replaces the stored record with the same identifier.
    fn update(&self, property: Property) -> Result<(), RepositoryError>;
    /// Returns whether a record matched.
    fn set_approved(&self, id: &PropertyId, approved: bool) -> Result<bool, RepositoryError>;
    /// Returns whether a record matched.
    fn set_rented(&self, id: &PropertyId, rented: bool) -> Result<bool, RepositoryError>;
    fn delete(&self, id: &PropertyId) -> Result<bool, RepositoryError>;
    fn delete_by_landlord(&self, username: &str) -> Result<u64, RepositoryError>;
}

/// Selection used when listing rent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFilter {
    Tenant(String),
    Landlord(String),
    PendingInvolving(String),
}

impl RequestFilter {
    pub fn matches(&self, request: &RentRequest) -> bool {
        match self {
            RequestFilter::Tenant(username) => request.tenant_username == *username,
            RequestFilter::Landlord(username) => request.landlord_username == *username,
            RequestFilter::PendingInvolving(username) => {
                request.status == RequestStatus::Pending
                    && (request.tenant_username == *username
                        || request.landlord_username == *username)
            }
        }
    }
}

/// Storage abstraction for rent requests.
pub trait RequestRepository: Send + Sync {
    fn insert(&self, request: RentRequest) -> Result<RentRequest, RepositoryError>;
    fn find_by_id(&self, id: &RequestId) -> Result<Option<RentRequest>, RepositoryError>;
    fn find(&self, filter: &RequestFilter) -> Result<Vec<RentRequest>, RepositoryError>;
    /// Returns whether a record matched.
    fn set_status(&self, id: &RequestId, status: RequestStatus) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record could not be encoded or decoded: {0}")]
    Corrupt(String),
}
