//! Rental marketplace core: accounts and wishlists, polymorphic listings, and the
//! rent-request lifecycle that ties tenants to landlords.
//!
//! Services are generic over the repository traits in [`repository`] so the console
//! can run against MongoDB while tests use the in-memory store.

pub mod credentials;
pub mod domain;
pub mod error;
pub mod properties;
pub mod repository;
pub mod requests;
pub mod search;
pub mod session;
pub mod users;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    Address, CommercialDetails, CommercialSubtype, FlatDetails, FurnishedCategory, HouseDetails,
    ListingDraft, ProfileUpdate, Property, PropertyDetails, PropertyId, PropertyType,
    RentRequest, RequestDecision, RequestId, RequestStatus, Role, SignUpForm, User,
};
pub use error::MarketplaceError;
pub use properties::{ListingScope, PropertyService};
pub use repository::{
    PropertyFilter, PropertyRepository, RepositoryError, RequestFilter, RequestRepository,
    UserRepository,
};
pub use requests::RequestService;
pub use search::SearchCriteria;
pub use session::Actor;
pub use users::UserService;
pub use validation::ValidationError;
pub use workflow::{DeletionReport, RentalWorkflow, RequestView, UserOverview};
