use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Identifier wrapper for listed properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for rent requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

/// Account record as persisted in the users collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub age: u8,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub wishlist: Vec<PropertyId>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_wishlisted(&self, property_id: &PropertyId) -> bool {
        self.wishlist.iter().any(|id| id == property_id)
    }
}

/// Candidate account submitted at signup. The password is plaintext and never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub name: String,
    pub age: u8,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

impl fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpForm")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: u8,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: u32,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.area, self.city, self.state, self.pincode
        )
    }
}

/// Listing category. The numeric tag is the persisted discriminator for the details payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Commercial,
    House,
    Flat,
}

impl PropertyType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Commercial, Self::House, Self::Flat]
    }

    pub const fn tag(self) -> i32 {
        match self {
            Self::Commercial => 1,
            Self::House => 2,
            Self::Flat => 3,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self, ValidationError> {
        match tag {
            1 => Ok(Self::Commercial),
            2 => Ok(Self::House),
            3 => Ok(Self::Flat),
            other => Err(ValidationError::UnknownPropertyType(other)),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Commercial => "Commercial",
            Self::House => "House",
            Self::Flat => "Flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommercialSubtype {
    #[serde(alias = "shop")]
    Shop,
    #[serde(alias = "factory")]
    Factory,
    #[serde(alias = "warehouse")]
    Warehouse,
}

impl CommercialSubtype {
    pub const fn ordered() -> [Self; 3] {
        [Self::Shop, Self::Factory, Self::Warehouse]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Shop => "Shop",
            Self::Factory => "Factory",
            Self::Warehouse => "Warehouse",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FurnishedCategory {
    Unfurnished,
    #[serde(rename = "Semi Furnished")]
    Semi,
    #[serde(rename = "Fully Furnished")]
    Fully,
}

impl FurnishedCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::Unfurnished, Self::Semi, Self::Fully]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unfurnished => "Unfurnished",
            Self::Semi => "Semi Furnished",
            Self::Fully => "Fully Furnished",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialDetails {
    pub floor_area: String,
    #[serde(rename = "sub_type")]
    pub subtype: CommercialSubtype,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseDetails {
    #[serde(rename = "no_of_rooms")]
    pub rooms: u8,
    #[serde(rename = "furnished_category")]
    pub furnished: FurnishedCategory,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatDetails {
    #[serde(rename = "furnished_category")]
    pub furnished: FurnishedCategory,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub bhk: u8,
}

/// Type-specific attributes of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyDetails {
    Commercial(CommercialDetails),
    House(HouseDetails),
    Flat(FlatDetails),
}

impl PropertyDetails {
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyDetails::Commercial(_) => PropertyType::Commercial,
            PropertyDetails::House(_) => PropertyType::House,
            PropertyDetails::Flat(_) => PropertyType::Flat,
        }
    }
}

impl fmt::Display for PropertyDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyDetails::Commercial(details) => write!(
                f,
                "Floor Area: {}, Subtype: {}",
                details.floor_area,
                details.subtype.label()
            ),
            PropertyDetails::House(details) => write!(
                f,
                "Rooms: {}, Furnished: {}, Amenities: {}",
                details.rooms,
                details.furnished.label(),
                details.amenities.join(", ")
            ),
            PropertyDetails::Flat(details) => write!(
                f,
                "Furnished: {}, Amenities: {}, BHK: {}",
                details.furnished.label(),
                details.amenities.join(", "),
                details.bhk
            ),
        }
    }
}

/// Landlord input for creating or editing a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub address: Address,
    pub rent_amount: f64,
    pub details: PropertyDetails,
}

/// Listing as read back from the store.
///
/// `property_type` and `details` are `None` when the stored type tag is not recognised;
/// `details` alone is `None` when the payload could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub property_type: Option<PropertyType>,
    pub title: String,
    pub address: Address,
    pub landlord_username: String,
    pub rent_amount: f64,
    pub approved: bool,
    pub rented: bool,
    pub details: Option<PropertyDetails>,
}

impl Property {
    pub fn type_label(&self) -> &'static str {
        self.property_type
            .map(PropertyType::label)
            .unwrap_or("Unknown")
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.landlord_username == username
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// Landlord response to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDecision {
    Accept,
    Reject,
}

impl RequestDecision {
    pub const fn status(self) -> RequestStatus {
        match self {
            RequestDecision::Accept => RequestStatus::Accepted,
            RequestDecision::Reject => RequestStatus::Rejected,
        }
    }
}

/// Tenant request to rent a property, as persisted in the requests collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentRequest {
    #[serde(rename = "_id")]
    pub id: RequestId,
    pub property_id: PropertyId,
    pub tenant_username: String,
    pub landlord_username: String,
    #[serde(rename = "request_status")]
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}
