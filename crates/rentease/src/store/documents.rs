use mongodb::bson::{self, Bson};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::marketplace::{
    Address, Property, PropertyDetails, PropertyId, PropertyType, RepositoryError,
};

/// Listing as persisted in the properties collection.
///
/// `details` is kept as raw BSON; its shape is chosen by the `property_type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDocument {
    #[serde(rename = "_id")]
    pub id: PropertyId,
    pub property_type: i32,
    pub title: String,
    pub address: Address,
    pub landlord_username: String,
    pub rent_amount: f64,
    pub is_approved_by_admin: bool,
    pub is_rented: bool,
    #[serde(default)]
    pub details: Option<Bson>,
}

impl PropertyDocument {
    pub fn from_property(property: &Property) -> Result<Self, RepositoryError> {
        let property_type = property
            .details
            .as_ref()
            .map(PropertyDetails::property_type)
            .or(property.property_type)
            .ok_or_else(|| {
                RepositoryError::Corrupt(format!("property {} has no type", property.id))
            })?;

        let details = property
            .details
            .as_ref()
            .map(encode_details)
            .transpose()?;

        Ok(Self {
            id: property.id.clone(),
            property_type: property_type.tag(),
            title: property.title.clone(),
            address: property.address.clone(),
            landlord_username: property.landlord_username.clone(),
            rent_amount: property.rent_amount,
            is_approved_by_admin: property.approved,
            is_rented: property.rented,
            details,
        })
    }

    /// Decode into the read model. Never fails: an unknown tag drops both the type and
    /// details, an undecodable payload drops only the details.
    pub fn into_property(self) -> Property {
        let property_type = match PropertyType::from_tag(self.property_type) {
            Ok(property_type) => Some(property_type),
            Err(err) => {
                warn!(property_id = %self.id, error = %err, "stored property has unknown type");
                None
            }
        };

        let details = match (property_type, self.details) {
            (Some(property_type), Some(raw)) => match decode_details(property_type, raw) {
                Ok(details) => Some(details),
                Err(err) => {
                    warn!(
                        property_id = %self.id,
                        property_type = property_type.label(),
                        error = %err,
                        "stored property details could not be decoded"
                    );
                    None
                }
            },
            _ => None,
        };

        Property {
            id: self.id,
            property_type,
            title: self.title,
            address: self.address,
            landlord_username: self.landlord_username,
            rent_amount: self.rent_amount,
            approved: self.is_approved_by_admin,
            rented: self.is_rented,
            details,
        }
    }
}

fn encode_details(details: &PropertyDetails) -> Result<Bson, RepositoryError> {
    let encoded = match details {
        PropertyDetails::Commercial(inner) => bson::to_bson(inner),
        PropertyDetails::House(inner) => bson::to_bson(inner),
        PropertyDetails::Flat(inner) => bson::to_bson(inner),
    };
    encoded.map_err(|err| RepositoryError::Corrupt(err.to_string()))
}

fn decode_details(
    property_type: PropertyType,
    raw: Bson,
) -> Result<PropertyDetails, bson::de::Error> {
    match property_type {
        PropertyType::Commercial => bson::from_bson(raw).map(PropertyDetails::Commercial),
        PropertyType::House => bson::from_bson(raw).map(PropertyDetails::House),
        PropertyType::Flat => bson::from_bson(raw).map(PropertyDetails::Flat),
    }
}
