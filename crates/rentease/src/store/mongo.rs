use mongodb::bson::{doc, Document};
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use mongodb::sync::{Client, Collection};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::marketplace::{
    Property, PropertyFilter, PropertyId, PropertyRepository, RentRequest, RepositoryError,
    RequestFilter, RequestId, RequestRepository, RequestStatus, User, UserRepository,
};

use super::documents::PropertyDocument;

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed store using the driver's blocking API.
pub struct MongoStore {
    users: Collection<User>,
    properties: Collection<PropertyDocument>,
    requests: Collection<RentRequest>,
}

impl MongoStore {
    /// Connect and ping the server so an unreachable store fails at startup.
    pub fn connect(config: &StoreConfig) -> Result<Self, RepositoryError> {
        let client = Client::with_uri_str(&config.uri).map_err(driver_error)?;
        let database = client.database(&config.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .map_err(driver_error)?;

        info!(database = %config.database, "connected to document store");

        Ok(Self {
            users: database.collection(&config.users_collection),
            properties: database.collection(&config.properties_collection),
            requests: database.collection(&config.requests_collection),
        })
    }
}

fn driver_error(err: DriverError) -> RepositoryError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            RepositoryError::Conflict
        }
        ErrorKind::BsonDeserialization(inner) => RepositoryError::Corrupt(inner.to_string()),
        ErrorKind::BsonSerialization(inner) => RepositoryError::Corrupt(inner.to_string()),
        _ => RepositoryError::Unavailable(err.to_string()),
    }
}

fn collect<T>(collection: &Collection<T>, filter: Document) -> Result<Vec<T>, RepositoryError>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = collection.find(filter, None).map_err(driver_error)?;
    cursor
        .collect::<Result<Vec<_>, _>>()
        .map_err(driver_error)
}

fn property_filter(filter: &PropertyFilter) -> Document {
    match filter {
        PropertyFilter::OwnedBy(username) => doc! { "landlord_username": username.as_str() },
        PropertyFilter::Unrented => doc! { "is_rented": false },
        PropertyFilter::PendingApproval => doc! { "is_approved_by_admin": false },
    }
}

fn request_filter(filter: &RequestFilter) -> Document {
    match filter {
        RequestFilter::Tenant(username) => doc! { "tenant_username": username.as_str() },
        RequestFilter::Landlord(username) => doc! { "landlord_username": username.as_str() },
        RequestFilter::PendingInvolving(username) => doc! {
            "request_status": RequestStatus::Pending.label(),
            "$or": [
                { "tenant_username": username.as_str() },
                { "landlord_username": username.as_str() },
            ],
        },
    }
}

impl UserRepository for MongoStore {
    fn insert(&self, user: User) -> Result<User, RepositoryError> {
        if self.find_by_username(&user.username)?.is_some() {
            return Err(RepositoryError::Conflict);
        }
        self.users.insert_one(&user, None).map_err(driver_error)?;
        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        debug!(username, "loading user");
        self.users
            .find_one(doc! { "username": username }, None)
            .map_err(driver_error)
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        let result = self
            .users
            .replace_one(doc! { "username": user.username.as_str() }, &user, None)
            .map_err(driver_error)?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete(&self, username: &str) -> Result<bool, RepositoryError> {
        let result = self
            .users
            .delete_one(doc! { "username": username }, None)
            .map_err(driver_error)?;
        Ok(result.deleted_count > 0)
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        collect(&self.users, Document::new())
    }
}

impl PropertyRepository for MongoStore {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let document = PropertyDocument::from_property(&property)?;
        self.properties
            .insert_one(&document, None)
            .map_err(driver_error)?;
        Ok(property)
    }

    fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        debug!(property_id = %id, "loading property");
        let document = self
            .properties
            .find_one(doc! { "_id": id.as_str() }, None)
            .map_err(driver_error)?;
        Ok(document.map(PropertyDocument::into_property))
    }

    fn find(&self, filter: &PropertyFilter) -> Result<Vec<Property>, RepositoryError> {
        let documents = collect(&self.properties, property_filter(filter))?;
        Ok(documents
            .into_iter()
            .map(PropertyDocument::into_property)
            .collect())
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let document = PropertyDocument::from_property(&property)?;
        let result = self
            .properties
            .replace_one(doc! { "_id": property.id.as_str() }, &document, None)
            .map_err(driver_error)?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn set_approved(&self, id: &PropertyId, approved: bool) -> Result<bool, RepositoryError> {
        let result = self
            .properties
            .update_one(
                doc! { "_id": id.as_str() },
                doc! { "$set": { "is_approved_by_admin": approved } },
                None,
            )
            .map_err(driver_error)?;
        Ok(result.matched_count > 0)
    }

    fn set_rented(&self, id: &PropertyId, rented: bool) -> Result<bool, RepositoryError> {
        let result = self
            .properties
            .update_one(
                doc! { "_id": id.as_str() },
                doc! { "$set": { "is_rented": rented } },
                None,
            )
            .map_err(driver_error)?;
        Ok(result.matched_count > 0)
    }

    fn delete(&self, id: &PropertyId) -> Result<bool, RepositoryError> {
        let result = self
            .properties
            .delete_one(doc! { "_id": id.as_str() }, None)
            .map_err(driver_error)?;
        Ok(result.deleted_count > 0)
    }

    fn delete_by_landlord(&self, username: &str) -> Result<u64, RepositoryError> {
        let result = self
            .properties
            .delete_many(doc! { "landlord_username": username }, None)
            .map_err(driver_error)?;
        Ok(result.deleted_count)
    }
}

impl RequestRepository for MongoStore {
    fn insert(&self, request: RentRequest) -> Result<RentRequest, RepositoryError> {
        self.requests
            .insert_one(&request, None)
            .map_err(driver_error)?;
        Ok(request)
    }

    fn find_by_id(&self, id: &RequestId) -> Result<Option<RentRequest>, RepositoryError> {
        self.requests
            .find_one(doc! { "_id": id.as_str() }, None)
            .map_err(driver_error)
    }

    fn find(&self, filter: &RequestFilter) -> Result<Vec<RentRequest>, RepositoryError> {
        collect(&self.requests, request_filter(filter))
    }

    fn set_status(&self, id: &RequestId, status: RequestStatus) -> Result<bool, RepositoryError> {
        let result = self
            .requests
            .update_one(
                doc! { "_id": id.as_str() },
                doc! { "$set": { "request_status": status.label() } },
                None,
            )
            .map_err(driver_error)?;
        Ok(result.matched_count > 0)
    }
}
