use std::sync::{Mutex, MutexGuard};

use crate::marketplace::{
    Property, PropertyFilter, PropertyId, PropertyRepository, RentRequest, RepositoryError,
    RequestFilter, RequestId, RequestRepository, RequestStatus, User, UserRepository,
};

use super::documents::PropertyDocument;

/// Process-local store implementing every repository trait. Records keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    properties: Mutex<Vec<PropertyDocument>>,
    requests: Mutex<Vec<RentRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw property document, bypassing encoding. Used to seed legacy records.
    pub fn insert_document(&self, document: PropertyDocument) -> Result<(), RepositoryError> {
        let mut properties = lock(&self.properties)?;
        if properties.iter().any(|existing| existing.id == document.id) {
            return Err(RepositoryError::Conflict);
        }
        properties.push(document);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

impl UserRepository for MemoryStore {
    fn insert(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = lock(&self.users)?;
        if users.iter().any(|existing| existing.username == user.username) {
            return Err(RepositoryError::Conflict);
        }
        users.push(user.clone());
        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let users = lock(&self.users)?;
        Ok(users.iter().find(|user| user.username == username).cloned())
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = lock(&self.users)?;
        let slot = users
            .iter_mut()
            .find(|existing| existing.username == user.username)
            .ok_or(RepositoryError::NotFound)?;
        *slot = user;
        Ok(())
    }

    fn delete(&self, username: &str) -> Result<bool, RepositoryError> {
        let mut users = lock(&self.users)?;
        let before = users.len();
        users.retain(|user| user.username != username);
        Ok(users.len() != before)
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(lock(&self.users)?.clone())
    }
}

impl PropertyRepository for MemoryStore {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let document = PropertyDocument::from_property(&property)?;
        self.insert_document(document)?;
        Ok(property)
    }

    fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        let properties = lock(&self.properties)?;
        Ok(properties
            .iter()
            .find(|document| document.id == *id)
            .cloned()
            .map(PropertyDocument::into_property))
    }

    fn find(&self, filter: &PropertyFilter) -> Result<Vec<Property>, RepositoryError> {
        let properties = lock(&self.properties)?;
        Ok(properties
            .iter()
            .cloned()
            .map(PropertyDocument::into_property)
            .filter(|property| filter.matches(property))
            .collect())
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        let document = PropertyDocument::from_property(&property)?;
        let mut properties = lock(&self.properties)?;
        let slot = properties
            .iter_mut()
            .find(|existing| existing.id == document.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = document;
        Ok(())
    }

    fn set_approved(&self, id: &PropertyId, approved: bool) -> Result<bool, RepositoryError> {
        let mut properties = lock(&self.properties)?;
        Ok(match properties.iter_mut().find(|document| document.id == *id) {
            Some(document) => {
                document.is_approved_by_admin = approved;
                true
            }
            None => false,
        })
    }

    fn set_rented(&self, id: &PropertyId, rented: bool) -> Result<bool, RepositoryError> {
        let mut properties = lock(&self.properties)?;
        Ok(match properties.iter_mut().find(|document| document.id == *id) {
            Some(document) => {
                document.is_rented = rented;
                true
            }
            None => false,
        })
    }

    fn delete(&self, id: &PropertyId) -> Result<bool, RepositoryError> {
        let mut properties = lock(&self.properties)?;
        let before = properties.len();
        properties.retain(|document| document.id != *id);
        Ok(properties.len() != before)
    }

    fn delete_by_landlord(&self, username: &str) -> Result<u64, RepositoryError> {
        let mut properties = lock(&self.properties)?;
        let before = properties.len();
        properties.retain(|document| document.landlord_username != username);
        Ok((before - properties.len()) as u64)
    }
}

impl RequestRepository for MemoryStore {
    fn insert(&self, request: RentRequest) -> Result<RentRequest, RepositoryError> {
        let mut requests = lock(&self.requests)?;
        if requests.iter().any(|existing| existing.id == request.id) {
            return Err(RepositoryError::Conflict);
        }
        requests.push(request.clone());
        Ok(request)
    }

    fn find_by_id(&self, id: &RequestId) -> Result<Option<RentRequest>, RepositoryError> {
        let requests = lock(&self.requests)?;
        Ok(requests.iter().find(|request| request.id == *id).cloned())
    }

    fn find(&self, filter: &RequestFilter) -> Result<Vec<RentRequest>, RepositoryError> {
        let requests = lock(&self.requests)?;
        Ok(requests
            .iter()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect())
    }

    fn set_status(&self, id: &RequestId, status: RequestStatus) -> Result<bool, RepositoryError> {
        let mut requests = lock(&self.requests)?;
        Ok(match requests.iter_mut().find(|request| request.id == *id) {
            Some(request) => {
                request.status = status;
                true
            }
            None => false,
        })
    }
}
