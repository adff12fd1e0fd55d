use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::marketplace::{
    Actor, Address, CommercialDetails, CommercialSubtype, FlatDetails, FurnishedCategory,
    HouseDetails, ListingDraft, Property, PropertyDetails, PropertyFilter, PropertyId,
    PropertyRepository, PropertyService, RentRequest, RentalWorkflow, RepositoryError,
    RequestFilter, RequestId, RequestRepository, RequestService, RequestStatus, Role,
    SignUpForm, User, UserRepository, UserService,
};
use crate::store::MemoryStore;

pub(super) type MemoryWorkflow = RentalWorkflow<MemoryStore, MemoryStore, MemoryStore>;

pub(super) fn build_workflow() -> (MemoryWorkflow, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let workflow = RentalWorkflow::new(
        UserService::new(store.clone()),
        PropertyService::new(store.clone()),
        RequestService::new(store.clone()),
        3,
    );
    (workflow, store)
}

pub(super) fn tenant() -> Actor {
    Actor::new("asha", Role::User)
}

pub(super) fn landlord() -> Actor {
    Actor::new("meera", Role::User)
}

pub(super) fn admin() -> Actor {
    Actor::new("root", Role::Admin)
}

pub(super) fn sign_up_form(username: &str) -> SignUpForm {
    SignUpForm {
        username: username.to_string(),
        password: "Str0ng!pass".to_string(),
        name: "Asha Kulkarni".to_string(),
        age: 29,
        email: format!("{username}@example.in"),
        phone_number: "9876543210".to_string(),
        address: "12 FC Road, Pune".to_string(),
    }
}

/// Insert an account directly, skipping password hashing.
pub(super) fn seed_user(store: &MemoryStore, username: &str, role: Role) -> User {
    UserRepository::insert(
        store,
        User {
            username: username.to_string(),
            password_hash: "unused".to_string(),
            name: username.to_string(),
            age: 35,
            email: format!("{username}@example.in"),
            phone_number: "9123456780".to_string(),
            address: "Pune".to_string(),
            role,
            wishlist: Vec::new(),
        },
    )
    .expect("seed user")
}

pub(super) fn pune_address() -> Address {
    Address {
        area: "Kothrud".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: 411038,
    }
}

pub(super) fn house_draft() -> ListingDraft {
    ListingDraft {
        title: "Garden house".to_string(),
        address: pune_address(),
        rent_amount: 32000.0,
        details: PropertyDetails::House(HouseDetails {
            rooms: 4,
            furnished: FurnishedCategory::Semi,
            amenities: vec!["garden".to_string(), "garage".to_string()],
        }),
    }
}

pub(super) fn flat_draft() -> ListingDraft {
    ListingDraft {
        title: "Riverside 2BHK".to_string(),
        address: Address {
            area: "Aundh".to_string(),
            ..pune_address()
        },
        rent_amount: 21000.0,
        details: PropertyDetails::Flat(FlatDetails {
            furnished: FurnishedCategory::Fully,
            amenities: vec!["lift".to_string()],
            bhk: 2,
        }),
    }
}

pub(super) fn commercial_draft() -> ListingDraft {
    ListingDraft {
        title: "Commercial Space".to_string(),
        address: Address {
            area: "Downtown".to_string(),
            city: "Metropolis".to_string(),
            state: "NY".to_string(),
            pincode: 10001,
        },
        rent_amount: 2000.0,
        details: PropertyDetails::Commercial(CommercialDetails {
            floor_area: "5000 sq ft".to_string(),
            subtype: CommercialSubtype::Warehouse,
        }),
    }
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

/// Store double where every call fails as if the server were down.
pub(super) struct UnavailableStore;

impl UserRepository for UnavailableStore {
    fn insert(&self, _user: User) -> Result<User, RepositoryError> {
        Err(offline())
    }

    fn find_by_username(&self, _username: &str) -> Result<Option<User>, RepositoryError> {
        Err(offline())
    }

    fn update(&self, _user: User) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn delete(&self, _username: &str) -> Result<bool, RepositoryError> {
        Err(offline())
    }

    fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Err(offline())
    }
}

impl PropertyRepository for UnavailableStore {
    fn insert(&self, _property: Property) -> Result<Property, RepositoryError> {
        Err(offline())
    }

    fn find_by_id(&self, _id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        Err(offline())
    }

    fn find(&self, _filter: &PropertyFilter) -> Result<Vec<Property>, RepositoryError> {
        Err(offline())
    }

    fn update(&self, _property: Property) -> Result<(), RepositoryError> {
        Err(offline())
    }

    fn set_approved(&self, _id: &PropertyId, _approved: bool) -> Result<bool, RepositoryError> {
        Err(offline())
    }

    fn set_rented(&self, _id: &PropertyId, _rented: bool) -> Result<bool, RepositoryError> {
        Err(offline())
    }

    fn delete(&self, _id: &PropertyId) -> Result<bool, RepositoryError> {
        Err(offline())
    }

    fn delete_by_landlord(&self, _username: &str) -> Result<u64, RepositoryError> {
        Err(offline())
    }
}

impl RequestRepository for UnavailableStore {
    fn insert(&self, _request: RentRequest) -> Result<RentRequest, RepositoryError> {
        Err(offline())
    }

    fn find_by_id(&self, _id: &RequestId) -> Result<Option<RentRequest>, RepositoryError> {
        Err(offline())
    }

    fn find(&self, _filter: &RequestFilter) -> Result<Vec<RentRequest>, RepositoryError> {
        Err(offline())
    }

    fn set_status(&self, _id: &RequestId, _status: RequestStatus) -> Result<bool, RepositoryError> {
        Err(offline())
    }
}

/// Property store whose `set_rented` fails a fixed number of times before delegating.
pub(super) struct FlakyRentedStore {
    inner: Arc<MemoryStore>,
    failures_remaining: AtomicU32,
    rented_calls: AtomicU32,
}

impl FlakyRentedStore {
    pub(super) fn new(inner: Arc<MemoryStore>, failures: u32) -> Self {
        Self {
            inner,
            failures_remaining: AtomicU32::new(failures),
            rented_calls: AtomicU32::new(0),
        }
    }

    pub(super) fn rented_calls(&self) -> u32 {
        self.rented_calls.load(Ordering::SeqCst)
    }
}

impl PropertyRepository for FlakyRentedStore {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        PropertyRepository::insert(self.inner.as_ref(), property)
    }

    fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        PropertyRepository::find_by_id(self.inner.as_ref(), id)
    }

    fn find(&self, filter: &PropertyFilter) -> Result<Vec<Property>, RepositoryError> {
        PropertyRepository::find(self.inner.as_ref(), filter)
    }

    fn update(&self, property: Property) -> Result<(), RepositoryError> {
        PropertyRepository::update(self.inner.as_ref(), property)
    }

    fn set_approved(&self, id: &PropertyId, approved: bool) -> Result<bool, RepositoryError> {
        self.inner.set_approved(id, approved)
    }

    fn set_rented(&self, id: &PropertyId, rented: bool) -> Result<bool, RepositoryError> {
        self.rented_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.set_rented(id, rented)
    }

    fn delete(&self, id: &PropertyId) -> Result<bool, RepositoryError> {
        PropertyRepository::delete(self.inner.as_ref(), id)
    }

    fn delete_by_landlord(&self, username: &str) -> Result<u64, RepositoryError> {
        self.inner.delete_by_landlord(username)
    }
}
