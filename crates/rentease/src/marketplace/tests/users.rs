use std::sync::Arc;

use super::common::*;
use crate::marketplace::{
    MarketplaceError, ProfileUpdate, PropertyId, RepositoryError, Role, UserRepository,
    UserService, ValidationError,
};
use crate::store::MemoryStore;

fn service() -> (UserService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (UserService::new(store.clone()), store)
}

#[test]
fn sign_up_stores_a_hash_and_defaults_role_and_wishlist() {
    let (users, store) = service();

    let created = users.sign_up(sign_up_form("asha")).expect("sign up");

    assert_eq!(created.role, Role::User);
    assert!(created.wishlist.is_empty());
    assert_ne!(created.password_hash, "Str0ng!pass");
    assert!(created.password_hash.starts_with("$argon2"));
    let stored = store
        .find_by_username("asha")
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored, created);
}

#[test]
fn duplicate_username_is_rejected() {
    let (users, store) = service();
    seed_user(&store, "asha", Role::User);

    match users.sign_up(sign_up_form("asha")) {
        Err(MarketplaceError::DuplicateUsername(name)) => assert_eq!(name, "asha"),
        other => panic!("expected duplicate username, got {other:?}"),
    }
}

#[test]
fn sign_up_validates_before_touching_the_store() {
    let users = UserService::new(Arc::new(UnavailableStore));
    let mut form = sign_up_form("asha");
    form.phone_number = "12345".to_string();

    match users.sign_up(form) {
        Err(MarketplaceError::Validation(ValidationError::InvalidMobileNumber(number))) => {
            assert_eq!(number, "12345")
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn login_distinguishes_bad_credentials_from_store_failures() {
    let (users, _store) = service();
    users.sign_up(sign_up_form("asha")).expect("sign up");

    let actor = users
        .login("asha", "Str0ng!pass")
        .expect("login")
        .expect("authenticated");
    assert_eq!(actor.username(), "asha");
    assert!(!actor.is_admin());

    assert_eq!(users.login("asha", "Wr0ng!pass").expect("login"), None);
    assert_eq!(users.login("nobody", "Str0ng!pass").expect("login"), None);

    let offline = UserService::new(Arc::new(UnavailableStore));
    assert!(matches!(
        offline.login("asha", "Str0ng!pass"),
        Err(MarketplaceError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn adding_the_same_property_twice_fails_and_keeps_the_wishlist() {
    let (users, store) = service();
    seed_user(&store, "asha", Role::User);
    let id = PropertyId("p-1".to_string());

    users.add_to_wishlist("asha", id.clone()).expect("first add");
    match users.add_to_wishlist("asha", id.clone()) {
        Err(MarketplaceError::AlreadyInWishlist(duplicate)) => assert_eq!(duplicate, id),
        other => panic!("expected already in wishlist, got {other:?}"),
    }

    let stored = store
        .find_by_username("asha")
        .expect("lookup")
        .expect("stored");
    assert_eq!(stored.wishlist, vec![id]);
}

#[test]
fn wishlist_add_for_missing_user_is_not_found() {
    let (users, _store) = service();
    assert!(matches!(
        users.add_to_wishlist("ghost", PropertyId("p-1".to_string())),
        Err(MarketplaceError::UserNotFound(_))
    ));
}

#[test]
fn removing_keeps_the_order_of_the_rest() {
    let (users, store) = service();
    seed_user(&store, "asha", Role::User);
    for id in ["p-1", "p-2", "p-3"] {
        users
            .add_to_wishlist("asha", PropertyId(id.to_string()))
            .expect("add");
    }

    assert!(users
        .remove_from_wishlist("asha", &PropertyId("p-2".to_string()))
        .expect("remove"));
    assert!(!users
        .remove_from_wishlist("asha", &PropertyId("p-9".to_string()))
        .expect("remove"));

    let stored = store
        .find_by_username("asha")
        .expect("lookup")
        .expect("stored");
    assert_eq!(
        stored.wishlist,
        vec![PropertyId("p-1".to_string()), PropertyId("p-3".to_string())]
    );
}

#[test]
fn profile_update_keeps_identity_fields() {
    let (users, store) = service();
    let mut seeded = seed_user(&store, "asha", Role::User);
    seeded.wishlist.push(PropertyId("p-1".to_string()));
    store.update(seeded).expect("update");

    let updated = users
        .update_profile(
            &tenant(),
            ProfileUpdate {
                name: "Asha K".to_string(),
                age: 31,
                email: "asha.k@example.in".to_string(),
                phone_number: "8123456789".to_string(),
                address: "Baner, Pune".to_string(),
            },
        )
        .expect("update profile");

    assert_eq!(updated.name, "Asha K");
    assert_eq!(updated.password_hash, "unused");
    assert_eq!(updated.wishlist, vec![PropertyId("p-1".to_string())]);
}

#[test]
fn listing_accounts_requires_admin_and_hides_admins() {
    let (users, store) = service();
    seed_user(&store, "asha", Role::User);
    seed_user(&store, "meera", Role::User);
    seed_user(&store, "root", Role::Admin);

    assert!(matches!(
        users.list_non_admin_users(&tenant()),
        Err(MarketplaceError::Forbidden { .. })
    ));

    let names: Vec<_> = users
        .list_non_admin_users(&admin())
        .expect("list")
        .into_iter()
        .map(|user| user.username)
        .collect();
    assert_eq!(names, vec!["asha".to_string(), "meera".to_string()]);
}

#[test]
fn ensure_admin_is_idempotent_and_promotes_existing_accounts() {
    let (users, store) = service();

    let created = users.ensure_admin("root", "Adm1n!secret").expect("create");
    assert_eq!(created.role, Role::Admin);
    let again = users.ensure_admin("root", "ignored").expect("repeat");
    assert_eq!(again.password_hash, created.password_hash);
    assert_eq!(store.list().expect("list").len(), 1);

    seed_user(&store, "meera", Role::User);
    let promoted = users.ensure_admin("meera", "ignored").expect("promote");
    assert!(promoted.is_admin());
    assert_eq!(promoted.password_hash, "unused");
}
