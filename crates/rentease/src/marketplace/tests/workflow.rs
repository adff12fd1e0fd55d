use std::sync::Arc;

use super::common::*;
use crate::marketplace::{
    Actor, ListingScope, MarketplaceError, PropertyId, PropertyRepository, PropertyService,
    RentalWorkflow, RequestDecision, RequestId, RequestService, RequestStatus, Role,
    UserRepository, UserService,
};
use crate::store::MemoryStore;

fn seed_parties(store: &MemoryStore) {
    seed_user(store, "asha", Role::User);
    seed_user(store, "meera", Role::User);
    seed_user(store, "root", Role::Admin);
}

#[test]
fn requesting_a_property_drops_it_from_the_wishlist() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let flat = workflow
        .properties()
        .list_property(&landlord(), flat_draft())
        .expect("list");
    workflow
        .users()
        .add_to_wishlist("asha", house.id.clone())
        .expect("wishlist");
    workflow
        .users()
        .add_to_wishlist("asha", flat.id.clone())
        .expect("wishlist");

    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    assert_eq!(request.landlord_username, "meera");
    assert_eq!(request.status, RequestStatus::Pending);
    let wishlist = workflow.wishlist(&tenant()).expect("wishlist");
    assert_eq!(wishlist.len(), 1);
    assert_eq!(wishlist[0].id, flat.id);
}

#[test]
fn landlords_cannot_request_their_own_listing() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");

    assert!(matches!(
        workflow.request_property(&landlord(), &house.id),
        Err(MarketplaceError::SelfRequest)
    ));
    assert!(workflow
        .requests()
        .requests_for_landlord("meera")
        .expect("requests")
        .is_empty());
}

#[test]
fn requesting_a_missing_property_is_not_found() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);

    assert!(matches!(
        workflow.request_property(&tenant(), &PropertyId("gone".to_string())),
        Err(MarketplaceError::PropertyNotFound(_))
    ));
}

#[test]
fn first_acceptance_rents_the_property_and_resolves_the_request() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    let accepted = workflow
        .respond_to_request(&landlord(), &request.id, RequestDecision::Accept)
        .expect("accept");
    assert_eq!(accepted.status, RequestStatus::Accepted);
    assert!(
        workflow
            .properties()
            .find_by_id(&house.id)
            .expect("lookup")
            .expect("present")
            .rented
    );

    for decision in [RequestDecision::Accept, RequestDecision::Reject] {
        match workflow.respond_to_request(&landlord(), &request.id, decision) {
            Err(MarketplaceError::AlreadyResolved { status, .. }) => {
                assert_eq!(status, RequestStatus::Accepted)
            }
            other => panic!("expected already resolved, got {other:?}"),
        }
    }
    let stored = workflow
        .requests()
        .find_by_id(&request.id)
        .expect("lookup")
        .expect("present");
    assert_eq!(stored.status, RequestStatus::Accepted);
}

#[test]
fn rejection_leaves_the_property_available() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    workflow
        .respond_to_request(&landlord(), &request.id, RequestDecision::Reject)
        .expect("reject");

    assert!(
        !workflow
            .properties()
            .find_by_id(&house.id)
            .expect("lookup")
            .expect("present")
            .rented
    );
    assert!(matches!(
        workflow.respond_to_request(&landlord(), &request.id, RequestDecision::Accept),
        Err(MarketplaceError::AlreadyResolved { .. })
    ));
}

#[test]
fn only_the_addressed_landlord_may_respond() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    assert!(matches!(
        workflow.respond_to_request(&tenant(), &request.id, RequestDecision::Accept),
        Err(MarketplaceError::Forbidden { .. })
    ));
}

fn second_tenant() -> Actor {
    Actor::new("ravi", Role::User)
}

#[test]
fn rented_listings_cannot_be_requested() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    seed_user(&store, "ravi", Role::User);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");
    workflow
        .respond_to_request(&landlord(), &request.id, RequestDecision::Accept)
        .expect("accept");

    match workflow.request_property(&second_tenant(), &house.id) {
        Err(MarketplaceError::PropertyUnavailable(id)) => assert_eq!(id, house.id),
        other => panic!("expected unavailable property, got {other:?}"),
    }
    assert!(workflow
        .requests()
        .requests_for_tenant("ravi")
        .expect("requests")
        .is_empty());
}

#[test]
fn a_tenant_holds_one_pending_request_per_listing() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let first = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    assert!(matches!(
        workflow.request_property(&tenant(), &house.id),
        Err(MarketplaceError::DuplicateRequest(_))
    ));
    assert_eq!(
        workflow
            .requests()
            .requests_for_tenant("asha")
            .expect("requests")
            .len(),
        1
    );

    workflow
        .respond_to_request(&landlord(), &first.id, RequestDecision::Reject)
        .expect("reject");
    let retry = workflow
        .request_property(&tenant(), &house.id)
        .expect("request again after rejection");
    assert_eq!(retry.status, RequestStatus::Pending);
}

#[test]
fn only_one_request_per_listing_can_be_accepted() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    seed_user(&store, "ravi", Role::User);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let first = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");
    let second = workflow
        .request_property(&second_tenant(), &house.id)
        .expect("request");

    workflow
        .respond_to_request(&landlord(), &first.id, RequestDecision::Accept)
        .expect("accept first");
    assert!(matches!(
        workflow.respond_to_request(&landlord(), &second.id, RequestDecision::Accept),
        Err(MarketplaceError::PropertyUnavailable(_))
    ));

    let status = |id: &RequestId| {
        workflow
            .requests()
            .find_by_id(id)
            .expect("lookup")
            .expect("present")
            .status
    };
    assert_eq!(status(&first.id), RequestStatus::Accepted);
    assert_eq!(status(&second.id), RequestStatus::Pending);

    workflow
        .respond_to_request(&landlord(), &second.id, RequestDecision::Reject)
        .expect("reject second");
    assert_eq!(status(&second.id), RequestStatus::Rejected);
}

#[test]
fn an_accepted_request_reserves_the_listing_before_the_flag_is_written() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    seed_user(&store, "ravi", Role::User);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let first = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");
    let second = workflow
        .request_property(&second_tenant(), &house.id)
        .expect("request");
    workflow
        .respond_to_request(&landlord(), &first.id, RequestDecision::Accept)
        .expect("accept first");
    store.set_rented(&house.id, false).expect("simulate lost write");

    assert!(matches!(
        workflow.respond_to_request(&landlord(), &second.id, RequestDecision::Accept),
        Err(MarketplaceError::PropertyUnavailable(_))
    ));

    workflow
        .respond_to_request(&landlord(), &first.id, RequestDecision::Accept)
        .expect("repair");
    assert!(
        workflow
            .properties()
            .find_by_id(&house.id)
            .expect("lookup")
            .expect("present")
            .rented
    );
}

fn flaky_workflow(
    failures: u32,
) -> (
    RentalWorkflow<MemoryStore, FlakyRentedStore, MemoryStore>,
    Arc<FlakyRentedStore>,
) {
    let store = Arc::new(MemoryStore::new());
    seed_parties(&store);
    let flaky = Arc::new(FlakyRentedStore::new(store.clone(), failures));
    let workflow = RentalWorkflow::new(
        UserService::new(store.clone()),
        PropertyService::new(flaky.clone()),
        RequestService::new(store),
        3,
    );
    (workflow, flaky)
}

#[test]
fn transient_rented_write_failures_are_retried() {
    let (workflow, flaky) = flaky_workflow(2);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    workflow
        .respond_to_request(&landlord(), &request.id, RequestDecision::Accept)
        .expect("accept after retries");

    assert_eq!(flaky.rented_calls(), 3);
    assert!(
        flaky
            .find_by_id(&house.id)
            .expect("lookup")
            .expect("present")
            .rented
    );
}

#[test]
fn exhausted_retries_report_and_reacceptance_repairs() {
    let (workflow, flaky) = flaky_workflow(4);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    let request = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");

    match workflow.respond_to_request(&landlord(), &request.id, RequestDecision::Accept) {
        Err(MarketplaceError::RentalSyncFailed {
            request_id,
            property_id,
            ..
        }) => {
            assert_eq!(request_id, request.id);
            assert_eq!(property_id, house.id);
        }
        other => panic!("expected rental sync failure, got {other:?}"),
    }
    assert_eq!(
        workflow
            .requests()
            .find_by_id(&request.id)
            .expect("lookup")
            .expect("present")
            .status,
        RequestStatus::Accepted
    );
    assert!(
        !flaky
            .find_by_id(&house.id)
            .expect("lookup")
            .expect("present")
            .rented
    );

    let repaired = workflow
        .respond_to_request(&landlord(), &request.id, RequestDecision::Accept)
        .expect("repair");
    assert_eq!(repaired.status, RequestStatus::Accepted);
    assert_eq!(flaky.rented_calls(), 5);
    assert!(
        flaky
            .find_by_id(&house.id)
            .expect("lookup")
            .expect("present")
            .rented
    );
}

#[test]
fn wishlist_skips_deleted_listings() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    workflow
        .users()
        .add_to_wishlist("asha", PropertyId("deleted".to_string()))
        .expect("wishlist");
    workflow
        .users()
        .add_to_wishlist("asha", house.id.clone())
        .expect("wishlist");

    let wishlist = workflow.wishlist(&tenant()).expect("wishlist");
    assert_eq!(wishlist.len(), 1);
    assert_eq!(wishlist[0].id, house.id);
}

#[test]
fn inbox_and_tenant_views_join_related_records() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    workflow
        .request_property(&tenant(), &house.id)
        .expect("request");
    workflow
        .properties()
        .delete_listed_property(&landlord(), &house.id)
        .expect("delete");
    let flat = workflow
        .properties()
        .list_property(&landlord(), flat_draft())
        .expect("list");
    workflow
        .request_property(&tenant(), &flat.id)
        .expect("request");

    let inbox = workflow.landlord_inbox(&landlord()).expect("inbox");
    assert_eq!(inbox.len(), 2);
    assert!(inbox[0].property.is_none(), "deleted listing is not found");
    assert_eq!(
        inbox[1].property.as_ref().map(|property| &property.id),
        Some(&flat.id)
    );
    assert_eq!(
        inbox[1].tenant.as_ref().map(|user| user.username.as_str()),
        Some("asha")
    );

    let mine = workflow.tenant_requests(&tenant()).expect("tenant view");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|view| view.tenant.is_none()));
}

#[test]
fn deleting_a_user_cascades_to_listings_and_pending_requests() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    seed_user(&store, "ravi", Role::User);
    let ravi = Actor::new("ravi", Role::User);

    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");
    workflow
        .properties()
        .list_property(&landlord(), flat_draft())
        .expect("list");
    let shop = workflow
        .properties()
        .list_property(&ravi, commercial_draft())
        .expect("list");
    let to_meera = workflow
        .request_property(&tenant(), &house.id)
        .expect("request");
    let to_ravi = workflow
        .request_property(&tenant(), &shop.id)
        .expect("request");

    let report = workflow.delete_user(&admin(), "meera").expect("delete");

    assert_eq!(report.properties_deleted, 2);
    assert_eq!(report.requests_rejected, 1);
    assert!(store.find_by_username("meera").expect("lookup").is_none());
    assert!(workflow
        .properties()
        .listed_properties(&ListingScope::OwnedBy("meera".to_string()))
        .expect("owned")
        .is_empty());
    assert!(workflow
        .properties()
        .find_by_id(&shop.id)
        .expect("lookup")
        .is_some());

    let status = |id: &RequestId| {
        workflow
            .requests()
            .find_by_id(id)
            .expect("lookup")
            .expect("present")
            .status
    };
    assert_eq!(status(&to_meera.id), RequestStatus::Rejected);
    assert_eq!(status(&to_ravi.id), RequestStatus::Pending);
}

#[test]
fn admin_operations_require_the_admin_role() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    let house = workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");

    assert!(matches!(
        workflow.delete_user(&tenant(), "meera"),
        Err(MarketplaceError::Forbidden { .. })
    ));
    assert!(matches!(
        workflow.approve_property(&landlord(), &house.id),
        Err(MarketplaceError::Forbidden { .. })
    ));
    assert!(matches!(
        workflow.pending_properties(&tenant()),
        Err(MarketplaceError::Forbidden { .. })
    ));
    assert!(matches!(
        workflow.delete_user(&admin(), "root"),
        Err(MarketplaceError::Forbidden { .. })
    ));
    assert!(matches!(
        workflow.delete_user(&admin(), "ghost"),
        Err(MarketplaceError::UserNotFound(_))
    ));

    assert_eq!(workflow.pending_properties(&admin()).expect("pending").len(), 1);
    workflow
        .approve_property(&admin(), &house.id)
        .expect("approve");
    assert!(workflow
        .pending_properties(&admin())
        .expect("pending")
        .is_empty());
}

#[test]
fn overview_lists_each_account_with_its_listings() {
    let (workflow, store) = build_workflow();
    seed_parties(&store);
    workflow
        .properties()
        .list_property(&landlord(), house_draft())
        .expect("list");

    let overview = workflow.users_overview(&admin()).expect("overview");

    let summary: Vec<_> = overview
        .iter()
        .map(|entry| (entry.user.username.as_str(), entry.listings.len()))
        .collect();
    assert_eq!(summary, vec![("asha", 0), ("meera", 1)]);
}
