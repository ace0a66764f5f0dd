use smartmarks::types::errors::*;

// === ValidationError Tests ===

#[test]
fn validation_error_empty_title_display() {
    let err = ValidationError::EmptyTitle;
    assert_eq!(err.to_string(), "Title must not be empty");
}

#[test]
fn validation_error_empty_url_display() {
    let err = ValidationError::EmptyUrl;
    assert_eq!(err.to_string(), "URL must not be empty");
}

#[test]
fn validation_error_invalid_url_display() {
    let err = ValidationError::InvalidUrl("not a url".to_string());
    assert_eq!(err.to_string(), "Invalid URL: not a url");
}

#[test]
fn validation_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(ValidationError::EmptyTitle);
    assert!(err.source().is_none());
}

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::Database("UNIQUE constraint failed".to_string()).to_string(),
        "Store database error: UNIQUE constraint failed"
    );
    assert_eq!(
        StoreError::Unavailable("worker cancelled".to_string()).to_string(),
        "Store unavailable: worker cancelled"
    );
}

#[test]
fn store_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StoreError::Database("oops".to_string()));
    assert!(err.source().is_none());
}

// === SubscriptionError Tests ===

#[test]
fn subscription_error_display_variants() {
    assert_eq!(
        SubscriptionError::Lagged(7).to_string(),
        "Subscription lagged: 7 changes missed"
    );
    assert_eq!(SubscriptionError::Closed.to_string(), "Subscription closed");
}

// === AuthError Tests ===

#[test]
fn auth_error_display() {
    assert_eq!(AuthError::Unauthenticated.to_string(), "Not authenticated");
}

// === DashboardError Tests ===

#[test]
fn dashboard_error_forwards_validation_message() {
    let err = DashboardError::Validation(ValidationError::InvalidUrl("docs.rs".to_string()));
    assert_eq!(err.to_string(), "Invalid URL: docs.rs");
}

#[test]
fn dashboard_error_forwards_store_message() {
    let err = DashboardError::Store(StoreError::Database("disk full".to_string()));
    assert_eq!(err.to_string(), "Store database error: disk full");
}

#[test]
fn dashboard_error_delete_in_flight_display() {
    let err = DashboardError::DeleteInFlight("bm-9".to_string());
    assert_eq!(err.to_string(), "Delete already in flight: bm-9");
}

#[test]
fn dashboard_error_closed_display() {
    assert_eq!(DashboardError::Closed.to_string(), "Dashboard session closed");
}

#[test]
fn dashboard_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(DashboardError::Closed);
    assert!(err.source().is_none());
}

#[test]
fn errors_are_comparable() {
    assert_eq!(
        DashboardError::DeleteInFlight("a".to_string()),
        DashboardError::DeleteInFlight("a".to_string())
    );
    assert_ne!(
        DashboardError::Closed,
        DashboardError::Store(StoreError::Unavailable("x".to_string()))
    );
}
