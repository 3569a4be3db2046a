//! End-to-end store flows against a wiremock backend: login and session
//! persistence, checkout, cancellation, and optimistic rollback.

use gursha_client::gateway::ApiGateway;
use gursha_client::models::{AddressInput, Credentials, MenuItem};
use gursha_client::storage::{FileStorage, MemoryStorage};
use gursha_client::stores::{
    AuthStore, CartError, CartStore, OrderStore, ProfileStore, RecipeStore, RestaurantStore,
};
use gursha_client::ClientConfig;
use gursha_core::{
    AddressId, AddressLabel, CommentId, CurrencyCode, MenuItemId, Money, OrderId, OrderStatus,
    PaymentMethodId, RecipeId, RestaurantId,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_gateway(server: &MockServer) -> ApiGateway {
    let config =
        ClientConfig::for_base_url(&server.uri()).expect("mock server uri should parse");
    ApiGateway::new(&config)
}

fn etb(s: &str) -> Money {
    Money::new(Decimal::from_str(s).expect("valid decimal"), CurrencyCode::ETB)
}

fn money_json(amount: &str) -> serde_json::Value {
    serde_json::json!({ "amount": amount, "currency": "ETB" })
}

fn menu_item(id: &str, price: &str) -> MenuItem {
    MenuItem {
        id: MenuItemId::new(id),
        restaurant_id: RestaurantId::new("r1"),
        name: "Doro Wat".to_string(),
        description: String::new(),
        price: etb(price),
        image_url: None,
        available: true,
    }
}

fn user_json() -> serde_json::Value {
    serde_json::json!({
        "id": "u1",
        "name": "Sara Tesfaye",
        "email": "sara@example.com",
        "phone": "+251911000111",
        "created_at": "2026-01-01T00:00:00Z"
    })
}

fn order_json(status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "ord_1",
        "restaurant_id": "r1",
        "lines": [
            { "name": "Doro Wat", "unit_price": money_json("14.99"), "quantity": 2 }
        ],
        "status": status,
        "address_id": "a1",
        "payment_method_id": "p1",
        "subtotal": money_json("45.94"),
        "delivery_fee": money_json("2.99"),
        "tax": money_json("6.89"),
        "tip": money_json("5.00"),
        "total": money_json("60.82"),
        "placed_at": "2026-08-01T10:00:00Z"
    })
}

#[tokio::test]
async fn login_session_survives_process_restart() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "token": "tok_live",
        "data": { "user": user_json() }
    });
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let dir = std::env::temp_dir().join(format!("gursha-test-{}", uuid::Uuid::new_v4()));
    let session_path = dir.join("session.json");

    {
        let mut auth = AuthStore::new(test_gateway(&server), FileStorage::new(&session_path));
        let name = auth
            .login(&Credentials {
                email: "sara@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .expect("login should succeed")
            .name
            .clone();
        assert_eq!(name, "Sara Tesfaye");
        assert!(auth.is_authenticated());
    }

    // A new process rehydrates from storage with no network call.
    let mut auth = AuthStore::new(test_gateway(&server), FileStorage::new(&session_path));
    auth.initialize().await.expect("initialize should succeed");
    assert!(auth.is_authenticated());
    assert_eq!(auth.user().expect("user present").name, "Sara Tesfaye");

    auth.logout().await.expect("logout should succeed");
    assert!(!auth.is_authenticated());

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn failed_login_records_error_and_stays_signed_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = std::env::temp_dir().join(format!("gursha-test-{}", uuid::Uuid::new_v4()));
    let mut auth = AuthStore::new(
        test_gateway(&server),
        FileStorage::new(dir.join("session.json")),
    );

    let result = auth
        .login(&Credentials {
            email: "sara@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert!(!auth.is_authenticated());
    assert!(!auth.is_loading());
    assert_eq!(auth.error(), Some("unauthorized"));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn checkout_clears_cart_and_returns_server_totals() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "success",
        "data": { "order": order_json("pending") }
    });
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let mut cart = CartStore::new(test_gateway(&server));
    cart.add_item(menu_item("m1", "14.99"), 2, None)
        .expect("add should succeed");
    cart.set_tip(etb("5.00"));

    let order = cart
        .checkout(
            Some(&AddressId::new("a1")),
            Some(&PaymentMethodId::new("p1")),
        )
        .await
        .expect("checkout should succeed");

    // Totals come from the backend verbatim, not from local arithmetic.
    assert_eq!(order.total, etb("60.82"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(cart.is_empty());
    assert!(cart.restaurant_id().is_none());
}

#[tokio::test]
async fn failed_checkout_keeps_cart_for_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("kitchen on fire"))
        .mount(&server)
        .await;

    let mut cart = CartStore::new(test_gateway(&server));
    cart.add_item(menu_item("m1", "14.99"), 2, None)
        .expect("add should succeed");

    let err = cart
        .checkout(
            Some(&AddressId::new("a1")),
            Some(&PaymentMethodId::new("p1")),
        )
        .await
        .expect_err("checkout should fail");

    assert!(matches!(err, CartError::Api(_)));
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.subtotal(), etb("29.98"));
}

#[tokio::test]
async fn cancel_applies_server_confirmed_order() {
    let server = MockServer::start().await;

    let list = serde_json::json!({
        "status": "success",
        "data": [order_json("confirmed")]
    });
    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&list))
        .mount(&server)
        .await;

    let cancelled = serde_json::json!({
        "status": "success",
        "data": { "order": order_json("cancelled") }
    });
    Mock::given(method("POST"))
        .and(path("/orders/ord_1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&cancelled))
        .expect(1)
        .mount(&server)
        .await;

    let mut orders = OrderStore::new(test_gateway(&server));
    orders.load().await.expect("load should succeed");

    let id = OrderId::new("ord_1");
    let order = orders.cancel(&id).await.expect("cancel should succeed");
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert_eq!(
        orders.get(&id).expect("still tracked").status,
        OrderStatus::Cancelled
    );
}

#[tokio::test]
async fn default_address_flip_rolls_back_on_server_error() {
    let server = MockServer::start().await;

    let addresses = serde_json::json!({
        "status": "success",
        "data": [
            {
                "id": "a1",
                "label": "home",
                "line": "Bole Road",
                "district": "Bole",
                "city": "Addis Ababa",
                "is_default": true
            },
            {
                "id": "a2",
                "label": "work",
                "line": "Churchill Avenue",
                "district": "Kirkos",
                "city": "Addis Ababa",
                "is_default": false
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&addresses))
        .mount(&server)
        .await;

    let payment_methods = serde_json::json!({ "status": "success", "data": [] });
    Mock::given(method("GET"))
        .and(path("/payment-methods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payment_methods))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/addresses/a2/default"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut profile = ProfileStore::new(test_gateway(&server));
    profile.load().await.expect("load should succeed");

    let result = profile.set_default_address(&AddressId::new("a2")).await;
    assert!(result.is_err());

    // The optimistic flip rolled back; a1 is still the sole default.
    let defaults: Vec<_> = profile.addresses().iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, AddressId::new("a1"));
}

#[tokio::test]
async fn default_address_flip_leaves_exactly_one_default() {
    let server = MockServer::start().await;

    let addresses = serde_json::json!({
        "status": "success",
        "data": [
            {
                "id": "a1",
                "label": "home",
                "line": "Bole Road",
                "district": "Bole",
                "city": "Addis Ababa",
                "is_default": true
            },
            {
                "id": "a2",
                "label": "work",
                "line": "Churchill Avenue",
                "district": "Kirkos",
                "city": "Addis Ababa",
                "is_default": false
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&addresses))
        .mount(&server)
        .await;

    let payment_methods = serde_json::json!({ "status": "success", "data": [] });
    Mock::given(method("GET"))
        .and(path("/payment-methods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payment_methods))
        .mount(&server)
        .await;

    let ack = serde_json::json!({ "status": "success", "data": null });
    Mock::given(method("POST"))
        .and(path("/addresses/a2/default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&ack))
        .expect(1)
        .mount(&server)
        .await;

    let mut profile = ProfileStore::new(test_gateway(&server));
    profile.load().await.expect("load should succeed");

    profile
        .set_default_address(&AddressId::new("a2"))
        .await
        .expect("flip should succeed");

    let defaults: Vec<_> = profile.addresses().iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, AddressId::new("a2"));
    assert_eq!(
        profile.default_address().expect("default present").id,
        AddressId::new("a2")
    );
}

#[tokio::test]
async fn add_address_returns_server_copy() {
    let server = MockServer::start().await;

    let created = serde_json::json!({
        "status": "success",
        "data": {
            "id": "a9",
            "label": "home",
            "line": "Bole Road",
            "district": "Bole",
            "city": "Addis Ababa",
            "is_default": true
        }
    });
    Mock::given(method("POST"))
        .and(path("/addresses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let mut profile = ProfileStore::new(test_gateway(&server));
    let address = profile
        .add_address(&AddressInput {
            label: AddressLabel::Home,
            line: "Bole Road".to_string(),
            district: "Bole".to_string(),
            city: "Addis Ababa".to_string(),
            landmark: None,
            location: None,
            is_default: true,
        })
        .await
        .expect("add should succeed");

    // The backend-assigned copy is both returned and stored.
    assert_eq!(address.id, AddressId::new("a9"));
    assert_eq!(profile.addresses().len(), 1);
    assert_eq!(
        profile.default_address().expect("default present").id,
        AddressId::new("a9")
    );
}

#[tokio::test]
async fn posted_comment_is_server_copy() {
    let server = MockServer::start().await;

    let feed = serde_json::json!({
        "status": "success",
        "data": [
            {
                "id": "rc1",
                "author_id": "u1",
                "title": "Misir Wat",
                "ingredients": ["red lentils"],
                "steps": ["Simmer until thick"],
                "likes": 0
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&feed))
        .mount(&server)
        .await;

    let posted = serde_json::json!({
        "status": "success",
        "data": {
            "comment": {
                "id": "c1",
                "author_id": "u1",
                "author_name": "Sara Tesfaye",
                "body": "Delicious",
                "created_at": "2026-08-01T10:00:00Z"
            }
        }
    });
    Mock::given(method("POST"))
        .and(path("/recipes/rc1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&posted))
        .expect(1)
        .mount(&server)
        .await;

    let mut recipes = RecipeStore::new(test_gateway(&server));
    recipes.load().await.expect("load should succeed");

    let id = RecipeId::new("rc1");
    let comment = recipes
        .add_comment(&id, "Delicious")
        .await
        .expect("comment should succeed");

    // The server-assigned copy is both returned and appended.
    assert_eq!(comment.id, CommentId::new("c1"));
    let thread = &recipes.get(&id).expect("recipe present").comments;
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].id, CommentId::new("c1"));
}

#[tokio::test]
async fn logout_drops_cached_reads() {
    let server = MockServer::start().await;

    let feed = serde_json::json!({
        "status": "success",
        "data": [
            {
                "id": "rc1",
                "author_id": "u1",
                "title": "Misir Wat",
                "ingredients": ["red lentils"],
                "steps": ["Simmer until thick"],
                "likes": 0
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&feed))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = test_gateway(&server);
    gateway.list_recipes().await.expect("first fetch");
    gateway.list_recipes().await.expect("cached fetch");

    let mut auth = AuthStore::new(gateway.clone(), MemoryStorage::new());
    auth.logout().await.expect("logout should succeed");

    // Cached reads carry viewer-scoped fields, so signing out drops them
    // and the next read goes back to the server.
    gateway.list_recipes().await.expect("refetch after logout");
}

#[tokio::test]
async fn menu_refresh_bypasses_cache() {
    let server = MockServer::start().await;

    let menu = serde_json::json!({
        "status": "success",
        "data": [
            {
                "id": "m1",
                "restaurant_id": "r1",
                "name": "Doro Wat",
                "description": "",
                "price": money_json("14.99"),
                "available": true
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/restaurants/r1/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&menu))
        .expect(2)
        .mount(&server)
        .await;

    let store = RestaurantStore::new(test_gateway(&server));
    let id = RestaurantId::new("r1");

    store.menu(&id).await.expect("first fetch");
    store.menu(&id).await.expect("cached fetch");

    let items = store.refresh_menu(&id).await.expect("forced refetch");
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn like_reconciles_to_server_count() {
    let server = MockServer::start().await;

    let feed = serde_json::json!({
        "status": "success",
        "data": [
            {
                "id": "rc1",
                "author_id": "u1",
                "title": "Misir Wat",
                "ingredients": ["red lentils", "berbere"],
                "steps": ["Simmer until thick"],
                "likes": 10
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&feed))
        .mount(&server)
        .await;

    // Another user liked in the meantime, so the confirmed count is 12,
    // not the locally estimated 11.
    let like = serde_json::json!({
        "status": "success",
        "data": { "liked": true, "likes": 12 }
    });
    Mock::given(method("POST"))
        .and(path("/recipes/rc1/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&like))
        .expect(1)
        .mount(&server)
        .await;

    let mut recipes = RecipeStore::new(test_gateway(&server));
    recipes.load().await.expect("load should succeed");

    let id = RecipeId::new("rc1");
    recipes.toggle_like(&id).await.expect("like should succeed");

    let recipe = recipes.get(&id).expect("recipe present");
    assert!(recipe.liked);
    assert_eq!(recipe.likes, 12);
}
