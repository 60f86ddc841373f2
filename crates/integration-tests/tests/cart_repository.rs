//! Cart repository contract tests.
//!
//! Each behavior is written once as a generic check over the repository
//! traits, then exercised against both store implementations: the in-memory
//! store (always) and PostgreSQL (`#[ignore]`d, requires `DATABASE_URL`; see
//! the crate docs for how to run).

use sugar_maple_core::{CartId, PublicId, UserId};
use sugar_maple_shop::db::{
    CartFilter, CartRepository, MemoryStore, OrderFilter, OrderRepository, RepositoryError,
    UserRepository,
};
use sugar_maple_shop::fixtures::{self, SampleData};
use sugar_maple_shop::models::User;

use sugar_maple_integration_tests::pg_store;

/// Seed the canonical scenario: two users, one order placed by the first.
async fn seed<U, O>(users: &U, orders: &O) -> SampleData
where
    U: UserRepository,
    O: OrderRepository,
{
    fixtures::seed_sample(users, orders, 2, 1)
        .await
        .expect("failed to seed sample data")
}

fn user1(data: &SampleData) -> &User {
    data.users.first().expect("two users seeded")
}

fn user2(data: &SampleData) -> &User {
    data.users.get(1).expect("two users seeded")
}

// ============================================================================
// Generic contract checks
// ============================================================================

async fn check_create_cart<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let owner = user1(&data);
    let owner_orders = orders
        .filter_all(&OrderFilter::new().user_id(owner.id))
        .await
        .expect("failed to load orders");

    let cart = carts
        .create(owner.id, &owner_orders)
        .await
        .expect("failed to create cart");

    assert_eq!(cart.user_id, owner.id);
    assert_eq!(cart.orders, owner_orders);
    assert_eq!(cart.orders.len(), 1);
}

async fn check_create_cart_missing_user<C>(carts: &C)
where
    C: CartRepository,
{
    let result = carts.create(UserId::new(424_242), &[]).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

async fn check_get_all_carts<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    carts
        .create(user1(&data).id, &data.orders)
        .await
        .expect("failed to create cart");
    carts
        .create(user2(&data).id, &[])
        .await
        .expect("failed to create cart");

    let all = carts.get_all().await.expect("failed to list carts");
    assert_eq!(all.len(), 2);
}

async fn check_get_cart_by_id<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let cart = carts
        .create(user1(&data).id, &data.orders)
        .await
        .expect("failed to create cart");

    let retrieved = carts
        .get_by_id(cart.id)
        .await
        .expect("lookup failed")
        .expect("cart should exist");
    assert_eq!(retrieved.id, cart.id);

    let absent = carts
        .get_by_id(CartId::new(424_242))
        .await
        .expect("lookup failed");
    assert!(absent.is_none());
}

async fn check_get_cart_by_public_id<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let cart = carts
        .create(user1(&data).id, &data.orders)
        .await
        .expect("failed to create cart");

    let retrieved = carts
        .get_by_public_id(&cart.public_id)
        .await
        .expect("lookup failed")
        .expect("cart should exist");
    assert_eq!(retrieved.id, cart.id);

    let absent = carts
        .get_by_public_id(&PublicId::random())
        .await
        .expect("lookup failed");
    assert!(absent.is_none());
}

async fn check_filter_carts<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let cart1 = carts
        .create(user1(&data).id, &data.orders)
        .await
        .expect("failed to create cart");
    let _cart2 = carts
        .create(user2(&data).id, &[])
        .await
        .expect("failed to create cart");

    let filtered = carts
        .filter(&CartFilter::new().user_id(user1(&data).id))
        .await
        .expect("filter failed")
        .expect("a cart should match");
    assert_eq!(filtered.id, cart1.id);
}

async fn check_filter_tie_break<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let owner = user1(&data);
    let first = carts
        .create(owner.id, &[])
        .await
        .expect("failed to create cart");
    let _second = carts
        .create(owner.id, &[])
        .await
        .expect("failed to create cart");

    // Multiple matches resolve deterministically to the lowest id.
    let filtered = carts
        .filter(&CartFilter::new().user_id(owner.id))
        .await
        .expect("filter failed")
        .expect("a cart should match");
    assert_eq!(filtered.id, first.id);
}

async fn check_filter_all_carts<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    carts
        .create(user1(&data).id, &data.orders)
        .await
        .expect("failed to create cart");
    carts
        .create(user2(&data).id, &[])
        .await
        .expect("failed to create cart");

    let owned = carts
        .filter_all(&CartFilter::new().user_id(user1(&data).id))
        .await
        .expect("filter failed");
    assert_eq!(owned.len(), 1);

    let all = carts
        .filter_all(&CartFilter::new())
        .await
        .expect("filter failed");
    assert_eq!(all.len(), 2);
}

async fn check_get_or_create_cart<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let owner = user1(&data);

    let (cart, created) = carts
        .get_or_create(owner.id)
        .await
        .expect("get_or_create failed");
    assert!(created);

    let (cart2, created2) = carts
        .get_or_create(owner.id)
        .await
        .expect("get_or_create failed");
    assert!(!created2);
    assert_eq!(cart.id, cart2.id);

    let all = carts.get_all().await.expect("failed to list carts");
    assert_eq!(all.len(), 1);
}

async fn check_delete_cart<U, O, C>(users: &U, orders: &O, carts: &C)
where
    U: UserRepository,
    O: OrderRepository,
    C: CartRepository,
{
    let data = seed(users, orders).await;
    let cart = carts
        .create(user1(&data).id, &data.orders)
        .await
        .expect("failed to create cart");

    carts.delete(&cart).await.expect("delete failed");

    let retrieved = carts.get_by_id(cart.id).await.expect("lookup failed");
    assert!(retrieved.is_none());

    // Deleting an already-absent cart is a no-op.
    carts.delete(&cart).await.expect("second delete failed");
}

// ============================================================================
// In-memory store
// ============================================================================

#[tokio::test]
async fn test_create_cart() {
    let store = MemoryStore::new();
    check_create_cart(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_create_cart_missing_user() {
    let store = MemoryStore::new();
    check_create_cart_missing_user(&store.carts()).await;
}

#[tokio::test]
async fn test_get_all_carts() {
    let store = MemoryStore::new();
    check_get_all_carts(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_get_cart_by_id() {
    let store = MemoryStore::new();
    check_get_cart_by_id(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_get_cart_by_public_id() {
    let store = MemoryStore::new();
    check_get_cart_by_public_id(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_filter_carts() {
    let store = MemoryStore::new();
    check_filter_carts(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_filter_tie_break() {
    let store = MemoryStore::new();
    check_filter_tie_break(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_filter_all_carts() {
    let store = MemoryStore::new();
    check_filter_all_carts(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_get_or_create_cart() {
    let store = MemoryStore::new();
    check_get_or_create_cart(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
async fn test_delete_cart() {
    let store = MemoryStore::new();
    check_delete_cart(&store.users(), &store.orders(), &store.carts()).await;
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_create_cart_postgres() {
    let store = pg_store().await;
    check_create_cart(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_create_cart_missing_user_postgres() {
    let store = pg_store().await;
    check_create_cart_missing_user(&store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_get_all_carts_postgres() {
    let store = pg_store().await;
    check_get_all_carts(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_get_cart_by_id_postgres() {
    let store = pg_store().await;
    check_get_cart_by_id(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_get_cart_by_public_id_postgres() {
    let store = pg_store().await;
    check_get_cart_by_public_id(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_filter_carts_postgres() {
    let store = pg_store().await;
    check_filter_carts(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_filter_tie_break_postgres() {
    let store = pg_store().await;
    check_filter_tie_break(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_filter_all_carts_postgres() {
    let store = pg_store().await;
    check_filter_all_carts(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_get_or_create_cart_postgres() {
    let store = pg_store().await;
    check_get_or_create_cart(&store.users(), &store.orders(), &store.carts()).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_delete_cart_postgres() {
    let store = pg_store().await;
    check_delete_cart(&store.users(), &store.orders(), &store.carts()).await;
}
