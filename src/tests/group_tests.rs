use std::sync::Arc;

use crate::error::WalletError;
use crate::groups::{GroupService, InMemoryGroupStorage};
use crate::models::{CartItem, GroupProduct};
use crate::store::CartStore;

fn product(name: &str, quantity: u32, base_price: f64) -> GroupProduct {
    GroupProduct {
        id: format!("p-{name}"),
        name: name.to_string(),
        quantity,
        base_price,
        total_price: quantity as f64 * base_price,
        category: Some("bebidas".to_string()),
        image: None,
    }
}

fn cart_item(name: &str, quantity: u32, price: f64) -> CartItem {
    CartItem {
        id: format!("c-{name}"),
        name: name.to_string(),
        quantity,
        price,
        category: None,
        image: None,
    }
}

fn service() -> GroupService<InMemoryGroupStorage> {
    GroupService::new(InMemoryGroupStorage::new(), Arc::new(CartStore::new()))
}

#[tokio::test]
async fn duplicate_product_name_aggregates_quantity() {
    let _ = env_logger::try_init();
    let service = service();
    let group = service.create_group("Barrio Norte").await.unwrap();

    service
        .add_product_to_group(&group.id, product("Agua", 1, 1.5))
        .await
        .unwrap();
    let group = service
        .add_product_to_group(&group.id, product("Agua", 1, 1.5))
        .await
        .unwrap();

    assert_eq!(group.products.len(), 1);
    assert_eq!(group.products[0].quantity, 2);
    assert_eq!(group.products[0].total_price, 3.0);
}

#[tokio::test]
async fn distinct_products_get_their_own_entries() {
    let service = service();
    let group = service.create_group("Barrio Norte").await.unwrap();

    service
        .add_product_to_group(&group.id, product("Agua", 1, 1.5))
        .await
        .unwrap();
    let group = service
        .add_product_to_group(&group.id, product("Jugo", 2, 2.0))
        .await
        .unwrap();

    assert_eq!(group.products.len(), 2);
    let jugo = group.products.iter().find(|p| p.name == "Jugo").unwrap();
    assert_eq!(jugo.total_price, 4.0);
}

#[tokio::test]
async fn unknown_group_fails() {
    let service = service();
    let err = service
        .add_product_to_group("missing", product("Agua", 1, 1.5))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::GroupNotFound(_)));
}

#[tokio::test]
async fn move_cart_clears_only_after_success() {
    let cart = Arc::new(CartStore::new());
    let service = GroupService::new(InMemoryGroupStorage::new(), cart.clone());

    cart.add_item(cart_item("Agua", 2, 1.5));
    cart.add_item(cart_item("Jugo", 1, 2.0));

    // Failed group selection: the cart must survive.
    let err = service.move_cart_to_group("missing").await.unwrap_err();
    assert!(matches!(err, WalletError::GroupNotFound(_)));
    assert_eq!(cart.items().len(), 2);

    let group = service.create_group("Barrio Norte").await.unwrap();
    let group = service.move_cart_to_group(&group.id).await.unwrap();

    assert!(cart.is_empty());
    assert_eq!(group.products.len(), 2);
    let agua = group.products.iter().find(|p| p.name == "Agua").unwrap();
    assert_eq!(agua.quantity, 2);
    assert_eq!(agua.total_price, 3.0);
}

#[tokio::test]
async fn cart_merges_repeated_items_by_id() {
    let cart = CartStore::new();
    cart.add_item(cart_item("Agua", 1, 1.5));
    cart.add_item(cart_item("Agua", 2, 1.5));

    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 3);
}
