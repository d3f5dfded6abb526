use httpmock::prelude::*;
use serde_json::json;

use crate::client::{RechargeRequest, TransferRequest, WalletApi, WalletApiClient};
use crate::error::WalletError;

fn client_for(server: &MockServer) -> WalletApiClient {
    WalletApiClient::new(server.base_url(), Some("test-token".to_string()))
}

#[tokio::test]
async fn fetch_wallet_normalizes_integer_balance() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wallets")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(json!({
                "id": "w-1",
                "userId": "uid-1",
                "becoin_balance": 1000,
                "alias": "ana"
            }));
        })
        .await;

    let wallet = client_for(&server)
        .get_wallet_by_user_id("ana@beland.app", Some("uid-1"))
        .await
        .unwrap();

    mock.assert_async().await;
    // Integer form is backend-scaled minor units.
    assert_eq!(wallet.becoin_balance, 10.0);
    assert_eq!(wallet.alias.as_deref(), Some("ana"));
}

#[tokio::test]
async fn wallet_miss_triggers_auto_provisioning() {
    let _ = env_logger::try_init();
    let server = MockServer::start_async().await;
    let miss = server
        .mock_async(|when, then| {
            when.method(GET).path("/wallets");
            then.status(404).json_body(json!({"message": "not found"}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/wallets")
                .json_body_partial(r#"{"userId": "uid-1", "alias": "new"}"#);
            then.status(201).json_body(json!({
                "id": "w-9",
                "userId": "uid-1",
                "becoin_balance": "0",
                "alias": "new"
            }));
        })
        .await;

    let wallet = client_for(&server)
        .get_wallet_by_user_id("new@x.com", Some("uid-1"))
        .await
        .unwrap();

    miss.assert_async().await;
    create.assert_async().await;
    assert_eq!(wallet.alias.as_deref(), Some("new"));
    assert_eq!(wallet.user_id, "uid-1");
}

#[tokio::test]
async fn provisioning_without_user_id_fails_before_create() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wallets");
            then.status(404);
        })
        .await;

    let err = client_for(&server)
        .get_wallet_by_user_id("new@x.com", None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Provisioning(_)));
}

#[tokio::test]
async fn non_email_identifier_is_rejected_without_a_request() {
    let server = MockServer::start_async().await;

    let err = client_for(&server)
        .find_wallet_by_identifier("0991234567")
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::UnsupportedIdentifier(_)));
}

#[tokio::test]
async fn transfer_to_unregistered_recipient_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wallets")
                .query_param("email", "ghost@x.com");
            then.status(404);
        })
        .await;
    let transfer = server
        .mock_async(|when, then| {
            when.method(POST).path("/wallets/transfer");
            then.status(200).json_body(json!({"status": "completed"}));
        })
        .await;

    let err = client_for(&server)
        .transfer_between_users("me@x.com", "ghost@x.com", 25.0, None)
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::RecipientNotRegistered(_)));
    assert_eq!(transfer.hits_async().await, 0);
}

#[tokio::test]
async fn transfer_amount_is_validated_before_any_request() {
    let server = MockServer::start_async().await;

    let err = client_for(&server)
        .transfer_between_users("me@x.com", "amigo@x.com", 0.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount(_)));

    let err = client_for(&server)
        .create_transfer(TransferRequest {
            receiver_user_id: "uid-2".to_string(),
            amount: -5.0,
            description: None,
            transfer_type: "user_transfer".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAmount(_)));
}

#[tokio::test]
async fn transfer_resolves_recipient_then_posts() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/wallets")
                .query_param("email", "amigo@x.com");
            then.status(200).json_body(json!({
                "id": "w-2",
                "userId": "uid-2",
                "becoin_balance": "50"
            }));
        })
        .await;
    let transfer = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/wallets/transfer")
                .json_body_partial(r#"{"receiver_user_id": "uid-2", "amount": 25.0}"#);
            then.status(200)
                .json_body(json!({"status": "completed", "transactionId": "tx-7"}));
        })
        .await;

    let result = client_for(&server)
        .transfer_between_users("me@x.com", "amigo@x.com", 25.0, Some("hola".to_string()))
        .await
        .unwrap();

    transfer.assert_async().await;
    assert_eq!(result.transaction_id.as_deref(), Some("tx-7"));
}

#[tokio::test]
async fn recharge_unwraps_the_wallet_envelope() {
    let server = MockServer::start_async().await;
    let recharge = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/wallets/recharge")
                .json_body_partial(r#"{"wallet_id": "w-1", "amountUsd": 5.0}"#);
            then.status(201).json_body(json!({
                "wallet": {
                    "id": "w-1",
                    "userId": "uid-1",
                    "becoin_balance": 1500
                }
            }));
        })
        .await;

    let wallet = client_for(&server)
        .create_recharge(RechargeRequest {
            wallet_id: "w-1".to_string(),
            amount_usd: 5.0,
            reference_code: "RC-1-0001".to_string(),
            client_transaction_id: "ctx-1".to_string(),
            payphone_transaction_id: None,
        })
        .await
        .unwrap();

    recharge.assert_async().await;
    assert_eq!(wallet.becoin_balance, 15.0);
}

#[tokio::test]
async fn backend_errors_carry_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/wallets/w-1");
            then.status(500).body("boom");
        })
        .await;

    let err = client_for(&server).get_wallet("w-1").await.unwrap_err();
    match err {
        WalletError::Network { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "boom");
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_transactions_filters_by_wallet() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transactions")
                .query_param("wallet_id", "w-1");
            then.status(200).json_body(json!([
                {
                    "id": "t-1",
                    "type": {"name": "Recarga"},
                    "amount": 500,
                    "created_at": "2026-08-23T10:00:00Z"
                }
            ]));
        })
        .await;

    let records = client_for(&server).list_transactions("w-1").await.unwrap();
    mock.assert_async().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, 500.0);
}
