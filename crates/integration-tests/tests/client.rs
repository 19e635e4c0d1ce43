//! `CardStoreClient` against a running card store.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use note2u_core::{CardData, CardId, Side, Sticker};
use note2u_integration_tests::spawn_memory_store;
use note2u_store::{CardStoreClient, ClientError};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_save_and_fetch_card() {
    let (base, _) = spawn_memory_store().await;
    let client = CardStoreClient::new(base, TIMEOUT).unwrap();

    let card = CardData {
        to: "Sam".to_string(),
        from: "Lee".to_string(),
        msg: "Line one\nLine two".to_string(),
        stickers: vec![Sticker::new("🌹", 25.0, 75.0, Side::Back)],
        ..CardData::default()
    };
    let id = CardId::parse("abc123").unwrap();

    let receipt = client.save(&card, &id).await.unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.id, "abc123");

    let raw = client.fetch(&id).await.unwrap();
    assert_eq!(raw["id"], "abc123");

    assert_eq!(client.fetch_card(&id).await.unwrap(), card);
}

#[tokio::test]
async fn test_fetch_missing_card() {
    let (base, _) = spawn_memory_store().await;
    let client = CardStoreClient::new(base, TIMEOUT).unwrap();

    let err = client
        .fetch(&CardId::parse("nope00").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(id) if id.as_str() == "nope00"));
}

#[tokio::test]
async fn test_generated_ids_are_accepted() {
    let (base, provider) = spawn_memory_store().await;
    let client = CardStoreClient::new(base, TIMEOUT).unwrap();

    for _ in 0..5 {
        let id = CardId::generate();
        client.save(&CardData::default(), &id).await.unwrap();
    }
    assert!(provider.store().len().await >= 1);
}

#[tokio::test]
async fn test_unreachable_server() {
    // Port 9 (discard) is not served in the test environment
    let client = CardStoreClient::new(
        url::Url::parse("http://127.0.0.1:9/").unwrap(),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client
        .fetch(&CardId::parse("abc123").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
