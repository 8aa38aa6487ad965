//! End-to-end registration flow: challenge, signature, star.

use std::time::Duration;

use starnotary::core::StarRequest;
use starnotary::store::{MemoryStore, SqliteStore};
use starnotary::{MempoolConfig, Notary, NotaryConfig, NotaryError};
use starnotary_testkit::fixtures::{star_request, Wallet};

async fn memory_notary() -> anyhow::Result<Notary<MemoryStore>> {
    Ok(Notary::open(MemoryStore::new(), NotaryConfig::default()).await?)
}

/// Run the challenge/response for `wallet` and assert it succeeds.
async fn validate<S: starnotary::store::KeyValueStore>(
    notary: &Notary<S>,
    wallet: &Wallet,
) -> anyhow::Result<()> {
    let address = wallet.address();
    let request = notary.request_validation(&address).await?;
    let confirmation = notary
        .validate_signature(&address, &wallet.sign(&request.message))
        .await
        .ok_or_else(|| anyhow::anyhow!("signature rejected"))?;
    assert!(confirmation.register_star);
    Ok(())
}

#[tokio::test]
async fn register_star_end_to_end() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let wallet = Wallet::from_seed(42);
    let address = wallet.address();
    let before = notary.height().await?.expect("genesis");

    let request = notary.request_validation(&address).await?;
    assert_eq!(request.wallet_address, address);
    assert_eq!(
        request.message,
        format!("{}:{}:starRegistry", address, request.request_time_stamp)
    );
    assert_eq!(request.validation_window, 300);

    let confirmation = notary
        .validate_signature(&address, &wallet.sign(&request.message))
        .await
        .expect("valid signature");
    assert!(confirmation.register_star);
    assert!(confirmation.status.message_signature);
    assert_eq!(confirmation.status.request_time_stamp, request.request_time_stamp);

    let star = StarRequest {
        ra: "1h".into(),
        dec: "2d".into(),
        mag: Some("3".into()),
        cen: None,
        story: "hello".into(),
    };
    let block = notary.submit_star(&address, star).await?;

    assert_eq!(block.height, before + 1);
    assert_eq!(block.address(), Some(address.as_str()));
    let stored = block.star().expect("star body");
    assert_eq!(stored.story, "68656c6c6f");
    assert_eq!(stored.decoded_story()?, "hello");
    assert!(notary.validate_block(block.height).await?);
    assert!(!notary.mempool().is_address_validated(&address).await);

    assert_eq!(notary.block(block.height).await?, Some(block.clone()));
    assert_eq!(notary.block_by_hash(&block.hash).await?, Some(block.clone()));
    assert_eq!(notary.blocks_by_address(&address).await?, vec![block]);
    assert!(notary.validate_chain().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn validating_twice_returns_none() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let wallet = Wallet::from_seed(43);
    let address = wallet.address();

    let request = notary.request_validation(&address).await?;
    let signature = wallet.sign(&request.message);
    assert!(notary.validate_signature(&address, &signature).await.is_some());
    assert!(notary.validate_signature(&address, &signature).await.is_none());
    Ok(())
}

#[tokio::test]
async fn submission_requires_validation() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let wallet = Wallet::from_seed(44);

    // A pending request is not enough.
    notary.request_validation(&wallet.address()).await?;
    let err = notary
        .submit_star(&wallet.address(), star_request("too early"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotaryError::NotAuthorized(_)));
    assert_eq!(notary.height().await?, Some(0));
    Ok(())
}

#[tokio::test]
async fn one_wallet_cannot_use_another_validation() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let alice = Wallet::from_seed(45);
    let mallory = Wallet::from_seed(46);
    validate(&notary, &alice).await?;

    let err = notary
        .submit_star(&mallory.address(), star_request("stolen"))
        .await
        .unwrap_err();
    assert!(matches!(err, NotaryError::NotAuthorized(_)));

    // Alice's validation is untouched.
    notary.submit_star(&alice.address(), star_request("mine")).await?;
    Ok(())
}

#[tokio::test]
async fn malformed_star_keeps_validation() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let wallet = Wallet::from_seed(47);
    validate(&notary, &wallet).await?;

    let err = notary
        .submit_star(&wallet.address(), star_request(&"x".repeat(501)))
        .await
        .unwrap_err();
    assert!(matches!(err, NotaryError::InvalidRequest(_)));
    assert!(notary.mempool().is_address_validated(&wallet.address()).await);

    let block = notary
        .submit_star(&wallet.address(), star_request("short"))
        .await?;
    assert_eq!(block.height, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn duplicate_request_window_shrinks() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let wallet = Wallet::from_seed(48);

    let first = notary.request_validation(&wallet.address()).await?;
    tokio::time::advance(Duration::from_secs(90)).await;
    let second = notary.request_validation(&wallet.address()).await?;

    assert_eq!(second.request_time_stamp, first.request_time_stamp);
    assert_eq!(second.message, first.message);
    assert!(second.validation_window <= first.validation_window);
    assert_eq!(second.validation_window, 210);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn expired_request_cannot_be_validated() -> anyhow::Result<()> {
    let notary = Notary::open(
        MemoryStore::new(),
        NotaryConfig {
            mempool: MempoolConfig {
                validation_window: Duration::from_secs(60),
            },
        },
    )
    .await?;
    let wallet = Wallet::from_seed(49);
    let request = notary.request_validation(&wallet.address()).await?;

    tokio::time::advance(Duration::from_secs(61)).await;
    tokio::task::yield_now().await;

    let signature = wallet.sign(&request.message);
    assert!(notary
        .validate_signature(&wallet.address(), &signature)
        .await
        .is_none());
    assert!(!notary.mempool().is_address_validated(&wallet.address()).await);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn validation_before_deadline_survives_expiry() -> anyhow::Result<()> {
    let notary = Notary::open(
        MemoryStore::new(),
        NotaryConfig {
            mempool: MempoolConfig {
                validation_window: Duration::from_secs(60),
            },
        },
    )
    .await?;
    let wallet = Wallet::from_seed(52);
    let address = wallet.address();
    let request = notary.request_validation(&address).await?;
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_secs(59)).await;
    assert!(notary
        .validate_signature(&address, &wallet.sign(&request.message))
        .await
        .is_some());

    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;

    assert!(notary.mempool().is_address_validated(&address).await);
    assert!(notary.mempool().pending_request(&address).await.is_none());
    notary.submit_star(&address, star_request("in time")).await?;
    Ok(())
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_heights() -> anyhow::Result<()> {
    let notary = std::sync::Arc::new(memory_notary().await?);
    let wallets: Vec<Wallet> = (100..108).map(Wallet::from_seed).collect();
    for wallet in &wallets {
        validate(&notary, wallet).await?;
    }

    let mut tasks = Vec::new();
    for wallet in wallets {
        let notary = std::sync::Arc::clone(&notary);
        tasks.push(tokio::spawn(async move {
            notary
                .submit_star(&wallet.address(), star_request("parallel"))
                .await
        }));
    }

    let mut heights = Vec::new();
    for task in tasks {
        heights.push(task.await??.height);
    }
    heights.sort_unstable();
    assert_eq!(heights, (1..=8).collect::<Vec<u64>>());
    assert!(notary.validate_chain().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn sqlite_backed_notary() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("notary.db");
    let wallet = Wallet::from_seed(50);

    {
        let notary = Notary::open(SqliteStore::open(&path)?, NotaryConfig::default()).await?;
        validate(&notary, &wallet).await?;
        notary
            .submit_star(&wallet.address(), star_request("persisted"))
            .await?;
    }

    let notary = Notary::open(SqliteStore::open(&path)?, NotaryConfig::default()).await?;
    let stars = notary.blocks_by_address(&wallet.address()).await?;
    assert_eq!(stars.len(), 1);
    assert_eq!(stars[0].star().map(|s| s.decoded_story().ok()), Some(Some("persisted".into())));
    Ok(())
}

#[tokio::test]
async fn confirmation_serializes_in_wire_shape() -> anyhow::Result<()> {
    let notary = memory_notary().await?;
    let wallet = Wallet::from_seed(51);
    let request = notary.request_validation(&wallet.address()).await?;
    let confirmation = notary
        .validate_signature(&wallet.address(), &wallet.sign(&request.message))
        .await
        .expect("valid signature");

    let json = serde_json::to_value(&confirmation)?;
    assert_eq!(json["registerStar"], true);
    assert_eq!(json["status"]["address"], wallet.address());
    assert_eq!(json["status"]["message"], request.message);
    assert_eq!(json["status"]["messageSignature"], true);
    Ok(())
}
