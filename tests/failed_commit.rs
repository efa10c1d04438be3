mod support;

use std::sync::Arc;

use anyhow::Result;
use tallybook::models::Month;
use tallybook::LedgerError;

use support::{expense, revenue, service_with, user, FlakyStorage};

#[tokio::test]
async fn failed_save_reports_error_and_keeps_prior_state() -> Result<()> {
    let storage = Arc::new(FlakyStorage::new());
    let svc = service_with(storage.clone());
    let alice = user("alice");
    svc.initialize_account(&alice).await?;
    let tx = svc
        .add_transaction(&alice, &revenue("2024-03-10", 500))
        .await?
        .transaction;
    let before = svc.get_account(&alice).await?;

    storage.fail_saves(true);

    let err = svc
        .add_transaction(&alice, &expense("2024-03-15", 200))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
    assert!(err.to_string().contains("simulated write failure"));

    let err = svc
        .update_transaction(&alice, &tx.id, &revenue("2024-06-01", 900))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "persistence");

    let err = svc.delete_transaction(&alice, &tx.id).await.unwrap_err();
    assert_eq!(err.kind(), "persistence");

    assert_eq!(svc.get_account(&alice).await?, before);

    // Once the store recovers, the next mutation starts from the committed state.
    storage.fail_saves(false);
    let out = svc
        .add_transaction(&alice, &expense("2024-03-15", 200))
        .await?;
    assert_eq!(out.account.current_balance(), 300);
    assert_eq!(out.account.transactions().len(), 2);
    assert_eq!(
        out.account.monthly_data().get_or_zero(Month::March).expenses,
        200
    );
    Ok(())
}

#[tokio::test]
async fn failed_initialization_creates_nothing() -> Result<()> {
    let storage = Arc::new(FlakyStorage::new());
    let svc = service_with(storage.clone());
    let bob = user("bob");

    storage.fail_saves(true);
    let err = svc.initialize_account(&bob).await.unwrap_err();
    assert_eq!(err.kind(), "persistence");

    storage.fail_saves(false);
    assert!(svc.get_account(&bob).await.unwrap_err().is_not_found());
    svc.initialize_account(&bob).await?;
    Ok(())
}
