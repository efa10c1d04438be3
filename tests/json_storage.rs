mod support;

use std::sync::Arc;

use anyhow::Result;
use tallybook::models::{Id, Month};
use tallybook::storage::{JsonFileStorage, Storage};
use tempfile::TempDir;

use support::{expense, revenue, service_with, user};

#[tokio::test]
async fn account_survives_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    let alice = user("alice");

    let saved = {
        let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
        svc.initialize_account(&alice).await?;
        svc.add_transaction(&alice, &revenue("2024-03-10", 500)).await?;
        svc.add_transaction(&alice, &expense("2024-08-02", 120).with_description("tools"))
            .await?
            .account
    };

    let storage = JsonFileStorage::new(dir.path());
    let loaded = storage.get_account(&alice).await?.expect("account should load");
    assert_eq!(loaded, saved);
    assert_eq!(loaded.transaction(&Id::from_string("tx-2")).map(|t| t.description.as_str()), Some("tools"));
    assert_eq!(loaded.monthly_data().get_or_zero(Month::August).expenses, 120);

    // Month index is rebuilt on load, so further mutations land on the same entry.
    let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
    let out = svc
        .update_transaction(&alice, &Id::from_string("tx-1"), &revenue("2024-03-11", 600))
        .await?;
    assert_eq!(out.account.monthly_data().get_or_zero(Month::March).revenue, 600);
    assert_eq!(out.account.monthly_data().len(), saved.monthly_data().len());
    Ok(())
}

#[tokio::test]
async fn writes_leave_no_temp_file_behind() -> Result<()> {
    let dir = TempDir::new()?;
    let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
    let bob = user("bob");
    svc.initialize_account(&bob).await?;
    svc.add_transaction(&bob, &revenue("2024-02-02", 10)).await?;

    let account_dir = dir.path().join("accounts").join("bob");
    let mut names: Vec<String> = std::fs::read_dir(&account_dir)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<_>>()?;
    names.sort();
    assert_eq!(names, vec!["account.json"]);
    Ok(())
}

#[tokio::test]
async fn stored_document_uses_wire_field_names() -> Result<()> {
    let dir = TempDir::new()?;
    let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
    let carol = user("carol");
    svc.initialize_account(&carol).await?;
    svc.add_transaction(&carol, &expense("2024-04-09", 42)).await?;

    let raw = std::fs::read_to_string(dir.path().join("accounts/carol/account.json"))?;
    let doc: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(doc["userId"], "carol");
    assert_eq!(doc["currentBalance"], -42);
    assert_eq!(doc["totalExpenses"], 42);
    assert!(doc["monthlyData"].is_array());
    assert_eq!(doc["transactions"][0]["type"], "expense");
    assert_eq!(doc["transactions"][0]["date"], "2024-04-09");
    Ok(())
}

#[tokio::test]
async fn list_skips_entries_without_an_account_file() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = JsonFileStorage::new(dir.path());
    let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
    svc.initialize_account(&user("zed")).await?;
    svc.initialize_account(&user("amy")).await?;

    let accounts_dir = dir.path().join("accounts");
    std::fs::create_dir_all(accounts_dir.join("no-file-here"))?;
    std::fs::create_dir_all(accounts_dir.join(".hidden"))?;
    std::fs::write(accounts_dir.join("stray.txt"), "x")?;

    let ids: Vec<String> = storage
        .list_accounts()
        .await?
        .iter()
        .map(|a| a.user_id().to_string())
        .collect();
    assert_eq!(ids, vec!["amy", "zed"]);
    Ok(())
}

#[tokio::test]
async fn directory_name_wins_over_stored_user_id() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = JsonFileStorage::new(dir.path());
    let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
    let dave = user("dave");
    svc.initialize_account(&dave).await?;

    let path = dir.path().join("accounts/dave/account.json");
    let mut doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    doc["userId"] = serde_json::json!("mallory");
    std::fs::write(&path, serde_json::to_string_pretty(&doc)?)?;

    let loaded = storage.get_account(&dave).await?.expect("account should load");
    assert_eq!(loaded.user_id(), &dave);
    Ok(())
}

#[tokio::test]
async fn unsafe_user_ids_are_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = JsonFileStorage::new(dir.path());

    assert!(storage.get_account(&Id::from_string("../escape")).await.is_err());
    assert!(!dir.path().join("escape").exists());
    Ok(())
}

#[tokio::test]
async fn corrupt_file_surfaces_as_persistence_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("accounts/erin");
    std::fs::create_dir_all(&path)?;
    std::fs::write(path.join("account.json"), "{ not json")?;

    let svc = service_with(Arc::new(JsonFileStorage::new(dir.path())));
    let err = svc.get_account(&user("erin")).await.unwrap_err();
    assert_eq!(err.kind(), "persistence");
    Ok(())
}

#[tokio::test]
async fn failed_replace_removes_temp_file() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = JsonFileStorage::new(dir.path());
    let frank = user("frank");

    // A directory where the account file belongs makes the final rename fail
    // after the temp file has been written.
    let account_dir = dir.path().join("accounts/frank");
    std::fs::create_dir_all(account_dir.join("account.json/blocker"))?;

    let account = tallybook::models::Account::new(frank.clone(), chrono::Utc::now());
    assert!(storage.save_account(&account).await.is_err());
    assert!(!account_dir.join("account.json.tmp").exists());
    Ok(())
}
