use robostore_core::{
    ItemKind, ItemStore, Listing, NewRobot, RepoError, RobotRepository, RobotUpdate,
    SqliteItemStore, StoreError, StoredEntity,
};
use rusqlite::Connection;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

async fn seeded_store(listing_ids: &[&str]) -> SqliteItemStore {
    let store = SqliteItemStore::open_in_memory().unwrap();
    for id in listing_ids {
        let listing = Listing::new(*id, "seller", "kit");
        store.add_item(&listing.to_item().unwrap()).await.unwrap();
    }
    store
}

#[tokio::test]
async fn repository_crud_roundtrip_over_sqlite() {
    let repo = RobotRepository::new(seeded_store(&["l1"]).await);

    let created = repo
        .create(NewRobot::new("u1", "l1", "Arm").with_description("six axis"))
        .await
        .unwrap();
    assert_eq!(repo.get(created.id).await.unwrap(), created);

    let updated = repo
        .update(created.id, RobotUpdate::new().name("Arm2"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Arm2");
    assert_eq!(updated.description.as_deref(), Some("six axis"));
    assert_eq!(updated.listing_id, "l1");

    repo.delete(&updated).await.unwrap();
    assert!(matches!(
        repo.get(created.id).await.unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[tokio::test]
async fn missing_listing_is_reported_as_not_found() {
    let repo = RobotRepository::new(seeded_store(&[]).await);

    let err = repo
        .create(NewRobot::new("u1", "l404", "Arm"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { kind: ItemKind::Listing, ref id } if id == "l404"));
    assert!(repo.list_by_user("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn secondary_index_lookups_match_exactly() {
    let repo = RobotRepository::new(seeded_store(&["l1", "l2"]).await);

    let a = repo.create(NewRobot::new("u1", "l1", "A")).await.unwrap();
    let b = repo.create(NewRobot::new("u1", "l2", "B")).await.unwrap();
    let c = repo.create(NewRobot::new("u2", "l1", "C")).await.unwrap();

    let by_user: HashSet<_> = repo
        .list_by_user("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|robot| robot.id)
        .collect();
    assert_eq!(by_user, HashSet::from([a.id, b.id]));

    let by_listing: HashSet<_> = repo
        .list_by_listing("l1")
        .await
        .unwrap()
        .into_iter()
        .map(|robot| robot.id)
        .collect();
    assert_eq!(by_listing, HashSet::from([a.id, c.id]));

    // Listings share the `user_id` attribute but live under another kind.
    let listings = repo
        .store()
        .get_items_by_secondary_index("user_id", "seller", ItemKind::Listing)
        .await
        .unwrap();
    assert_eq!(listings.len(), 2);
}

#[tokio::test]
async fn add_rejects_duplicate_key() {
    let store = seeded_store(&["l1"]).await;

    let duplicate = Listing::new("l1", "someone-else", "other kit");
    let err = store
        .add_item(&duplicate.to_item().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { kind: ItemKind::Listing, .. }));

    let stored = store.get_item("l1", ItemKind::Listing).await.unwrap().unwrap();
    assert_eq!(Listing::from_item(stored).unwrap().user_id, "seller");
}

#[tokio::test]
async fn update_of_missing_item_is_store_not_found() {
    let store = seeded_store(&[]).await;

    let err = store
        .update_item("ghost", ItemKind::Robot, &robostore_core::Attributes::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: ItemKind::Robot, .. }));
}

#[tokio::test]
async fn invalid_index_name_is_rejected() {
    let store = seeded_store(&["l1"]).await;

    let err = store
        .get_items_by_secondary_index("user_id') OR ('1'='1", "x", ItemKind::Listing)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidIndex(_)));
}

#[tokio::test]
async fn robots_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("robostore.db");

    let created = {
        let store = SqliteItemStore::open(&path).unwrap();
        store
            .add_item(&Listing::new("l1", "seller", "kit").to_item().unwrap())
            .await
            .unwrap();
        RobotRepository::new(store)
            .create(NewRobot::new("u1", "l1", "Arm"))
            .await
            .unwrap()
    };

    let repo = RobotRepository::new(SqliteItemStore::open(&path).unwrap());
    assert_eq!(repo.get(created.id).await.unwrap(), created);
    assert_eq!(repo.list_by_listing("l1").await.unwrap(), vec![created]);
}

#[tokio::test]
async fn locked_database_does_not_stall_other_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("busy.db");
    let store = SqliteItemStore::open(&path).unwrap();

    let blocker = Connection::open(&path).unwrap();
    blocker.execute_batch("BEGIN EXCLUSIVE;").unwrap();
    let release = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(300));
        blocker.execute_batch("COMMIT;").unwrap();
    });

    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = Arc::clone(&ticks);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    let listing = Listing::new("l1", "seller", "kit");
    store.add_item(&listing.to_item().unwrap()).await.unwrap();
    let ticks_during_write = ticks.load(Ordering::SeqCst);

    ticker.abort();
    release.join().unwrap();

    // The write waited on the exclusive lock for ~300 ms; the ticker must
    // have kept running on the single executor thread meanwhile.
    assert!(
        ticks_during_write >= 5,
        "ticker advanced only {ticks_during_write} times while the write was blocked"
    );
    assert!(store.get_item("l1", ItemKind::Listing).await.unwrap().is_some());
}
