use super::*;

use chrono::Utc;
use shared::domain::{Comment, PostId};

fn sample_post(id: i64) -> Post {
    Post {
        id: PostId(id),
        title: format!("post {id}"),
        content: "body".into(),
        tag: Some("general".into()),
        image: None,
        likes: 2,
        created_at: Utc::now(),
        comments: vec![Comment {
            text: "first".into(),
            created_at: Utc::now(),
        }],
    }
}

#[test]
fn fresh_store_has_no_posts_or_theme() {
    let storage = Storage::in_memory();
    assert!(matches!(storage.load_posts().expect("load"), LoadedPosts::Fresh));
    assert_eq!(storage.load_theme().expect("theme"), None);
}

#[test]
fn saves_and_restores_posts() {
    let storage = Storage::in_memory();
    storage
        .save_posts(&[sample_post(1), sample_post(2)])
        .expect("save");

    let LoadedPosts::Restored(posts) = storage.load_posts().expect("load") else {
        panic!("expected restored posts");
    };
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].comments[0].text, "first");
}

#[test]
fn corrupt_posts_value_is_reported_not_raised() {
    let store = MemoryStore::new();
    store.write(POSTS_KEY, "{not json").expect("write");
    let storage = Storage::new(store);
    assert!(matches!(
        storage.load_posts().expect("load"),
        LoadedPosts::Corrupt(_)
    ));
}

#[test]
fn theme_write_overwrites_previous_value() {
    let storage = Storage::in_memory();
    storage.save_theme(Theme::Light).expect("light");
    storage.save_theme(Theme::Dark).expect("dark");
    assert_eq!(storage.load_theme().expect("theme").as_deref(), Some("dark"));
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("forum.json");

    let storage = Storage::open_file(&path).expect("open");
    storage.save_posts(&[sample_post(5)]).expect("save");
    storage.save_theme(Theme::Dark).expect("theme");
    drop(storage);

    assert!(path.exists(), "store file should exist: {}", path.display());

    let reopened = Storage::open_file(&path).expect("reopen");
    let LoadedPosts::Restored(posts) = reopened.load_posts().expect("load") else {
        panic!("expected restored posts");
    };
    assert_eq!(posts[0].id, PostId(5));
    assert_eq!(reopened.load_theme().expect("theme").as_deref(), Some("dark"));
}

#[test]
fn empty_store_file_opens_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("forum.json");
    fs::write(&path, "").expect("touch");

    let store = FileStore::open(&path).expect("open");
    assert_eq!(store.read(POSTS_KEY).expect("read"), None);
}

#[test]
fn malformed_store_file_fails_to_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("forum.json");
    fs::write(&path, "[1, 2, 3]").expect("write");

    let err = FileStore::open(&path).err().expect("should fail");
    assert!(err.to_string().contains("not a JSON object"));
}

#[test]
fn failed_file_write_leaves_entries_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("nested");
    let path = nested.join("forum.json");

    let store = FileStore::open(&path).expect("open");
    store.write(THEME_KEY, "light").expect("first write");
    fs::remove_dir_all(&nested).expect("remove parent");

    assert!(store.write(THEME_KEY, "dark").is_err());
    assert!(store.write(POSTS_KEY, "[]").is_err());
    assert_eq!(store.read(THEME_KEY).expect("read").as_deref(), Some("light"));
    assert_eq!(store.read(POSTS_KEY).expect("read"), None);
}
