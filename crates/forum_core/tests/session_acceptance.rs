use std::time::Duration;

use forum_core::{apply_and_settle, AppOptions, ForumApp};
use shared::{
    domain::{Mark, Theme},
    protocol::{Command, ForumEvent},
};
use storage::Storage;

fn options() -> AppOptions {
    AppOptions {
        opponent_delay: Duration::from_millis(500),
        opponent_seed: Some(42),
    }
}

#[tokio::test(start_paused = true)]
async fn opponent_answers_after_its_delay() {
    let mut app = ForumApp::open(Storage::in_memory(), options()).expect("app");
    app.apply(Command::ToggleGame).expect("open game");

    let started = tokio::time::Instant::now();
    let mut events = Vec::new();
    apply_and_settle(&mut app, Command::PlayMove { cell: 4 }, |event| {
        events.push(event.clone())
    })
    .await
    .expect("play");

    assert!(started.elapsed() >= Duration::from_millis(500));
    assert!(events
        .iter()
        .any(|event| matches!(event, ForumEvent::OpponentScheduled(_))));
    assert_eq!(app.game().filled_cells(), 2);
    assert_eq!(app.game().to_move(), Mark::X);
}

#[tokio::test(start_paused = true)]
async fn commands_without_deferred_work_settle_immediately() {
    let mut app = ForumApp::open(Storage::in_memory(), options()).expect("app");

    let started = tokio::time::Instant::now();
    let mut count = 0;
    apply_and_settle(&mut app, Command::Join, |_| count += 1)
        .await
        .expect("join");

    assert_eq!(count, 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[test]
fn forum_and_theme_survive_a_reload_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("forum.json");

    let mut app = ForumApp::open(Storage::open_file(&path).expect("store"), options()).expect("app");
    let events = app
        .apply(Command::CreatePost {
            title: "Hello".into(),
            content: "First post on disk".into(),
            tag: Some("intro".into()),
            image: Some("data:image/png;base64,AAAA".into()),
        })
        .expect("create");
    let post_id = events
        .iter()
        .find_map(|event| match event {
            ForumEvent::PostCreated { post_id } => Some(*post_id),
            _ => None,
        })
        .expect("created");
    app.apply(Command::AddComment {
        post_id: Some(post_id),
        text: "welcome".into(),
    })
    .expect("comment");
    app.apply(Command::SetTheme {
        name: "dark".into(),
    })
    .expect("theme");
    drop(app);

    let reloaded =
        ForumApp::open(Storage::open_file(&path).expect("store"), options()).expect("reload");
    assert_eq!(reloaded.theme(), Some(Theme::Dark));
    let post = reloaded.forum().get_post(post_id).expect("post");
    assert_eq!(post.comments[0].text, "welcome");
    assert_eq!(post.image.as_deref(), Some("data:image/png;base64,AAAA"));
}
