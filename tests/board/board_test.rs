//! Integration tests for the board service.

use std::sync::Arc;

use parley::board::{Board, BoardError};
use parley::compiler::{QueryCompiler, QueryError};
use parley::config::CompletionSettings;
use parley::executor::{RelationalExecutor, SqliteExecutor};
use parley::intent;
use parley::synth::{DeferredSynthesizer, FixtureSynthesizer, SynthesisError};
use parley::toggle::{ReactionOutcome, VoteOutcome, VoteValue};
use serde_json::json;

async fn store() -> Arc<SqliteExecutor> {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.install_schema().await.unwrap();
    exec.execute(
        r#"INSERT INTO users (id, username, email, "passwordHash") VALUES (7, 'ada', 'ada@example.com', 'x')"#,
        &[],
    )
    .await
    .unwrap();
    Arc::new(exec)
}

fn board(synth: &Arc<FixtureSynthesizer>, exec: &Arc<SqliteExecutor>) -> Board {
    Board::new(QueryCompiler::new(synth.clone(), exec.clone()))
}

fn fixture() -> FixtureSynthesizer {
    FixtureSynthesizer::new()
        .with(
            intent::create_message(7, "Hello", "World"),
            "```sql\nINSERT INTO messages (\"userId\", title, content) VALUES (7, 'Hello', 'World') RETURNING id;\n```",
        )
        .with(
            intent::add_comment(1, 7, "First!"),
            r#"INSERT INTO comments ("messageId", "userId", content) VALUES (1, 7, 'First!')"#,
        )
        .with(
            intent::message_detail(1, Some(7)),
            r#"SELECT m.id, m.title, u.username,
  (SELECT json_group_array(json_object('id', c.id, 'content', c.content)) FROM comments c WHERE c."messageId" = m.id) AS comments,
  (SELECT json_group_array(json_object('emoji', emoji, 'count', n)) FROM (SELECT emoji, COUNT(*) AS n FROM reactions WHERE "messageId" = 1 GROUP BY emoji)) AS reactions,
  (SELECT json_group_array(emoji) FROM reactions WHERE "messageId" = m.id AND "userId" = 7) AS "userReactions"
FROM messages m JOIN users u ON u.id = m."userId" WHERE m.id = 1"#,
        )
        .with(
            intent::find_user("ada"),
            r#"SELECT id, username, "createdAt" FROM users WHERE username = 'ada'"#,
        )
        .with(
            intent::find_user("nobody"),
            r#"SELECT id, username, "createdAt" FROM users WHERE username = 'nobody'"#,
        )
        .with(
            intent::user_messages(7),
            r#"SELECT id, title FROM messages WHERE "userId" = 7 ORDER BY "createdAt" DESC"#,
        )
        .with(
            intent::create_user("bob", "bob@example.com", "hash"),
            r#"INSERT INTO users (username, email, "passwordHash") VALUES ('bob', 'bob@example.com', 'hash') RETURNING id, username"#,
        )
        .with(
            intent::create_user("ada", "ada2@example.com", "hash"),
            r#"INSERT INTO users (username, email, "passwordHash") VALUES ('ada', 'ada2@example.com', 'hash') RETURNING id, username"#,
        )
}

// ============================================================================
// Messages and comments
// ============================================================================

#[tokio::test]
async fn test_create_message_returns_id() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);
    assert!(board.list_messages().await.unwrap().is_empty());

    let id = board.create_message(7, "Hello", "World").await.unwrap();
    assert_eq!(id, Some(1));

    let listing = board.list_messages().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["title"], json!("Hello"));
    assert_eq!(listing[0]["content"], json!("World"));
    assert_eq!(listing[0]["username"], json!("ada"));
    assert_eq!(listing[0]["voteCount"], json!(0));
    assert_eq!(listing[0]["commentCount"], json!(0));
}

#[tokio::test]
async fn test_empty_inputs_rejected_before_synthesis() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);

    assert!(matches!(
        board.create_message(7, "  ", "World").await,
        Err(BoardError::InvalidInput("title"))
    ));
    assert!(matches!(
        board.create_message(7, "Hello", "").await,
        Err(BoardError::InvalidInput("content"))
    ));
    assert!(matches!(
        board.add_comment(1, 7, "\n").await,
        Err(BoardError::InvalidInput("comment"))
    ));
    assert!(matches!(
        board.react(1, 7, "").await,
        Err(BoardError::InvalidInput("emoji"))
    ));
    assert_eq!(synth.calls(), 0);
}

#[tokio::test]
async fn test_message_detail_decodes_aggregates() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);

    board.create_message(7, "Hello", "World").await.unwrap();
    board.add_comment(1, 7, "First!").await.unwrap();
    board.react(1, 7, "👍").await.unwrap();

    let detail = board.message_detail(1, Some(7)).await.unwrap().unwrap();
    assert_eq!(detail["username"], json!("ada"));
    assert_eq!(detail["comments"], json!([{ "id": 1, "content": "First!" }]));
    assert_eq!(detail["reactions"], json!([{ "emoji": "👍", "count": 1 }]));
    assert_eq!(detail["userReactions"], json!(["👍"]));
}

// ============================================================================
// Toggles
// ============================================================================

#[tokio::test]
async fn test_vote_and_react_through_board() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);
    board.create_message(7, "Hello", "World").await.unwrap();

    assert_eq!(
        board.vote(1, 7, 1).await.unwrap(),
        VoteOutcome::Cast(VoteValue::Up)
    );
    assert_eq!(board.vote(1, 7, 3).await.unwrap(), VoteOutcome::Rejected(3));
    assert_eq!(board.react(1, 7, "🎉").await.unwrap(), ReactionOutcome::Added);
    assert_eq!(board.react(1, 7, "🎉").await.unwrap(), ReactionOutcome::Removed);
}

#[tokio::test]
async fn test_vote_on_missing_message_fails() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);

    let err = board.vote(42, 7, 1).await.unwrap_err();
    assert!(matches!(err, BoardError::Query(_)));
    assert!(err.is_constraint_violation());
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_user_profile() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);
    board.create_message(7, "Hello", "World").await.unwrap();

    let profile = board.user_profile("ada").await.unwrap().unwrap();
    assert_eq!(profile.user["id"], json!(7));
    assert_eq!(profile.messages.len(), 1);
    assert_eq!(profile.messages[0]["title"], json!("Hello"));

    assert!(board.user_profile("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_user() {
    let exec = store().await;
    let synth = Arc::new(fixture());
    let board = board(&synth, &exec);

    let user = board
        .create_user("bob", "bob@example.com", "hash")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user["username"], json!("bob"));

    let err = board
        .create_user("ada", "ada2@example.com", "hash")
        .await
        .unwrap_err();
    assert!(err.is_constraint_violation());
}

// ============================================================================
// Completion configuration
// ============================================================================

#[tokio::test]
async fn test_unset_api_key_only_fails_synthesis() {
    let exec = store().await;
    exec.execute(
        r#"INSERT INTO messages (id, "userId", title, content) VALUES (1, 7, 'Hello', 'World')"#,
        &[],
    )
    .await
    .unwrap();

    let settings = CompletionSettings {
        api_key: Some("${PARLEY_UNSET_KEY_FOR_BOARD_TEST}".into()),
        ..CompletionSettings::default()
    };
    let compiler = QueryCompiler::new(Arc::new(DeferredSynthesizer::new(settings)), exec.clone());
    let board = Board::new(compiler);

    assert_eq!(board.list_messages().await.unwrap().len(), 1);
    assert_eq!(
        board.vote(1, 7, 1).await.unwrap(),
        VoteOutcome::Cast(VoteValue::Up)
    );
    assert_eq!(board.react(1, 7, "👍").await.unwrap(), ReactionOutcome::Added);

    let err = board.add_comment(1, 7, "hi").await.unwrap_err();
    assert!(matches!(
        err,
        BoardError::Query(QueryError::CompilationFailed(SynthesisError::Unconfigured(_)))
    ));
}
