//! Integration tests for the reaction toggle.

use std::sync::Arc;

use parley::compiler::QueryCompiler;
use parley::executor::{RelationalExecutor, SqliteExecutor};
use parley::intent;
use parley::synth::FixtureSynthesizer;
use parley::toggle::{toggle_reaction, ReactionOutcome, ToggleMode};

const MESSAGE: i64 = 1;
const USER: i64 = 7;

async fn store() -> Arc<SqliteExecutor> {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.install_schema().await.unwrap();
    for sql in [
        r#"INSERT INTO users (id, username, email, "passwordHash") VALUES (7, 'ada', 'ada@example.com', 'x')"#,
        r#"INSERT INTO messages (id, "userId", title, content) VALUES (1, 7, 'Hello', 'World')"#,
    ] {
        exec.execute(sql, &[]).await.unwrap();
    }
    Arc::new(exec)
}

fn reaction_fixture(emojis: &[&str]) -> FixtureSynthesizer {
    let mut synth = FixtureSynthesizer::new();
    for emoji in emojis {
        let key = format!(r#""messageId" = 1 AND "userId" = 7 AND emoji = '{}'"#, emoji);
        synth.insert(
            intent::find_reaction(MESSAGE, USER, emoji),
            format!("SELECT id FROM reactions WHERE {}", key),
        );
        synth.insert(
            intent::insert_reaction(MESSAGE, USER, emoji),
            format!(
                "Here is the SQL:\nINSERT INTO reactions (\"messageId\", \"userId\", emoji) VALUES (1, 7, '{}')",
                emoji
            ),
        );
        synth.insert(
            intent::delete_reaction(MESSAGE, USER, emoji),
            format!("DELETE FROM reactions WHERE {}", key),
        );
    }
    synth
}

async fn reactions(exec: &SqliteExecutor) -> Vec<String> {
    exec.execute("SELECT emoji FROM reactions ORDER BY emoji", &[])
        .await
        .unwrap()
        .iter()
        .map(|row| row["emoji"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_twice_removes() {
    for mode in [ToggleMode::Compiled, ToggleMode::Atomic] {
        let exec = store().await;
        let compiler = QueryCompiler::new(Arc::new(reaction_fixture(&["👍"])), exec.clone());

        let first = toggle_reaction(&compiler, mode, MESSAGE, USER, "👍").await.unwrap();
        assert_eq!(first, ReactionOutcome::Added);
        assert_eq!(reactions(&exec).await, vec!["👍"]);

        let second = toggle_reaction(&compiler, mode, MESSAGE, USER, "👍").await.unwrap();
        assert_eq!(second, ReactionOutcome::Removed);
        assert!(reactions(&exec).await.is_empty(), "{:?}", mode);
    }
}

#[tokio::test]
async fn test_emojis_are_independent() {
    for mode in [ToggleMode::Compiled, ToggleMode::Atomic] {
        let exec = store().await;
        let compiler = QueryCompiler::new(Arc::new(reaction_fixture(&["👍", "🎉"])), exec.clone());

        toggle_reaction(&compiler, mode, MESSAGE, USER, "👍").await.unwrap();
        toggle_reaction(&compiler, mode, MESSAGE, USER, "🎉").await.unwrap();
        toggle_reaction(&compiler, mode, MESSAGE, USER, "👍").await.unwrap();

        assert_eq!(reactions(&exec).await, vec!["🎉"], "{:?}", mode);
    }
}

#[tokio::test]
async fn test_atomic_needs_no_fixture() {
    let exec = store().await;
    let synth = Arc::new(FixtureSynthesizer::new());
    let compiler = QueryCompiler::new(synth.clone(), exec.clone());

    let outcome = toggle_reaction(&compiler, ToggleMode::Auto, MESSAGE, USER, "🔥").await.unwrap();
    assert_eq!(outcome, ReactionOutcome::Added);
    assert_eq!(synth.calls(), 0);
    assert_eq!(reactions(&exec).await, vec!["🔥"]);
}

#[tokio::test]
async fn test_compiled_race_loser_hits_constraint() {
    let exec = store().await;
    let compiler = QueryCompiler::new(Arc::new(reaction_fixture(&["👍"])), exec.clone());

    toggle_reaction(&compiler, ToggleMode::Compiled, MESSAGE, USER, "👍").await.unwrap();
    let err = compiler
        .compile_and_run(&intent::insert_reaction(MESSAGE, USER, "👍"), &[])
        .await
        .unwrap_err();

    assert!(err.is_constraint_violation());
    assert_eq!(reactions(&exec).await, vec!["👍"]);
}
