//! Natural-language intents sent to the synthesizer.
//!
//! Numeric ids are typed and inlined. User-supplied text is wrapped in
//! double quotes with embedded quotes and backslashes escaped, so it reads
//! as one quoted value rather than as further instructions.

/// Quote user text for embedding in an intent.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render an optional viewer id the way the model expects it.
fn viewer(user_id: Option<i64>) -> String {
    user_id.map_or_else(|| "NULL".to_string(), |id| id.to_string())
}

// ============================================================================
// Votes
// ============================================================================

pub fn find_vote(message_id: i64, user_id: i64) -> String {
    format!(
        "Get the vote where messageId is {} and userId is {}.",
        message_id, user_id
    )
}

pub fn insert_vote(message_id: i64, user_id: i64, value: i64) -> String {
    format!(
        "Insert a vote with messageId {}, userId {}, and value {}.",
        message_id, user_id, value
    )
}

pub fn update_vote(message_id: i64, user_id: i64, value: i64) -> String {
    format!(
        "Update the vote where messageId is {} and userId is {}: set value to {}.",
        message_id, user_id, value
    )
}

pub fn delete_vote(message_id: i64, user_id: i64) -> String {
    format!(
        "Delete the vote where messageId is {} and userId is {}.",
        message_id, user_id
    )
}

// ============================================================================
// Reactions
// ============================================================================

pub fn find_reaction(message_id: i64, user_id: i64, emoji: &str) -> String {
    format!(
        "Get the reaction where messageId is {}, userId is {}, and emoji is {}.",
        message_id,
        user_id,
        quote(emoji)
    )
}

pub fn insert_reaction(message_id: i64, user_id: i64, emoji: &str) -> String {
    format!(
        "Insert a reaction with messageId {}, userId {}, and emoji {}.",
        message_id,
        user_id,
        quote(emoji)
    )
}

pub fn delete_reaction(message_id: i64, user_id: i64, emoji: &str) -> String {
    format!(
        "Delete the reaction where messageId is {}, userId is {}, and emoji is {}.",
        message_id,
        user_id,
        quote(emoji)
    )
}

// ============================================================================
// Messages and comments
// ============================================================================

pub fn create_message(user_id: i64, title: &str, content: &str) -> String {
    format!(
        "Insert a new message with userId {}, title {}, and content {}. Return the id. \
         If the title or content is hateful, harassing or malicious, store \"Don't be mean\" \
         as both the title and the content instead.",
        user_id,
        quote(title),
        quote(content)
    )
}

pub fn message_detail(message_id: i64, viewer_id: Option<i64>) -> String {
    let viewer = viewer(viewer_id);
    format!(
        "Get the message with id {message_id} as a single row with its id, title, content and \"createdAt\", plus:
- the author's username from users as \"username\"
- the vote total (COALESCE of the sum of votes.value, 0) as \"voteCount\"
- the value of the vote cast by userId {viewer} as \"userVote\", NULL if there is none
- a JSON array of its comments (each with id, content, \"createdAt\" and the commenter's username), oldest first, as \"comments\"
- a JSON array of its reactions grouped by emoji (each object has emoji and count) as \"reactions\"
- a JSON array of the emoji strings userId {viewer} reacted with as \"userReactions\""
    )
}

pub fn add_comment(message_id: i64, user_id: i64, content: &str) -> String {
    format!(
        "Insert a new comment with messageId {}, userId {}, and content {}.",
        message_id,
        user_id,
        quote(content)
    )
}

// ============================================================================
// Users
// ============================================================================

pub fn find_user(username: &str) -> String {
    format!(
        "Get the user whose username is {}. Return id, username, and \"createdAt\".",
        quote(username)
    )
}

pub fn create_user(username: &str, email: &str, password_hash: &str) -> String {
    format!(
        "Insert a new user with username {}, email {}, and \"passwordHash\" {}. Return id and username.",
        quote(username),
        quote(email),
        quote(password_hash)
    )
}

pub fn user_messages(user_id: i64) -> String {
    format!(
        "Get all messages where userId is {} with id, title, content, \"createdAt\", \
         the vote total (COALESCE of the sum of votes.value, 0) as \"voteCount\" and \
         the number of comments as \"commentCount\". Order by \"createdAt\" descending.",
        user_id
    )
}
