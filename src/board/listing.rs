//! Hand-written listing query.
//!
//! The listing is the hottest read on the board, so it skips synthesis and
//! goes through the read cache. Counts come from correlated subqueries; a
//! join over both votes and comments would multiply each by the other.
//! Messages whose author is gone are listed with a null username.

pub(crate) const LISTING_SQL: &str = r#"SELECT
    m.id,
    m.title,
    m.content,
    m."createdAt",
    u.username,
    COALESCE((SELECT SUM(v.value) FROM votes v WHERE v."messageId" = m.id), 0) AS "voteCount",
    (SELECT COUNT(*) FROM comments c WHERE c."messageId" = m.id) AS "commentCount"
FROM messages m
LEFT JOIN users u ON u.id = m."userId"
ORDER BY m."createdAt" DESC, m.id DESC"#;
