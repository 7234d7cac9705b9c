pub(super) const INSERT_CONVERSATION: &str = r#"
    INSERT INTO conversations (id, created_by, created_at)
    VALUES (?1, ?2, ?3)
"#;

pub(super) const INSERT_MEMBERSHIP: &str = r#"
    INSERT INTO conversation_members (conversation_id, user_id, joined_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(conversation_id, user_id) DO NOTHING
"#;

// One statement, so the member check and the insert cannot interleave with another writer.
pub(super) const CLAIM_SOLO_CONVERSATION: &str = r#"
    INSERT INTO conversation_members (conversation_id, user_id, joined_at)
    SELECT ?1, ?3, ?4
    WHERE EXISTS (
        SELECT 1 FROM conversation_members
        WHERE conversation_id = ?1 AND user_id = ?2
    )
      AND NOT EXISTS (
        SELECT 1 FROM conversation_members
        WHERE conversation_id = ?1 AND user_id <> ?2
    )
"#;

pub(super) const SELECT_CONVERSATION_IDS_BY_USER: &str = r#"
    SELECT c.id
    FROM conversation_members m
    JOIN conversations c ON c.id = m.conversation_id
    WHERE m.user_id = ?1
    ORDER BY c.created_at ASC, c.id ASC
"#;

pub(super) const SELECT_SOLO_CONVERSATION_IDS: &str = r#"
    SELECT c.id
    FROM conversation_members m
    JOIN conversations c ON c.id = m.conversation_id
    WHERE m.user_id = ?1
      AND NOT EXISTS (
          SELECT 1 FROM conversation_members o
          WHERE o.conversation_id = m.conversation_id AND o.user_id <> ?1
      )
    ORDER BY c.created_at ASC, c.id ASC
"#;

pub(super) const SELECT_MEMBER_IDS: &str = r#"
    SELECT user_id
    FROM conversation_members
    WHERE conversation_id = ?1
    ORDER BY joined_at ASC, user_id ASC
"#;

pub(super) const SELECT_UNDERPOPULATED_CONVERSATIONS: &str = r#"
    SELECT c.id,
           c.created_by,
           c.created_at,
           COUNT(m.user_id) AS member_count
    FROM conversations c
    LEFT JOIN conversation_members m ON m.conversation_id = c.id
    GROUP BY c.id, c.created_by, c.created_at
    HAVING COUNT(m.user_id) < 2
    ORDER BY c.created_at ASC, c.id ASC
"#;

pub(super) const ATTACH_MATCH_CONVERSATION: &str = r#"
    UPDATE matches
    SET conversation_id = ?2
    WHERE id = ?1 AND conversation_id IS NULL
"#;

pub(super) const INSERT_MATCH: &str = r#"
    INSERT INTO matches (id, user_low, user_high, conversation_id, created_at)
    VALUES (?1, ?2, ?3, NULL, ?4)
    ON CONFLICT(user_low, user_high) DO NOTHING
"#;

pub(super) const SELECT_MATCH_BY_PAIR: &str = r#"
    SELECT id, user_low, user_high, conversation_id, created_at
    FROM matches
    WHERE user_low = ?1 AND user_high = ?2
"#;

pub(super) const SELECT_MATCH_BY_ID: &str = r#"
    SELECT id, user_low, user_high, conversation_id, created_at
    FROM matches
    WHERE id = ?1
"#;

pub(super) const INSERT_LIKE: &str = r#"
    INSERT INTO likes (from_user, to_user, created_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(from_user, to_user) DO NOTHING
"#;

pub(super) const SELECT_LIKE_EXISTS: &str = r#"
    SELECT EXISTS(
        SELECT 1 FROM likes WHERE from_user = ?1 AND to_user = ?2
    )
"#;

pub(super) const INSERT_BLOCK: &str = r#"
    INSERT INTO blocked_users (blocker, blocked, created_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(blocker, blocked) DO NOTHING
"#;

pub(super) const DELETE_BLOCK: &str = r#"
    DELETE FROM blocked_users
    WHERE blocker = ?1 AND blocked = ?2
"#;

pub(super) const SELECT_BLOCKED_IDS: &str = r#"
    SELECT blocked
    FROM blocked_users
    WHERE blocker = ?1
"#;
