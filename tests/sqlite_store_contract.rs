mod common;

use common::{SqliteContext, conversation, setup_sqlite, sorted_members, user};
use kindred::application::ports::{
    BlockRepository, LikeRepository, MatchStore, MembershipStore, SafetyFilter,
};
use kindred::{
    AppError, ConnectionPool, ConversationId, MatchId, Repository, SqliteRepository, UserPair,
};

async fn seed_conversation(ctx: &SqliteContext, id: &str, created_at: i64, members: &[&str]) {
    sqlx::query("INSERT INTO conversations (id, created_by, created_at) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(members.first().copied().unwrap_or("system"))
        .bind(created_at)
        .execute(ctx.pool.get_pool())
        .await
        .expect("seed conversation");
    for member in members {
        sqlx::query(
            "INSERT INTO conversation_members (conversation_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
        )
        .bind(id)
        .bind(*member)
        .bind(created_at)
        .execute(ctx.pool.get_pool())
        .await
        .expect("seed membership");
    }
}

async fn count_rows(ctx: &SqliteContext, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(ctx.pool.get_pool())
        .await
        .expect("count rows")
}

#[tokio::test]
async fn schema_is_healthy_after_migration() {
    let ctx = setup_sqlite().await;
    assert!(ctx.repository.health_check().await.expect("health check"));
    // Migrations are idempotent.
    ctx.repository.initialize().await.expect("second migrate");
}

#[tokio::test]
async fn in_memory_database_supports_the_full_flow() {
    let pool = ConnectionPool::from_memory().await.expect("memory pool");
    let repository = SqliteRepository::new(pool.clone());
    repository.initialize().await.expect("migrate");

    let conversation_id = repository
        .create_conversation(&user("u1"))
        .await
        .expect("create");
    repository
        .insert_membership(&conversation_id, &user("u1"))
        .await
        .expect("insert");
    assert_eq!(
        repository
            .list_conversation_ids_for_user(&user("u1"))
            .await
            .expect("list"),
        vec![conversation_id]
    );
    pool.close().await;
}

#[tokio::test]
async fn duplicate_membership_is_reported_as_conflict() {
    let ctx = setup_sqlite().await;
    let repository = ctx.repository.as_ref();
    let conversation_id = repository
        .create_conversation(&user("u1"))
        .await
        .expect("create");

    repository
        .insert_membership(&conversation_id, &user("u1"))
        .await
        .expect("first insert");
    let err = repository
        .insert_membership(&conversation_id, &user("u1"))
        .await
        .expect_err("duplicate");

    assert!(err.is_conflict());
    assert_eq!(count_rows(&ctx, "conversation_members").await, 1);
}

#[tokio::test]
async fn membership_for_missing_conversation_is_a_database_error() {
    let ctx = setup_sqlite().await;
    let err = ctx
        .repository
        .insert_membership(&conversation("missing"), &user("u1"))
        .await
        .expect_err("foreign key");

    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn conversation_listing_follows_creation_order() {
    let ctx = setup_sqlite().await;
    seed_conversation(&ctx, "c-late", 3_000, &["u1", "u2"]).await;
    seed_conversation(&ctx, "c-early", 1_000, &["u1", "u2"]).await;
    seed_conversation(&ctx, "c-mid", 2_000, &["u1", "u3"]).await;
    seed_conversation(&ctx, "c-other", 500, &["u4", "u2"]).await;
    let repository = ctx.repository.as_ref();

    let own = repository
        .list_conversation_ids_for_user(&user("u1"))
        .await
        .expect("list");
    assert_eq!(
        own,
        vec![conversation("c-early"), conversation("c-mid"), conversation("c-late")]
    );

    let shared = repository
        .filter_conversation_ids_with_member(&own, &user("u2"))
        .await
        .expect("filter");
    assert_eq!(shared, vec![conversation("c-early"), conversation("c-late")]);
}

#[tokio::test]
async fn filter_handles_more_ids_than_one_statement_binds() {
    let ctx = setup_sqlite().await;
    seed_conversation(&ctx, "c-real", 1_000, &["u1", "u2"]).await;

    let mut candidates: Vec<ConversationId> = (0..1_200)
        .map(|index| conversation(&format!("c-fake-{index}")))
        .collect();
    candidates.push(conversation("c-real"));

    let shared = ctx
        .repository
        .filter_conversation_ids_with_member(&candidates, &user("u2"))
        .await
        .expect("filter");
    assert_eq!(shared, vec![conversation("c-real")]);

    let empty = ctx
        .repository
        .filter_conversation_ids_with_member(&[], &user("u2"))
        .await
        .expect("empty filter");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn solo_listing_only_returns_single_member_conversations() {
    let ctx = setup_sqlite().await;
    seed_conversation(&ctx, "c-solo-new", 2_000, &["u1"]).await;
    seed_conversation(&ctx, "c-solo-old", 1_000, &["u1"]).await;
    seed_conversation(&ctx, "c-pair", 500, &["u1", "u2"]).await;
    seed_conversation(&ctx, "c-empty", 100, &[]).await;

    let solo = ctx
        .repository
        .list_solo_conversation_ids(&user("u1"))
        .await
        .expect("solo");
    assert_eq!(
        solo,
        vec![conversation("c-solo-old"), conversation("c-solo-new")]
    );
}

#[tokio::test]
async fn claim_adds_a_partner_only_to_a_solo_conversation() {
    let ctx = setup_sqlite().await;
    seed_conversation(&ctx, "c0", 1, &["u1"]).await;
    seed_conversation(&ctx, "c1", 2, &["u1", "u9"]).await;
    seed_conversation(&ctx, "c2", 3, &[]).await;
    let repository = ctx.repository.as_ref();

    assert!(
        repository
            .claim_solo_conversation(&conversation("c0"), &user("u1"), &user("u2"))
            .await
            .expect("claim")
    );
    assert!(
        repository
            .claim_solo_conversation(&conversation("c0"), &user("u1"), &user("u2"))
            .await
            .expect("repeat claim by the same pair")
    );
    assert!(
        !repository
            .claim_solo_conversation(&conversation("c0"), &user("u1"), &user("u3"))
            .await
            .expect("taken")
    );
    assert!(
        !repository
            .claim_solo_conversation(&conversation("c1"), &user("u1"), &user("u3"))
            .await
            .expect("shared")
    );
    assert!(
        !repository
            .claim_solo_conversation(&conversation("c2"), &user("u1"), &user("u3"))
            .await
            .expect("empty")
    );

    assert_eq!(
        sorted_members(repository, &conversation("c0")).await,
        ["u1", "u2"]
    );
    assert_eq!(count_rows(&ctx, "conversation_members").await, 4);
}

#[tokio::test]
async fn concurrent_contacts_over_sqlite_never_share_one_orphan() {
    let ctx = setup_sqlite().await;
    seed_conversation(&ctx, "c0", 1, &["u1"]).await;
    let service = ctx.service();

    let (with_u2, with_u3) = tokio::join!(
        service.resolve_direct_conversation("u1", "u2"),
        service.resolve_direct_conversation("u1", "u3"),
    );
    let with_u2 = with_u2.expect("u1-u2");
    let with_u3 = with_u3.expect("u1-u3");

    assert_ne!(with_u2, with_u3);
    let repository = ctx.repository.as_ref();
    assert_eq!(sorted_members(repository, &with_u2).await, ["u1", "u2"]);
    assert_eq!(sorted_members(repository, &with_u3).await, ["u1", "u3"]);
}

#[tokio::test]
async fn audit_lists_conversations_missing_members() {
    let ctx = setup_sqlite().await;
    seed_conversation(&ctx, "c-empty", 100, &[]).await;
    seed_conversation(&ctx, "c-solo", 200, &["u1"]).await;
    seed_conversation(&ctx, "c-pair", 300, &["u1", "u2"]).await;

    let audit = ctx
        .repository
        .list_underpopulated_conversations()
        .await
        .expect("audit");

    let summary: Vec<(String, u32)> = audit
        .into_iter()
        .map(|entry| (entry.conversation.id.to_string(), entry.member_count))
        .collect();
    assert_eq!(
        summary,
        vec![("c-empty".to_string(), 0), ("c-solo".to_string(), 1)]
    );
}

#[tokio::test]
async fn match_conversation_attaches_once() {
    let ctx = setup_sqlite().await;
    let repository = ctx.repository.as_ref();
    let record = repository
        .create_match(&UserPair::new("u4", "u3").expect("pair"))
        .await
        .expect("create match");
    assert_eq!(record.user_low, user("u3"));
    assert_eq!(record.user_high, user("u4"));
    assert_eq!(record.conversation_id, None);

    let first = repository.create_conversation(&user("u3")).await.expect("c1");
    let second = repository.create_conversation(&user("u4")).await.expect("c2");

    assert!(
        repository
            .update_match_conversation_id(&record.id, &first)
            .await
            .expect("attach")
    );
    assert!(
        !repository
            .update_match_conversation_id(&record.id, &second)
            .await
            .expect("second attach")
    );
    assert_eq!(
        repository
            .find_match(&record.id)
            .await
            .expect("lookup")
            .conversation_id,
        Some(first)
    );
}

#[tokio::test]
async fn unknown_match_is_not_found() {
    let ctx = setup_sqlite().await;
    let repository = ctx.repository.as_ref();
    let missing = MatchId::new("m-missing").expect("match id");
    let conversation_id = repository.create_conversation(&user("u1")).await.expect("create");

    let lookup = repository
        .find_match(&missing)
        .await
        .expect_err("lookup");
    assert!(matches!(lookup, AppError::NotFound(_)));

    let update = repository
        .update_match_conversation_id(&missing, &conversation_id)
        .await
        .expect_err("update");
    assert!(matches!(update, AppError::NotFound(_)));
}

#[tokio::test]
async fn likes_and_matches_are_idempotent() {
    let ctx = setup_sqlite().await;
    let repository = ctx.repository.as_ref();

    repository.record_like(&user("u1"), &user("u2")).await.expect("like");
    repository.record_like(&user("u1"), &user("u2")).await.expect("like again");
    assert_eq!(count_rows(&ctx, "likes").await, 1);
    assert!(repository.has_liked(&user("u1"), &user("u2")).await.expect("has liked"));
    assert!(!repository.has_liked(&user("u2"), &user("u1")).await.expect("has liked"));

    let pair = UserPair::new("u1", "u2").expect("pair");
    let created = repository.create_match(&pair).await.expect("match");
    let again = repository
        .create_match(&UserPair::new("u2", "u1").expect("pair"))
        .await
        .expect("match again");
    assert_eq!(created.id, again.id);
    assert_eq!(count_rows(&ctx, "matches").await, 1);

    let fetched = repository.find_match(&created.id).await.expect("find");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn blocks_round_through_the_safety_filter() {
    let ctx = setup_sqlite().await;
    let repository = ctx.repository.as_ref();

    repository.block_user(&user("u1"), &user("u2")).await.expect("block");
    repository.block_user(&user("u1"), &user("u2")).await.expect("block again");
    repository.block_user(&user("u1"), &user("u3")).await.expect("block");
    let blocked = repository
        .list_blocked_user_ids(&user("u1"))
        .await
        .expect("list");
    assert_eq!(blocked.len(), 2);
    assert!(blocked.contains(&user("u2")));
    assert!(
        repository
            .list_blocked_user_ids(&user("u2"))
            .await
            .expect("list")
            .is_empty()
    );

    repository.unblock_user(&user("u1"), &user("u2")).await.expect("unblock");
    let blocked = repository
        .list_blocked_user_ids(&user("u1"))
        .await
        .expect("list");
    assert!(!blocked.contains(&user("u2")));

    let err = repository
        .block_user(&user("u1"), &user("u1"))
        .await
        .expect_err("self block");
    assert!(matches!(err, AppError::InvalidPair(_)));
}

#[tokio::test]
async fn resolver_over_sqlite_reuses_and_repairs() {
    let ctx = setup_sqlite().await;
    let service = ctx.service();

    let first = service
        .resolve_direct_conversation("u1", "u2")
        .await
        .expect("first");
    let rows = count_rows(&ctx, "conversation_members").await;
    let second = service
        .resolve_direct_conversation("u2", "u1")
        .await
        .expect("second");

    assert_eq!(first, second);
    assert_eq!(count_rows(&ctx, "conversations").await, 1);
    assert_eq!(count_rows(&ctx, "conversation_members").await, rows);
    assert_eq!(
        sorted_members(ctx.repository.as_ref(), &first).await,
        ["u1", "u2"]
    );

    seed_conversation(&ctx, "c-legacy", 1_000, &["u5"]).await;
    let repaired = service
        .resolve_direct_conversation("u5", "u6")
        .await
        .expect("repair");
    assert_eq!(repaired, conversation("c-legacy"));
    assert_eq!(
        sorted_members(ctx.repository.as_ref(), &repaired).await,
        ["u5", "u6"]
    );
}

#[tokio::test]
async fn blocked_resolve_over_sqlite_writes_nothing() {
    let ctx = setup_sqlite().await;
    ctx.repository
        .block_user(&user("u1"), &user("u2"))
        .await
        .expect("block");

    let err = ctx
        .service()
        .resolve_direct_conversation("u1", "u2")
        .await
        .expect_err("blocked");

    assert!(err.is_user_facing());
    assert_eq!(count_rows(&ctx, "conversations").await, 0);
    assert_eq!(count_rows(&ctx, "conversation_members").await, 0);
}

#[tokio::test]
async fn match_binding_over_sqlite() {
    let ctx = setup_sqlite().await;
    let record = ctx
        .repository
        .create_match(&UserPair::new("u3", "u4").expect("pair"))
        .await
        .expect("match");

    let service = ctx.service();
    let bound = service
        .bind_match_conversation(record.id.as_str(), "u3", "u4")
        .await
        .expect("bind");
    let rebound = service
        .bind_match_conversation(record.id.as_str(), "u4", "u3")
        .await
        .expect("rebind");

    assert_eq!(bound, rebound);
    assert_eq!(count_rows(&ctx, "conversations").await, 1);
    assert_eq!(
        ctx.repository
            .find_match(&record.id)
            .await
            .expect("lookup")
            .conversation_id,
        Some(bound)
    );

    let err = service
        .bind_match_conversation(record.id.as_str(), "u3", "u5")
        .await
        .expect_err("u5 is not part of the match");
    assert!(matches!(err, AppError::InvalidPair(_)));
    assert_eq!(count_rows(&ctx, "conversation_members").await, 2);
}
