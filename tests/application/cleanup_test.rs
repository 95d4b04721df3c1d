use crate::common;

use std::time::Duration as StdDuration;
use time::{Duration, OffsetDateTime};
use userhub::application::maintenance::cleanup::{CleanupExpiredTokensUseCase, CleanupReport};
use userhub::domain::auth::RefreshToken;
use userhub::domain::password_reset::PasswordResetToken;
use userhub::infrastructure::scheduler::CleanupScheduler;
use userhub::shared::retry::RetryPolicy;
use std::sync::Arc;
use uuid::Uuid;

fn refresh_record(user_id: Uuid, hash: &str, expires_at: OffsetDateTime) -> RefreshToken {
    RefreshToken {
        id: Uuid::new_v4(),
        user_id,
        token_hash: hash.to_string(),
        expires_at,
        created_at: expires_at - Duration::days(7),
    }
}

#[tokio::test]
async fn test_cleanup_deletes_only_expired_records() {
    let (state, stores) = common::memory_state();
    let user_id = Uuid::new_v4();
    let now = OffsetDateTime::now_utc();

    stores
        .refresh_tokens
        .insert(refresh_record(user_id, "expired", now - Duration::days(1)))
        .unwrap();
    stores
        .refresh_tokens
        .insert(refresh_record(user_id, "live", now + Duration::days(6)))
        .unwrap();
    stores
        .reset_tokens
        .insert(PasswordResetToken {
            id: Uuid::new_v4(),
            user_id,
            token_hash: "old-reset".to_string(),
            expires_at: now - Duration::minutes(5),
            created_at: now - Duration::minutes(35),
        })
        .unwrap();

    let cleanup = CleanupExpiredTokensUseCase::new(
        state.refresh_token_repo.clone(),
        state.reset_token_repo.clone(),
    );

    let report = cleanup.execute(now).await.unwrap();
    assert_eq!(
        report,
        CleanupReport {
            refresh_tokens: 1,
            reset_tokens: 1
        }
    );

    let remaining = stores.refresh_tokens.all();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].token_hash, "live");
    assert!(stores.reset_tokens.all().is_empty());

    // Nothing new expired, so a second run deletes nothing
    assert_eq!(cleanup.execute(now).await.unwrap(), CleanupReport::default());
}

#[tokio::test]
async fn test_scheduler_retries_transient_store_failures() {
    let (state, stores) = common::memory_state();
    stores
        .refresh_tokens
        .insert(refresh_record(
            Uuid::new_v4(),
            "expired",
            OffsetDateTime::now_utc() - Duration::days(1),
        ))
        .unwrap();
    stores.refresh_tokens.fail_next_cleanups(1);

    let scheduler = CleanupScheduler::new(
        Arc::new(CleanupExpiredTokensUseCase::new(
            state.refresh_token_repo.clone(),
            state.reset_token_repo.clone(),
        )),
        RetryPolicy::new(3, StdDuration::from_millis(1)),
        3,
    );

    let report = scheduler.run_once().await.unwrap();
    assert_eq!(report.refresh_tokens, 1);
    assert!(stores.refresh_tokens.all().is_empty());
}
