//! In-memory repositories backing unit tests and database-less runs.
//!
//! Each store sits behind a single mutex, so compound operations such as
//! `rotate` are atomic with respect to each other. Failure switches let tests
//! simulate an unavailable store.

use crate::domain::auth::{NewRefreshToken, RefreshToken, RefreshTokenRepository};
use crate::domain::password_reset::{
    NewPasswordResetToken, PasswordResetToken, PasswordResetTokenRepository, ResetOutcome,
};
use crate::domain::users::{DuplicateEmail, NewUser, UpdateProfile, User, UserRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use time::OffsetDateTime;
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow::anyhow!("In-memory store lock poisoned"))
}

/// Consume one pending failure, if any
fn take_failure(pending: &AtomicU32) -> bool {
    pending
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    unavailable: Arc<AtomicBool>,
    fail_password_writes: Arc<AtomicBool>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make password writes fail while reads keep working
    pub fn set_fail_password_writes(&self, fail: bool) {
        self.fail_password_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_active(&self, id: Uuid, is_active: bool) -> Result<bool> {
        let mut users = lock(&self.users)?;
        Ok(users
            .iter_mut()
            .find(|u| u.id == id)
            .map(|u| u.is_active = is_active)
            .is_some())
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            anyhow::bail!("User store unavailable");
        }
        Ok(())
    }

    fn write_password(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        self.check_available()?;
        if self.fail_password_writes.load(Ordering::SeqCst) {
            anyhow::bail!("User store rejected password write");
        }

        let mut users = lock(&self.users)?;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };

        user.password_hash = Some(password_hash.to_string());
        user.password_changed = true;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, anyhow::Error> {
        self.check_available()?;
        let mut users = lock(&self.users)?;
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DuplicateEmail.into());
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            role: new_user.role,
            phone_number: new_user.phone_number,
            preferred_language: new_user.preferred_language,
            preferred_currency: new_user.preferred_currency,
            is_active: true,
            password_changed: false,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, anyhow::Error> {
        self.check_available()?;
        Ok(lock(&self.users)?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        self.check_available()?;
        Ok(lock(&self.users)?
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProfile,
    ) -> Result<Option<User>, anyhow::Error> {
        self.check_available()?;
        let mut users = lock(&self.users)?;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(phone_number) = update.phone_number {
            user.phone_number = Some(phone_number);
        }
        if let Some(language) = update.preferred_language {
            user.preferred_language = language;
        }
        if let Some(currency) = update.preferred_currency {
            user.preferred_currency = currency;
        }
        user.updated_at = OffsetDateTime::now_utc();

        Ok(Some(user.clone()))
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, anyhow::Error> {
        self.write_password(id, password_hash)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenRepository {
    tokens: Arc<Mutex<Vec<RefreshToken>>>,
    fail_inserts: Arc<AtomicBool>,
    failing_cleanups: Arc<AtomicU32>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create` and the insert half of `rotate` fail
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Make the next `count` calls to `delete_expired_before` fail
    pub fn fail_next_cleanups(&self, count: u32) {
        self.failing_cleanups.store(count, Ordering::SeqCst);
    }

    /// Every stored record, including expired ones
    pub fn all(&self) -> Vec<RefreshToken> {
        self.tokens
            .lock()
            .map(|tokens| tokens.clone())
            .unwrap_or_default()
    }

    /// Insert a record verbatim, bypassing expiry checks
    pub fn insert(&self, token: RefreshToken) -> Result<()> {
        lock(&self.tokens)?.push(token);
        Ok(())
    }

    fn build(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            anyhow::bail!("Refresh token store rejected insert");
        }

        Ok(RefreshToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: NewRefreshToken) -> Result<RefreshToken> {
        let token = self.build(token)?;
        lock(&self.tokens)?.push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        let now = OffsetDateTime::now_utc();
        Ok(lock(&self.tokens)?
            .iter()
            .find(|t| t.token_hash == token_hash && t.is_valid_at(now))
            .cloned())
    }

    async fn rotate(
        &self,
        consumed_id: Uuid,
        replacement: NewRefreshToken,
    ) -> Result<Option<RefreshToken>> {
        let mut tokens = lock(&self.tokens)?;
        let Some(position) = tokens.iter().position(|t| t.id == consumed_id) else {
            return Ok(None);
        };

        // Build before removing so a failed insert leaves the old record
        let replacement = self.build(replacement)?;
        tokens.remove(position);
        tokens.push(replacement.clone());

        Ok(Some(replacement))
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool> {
        let mut tokens = lock(&self.tokens)?;
        let before = tokens.len();
        tokens.retain(|t| t.token_hash != token_hash);
        Ok(tokens.len() < before)
    }

    async fn delete_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64> {
        if take_failure(&self.failing_cleanups) {
            anyhow::bail!("Refresh token store unavailable");
        }

        let mut tokens = lock(&self.tokens)?;
        let before = tokens.len();
        tokens.retain(|t| t.expires_at > cutoff);
        Ok((before - tokens.len()) as u64)
    }
}

/// Reset records plus a handle on the user store, so `reset_password` can
/// apply both halves under the record lock
#[derive(Clone)]
pub struct InMemoryPasswordResetTokenRepository {
    tokens: Arc<Mutex<Vec<PasswordResetToken>>>,
    users: InMemoryUserRepository,
}

impl InMemoryPasswordResetTokenRepository {
    pub fn new(users: InMemoryUserRepository) -> Self {
        Self {
            tokens: Arc::default(),
            users,
        }
    }

    pub fn all(&self) -> Vec<PasswordResetToken> {
        self.tokens
            .lock()
            .map(|tokens| tokens.clone())
            .unwrap_or_default()
    }

    pub fn insert(&self, token: PasswordResetToken) -> Result<()> {
        lock(&self.tokens)?.push(token);
        Ok(())
    }
}

#[async_trait]
impl PasswordResetTokenRepository for InMemoryPasswordResetTokenRepository {
    async fn create(&self, token: NewPasswordResetToken) -> Result<PasswordResetToken> {
        let token = PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: token.user_id,
            token_hash: token.token_hash,
            expires_at: token.expires_at,
            created_at: OffsetDateTime::now_utc(),
        };
        lock(&self.tokens)?.push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<PasswordResetToken>> {
        let now = OffsetDateTime::now_utc();
        Ok(lock(&self.tokens)?
            .iter()
            .find(|t| t.token_hash == token_hash && t.is_valid_at(now))
            .cloned())
    }

    async fn reset_password(
        &self,
        id: Uuid,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<ResetOutcome> {
        let mut tokens = lock(&self.tokens)?;
        let Some(position) = tokens
            .iter()
            .position(|t| t.id == id && t.user_id == user_id)
        else {
            return Ok(ResetOutcome::TokenUsed);
        };

        // Write first so a failed write leaves the record in place
        if !self.users.write_password(user_id, password_hash)? {
            return Ok(ResetOutcome::UserMissing);
        }
        tokens.remove(position);

        Ok(ResetOutcome::Applied)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64> {
        let mut tokens = lock(&self.tokens)?;
        let before = tokens.len();
        tokens.retain(|t| t.user_id != user_id);
        Ok((before - tokens.len()) as u64)
    }

    async fn delete_expired_before(&self, cutoff: OffsetDateTime) -> Result<u64> {
        let mut tokens = lock(&self.tokens)?;
        let before = tokens.len();
        tokens.retain(|t| t.expires_at > cutoff);
        Ok((before - tokens.len()) as u64)
    }
}
