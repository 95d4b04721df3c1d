use crate::common;

use std::sync::Arc;
use userhub::application::auth::change_password::{ChangePasswordRequest, ChangePasswordUseCase};
use userhub::application::auth::login::{LoginRequest, LoginUseCase};
use userhub::application::auth::refresh::{RefreshTokenRequest, RefreshTokenUseCase};
use userhub::application::users::register::{RegisterUserRequest, RegisterUserUseCase};
use userhub::domain::users::UserRepository;
use userhub::infrastructure::state::AppState;
use userhub::shared::error::AppError;

fn login_use_case(state: &AppState) -> LoginUseCase {
    LoginUseCase::new(
        state.user_repo.clone(),
        state.refresh_token_repo.clone(),
        state.token_service.clone(),
        state.password_service.clone(),
        state.cipher.clone(),
    )
}

fn refresh_use_case(state: &AppState) -> RefreshTokenUseCase {
    RefreshTokenUseCase::new(
        state.refresh_token_repo.clone(),
        state.user_repo.clone(),
        state.token_service.clone(),
        state.cipher.clone(),
    )
}

fn credentials(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

async fn register(state: &AppState, email: &str, password: &str) {
    RegisterUserUseCase::new(
        state.user_repo.clone(),
        state.password_service.clone(),
        state.cipher.clone(),
    )
    .execute(RegisterUserRequest {
        email: email.to_string(),
        password: password.to_string(),
        full_name: "Abebe Kebede".to_string(),
        role: Default::default(),
        phone_number: Some("+251911234567".to_string()),
        preferred_language: Default::default(),
        preferred_currency: Default::default(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_register_login_refresh_scenario() {
    let (state, _) = common::memory_state();
    register(&state, "a@x.com", "p1").await;

    let login = login_use_case(&state);
    let tokens = login.execute(credentials("a@x.com", "p1")).await.unwrap();
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());

    let err = login
        .execute(credentials("a@x.com", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));

    let refresh = refresh_use_case(&state);
    let rotated = refresh
        .execute(RefreshTokenRequest {
            refresh_token: tokens.refresh_token.clone(),
        })
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);
    assert_ne!(rotated.access_token, tokens.access_token);

    let err = refresh
        .execute(RefreshTokenRequest {
            refresh_token: tokens.refresh_token,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
}

#[tokio::test]
async fn test_unknown_email_matches_wrong_password() {
    let (state, _) = common::memory_state();
    register(&state, "a@x.com", "p1").await;
    let login = login_use_case(&state);

    let unknown = login
        .execute(credentials("b@x.com", "p1"))
        .await
        .unwrap_err();
    let wrong = login
        .execute(credentials("a@x.com", "p2"))
        .await
        .unwrap_err();

    assert_eq!(unknown.to_string(), wrong.to_string());
    assert_eq!(unknown.status(), wrong.status());
}

#[tokio::test]
async fn test_concurrent_refresh_single_winner() {
    let (state, stores) = common::memory_state();
    register(&state, "a@x.com", "p1").await;
    let tokens = login_use_case(&state)
        .execute(credentials("a@x.com", "p1"))
        .await
        .unwrap();

    let refresh = Arc::new(refresh_use_case(&state));
    let mut handles = Vec::new();
    for _ in 0..4 {
        let refresh = refresh.clone();
        let token = tokens.refresh_token.clone();
        handles.push(tokio::spawn(async move {
            refresh
                .execute(RefreshTokenRequest {
                    refresh_token: token,
                })
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert!(matches!(e, AppError::InvalidToken)),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(stores.refresh_tokens.all().len(), 1);
}

#[tokio::test]
async fn test_change_password_scenario() {
    let (state, stores) = common::memory_state();
    register(&state, "a@x.com", "p1").await;
    let user = stores.users.find_by_email("a@x.com").await.unwrap().unwrap();
    let change = ChangePasswordUseCase::new(state.user_repo.clone(), state.password_service.clone());
    let login = login_use_case(&state);

    let err = change
        .execute(
            user.id,
            ChangePasswordRequest {
                old_password: "wrong".to_string(),
                new_password: "p2".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    assert!(login.execute(credentials("a@x.com", "p1")).await.is_ok());

    change
        .execute(
            user.id,
            ChangePasswordRequest {
                old_password: "p1".to_string(),
                new_password: "p2".to_string(),
            },
        )
        .await
        .unwrap();

    assert!(login.execute(credentials("a@x.com", "p2")).await.is_ok());
    assert!(matches!(
        login.execute(credentials("a@x.com", "p1")).await,
        Err(AppError::InvalidCredentials)
    ));
}
