// src/account.rs
//
// Session management against the backend auth service, plus the two
// serverless functions behind the password-reset flow. Accounts are keyed by
// phone number; the auth service wants an email, so a synthetic one is
// derived from the phone.

use serde::Deserialize;
use serde_json::json;

use crate::api::appwrite::AppwriteError;
use crate::error::AppError;
use crate::models::User;
use crate::AppState;

const SYNTHETIC_EMAIL_DOMAIN: &str = "users.kino.mn";

fn synthetic_email(phone: &str) -> String {
    format!("{}@{SYNTHETIC_EMAIL_DOMAIN}", phone.trim())
}

pub async fn sign_in(state: &AppState, phone: &str, password: &str) -> Result<User, AppError> {
    if phone.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Please enter your phone number and password".to_string(),
        ));
    }

    let email = synthetic_email(phone);
    let session = state
        .appwrite
        .create_email_session(&email, password)
        .await
        .map_err(|e| {
            log::error!("sign_in session error: {e}");
            AppError::from(e)
        })?;
    state.appwrite.set_session(session.secret);

    state.appwrite.get_account().await.map_err(|e| {
        log::error!("sign_in account fetch error: {e}");
        AppError::from(e)
    })
}

/// Registers a new account. Not considered complete until a session exists,
/// so the fresh account is signed in immediately, and a profile record
/// (phone + registration id) is written under the new account's id.
pub async fn create_account(
    state: &AppState,
    phone: &str,
    password: &str,
    username: &str,
    registration_id: &str,
) -> Result<User, AppError> {
    if phone.trim().is_empty()
        || password.is_empty()
        || username.trim().is_empty()
        || registration_id.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Please fill in all fields".to_string(),
        ));
    }

    let email = synthetic_email(phone);
    let account = state
        .appwrite
        .create_account(&email, password, username)
        .await
        .map_err(|e| {
            log::error!("create_account error: {e}");
            AppError::from(e)
        })?;

    let user = sign_in(state, phone, password).await?;

    state
        .appwrite
        .create_document::<serde_json::Value>(
            &state.database_id,
            &state.profiles_collection_id,
            &account.id,
            json!({
                "userId": account.id,
                "username": username,
                "phone": phone.trim(),
                "registrationId": registration_id.trim(),
            }),
        )
        .await
        .map_err(|e| {
            log::error!("create_account profile write error: {e}");
            AppError::from(e)
        })?;

    Ok(user)
}

/// The session-bootstrap read. Nobody signed in is a normal answer, not an
/// error.
pub async fn current_user(state: &AppState) -> Result<Option<User>, AppError> {
    match state.appwrite.get_account().await {
        Ok(user) => Ok(Some(user)),
        Err(AppwriteError::Unauthorized { .. }) => Ok(None),
        Err(e) => {
            log::error!("current_user error: {e}");
            Err(e.into())
        }
    }
}

/// Ends the session on the backend. The local secret is dropped either way;
/// a backend failure still surfaces to the caller.
pub async fn sign_out(state: &AppState) -> Result<(), AppError> {
    let result = state.appwrite.delete_current_session().await;
    state.appwrite.clear_session();
    result.map_err(|e| {
        log::error!("sign_out error: {e}");
        AppError::from(e)
    })
}

#[derive(Debug, Deserialize)]
struct VerifyIdentityResponse {
    success: bool,
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Password-reset step 1: resolve a registration id to the account it
/// belongs to.
pub async fn verify_identity(
    state: &AppState,
    registration_id: &str,
) -> Result<String, AppError> {
    if registration_id.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter your registration number".to_string(),
        ));
    }

    let response: VerifyIdentityResponse = state
        .appwrite
        .execute_function_json(
            &state.identity_verify_fn_id,
            &json!({ "registrationId": registration_id.trim() }),
        )
        .await
        .map_err(|e| {
            log::error!("verify_identity error: {e}");
            AppError::from(e)
        })?;

    if !response.success {
        return Err(AppError::RemoteExecution(
            response
                .message
                .unwrap_or_else(|| "identity verification failed".to_string()),
        ));
    }
    response
        .user_id
        .ok_or_else(|| AppError::Parse("identity verification response missing userId".to_string()))
}

#[derive(Debug, Deserialize)]
struct PasswordResetResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Password-reset step 2: set the new password for the verified account.
pub async fn reset_password(
    state: &AppState,
    user_id: &str,
    new_password: &str,
) -> Result<(), AppError> {
    if new_password.is_empty() {
        return Err(AppError::Validation(
            "Please enter a new password".to_string(),
        ));
    }

    let response: PasswordResetResponse = state
        .appwrite
        .execute_function_json(
            &state.password_reset_fn_id,
            &json!({ "userId": user_id, "newPassword": new_password }),
        )
        .await
        .map_err(|e| {
            log::error!("reset_password error: {e}");
            AppError::from(e)
        })?;

    if response.success {
        Ok(())
    } else {
        Err(AppError::RemoteExecution(
            response
                .message
                .unwrap_or_else(|| "password reset failed".to_string()),
        ))
    }
}
