use tracing::warn;

use crate::accounts::dto::{CreateAccountRequest, LoginRequest, SessionUser, UpdateAccountRequest};
use crate::accounts::password::{hash_password, verify_password};
use crate::accounts::repo::{Account, AccountChanges, AccountStore, NewAccount};
use crate::error::ApiError;

/// All accounts, in id order.
pub async fn list(store: &dyn AccountStore) -> Result<Vec<Account>, ApiError> {
    store.list().await.map_err(ApiError::Store)
}

/// Creates an account, deriving the stored hash from the plaintext password.
/// All four fields must be supplied; a zero balance is supplied.
pub async fn create(
    store: &dyn AccountStore,
    request: CreateAccountRequest,
) -> Result<i64, ApiError> {
    let Some((display_name, login_id, password, balance)) = request.into_fields() else {
        warn!("create request missing fields");
        return Err(ApiError::Validation("all fields are required"));
    };

    let password_hash = hash_password(&password)?;
    store
        .insert(NewAccount {
            display_name,
            login_id,
            password_hash,
            balance,
        })
        .await
        .map_err(ApiError::Store)
}

pub async fn delete(store: &dyn AccountStore, id: i64) -> Result<(), ApiError> {
    let affected = store.delete(id).await.map_err(ApiError::Store)?;
    if affected == 0 {
        return Err(ApiError::NotFound("account not found"));
    }
    Ok(())
}

/// Applies the supplied subset of fields to the row matched by `id`. A
/// supplied password is re-hashed exactly as in `create`.
pub async fn update(
    store: &dyn AccountStore,
    id: i64,
    request: UpdateAccountRequest,
) -> Result<(), ApiError> {
    if request.is_empty() {
        warn!(id, "update request with no fields");
        return Err(ApiError::Validation(
            "at least one field is required for the update",
        ));
    }

    let mut changes = AccountChanges {
        display_name: request.display_name,
        login_id: request.login_id,
        password_hash: None,
        balance: request.balance,
    };
    if let Some(password) = request.password {
        changes.password_hash = Some(hash_password(&password)?);
    }

    let affected = store.update(id, changes).await.map_err(ApiError::Store)?;
    if affected == 0 {
        return Err(ApiError::NotFound("account not found"));
    }
    Ok(())
}

/// Verifies the credential pair and returns the public view of the account.
pub async fn authenticate(
    store: &dyn AccountStore,
    request: LoginRequest,
) -> Result<SessionUser, ApiError> {
    let (login_id, password) = match (request.login_id, request.password) {
        (Some(login_id), Some(password)) => (login_id, password),
        _ => {
            warn!("login request missing credentials");
            return Err(ApiError::Validation("loginId and password are required"));
        }
    };

    let account = store
        .find_by_login_id(&login_id)
        .await
        .map_err(ApiError::Store)?
        .ok_or(ApiError::NotFound("account not found"))?;

    if !verify_password(&password, &account.password_hash)? {
        warn!(login_id = %account.login_id, "login with incorrect password");
        return Err(ApiError::Unauthorized("incorrect password"));
    }

    Ok(SessionUser {
        display_name: account.display_name,
        balance: account.balance,
        is_admin: is_admin(&account.login_id),
    })
}

// Compatibility rule carried over from the previous deployment: the account
// whose login id is literally "admin" is the one administrator.
fn is_admin(login_id: &str) -> bool {
    login_id == "admin"
}
