//! Registration, login and profile resolution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::{Account, AccountView, AdminProfile};
use crate::store::prelude::*;
use crate::types::Role;

use super::to_value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSuccess {
    pub token: String,
    pub account: AccountView,
    pub profile: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeOutput {
    pub account: AccountView,
    pub profile: serde_json::Value,
}

/// Create an account after the unique-email check. Shared by every paired
/// profile+account creation path.
pub(crate) async fn create_account_checked(
    store: &dyn Store,
    email: &str,
    password: &str,
    role: Role,
    campus: Option<Uuid>,
) -> Result<Account, ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::validation("email is required"));
    }
    if password.is_empty() {
        return Err(ApiError::validation("password is required"));
    }
    if store.account_by_email(email).await?.is_some() {
        return Err(ApiError::conflict("email already registered"));
    }
    let account = Account::new(email.to_string(), hash_password(password), role, campus);
    store.insert_account(&account).await?;
    Ok(account)
}

fn issue_token(account: &Account) -> Result<String, ApiError> {
    let claims = Claims::new(account.id, account.role, account.campus);
    generate_jwt(&claims).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal("could not issue token")
    })
}

/// Public admin registration. Account first, then profile; the account is
/// removed again if the profile write fails.
pub async fn register_admin(
    store: &dyn Store,
    input: RegisterAdminInput,
) -> Result<AuthSuccess, ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::validation("name is required"));
    }
    let account =
        create_account_checked(store, &input.email, &input.password, Role::Admin, None).await?;

    let profile = AdminProfile {
        id: Uuid::new_v4(),
        account: account.id,
        name: input.name.trim().to_string(),
        contact_number: input.contact_number,
        created_at: chrono::Utc::now(),
    };
    if let Err(e) = store.insert_admin(&profile).await {
        store.delete_account(account.id).await?;
        return Err(e.into());
    }

    Ok(AuthSuccess {
        token: issue_token(&account)?,
        account: AccountView::from(&account),
        profile: to_value(&profile)?,
    })
}

pub async fn login(store: &dyn Store, input: LoginInput) -> Result<AuthSuccess, ApiError> {
    let account = store
        .account_by_email(&input.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid email or password"))?;

    if !verify_password(&input.password, &account.password_hash) {
        return Err(ApiError::unauthorized("invalid email or password"));
    }
    if !account.is_active {
        return Err(ApiError::forbidden("account is disabled"));
    }

    let profile = load_profile(store, &account).await?;

    Ok(AuthSuccess {
        token: issue_token(&account)?,
        account: AccountView::from(&account),
        profile,
    })
}

pub async fn me(store: &dyn Store, actor: &Actor) -> Result<MeOutput, ApiError> {
    let account = store
        .account(actor.account)
        .await?
        .ok_or_else(|| ApiError::not_found("account not found"))?;
    let profile = load_profile(store, &account).await?;
    Ok(MeOutput {
        account: AccountView::from(&account),
        profile,
    })
}

/// Role-dispatched profile lookup. A missing profile for a live account is a
/// data integrity failure, not a caller error.
async fn load_profile(store: &dyn Store, account: &Account) -> Result<serde_json::Value, ApiError> {
    let missing = || {
        tracing::error!(account = %account.id, "account has no profile record");
        ApiError::internal("profile record missing")
    };
    match account.role {
        Role::Admin => {
            let p = store.admin_by_account(account.id).await?.ok_or_else(missing)?;
            to_value(&p)
        }
        Role::Coordinator => {
            let p = store
                .coordinator_by_account(account.id)
                .await?
                .ok_or_else(missing)?;
            to_value(&p)
        }
        Role::Teacher => {
            let p = store.teacher_by_account(account.id).await?.ok_or_else(missing)?;
            to_value(&p)
        }
        Role::Student => {
            let p = store.student_by_account(account.id).await?.ok_or_else(missing)?;
            to_value(&p)
        }
    }
}
