use chrono::{Duration, Utc};
use hex::ToHex;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

use crate::core::models::common::Pagination;
use crate::core::models::user::{Claim, Insert as UserInsert, Login, Patch, Profile, Query, Role, Signup, User};
use crate::core::ports::guard::Guard;
use crate::core::ports::repository::{Store, TxStore, UserCommon};
use crate::core::ports::tokener::Tokener;
use crate::error::Error;

pub fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}

fn validate_signup(data: &Signup) -> Result<(), Error> {
    if data.name.trim().is_empty() {
        return Err(Error::Validation("name is required".into()));
    }
    if !data.email.contains('@') {
        return Err(Error::Validation("invalid email".into()));
    }
    if data.password.len() < 6 {
        return Err(Error::Validation("password must have at least 6 characters".into()));
    }
    if let Some(age) = data.age {
        if !(1..=150).contains(&age) {
            return Err(Error::Validation("invalid age".into()));
        }
    }
    Ok(())
}

pub async fn signup<T>(mut tx: T, data: Signup) -> Result<i32, Error>
where
    T: TxStore,
{
    validate_signup(&data)?;
    let email = data.email.trim().to_lowercase();
    if UserCommon::exists_email(&mut tx, &email).await? {
        return Err(Error::Conflict(format!("email already registered: {}", email)));
    }
    let slt = random_salt();
    let id = UserCommon::insert(
        &mut tx,
        UserInsert {
            name: data.name,
            email,
            password: hash_password(&data.password, &slt),
            salt: slt,
            age: data.age,
            barangay: data.barangay,
            city: data.city,
            province: data.province,
            role: Role::Youth,
        },
    )
    .await?;
    tx.commit().await?;
    log::info!("user {} signed up", id);
    Ok(id)
}

pub async fn login<S, K>(db: &mut S, tokener: &K, data: Login, ttl_days: i64) -> Result<String, Error>
where
    S: Store,
    K: Tokener<Claim>,
{
    let user = match UserCommon::get_by_email(db, &data.email.trim().to_lowercase()).await? {
        Some(user) => user,
        None => return Err(Error::Unauthorized),
    };
    if hash_password(&data.password, &user.salt) != user.password {
        return Err(Error::Unauthorized);
    }
    if !user.is_active {
        return Err(Error::Forbidden("account is deactivated".into()));
    }
    let claim = Claim {
        user: user.id.to_string(),
        exp: (Utc::now() + Duration::days(ttl_days)).timestamp(),
    };
    tokener.gen_token(&claim)
}

/// Loads the calling user, refusing deactivated accounts.
pub async fn caller<S>(db: &mut S, uid: i32) -> Result<User, Error>
where
    S: UserCommon,
{
    let user = match UserCommon::get(db, uid).await {
        Ok(user) => user,
        Err(Error::NotFound(_)) => return Err(Error::Unauthorized),
        Err(e) => return Err(e),
    };
    if !user.is_active {
        return Err(Error::Forbidden("account is deactivated".into()));
    }
    Ok(user)
}

/// Loads the calling user and checks its role grants `action` on `resource`.
pub async fn authorize<S, G>(db: &mut S, guard: &G, uid: i32, resource: &str, action: &str) -> Result<User, Error>
where
    S: UserCommon,
    G: Guard,
{
    let user = caller(db, uid).await?;
    if !guard.allows(user.role, resource, action)? {
        return Err(Error::Forbidden(format!("{} may not {} {}", user.role, action, resource)));
    }
    Ok(user)
}

pub async fn me<S>(db: &mut S, uid: i32) -> Result<Profile, Error>
where
    S: Store,
{
    Ok(caller(db, uid).await?.into())
}

pub async fn update_profile<T>(mut tx: T, uid: i32, patch: Patch) -> Result<Profile, Error>
where
    T: TxStore,
{
    caller(&mut tx, uid).await?;
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(Error::Validation("name is required".into()));
        }
    }
    UserCommon::patch(&mut tx, uid, patch).await?;
    let user = UserCommon::get(&mut tx, uid).await?;
    tx.commit().await?;
    Ok(user.into())
}

pub async fn list_users<S, G>(db: &mut S, guard: &G, uid: i32, query: Query, pagination: Pagination) -> Result<(Vec<Profile>, i64), Error>
where
    S: Store,
    G: Guard,
{
    authorize(db, guard, uid, "user", "list").await?;
    let total = UserCommon::count(db, &query).await?;
    let users = UserCommon::query(db, &query, pagination).await?;
    Ok((users.into_iter().map(Profile::from).collect(), total))
}

pub async fn set_role<T, G>(mut tx: T, guard: &G, uid: i32, target: i32, role: Role) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "user", "manage").await?;
    if uid == target {
        return Err(Error::Forbidden("cannot change own role".into()));
    }
    UserCommon::get(&mut tx, target).await?;
    UserCommon::set_role(&mut tx, target, role).await?;
    tx.commit().await?;
    log::info!("user {} set role of user {} to {}", uid, target, role);
    Ok(())
}

pub async fn set_active<T, G>(mut tx: T, guard: &G, uid: i32, target: i32, active: bool) -> Result<(), Error>
where
    T: TxStore,
    G: Guard,
{
    authorize(&mut tx, guard, uid, "user", "manage").await?;
    if uid == target {
        return Err(Error::Forbidden("cannot change own status".into()));
    }
    UserCommon::get(&mut tx, target).await?;
    UserCommon::set_active(&mut tx, target, active).await?;
    tx.commit().await?;
    log::info!("user {} set active of user {} to {}", uid, target, active);
    Ok(())
}
