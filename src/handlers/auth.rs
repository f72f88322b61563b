use actix_web::web::{Data, Json};

use crate::config::Config;
use crate::core::models::user::{Login, Signup};
use crate::core::services::user;
use crate::error::Error;
use crate::handlers::DB;
use crate::impls::tokener::jwt::JWT;
use crate::response::{CreateResponse, TokenResponse};

pub async fn signup(Json(body): Json<Signup>, db: DB) -> Result<Json<CreateResponse>, Error> {
    let id = user::signup(db.begin().await?, body).await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn login(Json(body): Json<Login>, db: DB, jwt: Data<JWT>, config: Data<Config>) -> Result<Json<TokenResponse>, Error> {
    let token = user::login(&mut db.acquire().await?, jwt.get_ref(), body, config.token_ttl_days).await?;
    Ok(Json(TokenResponse { token }))
}
