use actix_web::web::Data;

use crate::database::postgres::PgSqlxManager;
use crate::privilege::casbin::CasbinGuard;

pub mod auth;
pub mod dashboard;
pub mod event;
pub mod feedback;
pub mod registration;
pub mod suggestion;
pub mod user;

type DB = Data<PgSqlxManager>;
type Privilege = Data<CasbinGuard>;
