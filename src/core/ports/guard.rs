use crate::core::models::user::Role;
use crate::error::Error;

/// Role based permission check, independent of resource ownership.
pub trait Guard {
    fn allows(&self, role: Role, resource: &str, action: &str) -> Result<bool, Error>;
}
