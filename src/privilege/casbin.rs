use casbin::prelude::*;
use std::result::Result;

use crate::core::models::user::Role;
use crate::core::ports::guard::Guard;
use crate::error::Error;

static MODEL: &str = include_str!("casbin.conf");
static POLICIES: &str = include_str!("policies.csv");

/// RBAC guard backed by an in-memory casbin enforcer loaded with the bundled policy set.
pub struct CasbinGuard {
    enforcer: Enforcer,
}

impl CasbinGuard {
    pub async fn new() -> Result<Self, Error> {
        let model = DefaultModel::from_str(MODEL).await?;
        let mut enforcer = Enforcer::new(model, MemoryAdapter::default()).await?;
        for line in POLICIES.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
            let mut fields = line.split(',').map(|f| f.trim().to_owned());
            let kind = fields.next().unwrap_or_default();
            let rule: Vec<String> = fields.collect();
            match kind.as_str() {
                "p" => {
                    enforcer.add_policy(rule).await?;
                }
                "g" => {
                    enforcer.add_grouping_policy(rule).await?;
                }
                other => log::warn!("skipping unknown policy kind: {}", other),
            }
        }
        Ok(Self { enforcer })
    }
}

impl Guard for CasbinGuard {
    fn allows(&self, role: Role, resource: &str, action: &str) -> Result<bool, Error> {
        let allowed = self.enforcer.enforce((role.as_str(), resource, action))?;
        Ok(allowed)
    }
}
