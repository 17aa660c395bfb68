use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Admin,
    Contract,
    Cost,
    Notification,
    User,
    Vehicle,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        ServiceKind::Admin,
        ServiceKind::Contract,
        ServiceKind::Cost,
        ServiceKind::Notification,
        ServiceKind::User,
        ServiceKind::Vehicle,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Admin => "Admin",
            ServiceKind::Contract => "Contract",
            ServiceKind::Cost => "Cost",
            ServiceKind::Notification => "Notification",
            ServiceKind::User => "User",
            ServiceKind::Vehicle => "Vehicle",
        }
    }

    // `/api/<slug>/...` on the gateway
    pub fn slug(&self) -> &'static str {
        match self {
            ServiceKind::Admin => "admin",
            ServiceKind::Contract => "contract",
            ServiceKind::Cost => "cost",
            ServiceKind::Notification => "notification",
            ServiceKind::User => "user",
            ServiceKind::Vehicle => "vehicle",
        }
    }

    pub fn env_prefix(&self) -> String {
        format!("{}_SERVICE", self.slug().to_uppercase())
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServiceKind::User => 3001,
            ServiceKind::Cost => 3004,
            ServiceKind::Vehicle => 3005,
            ServiceKind::Contract => 3006,
            ServiceKind::Admin => 3007,
            ServiceKind::Notification => 3008,
        }
    }

    pub fn greeting(&self) -> String {
        format!("{} Service running", self.display_name())
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| format!("Unknown service: {}", s))
    }
}
