use serde::{Deserialize, Serialize};

/// A set of resource amounts where absent fields mean "none of this resource".
///
/// Used for quest rewards, build costs and upgrade costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bamboo: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charms: Option<u32>,
}

impl ResourceBundle {
    pub const fn bamboo(amount: u64) -> Self {
        Self {
            bamboo: Some(amount),
            seeds: None,
            charms: None,
        }
    }

    pub const fn seeds(amount: u32) -> Self {
        Self {
            bamboo: None,
            seeds: Some(amount),
            charms: None,
        }
    }

    pub const fn with_seeds(mut self, amount: u32) -> Self {
        self.seeds = Some(amount);
        self
    }

    pub fn bamboo_or_zero(&self) -> u64 {
        self.bamboo.unwrap_or(0)
    }

    pub fn seeds_or_zero(&self) -> u32 {
        self.seeds.unwrap_or(0)
    }

    pub fn charms_or_zero(&self) -> u32 {
        self.charms.unwrap_or(0)
    }
}
