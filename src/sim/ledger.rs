use crate::error::Rejection;
use crate::model::tile::depot_storage_bonus;
use crate::model::{BuildingKind, GameState, ResourceBundle};

pub const BASE_BAMBOO_STORAGE: u64 = 1000;

impl GameState {
    /// Bamboo cap: 1000 plus a per-level bonus for every Depot on the grid.
    pub fn max_bamboo_storage(&self) -> u64 {
        BASE_BAMBOO_STORAGE
            + self
                .buildings()
                .filter(|b| b.kind == BuildingKind::Depot)
                .map(|b| depot_storage_bonus(b.level))
                .sum::<u64>()
    }

    pub fn storage_headroom(&self) -> u64 {
        self.max_bamboo_storage().saturating_sub(self.player.bamboo)
    }

    /// Credit bamboo up to the storage cap. Returns the amount actually added.
    pub fn add_bamboo(&mut self, amount: u64) -> u64 {
        let added = amount.min(self.storage_headroom());
        self.player.bamboo += added;
        added
    }

    pub fn spend_bamboo(&mut self, amount: u64) -> Result<(), Rejection> {
        if self.player.bamboo < amount {
            return Err(Rejection::InsufficientBamboo);
        }
        self.player.bamboo -= amount;
        Ok(())
    }

    pub fn add_seeds(&mut self, amount: u32) {
        self.player.seeds += amount;
    }

    pub fn spend_seeds(&mut self, amount: u32) -> Result<(), Rejection> {
        if self.player.seeds < amount {
            return Err(Rejection::InsufficientSeeds);
        }
        self.player.seeds -= amount;
        Ok(())
    }

    /// Check a cost bundle without spending it.
    pub fn check_affordable(&self, cost: &ResourceBundle) -> Result<(), Rejection> {
        if self.player.bamboo < cost.bamboo_or_zero() {
            return Err(Rejection::InsufficientBamboo);
        }
        if self.player.seeds < cost.seeds_or_zero() {
            return Err(Rejection::InsufficientSeeds);
        }
        if self.player.charms < cost.charms_or_zero() {
            return Err(Rejection::InsufficientCharms);
        }
        Ok(())
    }

    /// Debit a whole cost bundle, or nothing at all.
    pub fn pay(&mut self, cost: &ResourceBundle) -> Result<(), Rejection> {
        self.check_affordable(cost)?;
        self.player.bamboo -= cost.bamboo_or_zero();
        self.player.seeds -= cost.seeds_or_zero();
        self.player.charms -= cost.charms_or_zero();
        Ok(())
    }

    /// Credit a reward bundle. Bamboo is storage-capped, seeds and charms are not.
    /// Returns the bamboo actually added.
    pub fn grant(&mut self, reward: &ResourceBundle) -> u64 {
        let added = self.add_bamboo(reward.bamboo_or_zero());
        self.player.seeds += reward.seeds_or_zero();
        self.player.charms += reward.charms_or_zero();
        added
    }
}
