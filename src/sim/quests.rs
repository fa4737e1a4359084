use tracing::info;

use super::context::TickContext;
use super::system::{GameSystem, TickCadence};
use crate::error::Rejection;
use crate::model::{GameState, Quest, QuestKind};

fn measure(state: &GameState, kind: QuestKind) -> u64 {
    let stats = &state.player.stats;
    match kind {
        QuestKind::Build {
            requirement: Some(building),
        } => state.building_count(building) as u64,
        QuestKind::Build { requirement: None } => stats.buildings_built,
        QuestKind::Plant => stats.bamboo_planted,
        QuestKind::Convoy => stats.convoys_completed,
        QuestKind::Collect => stats.bamboo_collected,
    }
}

fn reward_quest(state: &mut GameState, index: usize) {
    let reward = state.quests[index].reward;
    state.quests[index].completed = true;
    let added = state.grant(&reward);
    info!(
        quest = %state.quests[index].id,
        bamboo = added,
        seeds = reward.seeds_or_zero(),
        charms = reward.charms_or_zero(),
        "quest completed"
    );
}

/// Recompute progress from player stats and pay out any quest that just
/// crossed its target. Returns the IDs of quests completed by this call.
///
/// Progress never goes down, and a completed quest is never rewarded again.
pub fn update_quests(state: &mut GameState) -> Vec<String> {
    let mut completed = Vec::new();
    for index in 0..state.quests.len() {
        let quest: &Quest = &state.quests[index];
        if quest.completed {
            continue;
        }
        let measured = measure(state, quest.kind);
        let quest = &mut state.quests[index];
        quest.progress = quest.progress.max(measured);
        if quest.progress >= quest.target {
            completed.push(quest.id.clone());
            reward_quest(state, index);
        }
    }
    completed
}

/// Force-complete a quest regardless of progress, paying its reward once.
pub fn complete_quest(state: &mut GameState, quest_id: &str) -> Result<(), Rejection> {
    let index = state
        .quests
        .iter()
        .position(|q| q.id == quest_id)
        .ok_or(Rejection::UnknownQuest)?;
    if state.quests[index].completed {
        return Err(Rejection::QuestAlreadyCompleted);
    }
    reward_quest(state, index);
    Ok(())
}

pub struct QuestSystem;

impl GameSystem for QuestSystem {
    fn name(&self) -> &str {
        "quests"
    }

    fn cadence(&self) -> TickCadence {
        TickCadence::World
    }

    fn tick(&mut self, ctx: &mut TickContext) {
        let done = update_quests(ctx.state);
        ctx.report.quests_completed.extend(done);
    }
}
