use serde::{Deserialize, Serialize};

use super::bundle::ResourceBundle;
use super::tile::BuildingKind;

/// Which counter drives a quest's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestKind {
    /// Buildings built, or the number of a given kind currently on the grid.
    Build { requirement: Option<BuildingKind> },
    Plant,
    Convoy,
    Collect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: ResourceBundle,
    pub progress: u64,
    pub target: u64,
    pub completed: bool,
    pub kind: QuestKind,
}

impl Quest {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        kind: QuestKind,
        target: u64,
        reward: ResourceBundle,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            reward,
            progress: 0,
            target,
            completed: false,
            kind,
        }
    }
}

/// Quests every new game starts with.
pub fn default_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "first-hq",
            "First Steps",
            "Build your first HQ",
            QuestKind::Build {
                requirement: Some(BuildingKind::Hq),
            },
            1,
            ResourceBundle::bamboo(100),
        ),
        Quest::new(
            "green-thumb",
            "Green Thumb",
            "Plant 5 bamboo tiles",
            QuestKind::Plant,
            5,
            ResourceBundle::seeds(1),
        ),
        Quest::new(
            "trade-routes",
            "Trade Routes",
            "Complete 3 successful convoys",
            QuestKind::Convoy,
            3,
            ResourceBundle::bamboo(300),
        ),
    ]
}
