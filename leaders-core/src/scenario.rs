//! Scenario - initial board setup

use std::path::Path;

use anyhow::{bail, Context};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::game::{Difficulty, GameState};
use crate::pieces::{character_by_name, CharacterId, GameId, Piece, PieceId, Player};
use crate::recruit::MAX_UNITS;

/// One unit and where it starts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub character: CharacterId,
    pub pos: Hex,
}

impl Placement {
    pub fn new(character: CharacterId, q: i8, r: i8) -> Self {
        Self {
            character,
            pos: Hex::new(q, r),
        }
    }
}

/// Starting position of a game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub first: Vec<Placement>,
    pub second: Vec<Placement>,
    #[serde(default)]
    pub ai_difficulty: Option<Difficulty>,
}

/// Escort cells for the First player, nearest the Leader first
const FORMATION: [(i8, i8); 4] = [(-1, 3), (1, 2), (-1, 2), (-2, 3)];

impl Scenario {
    /// Build the game, checking every placement
    pub fn to_game_state(&self, game_id: GameId) -> anyhow::Result<GameState> {
        let mut pieces: Vec<Piece> = Vec::new();

        for (player, side) in [(Player::First, &self.first), (Player::Second, &self.second)] {
            let leaders = side.iter().filter(|p| p.character == CharacterId::Leader).count();
            if leaders != 1 {
                bail!("{:?} needs exactly one Leader, found {}", player, leaders);
            }
            let units = side
                .iter()
                .filter(|p| !matches!(p.character, CharacterId::Leader | CharacterId::Cub))
                .count();
            if units > MAX_UNITS {
                bail!("{:?} fields {} units, at most {} allowed", player, units, MAX_UNITS);
            }

            for placement in side {
                let pos = placement.pos;
                if !pos.is_valid() {
                    bail!("{:?} {:?} placed off the board at ({}, {})", player, placement.character, pos.q, pos.r);
                }
                if pieces.iter().any(|p| p.pos == pos) {
                    bail!("two units placed on ({}, {})", pos.q, pos.r);
                }
                let id = PieceId(pieces.len() as u32 + 1);
                pieces.push(Piece::new(id, game_id, placement.character, player, pos));
            }
        }

        let state = GameState::new(game_id, pieces);
        Ok(match self.ai_difficulty {
            Some(difficulty) => state.with_difficulty(difficulty),
            None => state,
        })
    }

    /// Load from JSON file (enum names or display names for characters)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;

        if let Ok(scenario) = serde_json::from_str::<Scenario>(&content) {
            return Ok(scenario);
        }

        // Hand-written files: {"character": "Royal Guard", "q": 1, "r": 2}
        #[derive(Deserialize)]
        struct NamedPlacement {
            character: String,
            q: i8,
            r: i8,
        }

        #[derive(Deserialize)]
        struct NamedScenario {
            name: Option<String>,
            first: Vec<NamedPlacement>,
            second: Vec<NamedPlacement>,
            #[serde(default)]
            ai_difficulty: Option<Difficulty>,
        }

        fn convert(side: Vec<NamedPlacement>) -> anyhow::Result<Vec<Placement>> {
            side.into_iter()
                .map(|p| {
                    let character = character_by_name(&p.character)
                        .ok_or_else(|| anyhow::anyhow!("Unknown character: {}", p.character))?;
                    Ok(Placement::new(character, p.q, p.r))
                })
                .collect()
        }

        let named: NamedScenario = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))?;
        Ok(Scenario {
            name: named.name.unwrap_or_else(|| "unnamed".to_string()),
            first: convert(named.first)?,
            second: convert(named.second)?,
            ai_difficulty: named.ai_difficulty,
        })
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write scenario: {}", path.display()))?;
        Ok(())
    }

    /// Random escort of `num_units` per side; the Second side is the First
    /// side rotated through the board center
    pub fn random_symmetric<R: Rng>(rng: &mut R, name: &str, num_units: usize) -> Self {
        let pool: Vec<CharacterId> = CharacterId::recruitable().collect();
        let mut first = vec![Placement::new(CharacterId::Leader, 0, 3)];
        for &(q, r) in FORMATION.iter().take(num_units.min(MAX_UNITS)) {
            let character = pool[rng.gen_range(0..pool.len())];
            first.push(Placement::new(character, q, r));
        }
        let second = first
            .iter()
            .map(|p| Placement::new(p.character, -p.pos.q, -p.pos.r))
            .collect();

        Self {
            name: name.to_string(),
            first,
            second,
            ai_difficulty: None,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            first: vec![
                Placement::new(CharacterId::Leader, 0, 3),
                Placement::new(CharacterId::Protector, -1, 3),
                Placement::new(CharacterId::Archer, 1, 2),
            ],
            second: vec![
                Placement::new(CharacterId::Leader, 0, -3),
                Placement::new(CharacterId::Protector, 1, -3),
                Placement::new(CharacterId::Archer, -1, -2),
            ],
            ai_difficulty: None,
        }
    }
}
