//! Character definitions and on-board pieces

use crate::board::Hex;
use serde::{Deserialize, Serialize};

/// Ability identifier (closed set, keyed into the ability registry)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityId {
    LeaderBoost,
    AcrobatJump,
    CavalryCharge,
    GrapplerHook,
    IllusionistSwap,
    BrawlerPush,
    ManipulatorMove,
    ProwlerStealth,
    RoyalGuardStep,
    JailerBlock,
    ProtectorShield,
    ArcherAssist,
    AssassinStrike,
    VizierCounsel,
}

/// Character identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterId {
    Leader,
    Acrobat,
    Archer,
    Assassin,
    Brawler,
    Cavalry,
    Cub,
    Grappler,
    Illusionist,
    Jailer,
    Manipulator,
    Nemesis,
    OldBear,
    Protector,
    Prowler,
    RoyalGuard,
    Vizier,
}

/// Static character definition
#[derive(Clone, Debug)]
pub struct CharacterDef {
    pub id: CharacterId,
    pub name: &'static str,
    pub is_leader: bool,
    /// Whether the six standard adjacent steps apply
    pub moves_normally: bool,
    /// Whether adjacency to an enemy Leader yields capture points
    pub contributes_to_capture: bool,
    pub abilities: &'static [AbilityId],
}

impl CharacterDef {
    const fn new(id: CharacterId, name: &'static str, abilities: &'static [AbilityId]) -> Self {
        Self {
            id,
            name,
            is_leader: false,
            moves_normally: true,
            contributes_to_capture: true,
            abilities,
        }
    }

    const fn leader(mut self) -> Self {
        self.is_leader = true;
        self
    }

    const fn immobile(mut self) -> Self {
        self.moves_normally = false;
        self
    }

    const fn harmless(mut self) -> Self {
        self.contributes_to_capture = false;
        self
    }

    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }
}

use AbilityId as A;
use CharacterId as C;

/// All characters, indexed by `CharacterId as usize`
pub static CHARACTERS: [CharacterDef; 17] = [
    CharacterDef::new(C::Leader, "Leader", &[A::LeaderBoost]).leader(),
    CharacterDef::new(C::Acrobat, "Acrobat", &[A::AcrobatJump]),
    CharacterDef::new(C::Archer, "Archer", &[A::ArcherAssist]),
    CharacterDef::new(C::Assassin, "Assassin", &[A::AssassinStrike]),
    CharacterDef::new(C::Brawler, "Brawler", &[A::BrawlerPush]),
    CharacterDef::new(C::Cavalry, "Cavalry", &[A::CavalryCharge]),
    CharacterDef::new(C::Cub, "Cub", &[]).harmless(),
    CharacterDef::new(C::Grappler, "Grappler", &[A::GrapplerHook]),
    CharacterDef::new(C::Illusionist, "Illusionist", &[A::IllusionistSwap]),
    CharacterDef::new(C::Jailer, "Jailer", &[A::JailerBlock]),
    CharacterDef::new(C::Manipulator, "Manipulator", &[A::ManipulatorMove]),
    CharacterDef::new(C::Nemesis, "Nemesis", &[]).immobile(),
    CharacterDef::new(C::OldBear, "Old Bear", &[]),
    CharacterDef::new(C::Protector, "Protector", &[A::ProtectorShield]),
    CharacterDef::new(C::Prowler, "Prowler", &[A::ProwlerStealth]),
    CharacterDef::new(C::RoyalGuard, "Royal Guard", &[A::RoyalGuardStep]),
    CharacterDef::new(C::Vizier, "Vizier", &[A::VizierCounsel]),
];

impl CharacterId {
    pub fn def(self) -> &'static CharacterDef {
        &CHARACTERS[self as usize]
    }

    /// Characters that can be recruited; a Cub only arrives with the Old Bear
    pub fn recruitable() -> impl Iterator<Item = CharacterId> {
        CHARACTERS
            .iter()
            .map(|c| c.id)
            .filter(|&c| c != C::Leader && c != C::Cub)
    }
}

/// Get character from its display name or enum name
pub fn character_by_name(name: &str) -> Option<CharacterId> {
    let wanted = name.replace([' ', '_'], "").to_ascii_lowercase();
    CHARACTERS
        .iter()
        .find(|c| c.name.replace(' ', "").to_ascii_lowercase() == wanted)
        .map(|c| c.id)
}

// ============================================================================
// PIECES
// ============================================================================

/// Player seat (owner index 0 or 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// +1 for the seat starting at the positive-r edge, -1 otherwise
    pub fn home_sign(self) -> i8 {
        match self {
            Player::First => 1,
            Player::Second => -1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

/// Registered user behind a seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub game_id: GameId,
    pub character: CharacterId,
    pub owner: Player,
    pub pos: Hex,
    pub has_acted: bool,
}

impl Piece {
    pub fn new(id: PieceId, game_id: GameId, character: CharacterId, owner: Player, pos: Hex) -> Self {
        Self {
            id,
            game_id,
            character,
            owner,
            pos,
            has_acted: false,
        }
    }

    pub fn def(&self) -> &'static CharacterDef {
        self.character.def()
    }

    pub fn is_leader(&self) -> bool {
        self.def().is_leader
    }

    pub fn is(&self, character: CharacterId) -> bool {
        self.character == character
    }

    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.owner != other.owner
    }
}
