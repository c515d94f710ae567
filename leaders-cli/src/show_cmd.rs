//! Show command - print a scenario's board and one piece's options

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use leaders_core::{Board, CharacterId, GameId, Hex, PieceId, Player, BOARD_RADIUS, CHARACTERS};

use crate::scenario_cmd::load_scenario;

#[derive(Args)]
pub struct ShowArgs {
    /// Scenario JSON file (built-in default when omitted)
    #[arg(long, value_name = "FILE")]
    pub scenario: Option<PathBuf>,

    /// List moves and ability targets for this piece id
    #[arg(long)]
    pub piece: Option<u32>,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let scenario = load_scenario(args.scenario.as_deref())?;
    let state = scenario.to_game_state(GameId(0))?;

    println!("{}", scenario.name);
    println!("{}", render_board(&state.board));
    println!("{}", legend());

    if let Some(id) = args.piece {
        let id = PieceId(id);
        let piece = state.piece(id).with_context(|| format!("No piece with id {}", id.0))?;
        let moves = state.valid_moves(id)?;
        let targets = state.ability_targets(id)?;
        println!(
            "\n{:?} {} at ({}, {})",
            piece.owner,
            piece.def().name,
            piece.pos.q,
            piece.pos.r
        );
        println!("Moves:   {}", format_cells(&moves));
        println!("Targets: {}", format_cells(&targets));
    }

    Ok(())
}

/// Two-letter code, capitalised for the First player
fn code(character: CharacterId, owner: Player) -> String {
    let base = match character {
        CharacterId::Leader => "LE",
        CharacterId::Acrobat => "AC",
        CharacterId::Archer => "AR",
        CharacterId::Assassin => "AS",
        CharacterId::Brawler => "BR",
        CharacterId::Cavalry => "CA",
        CharacterId::Cub => "CU",
        CharacterId::Grappler => "GR",
        CharacterId::Illusionist => "IL",
        CharacterId::Jailer => "JA",
        CharacterId::Manipulator => "MA",
        CharacterId::Nemesis => "NE",
        CharacterId::OldBear => "OB",
        CharacterId::Protector => "PR",
        CharacterId::Prowler => "PW",
        CharacterId::RoyalGuard => "RG",
        CharacterId::Vizier => "VI",
    };
    match owner {
        Player::First => base.to_string(),
        Player::Second => base.to_ascii_lowercase(),
    }
}

/// Hex rows top to bottom, offset so neighbors line up
fn render_board(board: &Board) -> String {
    let mut lines = Vec::new();
    for r in -BOARD_RADIUS..=BOARD_RADIUS {
        let q_min = (-BOARD_RADIUS).max(-BOARD_RADIUS - r);
        let q_max = BOARD_RADIUS.min(BOARD_RADIUS - r);
        let mut line = " ".repeat(r.unsigned_abs() as usize * 2);
        for q in q_min..=q_max {
            let cell = match board.piece_at(Hex::new(q, r)) {
                Some(p) => code(p.character, p.owner),
                None => "..".to_string(),
            };
            line.push_str(&cell);
            line.push_str("  ");
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

fn legend() -> String {
    CHARACTERS
        .iter()
        .map(|c| format!("{}={}", code(c.id, Player::First), c.name))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_cells(cells: &[Hex]) -> String {
    if cells.is_empty() {
        return "-".to_string();
    }
    cells
        .iter()
        .map(|h| format!("({}, {})", h.q, h.r))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaders_core::Scenario;

    #[test]
    fn test_render_board_shape() {
        let state = Scenario::default().to_game_state(GameId(0)).unwrap();
        let text = render_board(&state.board);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[3].split_whitespace().count(), 7);
        assert_eq!(rows[0].split_whitespace().count(), 4);
        assert!(rows[0].contains("le"));
        assert!(rows[6].contains("LE"));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<String> = CHARACTERS.iter().map(|c| code(c.id, Player::First)).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), CHARACTERS.len());
    }

    #[test]
    fn test_format_cells() {
        assert_eq!(format_cells(&[]), "-");
        assert_eq!(format_cells(&[Hex::new(1, -2)]), "(1, -2)");
    }
}
