use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::error::{EngineError, EngineResult};
use crate::evaluation::tables::{self, PieceValueTable};
use crate::prelude::*;

/// Material value of each piece kind, in centipawns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialValues {
    pub pawn: i32,
    pub knight: i32,
    pub bishop: i32,
    pub rook: i32,
    pub queen: i32,
    pub king: i32,
}

/// One table per piece kind, from White's side with a8 first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PieceSquareTables {
    #[serde(with = "BigArray")]
    pub pawn: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub knight: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub bishop: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub rook: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub queen: [i32; NUM_SQUARES],
    #[serde(with = "BigArray")]
    pub king: [i32; NUM_SQUARES],
}

/// Evaluation weights that can be swapped out through a TOML file.
///
/// Every piece kind is a required field, so a file that forgets one fails to
/// load instead of silently scoring that kind as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalParams {
    pub material: MaterialValues,
    pub psts: PieceSquareTables,
}

impl Default for EvalParams {
    fn default() -> Self {
        let [pawn, knight, bishop, rook, queen, king] = tables::MATERIAL;
        Self {
            material: MaterialValues {
                pawn,
                knight,
                bishop,
                rook,
                queen,
                king,
            },
            psts: PieceSquareTables {
                pawn: tables::PAWN_TABLE,
                knight: tables::KNIGHT_TABLE,
                bishop: tables::BISHOP_TABLE,
                rook: tables::ROOK_TABLE,
                queen: tables::QUEEN_TABLE,
                king: tables::KING_TABLE,
            },
        }
    }
}

impl EvalParams {
    /// Material values indexed by [`PieceKind::index`]
    pub fn material_by_kind(&self) -> [i32; NUM_PIECES] {
        let m = &self.material;
        [m.pawn, m.knight, m.bishop, m.rook, m.queen, m.king]
    }

    /// Piece-square tables indexed by [`PieceKind::index`]
    pub fn tables_by_kind(&self) -> [[i32; NUM_SQUARES]; NUM_PIECES] {
        let t = &self.psts;
        [t.pawn, t.knight, t.bishop, t.rook, t.queen, t.king]
    }

    pub fn value_table(&self) -> PieceValueTable {
        PieceValueTable::new(&self.material_by_kind(), &self.tables_by_kind())
    }

    /// Save to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> EngineResult<()> {
        let toml_string =
            toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))?;
        fs::write(path.as_ref(), toml_string).map_err(|e| {
            EngineError::Config(format!("writing {}: {e}", path.as_ref().display()))
        })?;
        Ok(())
    }

    /// Load from a TOML File
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file_content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Config(format!("reading {}: {e}", path.as_ref().display()))
        })?;
        Self::from_toml(&file_content)
    }

    pub fn from_toml(content: &str) -> EngineResult<Self> {
        toml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_static_table() {
        assert_eq!(EvalParams::default().value_table(), tables::PIECE_VALUES);
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!(
            "minimax_chess_params_{}.toml",
            std::process::id()
        ));
        let mut params = EvalParams::default();
        params.material.knight = 305;
        params.psts.king[62] = 42;

        params.save_to_file(&path).unwrap();
        let loaded = EvalParams::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, params);
    }

    #[test]
    fn test_missing_kind_is_config_error() {
        let full = toml::to_string_pretty(&EvalParams::default()).unwrap();
        let without_king: String = full
            .lines()
            .filter(|line| !line.trim_start().starts_with("king = 20000"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_ne!(full.lines().count(), without_king.lines().count());

        let err = EvalParams::from_toml(&without_king).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut full = toml::to_string_pretty(&EvalParams::default()).unwrap();
        full = full.replacen("[material]", "[material]\namazon = 1200", 1);
        assert!(EvalParams::from_toml(&full).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = EvalParams::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
