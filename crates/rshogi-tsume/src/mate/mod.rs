//! 1手詰め判定
//!
//! - `mate_1ply_fast`: 接触王手だけを Bitboard 演算で調べる高速判定
//! - `mate_1ply`: 高速判定で見つからなければ王手を全部試す完全判定
//!
//! どちらも打ち歩詰めになる歩打ちは返さない。

mod drop_mate;
mod helpers;
mod move_mate;

use crate::movegen::{MoveList, generate_checks, is_mated};
use crate::position::Position;
use crate::types::Move;

pub use drop_mate::check_drop_mate;
pub use move_mate::check_move_mate;

/// 接触王手による1手詰めを探す（見つからなくても詰みがないとは限らない）
///
/// 手番側が王手されていれば None。
pub fn mate_1ply_fast(pos: &Position) -> Option<Move> {
    if pos.in_check() {
        return None;
    }
    check_drop_mate(pos).or_else(|| check_move_mate(pos))
}

/// 1手詰めを探す
///
/// None を返した場合は1手詰めが存在しない。手番側が王手されていれば None。
pub fn mate_1ply(pos: &mut Position) -> Option<Move> {
    if pos.in_check() {
        return None;
    }
    mate_1ply_fast(pos).or_else(|| brute_mate(pos))
}

/// 王手をすべて指してみて詰むものを探す
fn brute_mate(pos: &mut Position) -> Option<Move> {
    let mut list = MoveList::new();
    generate_checks(pos, &mut list, true);
    for &m in list.iter() {
        if m.is_pawn_drop() {
            continue;
        }
        pos.do_move(m);
        let mated = is_mated(pos);
        pos.undo_move();
        if mated {
            log::trace!("brute mate {m}");
            return Some(m);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(sfen: &str) -> Option<String> {
        let mut pos = Position::from_sfen(sfen).unwrap();
        let before = pos.to_sfen();
        let m = mate_1ply(&mut pos).map(|m| m.to_usi());
        assert_eq!(pos.to_sfen(), before);
        m
    }

    #[test]
    fn test_handmade_mates() {
        let cases = [
            ("4k4/9/4G4/9/9/9/9/9/4K4 b G 1", "G*5b"),
            ("4k4/9/4G4/9/9/9/9/9/4K4 b S 1", "S*5b"),
            ("3gkg3/9/3pG4/9/9/9/9/9/4K4 b N 1", "N*4c"),
            ("3gkg3/9/4Gp3/9/9/9/9/9/4K4 b N 1", "N*6c"),
            ("3sk4/9/4G4/9/9/9/9/9/4K4 b G 1", "G*4b"),
            ("3nkl3/9/4G4/9/9/9/9/9/4K4 b B 1", "B*6b"),
            ("3nkl3/9/4P4/9/9/9/9/9/4K4 b R 1", "R*5b"),
            ("3nkl3/9/4S4/9/9/9/9/9/4K4 b L 1", "L*5b"),
            ("4k4/9/9/9/9/9/4g4/9/4K4 w g 1", "G*5h"),
            ("4k4/9/3B5/9/9/9/9/9/4K4 b G 1", "G*5b"),
            ("4k4/9/4G4/2B6/9/9/9/9/4K4 b - 1", "5c5b"),
            ("3gk4/9/4SG3/9/9/9/9/9/4K4 b - 1", "4c4b"),
            ("4k4/9/4G4/9/9/9/9/4L4/4K4 b - 1", "5c5b"),
            ("4kg1RR/3s5/9/9/9/9/9/9/4K4 b - 1", "2a4a+"),
        ];
        for (sfen, expected) in cases {
            assert_eq!(solve(sfen).as_deref(), Some(expected), "{sfen}");
        }
    }

    #[test]
    fn test_handmade_no_mates() {
        for sfen in [
            "4k4/9/4G4/9/9/9/9/9/4K4 b - 1",
            "4kg2R/3s5/9/9/9/9/9/9/4K4 b - 1",
            "4k4/9/9/9/9/9/9/9/4K4 b G 1",
        ] {
            assert_eq!(solve(sfen), None, "{sfen}");
        }
    }

    #[test]
    fn test_pawn_drop_mate_is_not_returned() {
        // P*9b は打ち歩詰めで、ほかに詰みはない
        assert_eq!(solve("k8/2G6/9/1N7/9/9/9/9/8K b P 1"), None);
    }

    #[test]
    fn test_distant_check_mate_needs_full_search() {
        // 飛車の離れた王手での詰みは接触判定では見つからない
        let sfen = "kl7/9/2G6/9/9/9/9/9/4K4 b R 1";
        let pos = Position::from_sfen(sfen).unwrap();
        assert_eq!(mate_1ply_fast(&pos), None);
        let m = solve(sfen).expect("mate");
        assert!(m.starts_with("R*9"), "{m}");
    }

    #[test]
    fn test_in_check_returns_none() {
        let mut pos = Position::from_sfen("4k4/9/9/9/9/9/9/4r4/4K4 b G 1").unwrap();
        assert!(pos.in_check());
        assert_eq!(mate_1ply(&mut pos), None);
        assert_eq!(mate_1ply_fast(&pos), None);
    }
}
