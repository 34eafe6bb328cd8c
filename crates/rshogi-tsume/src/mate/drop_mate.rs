// 駒打ちによる1手詰め判定

use crate::bitboard::king_effect;
use crate::movegen::is_dead_end;
use crate::position::Position;
use crate::types::{Move, PieceType};

use super::helpers::{Checker, is_contact_mate};

/// 試す順（歩は打ち歩詰めになるので打たない）
const DROP_ORDER: [PieceType; 6] = [
    PieceType::Knight,
    PieceType::Gold,
    PieceType::Lance,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Silver,
];

/// 駒打ちによる接触王手の1手詰めを探す
pub fn check_drop_mate(pos: &Position) -> Option<Move> {
    let us = pos.side_to_move();
    let hand = pos.hand(us);
    if hand.is_empty() {
        return None;
    }
    let ksq = pos.king_square(!us);
    let empty = !pos.occupied();

    for pt in DROP_ORDER {
        if !hand.has(pt) {
            continue;
        }
        let mut targets = pos.check_squares(pt) & empty;
        if pt != PieceType::Knight {
            targets &= king_effect(ksq);
        }
        for to in targets {
            if is_dead_end(us, pt, to) {
                continue;
            }
            let checker = Checker { piece_type: pt, to, from: None };
            if is_contact_mate(pos, us, &checker) {
                log::trace!("drop mate {}", Move::new_drop(pt, to));
                return Some(Move::new_drop(pt, to));
            }
        }
    }
    None
}
