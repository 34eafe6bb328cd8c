// 盤上の駒を動かす1手詰め判定

use crate::bitboard::{Bitboard, aligned, enemy_field, king_effect};
use crate::movegen::is_dead_end;
use crate::position::Position;
use crate::types::{Move, PieceType, Square};

use super::helpers::{Checker, is_contact_mate};

/// 試す順（近接駒を先に、遠方駒を後に）
const MOVE_ORDER: [PieceType; 13] = [
    PieceType::Pawn,
    PieceType::Knight,
    PieceType::Silver,
    PieceType::Gold,
    PieceType::ProPawn,
    PieceType::ProLance,
    PieceType::ProKnight,
    PieceType::ProSilver,
    PieceType::Horse,
    PieceType::Dragon,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Lance,
];

/// 駒を動かす接触王手の1手詰めを探す
pub fn check_move_mate(pos: &Position) -> Option<Move> {
    let us = pos.side_to_move();
    let them = !us;
    let ksq = pos.king_square(them);
    let our_ksq = pos.king_square(us);
    let occ = pos.occupied();
    let pinned = pos.pinned_pieces(us);
    // 接触王手になりうる升（桂は王手升そのもの）
    let around = king_effect(ksq).and_not(pos.pieces_c(us));
    let knight_squares = pos.check_squares(PieceType::Knight).and_not(pos.pieces_c(us));
    let field = enemy_field(us);

    for pt in MOVE_ORDER {
        for from in pos.pieces(us, pt) {
            let pc = pos.piece_on(from);
            let reach = pos.effect_of(pc, from, occ);
            let targets = reach & (around | knight_squares);
            for to in targets {
                if pinned.contains(from) && !aligned(from, to, our_ksq) {
                    continue;
                }
                let promotable = pt.can_promote() && (field.contains(from) || field.contains(to));
                if promotable {
                    let promoted = try_move(pos, pt.promote().unwrap_or(pt), from, to, true);
                    if promoted.is_some() {
                        return promoted;
                    }
                }
                if !is_dead_end(us, pt, to) {
                    let plain = try_move(pos, pt, from, to, false);
                    if plain.is_some() {
                        return plain;
                    }
                }
            }
        }
    }
    None
}

fn try_move(pos: &Position, pt_after: PieceType, from: Square, to: Square, promote: bool) -> Option<Move> {
    let us = pos.side_to_move();
    // 桂以外は玉に接していなければ合駒が利くので対象外
    if pt_after != PieceType::Knight
        && (king_effect(pos.king_square(!us)) & Bitboard::from_square(to)).is_empty()
    {
        return None;
    }
    let checker = Checker { piece_type: pt_after, to, from: Some(from) };
    if is_contact_mate(pos, us, &checker) {
        let m = Move::new_move(from, to, promote);
        log::trace!("move mate {m}");
        Some(m)
    } else {
        None
    }
}
