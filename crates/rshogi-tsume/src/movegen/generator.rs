//! 指し手生成
//!
//! 合法手・王手・王手回避を生成する。打ち歩詰めはここでは除外しない
//! （詰み探索側が直前の手で判定する）。

use crate::bitboard::{Bitboard, FILE_BB, RANK_BB, between_bb, enemy_field, king_effect};
use crate::position::Position;
use crate::types::{Color, Move, PieceType, Rank, Square};

use super::MoveList;

/// 合法手を生成（歩・角・飛の不成は成れる場合に省く）
pub fn generate_legal(pos: &Position, list: &mut MoveList) {
    generate(pos, list, false);
}

/// 合法手を生成（不成をすべて含む）
pub fn generate_legal_all(pos: &Position, list: &mut MoveList) {
    generate(pos, list, true);
}

/// 王手になる合法手を生成
///
/// `all` が偽なら歩・角・飛の成れる不成を省く。
pub fn generate_checks(pos: &Position, list: &mut MoveList, all: bool) {
    generate(pos, list, all);
    list.retain(|m| pos.gives_check(m));
}

/// 王手回避の合法手を生成（不成をすべて含む）
pub fn generate_evasions(pos: &Position, list: &mut MoveList) {
    debug_assert!(pos.in_check());
    list.clear();
    evasions(pos, list, true);
    list.retain(|m| pos.is_legal(m));
}

/// 手番側が詰んでいるか（打ち歩詰めかどうかは問わない）
pub fn is_mated(pos: &Position) -> bool {
    if !pos.in_check() {
        return false;
    }
    let mut list = MoveList::new();
    generate_evasions(pos, &mut list);
    list.is_empty()
}

fn generate(pos: &Position, list: &mut MoveList, all: bool) {
    list.clear();
    if pos.in_check() {
        evasions(pos, list, all);
    } else {
        non_evasions(pos, list, all);
    }
    list.retain(|m| pos.is_legal(m));
}

fn non_evasions(pos: &Position, list: &mut MoveList, all: bool) {
    let us = pos.side_to_move();
    let occ = pos.occupied();
    let target = !pos.pieces_c(us);

    piece_moves(pos, list, target, all);

    let ksq = pos.king_square(us);
    for to in king_effect(ksq) & target {
        list.push(Move::new_move(ksq, to, false));
    }

    drops(pos, list, !occ);
}

fn evasions(pos: &Position, list: &mut MoveList, all: bool) {
    let us = pos.side_to_move();
    let ksq = pos.king_square(us);
    let checkers = pos.checkers();

    for to in king_effect(ksq).and_not(pos.pieces_c(us)) {
        list.push(Move::new_move(ksq, to, false));
    }

    // 両王手は玉が動くしかない
    if checkers.more_than_one() {
        return;
    }
    let Some(checker) = checkers.lsb() else {
        return;
    };
    let between = between_bb(ksq, checker);

    piece_moves(pos, list, between | Bitboard::from_square(checker), all);
    drops(pos, list, between);
}

/// 玉以外の盤上の駒の移動（target に入る手のみ）
fn piece_moves(pos: &Position, list: &mut MoveList, target: Bitboard, all: bool) {
    let us = pos.side_to_move();
    let occ = pos.occupied();
    let pieces = pos.pieces_c(us).and_not(pos.pieces_pt(PieceType::King));
    for from in pieces {
        let pc = pos.piece_on(from);
        let pt = pc.piece_type();
        for to in pos.effect_of(pc, from, occ) & target {
            push_piece_move(list, us, pt, from, to, all);
        }
    }
}

/// 成り・不成を展開して追加
#[inline]
fn push_piece_move(list: &mut MoveList, us: Color, pt: PieceType, from: Square, to: Square, all: bool) {
    let field = enemy_field(us);
    let can_promote = pt.can_promote() && (field.contains(from) || field.contains(to));
    if can_promote {
        list.push(Move::new_move(from, to, true));
    }
    if is_dead_end(us, pt, to) {
        return;
    }
    let dominated = can_promote && matches!(pt, PieceType::Pawn | PieceType::Bishop | PieceType::Rook);
    if !dominated || all {
        list.push(Move::new_move(from, to, false));
    }
}

/// 行き所のない駒になる升か
#[inline]
pub fn is_dead_end(us: Color, pt: PieceType, to: Square) -> bool {
    let rank = to.rank().relative(us);
    match pt {
        PieceType::Pawn | PieceType::Lance => rank == Rank::Rank1,
        PieceType::Knight => rank <= Rank::Rank2,
        _ => false,
    }
}

/// 駒打ちで置けない升（行き所のない段）
#[inline]
fn dead_ranks(us: Color, pt: PieceType) -> Bitboard {
    let (r1, r2) = match us {
        Color::Black => (RANK_BB[0], RANK_BB[1]),
        Color::White => (RANK_BB[8], RANK_BB[7]),
    };
    match pt {
        PieceType::Pawn | PieceType::Lance => r1,
        PieceType::Knight => r1 | r2,
        _ => Bitboard::EMPTY,
    }
}

/// 二歩にならない升（自分の歩がない筋）
pub fn pawn_drop_mask(pos: &Position, us: Color) -> Bitboard {
    let pawns = pos.pieces(us, PieceType::Pawn);
    FILE_BB.iter().fold(Bitboard::EMPTY, |acc, &file| {
        if (file & pawns).is_empty() { acc | file } else { acc }
    })
}

fn drops(pos: &Position, list: &mut MoveList, target: Bitboard) {
    let us = pos.side_to_move();
    let hand = pos.hand(us);
    if hand.is_empty() || target.is_empty() {
        return;
    }
    for pt in PieceType::HAND_PIECES {
        if !hand.has(pt) {
            continue;
        }
        let mut squares = target.and_not(dead_ranks(us, pt));
        if pt == PieceType::Pawn {
            squares &= pawn_drop_mask(pos, us);
        }
        for to in squares {
            list.push(Move::new_drop(pt, to));
        }
    }
}
