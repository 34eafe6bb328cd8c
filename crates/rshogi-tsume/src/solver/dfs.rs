//! 深さ制限付きの単純な詰み探索
//!
//! 置換表を使わず、攻め方は王手を、玉方はすべての合法手を順に試す。
//! 手数が短いと分かっている局面では DF-PN より軽い。

use crate::mate::mate_1ply;
use crate::movegen::{MoveList, generate_checks, generate_legal};
use crate::position::Position;
use crate::types::{Move, PieceType};

/// 玉方の応手の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Defence {
    /// この手で詰みを逃れる
    Refute(Move),
    /// 応手がないが、直前の手が打ち歩詰めなので攻め方の反則
    PawnDropMate,
    /// 詰み
    Mated,
}

/// `depth_limit` 手以内の詰みを探し、詰みなら初手を返す
pub fn solve(pos: &mut Position, depth_limit: i32) -> Option<Move> {
    attack(pos, depth_limit)
}

fn attack(pos: &mut Position, limit: i32) -> Option<Move> {
    if limit < 1 {
        return None;
    }
    if let Some(m) = mate_1ply(pos) {
        return Some(m);
    }

    // 手数に余裕があり歩を持っていれば、打ち歩詰めを避ける不成も試す
    let all = limit > 3 && pos.hand(pos.side_to_move()).has(PieceType::Pawn);
    let mut checks = MoveList::new();
    generate_checks(pos, &mut checks, all);

    for &m in checks.iter() {
        pos.do_move(m);
        let result = defence(pos, limit - 1);
        pos.undo_move();
        match result {
            Defence::Mated => return Some(m),
            Defence::Refute(reply) => log::trace!("dfs {m} refuted by {reply}"),
            Defence::PawnDropMate => {}
        }
    }
    None
}

fn defence(pos: &mut Position, limit: i32) -> Defence {
    let mut moves = MoveList::new();
    generate_legal(pos, &mut moves);

    for &m in moves.iter() {
        pos.do_move(m);
        let counter = attack(pos, limit - 1);
        pos.undo_move();
        if counter.is_none() {
            return Defence::Refute(m);
        }
    }

    if moves.is_empty() && pos.last_move().is_pawn_drop() {
        Defence::PawnDropMate
    } else {
        Defence::Mated
    }
}
