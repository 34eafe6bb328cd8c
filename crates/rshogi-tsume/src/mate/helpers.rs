// 1手詰め判定用のヘルパー関数
//
// いずれも「攻め方が1手指した直後」の局面を、実際に do_move せずに
// 占有 Bitboard の差し替えだけで評価する。

use crate::bitboard::{Bitboard, king_effect, piece_effect};
use crate::position::Position;
use crate::types::{Color, PieceType, Square};

/// 王手をかける駒（打った駒または動かした駒）
#[derive(Debug, Clone, Copy)]
pub struct Checker {
    /// 着手後の駒種（成りの場合は成った後）
    pub piece_type: PieceType,
    /// 着手後の升
    pub to: Square,
    /// 動く前の升（駒打ちはNone）
    pub from: Option<Square>,
}

impl Checker {
    #[inline]
    fn from_bb(&self) -> Bitboard {
        self.from.map_or(Bitboard::EMPTY, Bitboard::from_square)
    }

    /// 着手後の占有
    #[inline]
    pub fn occupied_after(&self, pos: &Position) -> Bitboard {
        pos.occupied().and_not(self.from_bb()) | Bitboard::from_square(self.to)
    }

    /// 王手駒以外の攻め方の駒（動いた駒を除く）
    #[inline]
    fn others(&self, pos: &Position, us: Color) -> Bitboard {
        pos.pieces_c(us).and_not(self.from_bb())
    }

    /// 着手後、王手駒の利き
    #[inline]
    fn effect(&self, us: Color, occupied: Bitboard) -> Bitboard {
        piece_effect(self.piece_type, us, self.to, occupied)
    }
}

/// 王手駒が相手玉に接触しているか（合駒が利かない王手か）
///
/// 桂は離れていても合駒が利かないので接触扱い。
pub fn is_contact_check(pos: &Position, us: Color, checker: &Checker) -> bool {
    let ksq = pos.king_square(!us);
    let occ = checker.occupied_after(pos);
    if !checker.effect(us, occ).contains(ksq) {
        return false;
    }
    checker.piece_type == PieceType::Knight || king_effect(ksq).contains(checker.to)
}

/// 相手玉が逃げられるか（王手駒を玉で取る場合を含む）
pub fn can_king_escape(pos: &Position, us: Color, checker: &Checker) -> bool {
    let them = !us;
    let ksq = pos.king_square(them);
    let to_bb = Bitboard::from_square(checker.to);
    // 玉が動いた後は元の升を遠方駒の利きが通り抜ける
    let occ = checker.occupied_after(pos).and_not(Bitboard::from_square(ksq));
    let others = checker.others(pos, us);
    let escapes = king_effect(ksq).and_not(pos.pieces_c(them).and_not(to_bb));

    escapes.iter().any(|dest| {
        let mut covered = (pos.attackers_to_occ(dest, occ) & others).is_not_empty();
        if dest != checker.to {
            covered |= checker.effect(us, occ).contains(dest);
        }
        !covered
    })
}

/// 玉以外の駒で王手駒を取れるか（取った後に自玉が取られないことも確認する）
pub fn can_piece_capture(pos: &Position, us: Color, checker: &Checker) -> bool {
    let them = !us;
    let ksq = pos.king_square(them);
    let to_bb = Bitboard::from_square(checker.to);
    let occ = checker.occupied_after(pos);
    let others = checker.others(pos, us);
    let capturers = (pos.attackers_to_occ(checker.to, occ) & pos.pieces_c(them))
        .and_not(Bitboard::from_square(ksq) | to_bb);

    capturers.iter().any(|from| {
        let occ_after = occ.and_not(Bitboard::from_square(from));
        (pos.attackers_to_occ(ksq, occ_after) & others).is_empty()
    })
}

/// 接触王手で詰んでいるか
pub fn is_contact_mate(pos: &Position, us: Color, checker: &Checker) -> bool {
    is_contact_check(pos, us, checker)
        && !can_king_escape(pos, us, checker)
        && !can_piece_capture(pos, us, checker)
}
