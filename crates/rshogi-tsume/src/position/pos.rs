//! 局面（Position）

use crate::bitboard::{
    Bitboard, aligned, between_bb, bishop_effect, gold_effect, king_effect, knight_effect,
    lance_effect, pawn_effect, piece_effect, rook_effect, silver_effect,
};
use crate::types::{Color, Hand, Move, Piece, PieceType, RepetitionState, Square};

use super::state::StateInfo;
use super::zobrist::{zobrist_hand, zobrist_psq, zobrist_side};

/// 将棋の局面
///
/// 探索中は1つの局面を `do_move` / `undo_move` で前後させて使い回す。
#[derive(Clone)]
pub struct Position {
    // === 盤面 ===
    /// 各マスの駒 [Square]
    pub(super) board: [Piece; Square::NUM],
    /// 駒種別Bitboard [PieceType]
    pub(super) by_type: [Bitboard; PieceType::NUM + 1],
    /// 先後別Bitboard
    pub(super) by_color: [Bitboard; Color::NUM],

    // === 手駒 ===
    /// 手駒 [Color]
    pub(super) hand: [Hand; Color::NUM],

    // === 状態 ===
    /// 状態スタック（末尾が現局面）
    pub(super) states: Vec<StateInfo>,
    /// 初期局面からの手数
    pub(super) game_ply: i32,
    /// 手番
    pub(super) side_to_move: Color,
    /// 玉の位置 [Color]
    pub(super) king_square: [Square; Color::NUM],
}

impl Position {
    // ========== 局面設定 ==========

    /// 空の局面を生成
    pub fn new() -> Self {
        Position {
            board: [Piece::NONE; Square::NUM],
            by_type: [Bitboard::EMPTY; PieceType::NUM + 1],
            by_color: [Bitboard::EMPTY; Color::NUM],
            hand: [Hand::EMPTY; Color::NUM],
            states: vec![StateInfo::new()],
            game_ply: 1,
            side_to_move: Color::Black,
            king_square: [Square::SQ_11; Color::NUM],
        }
    }

    // ========== 盤面アクセス ==========

    /// 指定マスの駒を取得
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Piece {
        self.board[sq.index()]
    }

    /// 全駒のBitboard（占有）
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.by_color[0] | self.by_color[1]
    }

    /// 指定駒種のBitboard
    #[inline]
    pub fn pieces_pt(&self, pt: PieceType) -> Bitboard {
        self.by_type[pt as usize]
    }

    /// 指定手番の駒のBitboard
    #[inline]
    pub fn pieces_c(&self, c: Color) -> Bitboard {
        self.by_color[c.index()]
    }

    /// 指定手番・駒種のBitboard
    #[inline]
    pub fn pieces(&self, c: Color, pt: PieceType) -> Bitboard {
        self.by_color[c.index()] & self.by_type[pt as usize]
    }

    /// 金と同じ動きの駒（金・と・成香・成桂・成銀）
    #[inline]
    pub fn golds(&self) -> Bitboard {
        self.pieces_pt(PieceType::Gold)
            | self.pieces_pt(PieceType::ProPawn)
            | self.pieces_pt(PieceType::ProLance)
            | self.pieces_pt(PieceType::ProKnight)
            | self.pieces_pt(PieceType::ProSilver)
    }

    /// 角と馬
    #[inline]
    pub fn bishop_horse(&self) -> Bitboard {
        self.pieces_pt(PieceType::Bishop) | self.pieces_pt(PieceType::Horse)
    }

    /// 飛車と龍
    #[inline]
    pub fn rook_dragon(&self) -> Bitboard {
        self.pieces_pt(PieceType::Rook) | self.pieces_pt(PieceType::Dragon)
    }

    /// 手駒を取得
    #[inline]
    pub fn hand(&self, c: Color) -> Hand {
        self.hand[c.index()]
    }

    /// 玉の位置を取得
    #[inline]
    pub fn king_square(&self, c: Color) -> Square {
        self.king_square[c.index()]
    }

    /// 手番を取得
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 手数を取得
    #[inline]
    pub fn game_ply(&self) -> i32 {
        self.game_ply
    }

    /// 初期局面からの手の深さ（do_move した回数）
    #[inline]
    pub fn depth(&self) -> usize {
        self.states.len() - 1
    }

    // ========== 状態アクセス ==========

    #[inline]
    pub(super) fn state(&self) -> &StateInfo {
        // states は常に1つ以上積まれている
        &self.states[self.states.len() - 1]
    }

    #[inline]
    fn state_mut(&mut self) -> &mut StateInfo {
        let last = self.states.len() - 1;
        &mut self.states[last]
    }

    /// 盤面ハッシュ（手番込み、手駒を含まない）
    #[inline]
    pub fn board_key(&self) -> u64 {
        self.state().board_key
    }

    /// 手駒ハッシュ
    #[inline]
    pub fn hand_key(&self) -> u64 {
        self.state().hand_key
    }

    /// 局面全体のハッシュ
    #[inline]
    pub fn key(&self) -> u64 {
        self.state().key()
    }

    /// 王手している駒
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        self.state().checkers
    }

    /// 手番側が王手されているか
    #[inline]
    pub fn in_check(&self) -> bool {
        self.state().checkers.is_not_empty()
    }

    /// 直前の指し手（初期局面ではNONE）
    #[inline]
    pub fn last_move(&self) -> Move {
        self.state().last_move
    }

    /// 直前の手で取られた駒
    #[inline]
    pub fn captured_piece(&self) -> Piece {
        self.state().captured_piece
    }

    /// 玉への利きを遮っている駒（先後両方）
    #[inline]
    pub fn blockers_for_king(&self, c: Color) -> Bitboard {
        self.state().blockers_for_king[c.index()]
    }

    /// c の駒をpinしている相手の遠方駒
    #[inline]
    pub fn pinners(&self, c: Color) -> Bitboard {
        self.state().pinners[c.index()]
    }

    /// c 側の pin されている駒
    #[inline]
    pub fn pinned_pieces(&self, c: Color) -> Bitboard {
        self.blockers_for_king(c) & self.pieces_c(c)
    }

    /// 手番側がその駒種で王手になる升
    #[inline]
    pub fn check_squares(&self, pt: PieceType) -> Bitboard {
        self.state().check_squares[pt as usize]
    }

    /// 連続王手の手数（2加算単位）
    #[inline]
    pub fn continuous_check(&self, c: Color) -> i32 {
        self.state().continuous_check[c.index()]
    }

    // ========== 利き ==========

    /// 指定升に利いている駒（先後両方、占有を指定）
    pub fn attackers_to_occ(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let mut result = Bitboard::EMPTY;
        for c in Color::ALL {
            // 相手側から見た利きを逆引きする
            let them = !c;
            let attackers = (pawn_effect(them, sq) & self.pieces_pt(PieceType::Pawn))
                | (knight_effect(them, sq) & self.pieces_pt(PieceType::Knight))
                | (silver_effect(them, sq) & self.pieces_pt(PieceType::Silver))
                | (gold_effect(them, sq) & self.golds())
                | (lance_effect(them, sq, occupied) & self.pieces_pt(PieceType::Lance));
            result |= attackers & self.pieces_c(c);
        }
        let kings = self.pieces_pt(PieceType::King)
            | self.pieces_pt(PieceType::Horse)
            | self.pieces_pt(PieceType::Dragon);
        result
            | (king_effect(sq) & kings)
            | (bishop_effect(sq, occupied) & self.bishop_horse())
            | (rook_effect(sq, occupied) & self.rook_dragon())
    }

    /// 指定升に c の駒が利いているか（占有を指定）
    #[inline]
    pub fn attackers_to_c_occ(&self, sq: Square, c: Color, occupied: Bitboard) -> Bitboard {
        self.attackers_to_occ(sq, occupied) & self.pieces_c(c)
    }

    /// 指定升に c の駒が利いているもの
    #[inline]
    pub fn attackers_to_c(&self, sq: Square, c: Color) -> Bitboard {
        self.attackers_to_c_occ(sq, c, self.occupied())
    }

    /// 指定升に c の駒が利いているか
    #[inline]
    pub fn is_attacked_by(&self, sq: Square, c: Color) -> bool {
        self.attackers_to_c(sq, c).is_not_empty()
    }

    /// 盤上の駒 pc が sq にいるとしたときの利き
    #[inline]
    pub fn effect_of(&self, pc: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
        piece_effect(pc.piece_type(), pc.color(), sq, occupied)
    }

    // ========== 指し手 ==========

    /// 指し手で動く駒（駒打ちなら打つ駒、成りは成る前）
    #[inline]
    pub fn moved_piece(&self, m: Move) -> Piece {
        if m.is_drop() {
            Piece::new(self.side_to_move, m.drop_piece_type())
        } else {
            self.piece_on(m.from())
        }
    }

    /// 指し手が王手になるか（直接王手・開き王手）
    pub fn gives_check(&self, m: Move) -> bool {
        if m.is_drop() {
            return self.check_squares(m.drop_piece_type()).contains(m.to());
        }
        let from = m.from();
        let to = m.to();
        let pt = self.piece_on(from).piece_type();
        let pt_after = if m.is_promote() { pt.promote().unwrap_or(pt) } else { pt };

        if self.check_squares(pt_after).contains(to) {
            return true;
        }

        let them_ksq = self.king_square(!self.side_to_move);
        self.blockers_for_king(!self.side_to_move).contains(from) && !aligned(from, to, them_ksq)
    }

    /// 擬似合法手が自玉を取られる手でないか
    ///
    /// 王手中は王手回避として生成された手であることを前提とする。
    pub fn is_legal(&self, m: Move) -> bool {
        if m.is_drop() {
            return true;
        }
        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();
        if self.piece_on(from).piece_type() == PieceType::King {
            let occ = self.occupied().and_not(Bitboard::from_square(from));
            return self.attackers_to_c_occ(to, !us, occ).is_empty();
        }
        !self.blockers_for_king(us).contains(from) || aligned(from, to, self.king_square(us))
    }

    /// 指し手で局面を進める
    pub fn do_move(&mut self, m: Move) {
        debug_assert!(m.is_some());
        let us = self.side_to_move;
        let them = !us;
        let mut st = self.state().inherit();
        let to = m.to();

        if m.is_drop() {
            let pt = m.drop_piece_type();
            let pc = Piece::new(us, pt);
            self.hand[us.index()] = self.hand[us.index()].sub(pt);
            st.hand_key = st.hand_key.wrapping_sub(zobrist_hand(us, pt));
            self.put_piece(pc, to);
            st.board_key ^= zobrist_psq(pc, to);
        } else {
            let from = m.from();
            let pc = self.piece_on(from);
            let captured = self.piece_on(to);
            if captured.is_some() {
                let pt = captured.piece_type().unpromote();
                self.remove_piece(to);
                st.board_key ^= zobrist_psq(captured, to);
                self.hand[us.index()] = self.hand[us.index()].add(pt);
                st.hand_key = st.hand_key.wrapping_add(zobrist_hand(us, pt));
            }
            st.captured_piece = captured;

            let moved = if m.is_promote() {
                Piece::new(us, pc.piece_type().promote().unwrap_or(pc.piece_type()))
            } else {
                pc
            };
            self.remove_piece(from);
            st.board_key ^= zobrist_psq(pc, from);
            self.put_piece(moved, to);
            st.board_key ^= zobrist_psq(moved, to);
            if pc.piece_type() == PieceType::King {
                self.king_square[us.index()] = to;
            }
        }

        st.board_key ^= zobrist_side();
        st.last_move = m;
        st.hands = self.hand;
        self.side_to_move = them;
        self.game_ply += 1;
        self.states.push(st);

        let checkers = self.attackers_to_c(self.king_square(them), us);
        let st = self.state_mut();
        st.checkers = checkers;
        st.continuous_check[us.index()] =
            if checkers.is_not_empty() { st.continuous_check[us.index()] + 2 } else { 0 };
        self.update_blockers_and_pinners();
        self.update_check_squares();
    }

    /// 直前の do_move を取り消す
    pub fn undo_move(&mut self) {
        debug_assert!(self.states.len() > 1, "undo_move without do_move");
        let Some(st) = self.states.pop() else {
            return;
        };
        let m = st.last_move;
        let them = self.side_to_move;
        let us = !them;
        self.side_to_move = us;
        self.game_ply -= 1;
        let to = m.to();

        if m.is_drop() {
            let pt = m.drop_piece_type();
            self.remove_piece(to);
            self.hand[us.index()] = self.hand[us.index()].add(pt);
        } else {
            let from = m.from();
            let moved = self.piece_on(to);
            let original = if m.is_promote() {
                Piece::new(us, moved.piece_type().unpromote())
            } else {
                moved
            };
            self.remove_piece(to);
            self.put_piece(original, from);
            if original.piece_type() == PieceType::King {
                self.king_square[us.index()] = from;
            }
            let captured = st.captured_piece;
            if captured.is_some() {
                self.put_piece(captured, to);
                self.hand[us.index()] = self.hand[us.index()].sub(captured.piece_type().unpromote());
            }
        }
    }

    // ========== 千日手 ==========

    /// 千日手・優等局面判定（手番側から見た分類）
    ///
    /// 同じ手番の過去局面を遡り、盤面が一致する最も近い局面と比較する。
    /// 盤面が一致しても手駒に優劣がつかない場合はさらに遡る。
    pub fn repetition_state(&self) -> RepetitionState {
        let us = self.side_to_move;
        let cur = self.state();
        let len = self.states.len();
        let mut dist = 2;
        while dist < len {
            let prev = &self.states[len - 1 - dist];
            if prev.board_key == cur.board_key {
                let now = cur.hands[us.index()];
                let then = prev.hands[us.index()];
                if now == then {
                    let d = dist as i32;
                    if cur.continuous_check[(!us).index()] >= d {
                        return RepetitionState::Win;
                    }
                    if cur.continuous_check[us.index()] >= d {
                        return RepetitionState::Lose;
                    }
                    return RepetitionState::Draw;
                }
                if now.is_superior_or_equal(then) {
                    return RepetitionState::Superior;
                }
                if then.is_superior_or_equal(now) {
                    return RepetitionState::Inferior;
                }
            }
            dist += 2;
        }
        RepetitionState::None
    }

    // ========== 内部更新 ==========

    pub(super) fn put_piece(&mut self, pc: Piece, sq: Square) {
        debug_assert!(self.board[sq.index()].is_none());
        self.board[sq.index()] = pc;
        self.by_type[pc.piece_type() as usize].set(sq);
        self.by_color[pc.color().index()].set(sq);
    }

    pub(super) fn remove_piece(&mut self, sq: Square) {
        let pc = self.board[sq.index()];
        debug_assert!(pc.is_some());
        self.board[sq.index()] = Piece::NONE;
        self.by_type[pc.piece_type() as usize].clear(sq);
        self.by_color[pc.color().index()].clear(sq);
    }

    /// 両玉について pin 情報を更新
    pub(super) fn update_blockers_and_pinners(&mut self) {
        let occ = self.occupied();
        let mut blockers = [Bitboard::EMPTY; Color::NUM];
        let mut pinners = [Bitboard::EMPTY; Color::NUM];
        for c in Color::ALL {
            let them = !c;
            let ksq = self.king_square(c);
            let snipers = ((lance_effect(c, ksq, Bitboard::EMPTY)
                & self.pieces(them, PieceType::Lance))
                | (rook_effect(ksq, Bitboard::EMPTY) & self.rook_dragon())
                | (bishop_effect(ksq, Bitboard::EMPTY) & self.bishop_horse()))
                & self.pieces_c(them);
            for sniper in snipers {
                let b = between_bb(ksq, sniper) & occ;
                if b.is_not_empty() && !b.more_than_one() {
                    blockers[c.index()] |= b;
                    if (b & self.pieces_c(c)).is_not_empty() {
                        pinners[c.index()].set(sniper);
                    }
                }
            }
        }
        let st = self.state_mut();
        st.blockers_for_king = blockers;
        st.pinners = pinners;
    }

    /// 手番側の王手升を更新
    pub(super) fn update_check_squares(&mut self) {
        let us = self.side_to_move;
        let them = !us;
        let ksq = self.king_square(them);
        let occ = self.occupied();
        let mut squares = [Bitboard::EMPTY; PieceType::NUM + 1];
        for pt in PieceType::ALL {
            if pt != PieceType::King {
                // 相手玉の位置に相手の駒を置いたときの利きが王手升になる
                squares[pt as usize] = piece_effect(pt, them, ksq, occ);
            }
        }
        self.state_mut().check_squares = squares;
    }

    /// 現局面の手駒・ハッシュ・王手情報を一から計算し直す
    pub(super) fn refresh_state(&mut self) {
        let mut board_key = 0u64;
        for sq in Square::all() {
            board_key ^= zobrist_psq(self.piece_on(sq), sq);
        }
        if self.side_to_move == Color::White {
            board_key ^= zobrist_side();
        }
        let mut hand_key = 0u64;
        for c in Color::ALL {
            for pt in PieceType::HAND_PIECES {
                let n = self.hand(c).count(pt) as u64;
                hand_key = hand_key.wrapping_add(zobrist_hand(c, pt).wrapping_mul(n));
            }
        }

        let us = self.side_to_move;
        let checkers = self.attackers_to_c(self.king_square(us), !us);
        let hands = self.hand;
        let st = self.state_mut();
        st.board_key = board_key;
        st.hand_key = hand_key;
        st.hands = hands;
        st.checkers = checkers;
        self.update_blockers_and_pinners();
        self.update_check_squares();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
