//! DF-PN による詰み探索
//!
//! 攻め方の手番（OR ノード）では王手だけを、玉方の手番（AND ノード）では
//! 王手回避だけを展開する。各ノードの値は置換表に1回だけ書き込み、
//! 子の値は置換表から読み直してしきい値を計算する。

use smallvec::SmallVec;

use crate::mate::{mate_1ply, mate_1ply_fast};
use crate::movegen::{MoveList, generate_checks, generate_evasions};
use crate::position::Position;
use crate::types::{Color, Move, RepetitionState};

use super::config::SolverConfig;
use super::error::ConfigError;
use super::pn::{INFINITY, PnDn, saturating_sum};
use super::pv;
use super::table::TranspositionTable;

/// 深さ制限がない場合の手数の上限
pub const MAX_PLY: u32 = 1024;

pub(super) type Children = SmallVec<[Move; 32]>;

/// 直前の探索の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveOutcome {
    /// 詰みを証明した
    Proven,
    /// 不詰を証明した
    Disproven,
    /// ノード数の上限に達した（まだ探索していない場合も含む）
    #[default]
    Inconclusive,
}

/// DF-PN 詰み探索器
pub struct DfPnSolver {
    table: TranspositionTable,
    config: SolverConfig,
    /// 今回の探索の制限（0 は無制限）
    max_node_count: u64,
    max_depth: u32,
    node_count: u64,
    aborted: bool,
    outcome: SolveOutcome,
}

impl DfPnSolver {
    /// 置換表サイズ（MB）を指定して作成（深さ・ノード数は無制限）
    pub fn new(memory_mb: usize) -> Self {
        Self::build(SolverConfig {
            memory_mb: memory_mb.max(1),
            ..SolverConfig::default()
        })
    }

    /// 設定を指定して作成
    pub fn with_config(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SolverConfig) -> Self {
        Self {
            table: TranspositionTable::new(config.memory_mb),
            config,
            max_node_count: config.max_node_count,
            max_depth: config.max_depth,
            node_count: 0,
            aborted: false,
            outcome: SolveOutcome::Inconclusive,
        }
    }

    /// 設定
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 置換表
    pub fn table(&self) -> &TranspositionTable {
        &self.table
    }

    /// 置換表を消去する
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// 直前の探索で訪れたノード数
    pub fn searched_node_count(&self) -> u64 {
        self.node_count
    }

    /// 直前の探索の結果
    pub fn last_outcome(&self) -> SolveOutcome {
        self.outcome
    }

    /// 手番側の詰みを探し、詰みなら初手を返す
    ///
    /// 不詰・打ち切りのどちらも None。区別は `last_outcome` で行う。
    pub fn solve(&mut self, pos: &mut Position) -> Option<Move> {
        self.solve_with_limits(pos, self.config.max_node_count, self.config.max_depth)
    }

    /// ノード数・深さの制限を指定して詰みを探す（0 は無制限）
    pub fn solve_with_limits(
        &mut self,
        pos: &mut Position,
        max_node_count: u64,
        max_depth: u32,
    ) -> Option<Move> {
        if !self.run(pos, max_node_count, max_depth).is_proven() {
            return None;
        }
        self.root_move(pos)
    }

    /// 詰みを探し、詰みなら手順を返す（詰みでなければ空）
    pub fn solve_with_pv(&mut self, pos: &mut Position) -> Vec<Move> {
        if !self.run(pos, self.config.max_node_count, self.config.max_depth).is_proven() {
            return Vec::new();
        }
        let ply_limit = self.ply_limit();
        pv::reconstruct(self, pos, ply_limit)
    }

    #[inline]
    fn ply_limit(&self) -> u32 {
        if self.max_depth == 0 { MAX_PLY } else { self.max_depth.min(MAX_PLY) }
    }

    fn run(&mut self, pos: &mut Position, max_node_count: u64, max_depth: u32) -> PnDn {
        self.table.new_generation();
        self.max_node_count = max_node_count;
        self.max_depth = max_depth;
        self.node_count = 0;
        self.aborted = false;

        let attacker = pos.side_to_move();
        log::debug!(
            "dfpn start: generation={} max_nodes={} max_depth={} sfen={}",
            self.table.generation(),
            max_node_count,
            max_depth,
            pos
        );

        // 王手されている攻め方は王手をかける前に逃げなければならない
        let value = if pos.in_check() {
            PnDn::disproven()
        } else {
            self.prove(pos, attacker, 0)
        };

        self.outcome = if value.is_proven() {
            SolveOutcome::Proven
        } else if value.is_disproven() {
            SolveOutcome::Disproven
        } else {
            SolveOutcome::Inconclusive
        };
        log::debug!(
            "dfpn end: outcome={:?} nodes={} pn={} dn={}",
            self.outcome,
            self.node_count,
            value.pn,
            value.dn
        );
        value
    }

    /// 詰みが証明されたルートで、詰みになる初手を選ぶ
    fn root_move(&mut self, pos: &mut Position) -> Option<Move> {
        if let Some(m) = mate_1ply_fast(pos) {
            return Some(m);
        }
        let attacker = pos.side_to_move();
        let children = expand(pos, true);
        self.proven_child(pos, &children, attacker, 0)
    }

    /// 置換表の値が詰み・不詰に決まるまで探索する（打ち切られたらその時点の値）
    pub(super) fn prove(&mut self, pos: &mut Position, attacker: Color, depth: u32) -> PnDn {
        let threshold = PnDn::new(INFINITY, INFINITY);
        let mut value = self.table.load(pos.board_key(), depth, pos.hand(attacker));
        while !value.is_decided() && !self.aborted {
            value = self.search(pos, attacker, depth, threshold);
        }
        value
    }

    /// 詰みが証明された子を1つ選ぶ
    ///
    /// 置換表に証明済みの子が残っていなければ（上書きで消えた場合）、
    /// 不詰と分かっている子を除いて pn の小さい順に探索し直す。
    pub(super) fn proven_child(
        &mut self,
        pos: &mut Position,
        children: &[Move],
        attacker: Color,
        depth: u32,
    ) -> Option<Move> {
        let or_node = pos.side_to_move() == attacker;
        let mut values = Vec::with_capacity(children.len());
        for &m in children {
            pos.do_move(m);
            let value = self.table.load(pos.board_key(), depth + 1, pos.hand(attacker));
            pos.undo_move();
            if value.is_proven() {
                return Some(m);
            }
            values.push((m, value));
        }

        if or_node {
            if let Some(m) = mate_1ply(pos) {
                return Some(m);
            }
        }

        values.retain(|(_, v)| !v.is_disproven());
        values.sort_by_key(|&(_, v)| v.pn);
        for (m, _) in values {
            pos.do_move(m);
            let value = self.prove(pos, attacker, depth + 1);
            pos.undo_move();
            if value.is_proven() {
                log::debug!("dfpn re-proved {m} at depth {depth}");
                return Some(m);
            }
            if self.aborted {
                break;
            }
        }
        None
    }

    /// 1ノードの探索。どの経路で戻っても値は置換表に1回だけ書き込む。
    fn search(&mut self, pos: &mut Position, attacker: Color, depth: u32, threshold: PnDn) -> PnDn {
        self.node_count += 1;
        let value = self.search_inner(pos, attacker, depth, threshold);
        self.table.store(pos.board_key(), depth, pos.hand(attacker), value);
        value
    }

    fn search_inner(
        &mut self,
        pos: &mut Position,
        attacker: Color,
        depth: u32,
        threshold: PnDn,
    ) -> PnDn {
        let key = pos.board_key();
        let stand = pos.hand(attacker);

        if self.max_node_count > 0 && self.node_count > self.max_node_count {
            self.aborted = true;
            return self.table.load(key, depth, stand);
        }

        let or_node = pos.side_to_move() == attacker;

        if let Some(value) = repetition_value(pos.repetition_state(), or_node) {
            return value;
        }

        // 攻め方の手番で残り手数がなければ詰まない
        if or_node && depth >= self.ply_limit() {
            return PnDn::disproven();
        }

        let cached = self.table.load(key, depth, stand);
        if cached.exceeds(threshold) {
            return cached;
        }

        if or_node {
            if let Some(m) = mate_1ply_fast(pos) {
                log::trace!("dfpn mate1 {m} at depth {depth}");
                return PnDn::proven();
            }
        }

        let children = expand(pos, or_node);
        if children.is_empty() {
            // 王手がない、または打ち歩詰めは不詰。それ以外の王手回避なしは詰み。
            return if or_node || pos.last_move().is_pawn_drop() {
                PnDn::disproven()
            } else {
                PnDn::proven()
            };
        }

        loop {
            let (value, best, best_value, second) =
                self.evaluate(pos, &children, attacker, depth, or_node);
            if value.exceeds(threshold) {
                return value;
            }

            let child_threshold = if or_node {
                PnDn {
                    pn: threshold.pn.min(second.saturating_add(1)),
                    dn: threshold.dn - value.dn + best_value.dn,
                }
            } else {
                PnDn {
                    pn: threshold.pn - value.pn + best_value.pn,
                    dn: threshold.dn.min(second.saturating_add(1)),
                }
            };

            pos.do_move(children[best]);
            self.search(pos, attacker, depth + 1, child_threshold);
            pos.undo_move();

            if self.aborted {
                return value;
            }
        }
    }

    /// 子の値を置換表から集める
    ///
    /// 戻り値は（このノードの値, 最善の子の番号, その値, 2番目に小さい値）。
    /// OR ノードでは pn、AND ノードでは dn の小さい子が最善。
    fn evaluate(
        &self,
        pos: &mut Position,
        children: &[Move],
        attacker: Color,
        depth: u32,
        or_node: bool,
    ) -> (PnDn, usize, PnDn, u32) {
        let mut best = 0;
        let mut best_value = PnDn::unknown();
        let mut min = INFINITY;
        let mut second = INFINITY;
        let mut sum = 0;

        for (i, &m) in children.iter().enumerate() {
            pos.do_move(m);
            let v = self.table.load(pos.board_key(), depth + 1, pos.hand(attacker));
            pos.undo_move();

            let (phi, delta) = if or_node { (v.pn, v.dn) } else { (v.dn, v.pn) };
            if phi < min {
                second = min;
                min = phi;
                best = i;
                best_value = v;
            } else if phi < second {
                second = phi;
            }
            sum = saturating_sum(sum, delta);
        }

        let value = if or_node {
            PnDn { pn: min, dn: sum }
        } else {
            PnDn { pn: sum, dn: min }
        };
        (value, best, best_value, second)
    }
}

/// 千日手・優等局面による終端判定
///
/// OR ノード（攻め方の手番）: 連続王手の千日手で勝ちなら詰み、
/// 通常の千日手・負け・劣等局面は不詰。
/// AND ノード（玉方の手番）: 通常の千日手・勝ち・優等局面は不詰、負けは詰み。
fn repetition_value(state: RepetitionState, or_node: bool) -> Option<PnDn> {
    match (state, or_node) {
        (RepetitionState::None, _) => None,
        (RepetitionState::Win, true) | (RepetitionState::Lose, false) => Some(PnDn::proven()),
        (RepetitionState::Draw | RepetitionState::Lose | RepetitionState::Inferior, true) => {
            Some(PnDn::disproven())
        }
        (RepetitionState::Draw | RepetitionState::Win | RepetitionState::Superior, false) => {
            Some(PnDn::disproven())
        }
        (RepetitionState::Superior, true) | (RepetitionState::Inferior, false) => None,
    }
}

/// 子ノードの指し手（OR ノードは王手、AND ノードは王手回避）
pub(super) fn expand(pos: &Position, or_node: bool) -> Children {
    let mut list = MoveList::new();
    if or_node {
        generate_checks(pos, &mut list, true);
    } else if pos.in_check() {
        generate_evasions(pos, &mut list);
    }
    list.iter().copied().collect()
}
