//! 詰み手順の復元
//!
//! 置換表には値しか残らないので、証明済みの局面から子を展開し直し、
//! 詰みが証明されている子だけをたどって手順を組み立てる。

use std::collections::HashSet;

use crate::position::Position;
use crate::types::{Color, Move};

use super::dfpn::{DfPnSolver, expand};

/// 詰みが証明された局面から詰み手順を復元する
///
/// 証明済みの子のうち最も長い手順を選ぶ（同じ長さなら生成順で先のもの）。
/// 置換表から証明が消えている局面では探索し直す。手順が組み立てられなければ空。
pub fn reconstruct(solver: &mut DfPnSolver, pos: &mut Position, ply_limit: u32) -> Vec<Move> {
    let attacker = pos.side_to_move();
    let mut walker = Walker {
        solver,
        attacker,
        ply_limit,
        visited: HashSet::new(),
    };
    walker.walk(pos, 0).unwrap_or_default()
}

struct Walker<'a> {
    solver: &'a mut DfPnSolver,
    attacker: Color,
    ply_limit: u32,
    /// 現在の経路上の局面（循環防止）
    visited: HashSet<u64>,
}

impl Walker<'_> {
    /// この局面からの詰み手順。詰みにたどり着けなければ None。
    fn walk(&mut self, pos: &mut Position, depth: u32) -> Option<Vec<Move>> {
        let or_node = pos.side_to_move() == self.attacker;
        let children = expand(pos, or_node);

        if !or_node && children.is_empty() {
            return (!pos.last_move().is_pawn_drop()).then(Vec::new);
        }
        if depth >= self.ply_limit {
            return None;
        }
        let key = pos.key();
        if !self.visited.insert(key) {
            return None;
        }

        let mut best: Option<Vec<Move>> = None;
        for &m in &children {
            pos.do_move(m);
            let proven = self
                .solver
                .table()
                .load(pos.board_key(), depth + 1, pos.hand(self.attacker))
                .is_proven();
            let line = if proven { self.walk(pos, depth + 1) } else { None };
            pos.undo_move();

            if let Some(rest) = line {
                if best.as_ref().is_none_or(|b| rest.len() + 1 > b.len()) {
                    best = Some(prepend(m, rest));
                }
            }
        }

        // 1手詰めで証明された局面は子が置換表になく、上書きで消えた証明もある
        if best.is_none() {
            if let Some(m) = self.solver.proven_child(pos, &children, self.attacker, depth) {
                pos.do_move(m);
                let line = self.walk(pos, depth + 1);
                pos.undo_move();
                best = line.map(|rest| prepend(m, rest));
            }
        }
        self.visited.remove(&key);
        best
    }
}

fn prepend(m: Move, rest: Vec<Move>) -> Vec<Move> {
    let mut line = Vec::with_capacity(rest.len() + 1);
    line.push(m);
    line.extend(rest);
    line
}

#[cfg(test)]
mod tests {
    use crate::movegen::is_mated;
    use crate::position::Position;
    use crate::solver::DfPnSolver;

    use super::reconstruct;

    fn pv(sfen: &str) -> Vec<String> {
        let mut pos = Position::from_sfen(sfen).unwrap();
        let mut solver = DfPnSolver::new(1);
        solver.solve_with_pv(&mut pos).iter().map(|m| m.to_usi()).collect()
    }

    #[test]
    fn test_mate_in_one_pv() {
        assert_eq!(pv("4k4/9/4P4/9/9/9/9/9/K8 b G2r2b3g4s4n4l17p 1"), ["G*5b"]);
    }

    #[test]
    fn test_no_mate_pv_is_empty() {
        assert!(pv("4k4/9/9/9/9/9/9/9/4K4 b G 1").is_empty());
    }

    #[test]
    fn test_pv_ends_in_mate() {
        let sfen = "9/9/4k4/9/4P4/9/9/9/K8 b 3G2r2bg4s4n4l17p 1";
        let mut pos = Position::from_sfen(sfen).unwrap();
        let mut solver = DfPnSolver::new(1);
        let line = solver.solve_with_pv(&mut pos);
        assert!(line.len() >= 5 && line.len() % 2 == 1, "{line:?}");
        for &m in &line {
            pos.do_move(m);
        }
        assert!(is_mated(&pos));
    }

    #[test]
    fn test_pv_after_table_cleared() {
        // 置換表が消えても詰み手順を探し直して組み立てる
        let sfen = "8k/9/9/2+R4P1/9/9/9/9/6K2 b G 1";
        let mut pos = Position::from_sfen(sfen).unwrap();
        let mut solver = DfPnSolver::new(1);
        assert!(solver.solve_with_limits(&mut pos, 0, 3).is_some());
        solver.clear();
        let line = reconstruct(&mut solver, &mut pos, 3);
        assert_eq!(line.len(), 3, "{line:?}");
        assert_eq!(line[0].to_usi(), "7d7a");
        assert_eq!(line[2].to_usi(), "G*2c");
        assert_eq!(pos.depth(), 0);
        for &m in &line {
            pos.do_move(m);
        }
        assert!(is_mated(&pos));
    }
}
