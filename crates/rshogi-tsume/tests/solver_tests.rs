//! 詰み探索の統合テスト

use rshogi_tsume::movegen::generate_legal_all;
use rshogi_tsume::prelude::*;
use rshogi_tsume::solver::{ConfigError, PnDn, TranspositionTable};

const MATE_IN_FIVE: &str = "9/9/4k4/9/4P4/9/9/9/K8 b 3G2r2bg4s4n4l17p 1";
const PAWN_DROP_ONLY: &str = "k8/2G6/9/1N7/9/9/9/9/8K b P 1";
/// 飛車を打って追う7手詰め（5手以内には詰まない）
const MATE_IN_SEVEN: [&str; 2] = ["6k2/9/9/9/9/9/9/9/K7R b RG 1", "7k1/9/9/9/9/9/9/9/K7R b RS 1"];

fn pos(sfen: &str) -> Position {
    Position::from_sfen(sfen).unwrap()
}

fn solver() -> DfPnSolver {
    DfPnSolver::new(4)
}

/// 手順が合法手の連続で、最後に玉方が詰んでいることを確認する
fn assert_valid_mate_line(sfen: &str, line: &[Move]) {
    let mut p = pos(sfen);
    assert!(!line.is_empty());
    for &m in line {
        let mut legal = MoveList::new();
        generate_legal_all(&p, &mut legal);
        assert!(legal.contains(m), "{m} is not legal in {p}");
        p.do_move(m);
    }
    assert!(is_mated(&p), "line does not end in mate: {p}");
    assert!(!p.last_move().is_pawn_drop(), "mate by pawn drop: {p}");
}

#[test]
fn test_mated_defender_is_terminal() {
    // 玉方が詰んでいる局面は、直前の攻め方の局面から1手で証明される
    let mated = pos("4k4/4G4/4P4/9/9/9/9/9/K8 w - 1");
    assert!(is_mated(&mated));

    let mut s = solver();
    let mut p = pos("4k4/9/4P4/9/9/9/9/9/K8 b G 1");
    assert_eq!(s.solve(&mut p).map(|m| m.to_usi()).as_deref(), Some("G*5b"));
    p.do_move(Move::from_usi("G*5b").unwrap());
    assert_eq!(p.to_sfen(), mated.to_sfen().replace(" 1", " 2"));
}

#[test]
fn test_pawn_drop_mate_is_not_mate() {
    let mut s = solver();
    let mut p = pos(PAWN_DROP_ONLY);
    assert_eq!(s.solve_with_limits(&mut p, 0, 1), None);
    assert_eq!(s.last_outcome(), SolveOutcome::Disproven);
    assert_eq!(dfs::solve(&mut p, 1), None);

    // 歩を打った直後は王手回避がないが、詰みではない
    p.do_move(Move::from_usi("P*9b").unwrap());
    assert!(is_mated(&p));
    p.undo_move();

    // 同じ形で金を持っていれば詰む
    let mut with_gold = pos("k8/2G6/9/1N7/9/9/9/9/8K b G 1");
    assert!(s.solve_with_limits(&mut with_gold, 0, 1).is_some());
    assert_eq!(s.last_outcome(), SolveOutcome::Proven);
}

#[test]
fn test_oracle_and_search_agree() {
    let sfens = [
        "4k4/9/4G4/9/9/9/9/9/4K4 b G 1",
        "3gkg3/9/3pG4/9/9/9/9/9/4K4 b N 1",
        "3nkl3/9/4G4/9/9/9/9/9/4K4 b B 1",
        "4k4/9/9/9/9/9/4g4/9/4K4 w g 1",
        "3gk4/9/4SG3/9/9/9/9/9/4K4 b - 1",
        "4kg1RR/3s5/9/9/9/9/9/9/4K4 b - 1",
        "kl7/9/2G6/9/9/9/9/9/4K4 b R 1",
    ];
    let mut s = solver();
    for sfen in sfens {
        let mut p = pos(sfen);
        let oracle = mate_1ply(&mut p).unwrap_or_else(|| panic!("no mate1 in {sfen}"));
        assert_valid_mate_line(sfen, &[oracle]);

        let m = s.solve_with_limits(&mut p, 0, 1).unwrap_or_else(|| panic!("dfpn failed on {sfen}"));
        assert_valid_mate_line(sfen, &[m]);
    }
}

#[test]
fn test_solve_is_idempotent() {
    let mut s = solver();
    let mut p = pos(MATE_IN_FIVE);
    let first = s.solve(&mut p);
    let first_nodes = s.searched_node_count();
    let second = s.solve(&mut p);
    let second_nodes = s.searched_node_count();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(first_nodes, second_nodes);
}

#[test]
fn test_proof_is_shared_with_superior_stand() {
    let weak = pos("4k4/9/4G4/9/9/9/9/9/4K4 b G 1");
    let strong = pos("4k4/9/4G4/9/9/9/9/9/4K4 b 2GS 1");
    let poor = pos("4k4/9/4G4/9/9/9/9/9/4K4 b S 1");
    assert_eq!(weak.board_key(), strong.board_key());

    let mut tt = TranspositionTable::new(1);
    tt.new_generation();
    let attacker = weak.side_to_move();
    tt.store(weak.board_key(), 0, weak.hand(attacker), PnDn::proven());
    assert!(tt.load(strong.board_key(), 0, strong.hand(attacker)).is_proven());
    assert!(!tt.load(poor.board_key(), 0, poor.hand(attacker)).is_proven());
}

#[test]
fn test_mate_survives_extra_piece_in_hand() {
    // 攻め方の持ち駒を増やしても同じ手数以内の詰みは消えない
    let cases = [
        (MATE_IN_FIVE, "9/9/4k4/9/4P4/9/9/9/K8 b 3GS2r2bg3s4n4l17p 1", 5),
        ("4k4/9/4G4/9/9/9/9/9/4K4 b G 1", "4k4/9/4G4/9/9/9/9/9/4K4 b GSN 1", 1),
        ("8k/9/9/2+R4P1/9/9/9/9/6K2 b G 1", "8k/9/9/2+R4P1/9/9/9/9/6K2 b GL 1", 3),
    ];
    let mut s = solver();
    for (weak, strong, depth) in cases {
        let mut p = pos(weak);
        assert!(s.solve_with_limits(&mut p, 0, depth).is_some(), "{weak}");

        let mut q = pos(strong);
        assert_eq!(p.board_key(), q.board_key());
        assert!(q.hand(Color::Black).is_superior_or_equal(p.hand(Color::Black)));
        let line = s.solve_with_pv(&mut q);
        assert_valid_mate_line(strong, &line);
        assert!(s.solve_with_limits(&mut q, 0, depth).is_some(), "{strong}");
    }
}

#[test]
fn test_node_budget() {
    let mut s = solver();
    let mut p = pos(MATE_IN_FIVE);
    assert_eq!(s.solve_with_limits(&mut p, 1, 0), None);
    assert_eq!(s.last_outcome(), SolveOutcome::Inconclusive);
    assert!(s.searched_node_count() <= 2);

    assert!(s.solve_with_limits(&mut p, 0, 0).is_some());
    assert_eq!(s.last_outcome(), SolveOutcome::Proven);
}

#[test]
fn test_mate_in_five() {
    let mut s = solver();
    let mut p = pos(MATE_IN_FIVE);
    let line = s.solve_with_pv(&mut p);
    assert!(line.len() >= 5, "{line:?}");
    assert_valid_mate_line(MATE_IN_FIVE, &line);
    assert!(dfs::solve(&mut p, 5).is_some());
}

#[test]
fn test_mate_in_seven() {
    for sfen in MATE_IN_SEVEN {
        let mut s = solver();
        let mut p = pos(sfen);
        assert_eq!(s.solve_with_limits(&mut p, 0, 5), None, "{sfen}");
        assert_eq!(s.last_outcome(), SolveOutcome::Disproven);
        assert!(s.solve_with_limits(&mut p, 0, 7).is_some(), "{sfen}");
        assert_eq!(s.last_outcome(), SolveOutcome::Proven);

        // 深さ制限付きの手順は最短手数ちょうどになる
        let config = SolverConfig {
            memory_mb: 4,
            max_depth: 7,
            ..SolverConfig::default()
        };
        let mut bounded = DfPnSolver::with_config(config).unwrap();
        let line = bounded.solve_with_pv(&mut p);
        assert_eq!(line.len(), 7, "{line:?}");
        assert_valid_mate_line(sfen, &line);

        assert_eq!(dfs::solve(&mut p, 5), None);
        let first = dfs::solve(&mut p, 7).unwrap_or_else(|| panic!("dfs misses mate in {sfen}"));
        assert!(p.gives_check(first));
        assert_eq!(p.to_sfen(), sfen);
    }
}

#[test]
fn test_pv_of_mate_in_one() {
    let mut s = solver();
    let sfen = "4k4/9/4P4/9/9/9/9/9/K8 b G2r2b3g4s4n4l17p 1";
    let mut p = pos(sfen);
    let line: Vec<String> = s.solve_with_pv(&mut p).iter().map(|m| m.to_usi()).collect();
    assert_eq!(line, ["G*5b"]);
}

#[test]
fn test_config_from_json() -> anyhow::Result<()> {
    let config: SolverConfig = serde_json::from_str(r#"{ "memory_mb": 2, "max_depth": 5 }"#)?;
    assert_eq!(config.memory_mb, 2);
    assert_eq!(config.max_depth, 5);
    assert_eq!(config.max_node_count, 0);

    let mut s = DfPnSolver::with_config(config)?;
    let mut p = pos(MATE_IN_FIVE);
    assert!(s.solve(&mut p).is_some());

    let empty: SolverConfig = serde_json::from_str("{}")?;
    assert_eq!(empty, SolverConfig::default());

    let zero: SolverConfig = serde_json::from_str(r#"{ "memory_mb": 0 }"#)?;
    let err = DfPnSolver::with_config(zero).err();
    assert_eq!(err, Some(ConfigError::ZeroMemory));
    assert_eq!(ConfigError::ZeroMemory.to_string(), "memory_mb must be at least 1");
    Ok(())
}
