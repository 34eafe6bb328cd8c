//! 遠方駒（香、角、飛、馬、龍）の利き計算
//!
//! 方向ごとの半直線テーブルを持ち、最も近い遮り駒を lsb/msb で求める。

use std::sync::OnceLock;

use crate::types::{Color, Square};

use super::Bitboard;
use super::tables::king_effect;

/// 方向（筋差分, 段差分）。先頭4つが飛車、後ろ4つが角の方向。
/// 反対方向は `dir ^ 1`。
const DIRECTIONS: [(i8, i8); 8] =
    [(0, -1), (0, 1), (1, 0), (-1, 0), (1, -1), (-1, 1), (1, 1), (-1, -1)];

const NORTH: usize = 0;
const SOUTH: usize = 1;

/// index差分が正の方向か（最近接の遮り駒が lsb になる）
const fn is_positive(dir: usize) -> bool {
    let (df, dr) = DIRECTIONS[dir];
    df * 9 + dr > 0
}

struct SliderTable {
    rays: [[Bitboard; 8]; Square::NUM],
    between: Box<[Bitboard]>,
    line: Box<[Bitboard]>,
}

static SLIDER_TABLE: OnceLock<SliderTable> = OnceLock::new();

fn slider_table() -> &'static SliderTable {
    SLIDER_TABLE.get_or_init(SliderTable::new)
}

impl SliderTable {
    fn new() -> Self {
        let mut rays = [[Bitboard::EMPTY; 8]; Square::NUM];
        for sq in Square::all() {
            for (dir, &(df, dr)) in DIRECTIONS.iter().enumerate() {
                let mut bb = Bitboard::EMPTY;
                let mut cur = sq.offset(df, dr);
                while let Some(s) = cur {
                    bb.set(s);
                    cur = s.offset(df, dr);
                }
                rays[sq.index()][dir] = bb;
            }
        }

        let mut between = vec![Bitboard::EMPTY; Square::NUM * Square::NUM].into_boxed_slice();
        let mut line = vec![Bitboard::EMPTY; Square::NUM * Square::NUM].into_boxed_slice();
        for a in Square::all() {
            for (dir, ray) in rays[a.index()].iter().enumerate() {
                let opposite = dir ^ 1;
                for b in ray.iter() {
                    let idx = a.index() * Square::NUM + b.index();
                    between[idx] = ray.and_not(rays[b.index()][dir]).and_not(Bitboard::from_square(b));
                    line[idx] = *ray | rays[a.index()][opposite] | Bitboard::from_square(a);
                }
            }
        }

        SliderTable { rays, between, line }
    }
}

#[inline]
fn ray_effect(table: &SliderTable, sq: Square, dir: usize, occupied: Bitboard) -> Bitboard {
    let ray = table.rays[sq.index()][dir];
    let blockers = ray & occupied;
    let nearest = if is_positive(dir) { blockers.lsb() } else { blockers.msb() };
    match nearest {
        Some(b) => ray.and_not(table.rays[b.index()][dir]),
        None => ray,
    }
}

/// 香の利き
#[inline]
pub fn lance_effect(color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    let dir = if color == Color::Black { NORTH } else { SOUTH };
    ray_effect(slider_table(), sq, dir, occupied)
}

/// 飛車の利き
#[inline]
pub fn rook_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    let table = slider_table();
    (0..4).fold(Bitboard::EMPTY, |acc, dir| acc | ray_effect(table, sq, dir, occupied))
}

/// 角の利き
#[inline]
pub fn bishop_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    let table = slider_table();
    (4..8).fold(Bitboard::EMPTY, |acc, dir| acc | ray_effect(table, sq, dir, occupied))
}

/// 馬の利き
#[inline]
pub fn horse_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_effect(sq, occupied) | king_effect(sq)
}

/// 龍の利き
#[inline]
pub fn dragon_effect(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_effect(sq, occupied) | king_effect(sq)
}

/// 2升の間の升（両端を含まない）。一直線上にない場合は空。
#[inline]
pub fn between_bb(a: Square, b: Square) -> Bitboard {
    slider_table().between[a.index() * Square::NUM + b.index()]
}

/// 2升を通る直線（盤端まで、両端を含む）。一直線上にない場合は空。
#[inline]
pub fn line_bb(a: Square, b: Square) -> Bitboard {
    slider_table().line[a.index() * Square::NUM + b.index()]
}

/// 3升が一直線上に並ぶか
#[inline]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    line_bb(a, b).contains(c)
}
