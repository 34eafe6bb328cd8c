//! 詰み探索用の置換表
//!
//! - `Entry`: 32バイトのエントリ（ハッシュ・攻め方の手駒・pn/dn・世代）
//! - `Bucket`: 8エントリのグループ（256バイト）
//! - `TranspositionTable`: テーブル本体
//!
//! 攻め方の手駒について優等局面の共有を行う。手駒 S で詰みが証明された局面は、
//! 盤面が同じで手駒が S 以上なら同じく詰みとして扱う。

use crate::types::Hand;

use super::pn::PnDn;

/// バケット内のエントリ数
pub const BUCKET_SIZE: usize = 8;

/// エントリ
#[derive(Debug, Clone, Copy)]
#[repr(C, align(32))]
pub struct Entry {
    hash: u64,
    stand: u32,
    pn: u32,
    dn: u32,
    generation: u8,
    _padding: [u8; 11],
}

impl Entry {
    const fn empty() -> Self {
        Self {
            hash: 0,
            stand: 0,
            pn: 1,
            dn: 1,
            generation: 0,
            _padding: [0; 11],
        }
    }

    #[inline]
    fn value(&self) -> PnDn {
        PnDn::new(self.pn, self.dn)
    }

    #[inline]
    fn write(&mut self, hash: u64, stand: u32, value: PnDn, generation: u8) {
        self.hash = hash;
        self.stand = stand;
        self.pn = value.pn;
        self.dn = value.dn;
        self.generation = generation;
    }
}

/// バケット
#[derive(Clone, Copy)]
#[repr(C, align(64))]
pub struct Bucket {
    entries: [Entry; BUCKET_SIZE],
}

impl Bucket {
    const fn new() -> Self {
        Self { entries: [Entry::empty(); BUCKET_SIZE] }
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Self::new()
    }
}

const _: () = assert!(std::mem::size_of::<Entry>() == 32);
const _: () = assert!(std::mem::size_of::<Bucket>() == 256);

/// 置換表
pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    /// 現在の世代（0 は未使用を表す）
    generation: u8,
}

impl TranspositionTable {
    /// 新しい置換表を作成（サイズはMB単位、最小1バケット）
    pub fn new(memory_mb: usize) -> Self {
        let count = (memory_mb * 1024 * 1024 / std::mem::size_of::<Bucket>()).max(1);
        Self {
            buckets: vec![Bucket::new(); count],
            generation: 0,
        }
    }

    /// バケット数
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// 現在の世代
    #[inline]
    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// 世代を進める（以前の世代のエントリはすべて無効になる）
    ///
    /// 一周して 0 に戻る場合は 1 に飛ばし、古いエントリが同じ世代に
    /// 見えないようテーブルを消去する。
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            log::warn!("tsume table generation wrapped; clearing {} buckets", self.buckets.len());
            self.clear();
            self.generation = 1;
        }
    }

    /// 全エントリを消去
    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::new());
    }

    #[inline]
    fn bucket_index(&self, hash: u64, depth: u32) -> usize {
        (hash.wrapping_add(u64::from(depth)) % self.buckets.len() as u64) as usize
    }

    /// 値を引く（見つからなければ未展開の (1, 1)）
    pub fn load(&self, hash: u64, depth: u32, stand: Hand) -> PnDn {
        let bucket = &self.buckets[self.bucket_index(hash, depth)];
        for e in &bucket.entries {
            // 同一世代のエントリは前詰めで並ぶ
            if e.generation != self.generation {
                break;
            }
            if e.hash != hash {
                continue;
            }
            if e.pn == 0 && stand.is_superior_or_equal(Hand::from_raw(e.stand)) {
                return e.value();
            }
            if e.stand == stand.raw() {
                return e.value();
            }
        }
        PnDn::unknown()
    }

    /// 値を書き込む
    pub fn store(&mut self, hash: u64, depth: u32, stand: Hand, value: PnDn) {
        let generation = self.generation;
        let index = self.bucket_index(hash, depth);
        let bucket = &mut self.buckets[index];
        let raw = stand.raw();

        for e in bucket.entries.iter_mut() {
            if e.generation != generation {
                e.write(hash, raw, value, generation);
                return;
            }
            if e.hash != hash {
                continue;
            }
            // より少ない手駒での詰みはより一般的なので上書き
            if value.is_proven() && Hand::from_raw(e.stand).is_superior_or_equal(stand) {
                e.write(hash, raw, value, generation);
                return;
            }
            // 既に少ない手駒で詰みが分かっている
            if e.pn == 0 && stand.is_superior_or_equal(Hand::from_raw(e.stand)) {
                return;
            }
            if e.stand == raw {
                e.write(hash, raw, value, generation);
                return;
            }
        }
        bucket.entries[BUCKET_SIZE - 1].write(hash, raw, value, generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;

    fn hand(gold: u32, silver: u32) -> Hand {
        Hand::EMPTY.set(PieceType::Gold, gold).set(PieceType::Silver, silver)
    }

    fn table() -> TranspositionTable {
        let mut tt = TranspositionTable::new(1);
        tt.new_generation();
        tt
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<Entry>(), 32);
        assert_eq!(std::mem::align_of::<Entry>(), 32);
        assert_eq!(std::mem::size_of::<Bucket>(), 256);
        assert_eq!(TranspositionTable::new(1).bucket_count(), 4096);
        assert_eq!(TranspositionTable::new(0).bucket_count(), 1);
    }

    #[test]
    fn test_miss_returns_unknown() {
        let tt = table();
        assert_eq!(tt.load(0x1234, 0, Hand::EMPTY), PnDn::unknown());
    }

    #[test]
    fn test_exact_store_and_load() {
        let mut tt = table();
        let v = PnDn::new(3, 7);
        tt.store(42, 5, hand(1, 0), v);
        assert_eq!(tt.load(42, 5, hand(1, 0)), v);
        // 深さが違えば別の升
        assert_eq!(tt.load(42, 6, hand(1, 0)), PnDn::unknown());
        // 手駒が違えば未確定値は共有しない
        assert_eq!(tt.load(42, 5, hand(2, 0)), PnDn::unknown());
    }

    #[test]
    fn test_proof_is_shared_with_superior_stand() {
        let mut tt = table();
        tt.store(7, 0, hand(1, 0), PnDn::proven());
        assert!(tt.load(7, 0, hand(1, 0)).is_proven());
        assert!(tt.load(7, 0, hand(2, 1)).is_proven());
        // 劣る手駒には使えない
        assert_eq!(tt.load(7, 0, hand(0, 1)), PnDn::unknown());
    }

    #[test]
    fn test_disproof_is_not_shared() {
        let mut tt = table();
        tt.store(7, 0, hand(2, 0), PnDn::disproven());
        assert!(tt.load(7, 0, hand(2, 0)).is_disproven());
        assert_eq!(tt.load(7, 0, hand(1, 0)), PnDn::unknown());
        assert_eq!(tt.load(7, 0, hand(3, 0)), PnDn::unknown());
    }

    #[test]
    fn test_more_general_proof_replaces_entry() {
        let mut tt = table();
        tt.store(9, 0, hand(2, 1), PnDn::proven());
        tt.store(9, 0, hand(1, 0), PnDn::proven());
        assert!(tt.load(9, 0, hand(1, 0)).is_proven());
        assert!(tt.load(9, 0, hand(1, 1)).is_proven());
    }

    #[test]
    fn test_proof_is_not_overwritten_by_weaker_value() {
        let mut tt = table();
        tt.store(9, 0, hand(1, 0), PnDn::proven());
        tt.store(9, 0, hand(1, 0), PnDn::new(5, 5));
        tt.store(9, 0, hand(2, 0), PnDn::new(5, 5));
        assert!(tt.load(9, 0, hand(1, 0)).is_proven());
        assert!(tt.load(9, 0, hand(2, 0)).is_proven());
    }

    #[test]
    fn test_new_generation_hides_old_entries() {
        let mut tt = table();
        tt.store(1, 0, Hand::EMPTY, PnDn::proven());
        tt.new_generation();
        assert_eq!(tt.load(1, 0, Hand::EMPTY), PnDn::unknown());
    }

    #[test]
    fn test_generation_wrap_skips_zero() {
        let mut tt = table();
        tt.store(1, 0, Hand::EMPTY, PnDn::proven());
        for _ in 0..255 {
            tt.new_generation();
        }
        assert_eq!(tt.generation(), 1);
        assert_eq!(tt.load(1, 0, Hand::EMPTY), PnDn::unknown());
    }

    #[test]
    fn test_full_bucket_overwrites_last_slot() {
        // バケット1つだけのテーブルで衝突させる
        let mut tt = TranspositionTable::new(0);
        tt.new_generation();
        for h in 0..BUCKET_SIZE as u64 {
            tt.store(h * 1000, 0, Hand::EMPTY, PnDn::new(2, 2));
        }
        tt.store(99_999, 0, Hand::EMPTY, PnDn::new(4, 4));
        assert_eq!(tt.load(0, 0, Hand::EMPTY), PnDn::new(2, 2));
        assert_eq!(tt.load(99_999, 0, Hand::EMPTY), PnDn::new(4, 4));
        assert_eq!(tt.load((BUCKET_SIZE as u64 - 1) * 1000, 0, Hand::EMPTY), PnDn::unknown());
    }
}
