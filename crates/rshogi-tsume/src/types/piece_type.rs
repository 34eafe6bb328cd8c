//! 駒種（PieceType）

/// 駒の種類。先手・後手は `Piece` 側で持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceType {
    // 生駒
    Pawn = 1,
    Lance = 2,
    Knight = 3,
    Silver = 4,
    Bishop = 5,
    Rook = 6,
    Gold = 7,
    King = 8,
    // 成駒
    ProPawn = 9,
    ProLance = 10,
    ProKnight = 11,
    ProSilver = 12,
    Horse = 13,  // 成角
    Dragon = 14, // 成飛
}

impl PieceType {
    /// 駒種の数。0 は空き升用に欠番。
    pub const NUM: usize = 14;

    /// 持ち駒の種類数
    pub const HAND_NUM: usize = 7;

    /// 持ち駒になる駒種（打つ手の生成順）
    pub const HAND_PIECES: [PieceType; 7] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Gold,
        PieceType::Bishop,
        PieceType::Rook,
    ];

    /// 盤上に現れる全駒種
    pub const ALL: [PieceType; 14] = [
        PieceType::Pawn,
        PieceType::Lance,
        PieceType::Knight,
        PieceType::Silver,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Gold,
        PieceType::King,
        PieceType::ProPawn,
        PieceType::ProLance,
        PieceType::ProKnight,
        PieceType::ProSilver,
        PieceType::Horse,
        PieceType::Dragon,
    ];

    /// 成れるかどうか
    #[inline]
    pub const fn can_promote(self) -> bool {
        self.promote().is_some()
    }

    /// 成った後の駒種。金・玉・成駒は None。
    #[inline]
    pub const fn promote(self) -> Option<PieceType> {
        match self {
            PieceType::Pawn => Some(PieceType::ProPawn),
            PieceType::Lance => Some(PieceType::ProLance),
            PieceType::Knight => Some(PieceType::ProKnight),
            PieceType::Silver => Some(PieceType::ProSilver),
            PieceType::Bishop => Some(PieceType::Horse),
            PieceType::Rook => Some(PieceType::Dragon),
            _ => None,
        }
    }

    /// 成る前の駒種（生駒はそのまま）
    #[inline]
    pub const fn unpromote(self) -> PieceType {
        match self {
            PieceType::ProPawn => PieceType::Pawn,
            PieceType::ProLance => PieceType::Lance,
            PieceType::ProKnight => PieceType::Knight,
            PieceType::ProSilver => PieceType::Silver,
            PieceType::Horse => PieceType::Bishop,
            PieceType::Dragon => PieceType::Rook,
            _ => self,
        }
    }

    /// 成駒かどうか
    #[inline]
    pub const fn is_promoted(self) -> bool {
        self as u8 >= 9
    }

    /// 飛び利きを持つか
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(
            self,
            PieceType::Lance
                | PieceType::Bishop
                | PieceType::Rook
                | PieceType::Horse
                | PieceType::Dragon
        )
    }

    /// 金と同じ動きの駒か（金・と・成香・成桂・成銀）
    #[inline]
    pub const fn is_gold_like(self) -> bool {
        matches!(
            self,
            PieceType::Gold
                | PieceType::ProPawn
                | PieceType::ProLance
                | PieceType::ProKnight
                | PieceType::ProSilver
        )
    }

    /// テーブル引き用の番号
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 番号から駒種へ。1..=14 以外は None。
    #[inline]
    pub const fn from_u8(n: u8) -> Option<PieceType> {
        if n >= 1 && n <= 14 { Some(PieceType::ALL[n as usize - 1]) } else { None }
    }

    /// SFEN/USIの駒文字（先手大文字、成駒は生駒の文字）
    pub const fn to_usi_char(self) -> char {
        match self.unpromote() {
            PieceType::Pawn => 'P',
            PieceType::Lance => 'L',
            PieceType::Knight => 'N',
            PieceType::Silver => 'S',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Gold => 'G',
            _ => 'K',
        }
    }

    /// 駒文字から生駒の駒種へ（大文字・小文字どちらも可）
    pub const fn from_usi_char(c: char) -> Option<PieceType> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceType::Pawn),
            'L' => Some(PieceType::Lance),
            'N' => Some(PieceType::Knight),
            'S' => Some(PieceType::Silver),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'G' => Some(PieceType::Gold),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }
}
