use crate::models::SignalKind;

/// A fixed word list whose shared terms score per match
///
/// Each entry is a group of spellings that count as the same term
/// (e.g. `gray`/`grey`). Entries containing a space are phrases and match as a
/// contiguous run of tokens.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub kind: SignalKind,
    pub terms: &'static [&'static [&'static str]],
}

pub const COLORS: Vocabulary = Vocabulary {
    kind: SignalKind::Color,
    terms: &[
        &["red"],
        &["blue"],
        &["green"],
        &["yellow"],
        &["black"],
        &["white"],
        &["brown"],
        &["pink"],
        &["purple"],
        &["orange"],
        &["gray", "grey"],
        &["silver"],
        &["gold"],
    ],
};

pub const BRANDS: Vocabulary = Vocabulary {
    kind: SignalKind::Brand,
    terms: &[
        &["apple"],
        &["samsung"],
        &["sony"],
        &["nike"],
        &["adidas"],
        &["hp"],
        &["dell"],
        &["lenovo"],
        &["canon"],
        &["nikon"],
    ],
};

pub const MATERIALS: Vocabulary = Vocabulary {
    kind: SignalKind::Material,
    terms: &[
        &["leather"],
        &["plastic"],
        &["metal"],
        &["fabric"],
        &["wood"],
        &["glass"],
        &["rubber"],
        &["cotton"],
        &["silk"],
        &["denim"],
    ],
};

pub const SIZES: Vocabulary = Vocabulary {
    kind: SignalKind::Size,
    terms: &[
        &["small"],
        &["medium"],
        &["large"],
        &["big"],
        &["tiny"],
        &["huge"],
        &["mini"],
    ],
};

pub const CONDITIONS: Vocabulary = Vocabulary {
    kind: SignalKind::Condition,
    terms: &[
        &["new"],
        &["old"],
        &["damaged"],
        &["worn"],
        &["broken"],
        &["cracked"],
        &["scratched"],
        &["mint"],
    ],
};

pub const FEATURES: Vocabulary = Vocabulary {
    kind: SignalKind::Feature,
    terms: &[
        &["cracked screen"],
        &["missing button"],
        &["sticker"],
        &["engraving"],
        &["keychain"],
        &["charm"],
        &["case"],
        &["cover"],
    ],
};

pub const VALUES: Vocabulary = Vocabulary {
    kind: SignalKind::Value,
    terms: &[
        &["expensive"],
        &["cheap"],
        &["valuable"],
        &["priceless"],
        &["costly"],
        &["budget"],
        &["premium"],
    ],
};

static ALL: [Vocabulary; 7] = [COLORS, BRANDS, MATERIALS, SIZES, CONDITIONS, FEATURES, VALUES];

impl Vocabulary {
    /// Every vocabulary, in scoring order
    pub fn all() -> &'static [Vocabulary] {
        &ALL
    }

    /// Canonical label for a term group (its first spelling)
    #[inline]
    pub fn label(group: &'static [&'static str]) -> &'static str {
        group.first().copied().unwrap_or("")
    }
}
