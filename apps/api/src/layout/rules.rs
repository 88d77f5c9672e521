//! Layout rules — size classes, heights, importance tiers and the weight tables
//! that drive card sizing on the masonry grid.
//!
//! The default values are load-bearing: the front-end grid uses
//! `grid-auto-rows: 8px`, so the three heights map to fixed row multiples
//! (12, 18, 24). Change them only together with the grid.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Display footprint of a card on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    S,
    M,
    L,
}

impl SizeClass {
    /// Column weight used by the grid (S=1, M=2, L=3).
    pub fn column_weight(self) -> u8 {
        match self {
            SizeClass::S => 1,
            SizeClass::M => 2,
            SizeClass::L => 3,
        }
    }
}

/// Pixel height of a card. Serialized as the bare number (96 / 144 / 192).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardHeight {
    Short,
    Medium,
    Tall,
}

impl CardHeight {
    pub const ALL: [CardHeight; 3] = [CardHeight::Short, CardHeight::Medium, CardHeight::Tall];

    pub fn px(self) -> u16 {
        match self {
            CardHeight::Short => 96,
            CardHeight::Medium => 144,
            CardHeight::Tall => 192,
        }
    }

    pub fn from_px(px: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.px() == px)
    }
}

impl Serialize for CardHeight {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.px())
    }
}

impl<'de> Deserialize<'de> for CardHeight {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let px = u16::deserialize(deserializer)?;
        CardHeight::from_px(px).ok_or_else(|| {
            serde::de::Error::custom(format!("card height must be 96, 144 or 192, got {px}"))
        })
    }
}

/// Prominence tier of a card. Unknown or missing values degrade to `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    #[default]
    Normal,
    Feature,
    Hero,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Normal => "normal",
            Importance::Feature => "feature",
            Importance::Hero => "hero",
        }
    }

    /// Lenient parse: only the exact tier names are recognized, anything else
    /// (including other casings) is `Normal`.
    pub fn parse_lossy(raw: Option<&str>) -> Self {
        match raw {
            Some("feature") => Importance::Feature,
            Some("hero") => Importance::Hero,
            _ => Importance::Normal,
        }
    }
}

/// Anything that can be laid out on the grid exposes its importance tier.
pub trait Prominence {
    fn importance(&self) -> Importance;
}

impl Prominence for Importance {
    fn importance(&self) -> Importance {
        *self
    }
}

/// Opaque JSON records carry an optional `importance` string field.
impl Prominence for serde_json::Value {
    fn importance(&self) -> Importance {
        Importance::parse_lossy(self.get("importance").and_then(|v| v.as_str()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Weight tables
// ────────────────────────────────────────────────────────────────────────────

/// Probability of each size class for one importance tier, in S→M→L order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeWeights {
    pub s: f64,
    pub m: f64,
    pub l: f64,
}

impl SizeWeights {
    /// Cumulative thresholding: the first class whose running total reaches
    /// `draw` wins. Falls back to `S` if the weights sum short of the draw.
    pub fn pick(&self, draw: f64) -> SizeClass {
        let mut cumulative = 0.0;
        for (class, weight) in [(SizeClass::S, self.s), (SizeClass::M, self.m), (SizeClass::L, self.l)] {
            cumulative += weight;
            if draw <= cumulative {
                return class;
            }
        }
        SizeClass::S
    }
}

/// Height distribution for one size class as ordered cumulative thresholds:
/// a draw below `tall_below` is tall, below `medium_below` is medium, else short.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightThresholds {
    pub tall_below: f64,
    pub medium_below: f64,
}

impl HeightThresholds {
    pub fn pick(&self, draw: f64) -> CardHeight {
        if draw < self.tall_below {
            CardHeight::Tall
        } else if draw < self.medium_below {
            CardHeight::Medium
        } else {
            CardHeight::Short
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rule set
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_L_INTERVAL: usize = 7;
pub const DEFAULT_MAX_M_RUN: usize = 2;
pub const DEFAULT_MAX_S_RUN: usize = 3;

/// Complete rule set consumed by the assigner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRules {
    /// Every `l_interval`-th card (1-based) is forced to `L`.
    pub l_interval: usize,
    /// Never more than this many `M` cards in a row.
    pub max_m_run: usize,
    /// Never more than this many `S` cards in a row.
    pub max_s_run: usize,
    pub normal: SizeWeights,
    pub feature: SizeWeights,
    pub hero: SizeWeights,
    pub large_heights: HeightThresholds,
    pub medium_heights: HeightThresholds,
    pub small_heights: HeightThresholds,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            l_interval: DEFAULT_L_INTERVAL,
            max_m_run: DEFAULT_MAX_M_RUN,
            max_s_run: DEFAULT_MAX_S_RUN,
            normal: SizeWeights { s: 0.55, m: 0.35, l: 0.10 },
            feature: SizeWeights { s: 0.40, m: 0.50, l: 0.10 },
            hero: SizeWeights { s: 0.20, m: 0.30, l: 0.50 },
            // 192px / 144px / 96px with P = .60/.30/.10, .40/.40/.20, .20/.40/.40
            large_heights: HeightThresholds { tall_below: 0.6, medium_below: 0.9 },
            medium_heights: HeightThresholds { tall_below: 0.4, medium_below: 0.8 },
            small_heights: HeightThresholds { tall_below: 0.2, medium_below: 0.6 },
        }
    }
}

impl LayoutRules {
    /// Default tables with overridden interval and run limits.
    pub fn with_limits(l_interval: usize, max_m_run: usize, max_s_run: usize) -> anyhow::Result<Self> {
        let rules = Self {
            l_interval,
            max_m_run,
            max_s_run,
            ..Self::default()
        };
        rules.validate()?;
        Ok(rules)
    }

    /// Rejects rule sets the assigner cannot honor. A zero run limit would make
    /// the trailing window meaningless; a zero interval has no positions.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.l_interval > 0, "layout L interval must be at least 1");
        anyhow::ensure!(self.max_m_run > 0, "layout max M run must be at least 1");
        anyhow::ensure!(self.max_s_run > 0, "layout max S run must be at least 1");
        Ok(())
    }

    pub fn size_weights(&self, importance: Importance) -> &SizeWeights {
        match importance {
            Importance::Normal => &self.normal,
            Importance::Feature => &self.feature,
            Importance::Hero => &self.hero,
        }
    }

    pub fn height_thresholds(&self, class: SizeClass) -> &HeightThresholds {
        match class {
            SizeClass::L => &self.large_heights,
            SizeClass::M => &self.medium_heights,
            SizeClass::S => &self.small_heights,
        }
    }

    /// Length of the trailing window the assigner must remember.
    pub fn window_len(&self) -> usize {
        self.max_m_run.max(self.max_s_run)
    }
}
