use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sort keys applied to the image sequence before packing.
/// All keys order ascending by value; ties keep their relative order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Preserve the current sequence order. This is an identity pass, not a
    /// comparator; no sort routine runs for it.
    None,
    Width,
    Height,
    Area,
    /// max(width, height), historically called "magic".
    #[serde(alias = "magic")]
    MaxSide,
}

impl FromStr for SortKey {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            "area" => Ok(Self::Area),
            "magic" | "maxside" | "max_side" => Ok(Self::MaxSide),
            _ => Err(()),
        }
    }
}

/// Packing strategy families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackerKind {
    /// First-fit rows. Fast, never rotates.
    Shelf,
    /// Skyline contour (BL/MW; good baseline).
    Skyline,
    /// Guillotine splitting (choice + split heuristics).
    Guillotine,
    /// MaxRects free-list (best quality for offline layout).
    MaxRects,
}

impl FromStr for PackerKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shelf" => Ok(Self::Shelf),
            "skyline" => Ok(Self::Skyline),
            "guillotine" => Ok(Self::Guillotine),
            "maxrects" => Ok(Self::MaxRects),
            _ => Err(()),
        }
    }
}

/// Skyline placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkylineHeuristic {
    BottomLeft,
    MinWaste,
}

impl FromStr for SkylineHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "minwaste" | "mw" => Ok(Self::MinWaste),
            _ => Err(()),
        }
    }
}

/// MaxRects placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaxRectsHeuristic {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
    BottomLeft,
}

impl FromStr for MaxRectsHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            _ => Err(()),
        }
    }
}

/// Guillotine free-rect choice heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuillotineChoice {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
}

impl FromStr for GuillotineChoice {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            _ => Err(()),
        }
    }
}

/// Guillotine split axis heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GuillotineSplit {
    SplitShorterLeftoverAxis,
    SplitLongerLeftoverAxis,
    SplitMinimizeArea,
    SplitMaximizeArea,
}

impl FromStr for GuillotineSplit {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slas" | "splitshorterleftoveraxis" => Ok(Self::SplitShorterLeftoverAxis),
            "llas" | "splitlongerleftoveraxis" => Ok(Self::SplitLongerLeftoverAxis),
            "minas" | "splitminimizearea" => Ok(Self::SplitMinimizeArea),
            "maxas" | "splitmaximizearea" => Ok(Self::SplitMaximizeArea),
            _ => Err(()),
        }
    }
}

/// One layout run's configuration, passed explicitly into every recompute
/// and validate call. There is no ambient configuration state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    /// Pixels kept free on the trailing edges of every placed image, and
    /// between images and the page's right/bottom edges.
    pub margin: u32,
    /// Allow 90 degree rotations where the strategy supports them.
    pub rotation_enabled: bool,
    #[serde(default = "default_sort_key")]
    pub sort_key: SortKey,
    /// Reverse the input sequence before the sort key is applied. This
    /// changes tie-break order for equal keys, not just the output order.
    #[serde(default)]
    pub reverse: bool,
    #[serde(default = "default_packer")]
    pub packer: PackerKind,

    // strategy tuning
    #[serde(default = "default_skyline_heuristic")]
    pub skyline_heuristic: SkylineHeuristic,
    #[serde(default = "default_mr_heuristic")]
    pub mr_heuristic: MaxRectsHeuristic,
    #[serde(default = "default_g_choice")]
    pub g_choice: GuillotineChoice,
    #[serde(default = "default_g_split")]
    pub g_split: GuillotineSplit,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 512,
            page_height: 512,
            margin: 0,
            rotation_enabled: false,
            sort_key: default_sort_key(),
            reverse: false,
            packer: default_packer(),
            skyline_heuristic: default_skyline_heuristic(),
            mr_heuristic: default_mr_heuristic(),
            g_choice: default_g_choice(),
            g_split: default_g_split(),
        }
    }
}

impl LayoutConfig {
    /// Validates the page dimensions. The per-image bounding check lives on
    /// the engine, which knows the source set.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;
        if self.page_width == 0 || self.page_height == 0 {
            return Err(AtlasError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }
        Ok(())
    }

    /// Create a fluent builder for `LayoutConfig`.
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }
}

fn default_sort_key() -> SortKey {
    SortKey::None
}
fn default_packer() -> PackerKind {
    PackerKind::Skyline
}
fn default_skyline_heuristic() -> SkylineHeuristic {
    SkylineHeuristic::BottomLeft
}
fn default_mr_heuristic() -> MaxRectsHeuristic {
    MaxRectsHeuristic::BestAreaFit
}
fn default_g_choice() -> GuillotineChoice {
    GuillotineChoice::BestAreaFit
}
fn default_g_split() -> GuillotineSplit {
    GuillotineSplit::SplitShorterLeftoverAxis
}

/// Builder for `LayoutConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct LayoutConfigBuilder {
    cfg: LayoutConfig,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: LayoutConfig::default(),
        }
    }
    pub fn page_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn margin(mut self, v: u32) -> Self {
        self.cfg.margin = v;
        self
    }
    pub fn rotation(mut self, v: bool) -> Self {
        self.cfg.rotation_enabled = v;
        self
    }
    pub fn sort_key(mut self, v: SortKey) -> Self {
        self.cfg.sort_key = v;
        self
    }
    pub fn reverse(mut self, v: bool) -> Self {
        self.cfg.reverse = v;
        self
    }
    pub fn packer(mut self, v: PackerKind) -> Self {
        self.cfg.packer = v;
        self
    }
    pub fn skyline_heuristic(mut self, v: SkylineHeuristic) -> Self {
        self.cfg.skyline_heuristic = v;
        self
    }
    pub fn mr_heuristic(mut self, v: MaxRectsHeuristic) -> Self {
        self.cfg.mr_heuristic = v;
        self
    }
    pub fn g_choice(mut self, v: GuillotineChoice) -> Self {
        self.cfg.g_choice = v;
        self
    }
    pub fn g_split(mut self, v: GuillotineSplit) -> Self {
        self.cfg.g_split = v;
        self
    }
    pub fn build(self) -> LayoutConfig {
        self.cfg
    }
}
