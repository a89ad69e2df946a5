//! Reader and writer for `.mindtree/config.mindtree`.
//!
//! The file is a list of `key: value` lines. Blank lines and `#` comments
//! are ignored, unknown keys are logged and skipped, and any key left out
//! keeps its default.

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::map::color::{Palette, Rgb};
use crate::map::layout::{
    DEFAULT_DEPTH_LIGHTEN_STEP, DEFAULT_HORIZONTAL_SPACING, DEFAULT_VERTICAL_SPACING,
    LayoutConfig, MAX_LAYOUT_DEPTH,
};
use crate::map::session::{Settings, SiblingSlot};

/// Which presentation the editor opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Diagram,
    Outline,
}

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            Self::Diagram => Self::Outline,
            Self::Outline => Self::Diagram,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Diagram => "diagram",
            Self::Outline => "outline",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub palette: Vec<Rgb>,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub depth_lighten_step: f32,
    pub sibling_slot: SiblingSlot,
    pub default_view: ViewMode,
    pub show_manual_edges: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: Palette::default().colors().to_vec(),
            horizontal_spacing: DEFAULT_HORIZONTAL_SPACING,
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            depth_lighten_step: DEFAULT_DEPTH_LIGHTEN_STEP,
            sibling_slot: SiblingSlot::default(),
            default_view: ViewMode::default(),
            show_manual_edges: true,
        }
    }
}

impl Config {
    /// Session settings derived from this configuration.
    pub fn settings(&self) -> Settings {
        Settings {
            layout: LayoutConfig {
                horizontal_spacing: self.horizontal_spacing,
                vertical_spacing: self.vertical_spacing,
                depth_lighten_step: self.depth_lighten_step,
                palette: Palette::new(self.palette.clone()),
                max_depth: MAX_LAYOUT_DEPTH,
            },
            sibling_slot: self.sibling_slot,
        }
    }
}

/// Contents written by `mindtree init`.
pub fn default_contents() -> String {
    serialize(&Config::default())
}

pub fn parse(input: &str) -> Result<Config> {
    let mut cfg = Config::default();

    for (i, raw) in input.lines().enumerate() {
        let line_num = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            bail!("expected `key: value` at line {}", line_num);
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "palette" => {
                cfg.palette = value
                    .split_whitespace()
                    .map(str::parse::<Rgb>)
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("invalid palette at line {}", line_num))?;
                if cfg.palette.is_empty() {
                    cfg.palette = Palette::default().colors().to_vec();
                }
            }
            "horizontal_spacing" => {
                cfg.horizontal_spacing = parse_spacing(value, line_num)?;
            }
            "vertical_spacing" => {
                cfg.vertical_spacing = parse_spacing(value, line_num)?;
            }
            "depth_lighten_step" => {
                let step: f32 = value
                    .parse()
                    .with_context(|| format!("invalid number at line {}", line_num))?;
                if !(0.0..=1.0).contains(&step) {
                    bail!("depth_lighten_step must be between 0 and 1 (line {})", line_num);
                }
                cfg.depth_lighten_step = step;
            }
            "sibling_slot" => {
                cfg.sibling_slot = match value {
                    "next-free" => SiblingSlot::NextFree,
                    "increment" => SiblingSlot::Increment,
                    other => bail!(
                        "unknown sibling_slot `{}` at line {} (expected next-free | increment)",
                        other,
                        line_num
                    ),
                };
            }
            "default_view" => {
                cfg.default_view = match value {
                    "diagram" => ViewMode::Diagram,
                    "outline" => ViewMode::Outline,
                    other => bail!(
                        "unknown default_view `{}` at line {} (expected diagram | outline)",
                        other,
                        line_num
                    ),
                };
            }
            "show_manual_edges" => {
                cfg.show_manual_edges = parse_bool(value, line_num)?;
            }
            other => warn!(key = other, line = line_num, "ignoring unknown config key"),
        }
    }

    Ok(cfg)
}

pub fn serialize(config: &Config) -> String {
    let palette = config
        .palette
        .iter()
        .map(|c| c.to_hex())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "\
# mindtree configuration
# Edit manually or run: mindtree setup

# Branch colors, assigned to top-level topics in order and reused cyclically
palette: {}

# Distance between a topic and its children, in diagram units
horizontal_spacing: {}

# Distance between sibling topics, in diagram units
vertical_spacing: {}

# How much each level below a branch head is lightened toward white (0..1)
depth_lighten_step: {}

# Path given to a new sibling
# Options: next-free | increment
sibling_slot: {}

# View shown when the editor opens
# Options: diagram | outline
default_view: {}

# Draw hand-drawn connections in the diagram view
show_manual_edges: {}
",
        palette,
        config.horizontal_spacing,
        config.vertical_spacing,
        config.depth_lighten_step,
        config.sibling_slot.as_str(),
        config.default_view.as_str(),
        config.show_manual_edges,
    )
}

fn parse_spacing(value: &str, line_num: usize) -> Result<f64> {
    let spacing: f64 = value
        .parse()
        .with_context(|| format!("invalid number at line {}", line_num))?;
    if !spacing.is_finite() || spacing <= 0.0 {
        bail!("spacing must be a positive number (line {})", line_num);
    }
    Ok(spacing)
}

fn parse_bool(value: &str, line_num: usize) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("expected true or false at line {}, got `{}`", line_num, other),
    }
}
