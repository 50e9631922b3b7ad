//! Supported chart kinds and their filename tags.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Pair,
    Scatter,
    Line,
    Category,
    Strip,
    Swarm,
    Violin,
    Box,
    Boxen,
    Count,
    Bar,
    Point,
    LinearModel,
    CorrelationHeatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 14] = [
        ChartKind::Pair,
        ChartKind::Scatter,
        ChartKind::Line,
        ChartKind::Category,
        ChartKind::Strip,
        ChartKind::Swarm,
        ChartKind::Violin,
        ChartKind::Box,
        ChartKind::Boxen,
        ChartKind::Count,
        ChartKind::Bar,
        ChartKind::Point,
        ChartKind::LinearModel,
        ChartKind::CorrelationHeatmap,
    ];

    /// Prefix of persisted filenames.
    pub fn tag(&self) -> &'static str {
        match self {
            ChartKind::Pair => "pairplot",
            ChartKind::Scatter => "scatterplot",
            ChartKind::Line => "lineplot",
            ChartKind::Category => "catplot",
            ChartKind::Strip => "stripplot",
            ChartKind::Swarm => "swarmplot",
            ChartKind::Violin => "violinplot",
            ChartKind::Box => "boxplot",
            ChartKind::Boxen => "boxenplot",
            ChartKind::Count => "countplot",
            ChartKind::Bar => "barplot",
            ChartKind::Point => "pointplot",
            ChartKind::LinearModel => "lmplot",
            ChartKind::CorrelationHeatmap => "correlation-heatmap",
        }
    }

    /// Figure-level charts draw on a square canvas of their own.
    pub fn is_figure_level(&self) -> bool {
        matches!(
            self,
            ChartKind::Pair | ChartKind::Category | ChartKind::LinearModel
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    /// Accepts the tag ("boxplot") or the short name ("box").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let short = name.strip_suffix("plot").unwrap_or(&name);
        let kind = match short {
            "pair" => ChartKind::Pair,
            "scatter" => ChartKind::Scatter,
            "line" => ChartKind::Line,
            "cat" | "category" => ChartKind::Category,
            "strip" => ChartKind::Strip,
            "swarm" => ChartKind::Swarm,
            "violin" => ChartKind::Violin,
            "box" => ChartKind::Box,
            "boxen" => ChartKind::Boxen,
            "count" => ChartKind::Count,
            "bar" => ChartKind::Bar,
            "point" => ChartKind::Point,
            "lm" | "regression" => ChartKind::LinearModel,
            "heatmap" | "correlation-heatmap" => ChartKind::CorrelationHeatmap,
            _ => return Err(format!("unknown chart kind '{}'", s)),
        };
        Ok(kind)
    }
}
