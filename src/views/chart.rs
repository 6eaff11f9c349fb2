use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Chart type a front end should draw.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

/// Renderer-agnostic description of one chart over a view's frame.
///
/// For [`ChartKind::Pie`], `x` names the slice labels and `y` the slice values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub markers: bool,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>, x: &str, y: &str) -> Self {
        Self {
            kind,
            title: title.into(),
            x: x.to_string(),
            y: y.to_string(),
            color: None,
            y_label: None,
            markers: false,
        }
    }

    pub fn with_color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn with_markers(mut self) -> Self {
        self.markers = true;
        self
    }
}
