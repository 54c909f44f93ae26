//! Message types for a stage session
//!
//! Every control edit, key press and decode completion becomes one `Msg`
//! that is handled on the event loop.

use std::path::PathBuf;

use crate::config::TransformOrigin;
use crate::domain::Point;
use crate::overlays::{OverlayImage, UploadTicket};

// ============================================================================
// Range / Ruler
// ============================================================================

/// Edits of the range inputs; `None` means the input is non-numeric
#[derive(Debug, Clone, PartialEq)]
pub enum RangeMsg {
    SetMin(Option<i64>),
    SetMax(Option<i64>),
    SetBounds(Option<i64>, Option<i64>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RulerMsg {
    /// Label interval input
    SetInterval(Option<i64>),
    /// Ruler scale input, in percent
    SetScalePercent(Option<f64>),
}

// ============================================================================
// Zoom
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ZoomMsg {
    In,
    Out,
    Reset,
    /// Zoom slider, in percent
    SetPercent(f64),
    SetOrigin(TransformOrigin),
    DragStart(Point),
    DragMove(Point),
    DragEnd,
}

// ============================================================================
// Upload slots
// ============================================================================

/// Per-slot controls, addressed by slot label
#[derive(Debug, Clone, PartialEq)]
pub enum SlotMsg {
    /// A file was chosen
    Upload { slot: String, path: PathBuf },
    Opacity { slot: String, pct: Option<i64> },
    Delete(String),
    Move { slot: String, x: f64, y: f64 },
    Resize { slot: String, sx: f64, sy: f64 },
}

/// A key press as reported by the input layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Character produced by the key, e.g. `"="`
    pub key: String,
    /// Physical key name when it matters, e.g. `"NumpadAdd"`
    pub code: Option<String>,
    pub ctrl: bool,
}

/// Outcome of a background decode
#[derive(Debug)]
pub struct DecodeResult {
    pub ticket: UploadTicket,
    pub source: PathBuf,
    pub result: anyhow::Result<OverlayImage>,
}

// ============================================================================
// Top-level
// ============================================================================

#[derive(Debug)]
pub enum Msg {
    Range(RangeMsg),
    Ruler(RulerMsg),
    Zoom(ZoomMsg),
    Slot(SlotMsg),
    /// Go-to target input + go action
    GoTo(Option<i64>),
    Key(KeyPress),
    Decoded(DecodeResult),
    ShowSlots,
    ShowStatus,
    Quit,
}

impl Msg {
    pub fn zoom_in() -> Self {
        Msg::Zoom(ZoomMsg::In)
    }

    pub fn zoom_out() -> Self {
        Msg::Zoom(ZoomMsg::Out)
    }

    pub fn zoom_reset() -> Self {
        Msg::Zoom(ZoomMsg::Reset)
    }

    pub fn set_min(value: Option<i64>) -> Self {
        Msg::Range(RangeMsg::SetMin(value))
    }

    pub fn set_max(value: Option<i64>) -> Self {
        Msg::Range(RangeMsg::SetMax(value))
    }

    pub fn set_interval(value: Option<i64>) -> Self {
        Msg::Ruler(RulerMsg::SetInterval(value))
    }

    pub fn upload(slot: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Msg::Slot(SlotMsg::Upload {
            slot: slot.into(),
            path: path.into(),
        })
    }
}
