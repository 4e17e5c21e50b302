use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum AppEvent {
    // Input side
    LoadImage(PathBuf),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    PointerLeave(Point),
    CancelSelection,
    RecognizeFullImage,
    SetLanguage(String),
    Shutdown,

    // Display side
    ImageLoaded {
        path: PathBuf,
        natural: NaturalSize,
        rendered: ViewportRect,
    },
    ImageLoadFailed(String),
    SelectionOverlay(Option<ViewportRect>),
    SelectionCleared {
        dispatched: bool,
    },
    JobUpdate(JobSnapshot),
}

/// Pointer position in viewport space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in viewport (display) units.
///
/// Width and height are never negative; build one from two corners with
/// [`ViewportRect::from_points`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Normalize a drag (anchor + current pointer) into a rectangle
    pub fn from_points(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self {
            left,
            top,
            width: a.x.max(b.x) - left,
            height: a.y.max(b.y) - top,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Intrinsic pixel dimensions of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Rectangle in the image's native pixel space, always inside its
/// [`NaturalSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrinsicRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl IntrinsicRect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Minimum selection sizes below which a drag is treated as noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionLimits {
    /// In display units, checked against the on-screen intersection
    pub min_display: f64,
    /// In image pixels, checked after scaling
    pub min_intrinsic: u32,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            min_display: 4.0,
            min_intrinsic: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Idle,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Idle => "idle",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobSource {
    FullImage,
    Region(IntrinsicRect),
}

/// Displayable state of the authoritative recognition job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: Uuid,
    pub generation: u64,
    pub source: JobSource,
    pub language: String,
    pub status: JobStatus,
    /// Last stage label reported by the engine
    pub stage: Option<String>,
    pub progress_percent: u8,
    pub result_text: Option<String>,
    pub error_message: Option<String>,
}

impl JobSnapshot {
    pub fn idle() -> Self {
        Self {
            id: Uuid::nil(),
            generation: 0,
            source: JobSource::FullImage,
            language: String::new(),
            status: JobStatus::Idle,
            stage: None,
            progress_percent: 0,
            result_text: None,
            error_message: None,
        }
    }

    /// Status string shown to the user: the engine's stage while running,
    /// otherwise the fixed status name.
    pub fn status_label(&self) -> &str {
        match (&self.status, &self.stage) {
            (JobStatus::Running, Some(stage)) => stage,
            (status, _) => status.as_str(),
        }
    }
}
