/// Pupil seed row offset above the face center, relative to face scale.
pub const EYE_ROW_OFFSET_RATIO: f64 = 0.085;

/// Pupil seed column offset from the face center, relative to face scale.
pub const EYE_COL_OFFSET_RATIO: f64 = 0.185;

/// Pupil seed window size relative to face scale.
pub const EYE_SCALE_RATIO: f64 = 0.4;

/// Refinement passes requested from pupil and landmark localizers.
pub const PERTURB_BUDGET: u32 = 63;

pub const DEFAULT_MIN_SIZE: u32 = 20;
pub const DEFAULT_MAX_SIZE: u32 = 1100;
pub const DEFAULT_SHIFT_FACTOR: f64 = 0.1;
pub const DEFAULT_SCALE_FACTOR: f64 = 1.1;
pub const DEFAULT_ROTATION_ANGLE: f64 = 0.0;

/// The pupil locator always scans upright, whatever the face cascade angle.
pub const PUPIL_ROTATION_ANGLE: f64 = 0.0;

pub const DEFAULT_CLUSTER_OVERLAP: f64 = 0.2;
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 7.5;

/// Eye-region landmark groups in traversal order.
pub const EYE_GROUPS: &[&str] = &["lp46", "lp44", "lp42", "lp38", "lp312"];

/// Mouth-region landmark groups in traversal order.
pub const MOUTH_GROUPS: &[&str] = &["lp93", "lp84", "lp82", "lp81"];

/// Group whose first detector runs once more, flipped, after the main traversal.
pub const TERMINAL_GROUP: &str = "lp84";

pub const CONFIG_DIR_NAME: &str = "facemark";
pub const CONFIG_FILE_NAME: &str = "pipeline.json";
