mod capture;
mod compare;

pub use capture::{CaptureConfig, SCENES, capture_scene, render_scene};
pub use compare::{CompareResult, compare_snapshots, generate_diff};

use sprout::dom::DomError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotTestError {
    #[error("Unknown scene: {0}")]
    UnknownScene(String),
    #[error("Reference snapshot not found: {0}")]
    ReferenceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

pub type Result<T> = std::result::Result<T, SnapshotTestError>;

/// Configuration for a snapshot test
#[derive(Clone, Default)]
pub struct SnapshotTestConfig {
    /// Name of the scene to render
    pub scene_name: String,
}

/// Result of a snapshot test
pub struct SnapshotTestResult {
    /// Whether the captured markup equals the reference exactly
    pub passed: bool,
    /// Fraction of matching lines (0.0 to 1.0), reported on mismatch
    pub similarity: f64,
    pub captured_path: PathBuf,
    pub reference_path: PathBuf,
    /// Path to the line diff (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

pub fn reference_path(scene_name: &str) -> PathBuf {
    references_dir().join(format!("{}.html", scene_name))
}

/// Directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

pub fn captured_path(scene_name: &str) -> PathBuf {
    output_dir().join(format!("{}_captured.html", scene_name))
}

pub fn diff_path(scene_name: &str) -> PathBuf {
    output_dir().join(format!("{}.diff", scene_name))
}

/// Render a scene and compare it against its reference snapshot
pub fn run_snapshot_test(config: &SnapshotTestConfig) -> Result<SnapshotTestResult> {
    std::fs::create_dir_all(output_dir())?;

    let ref_path = reference_path(&config.scene_name);
    let cap_path = captured_path(&config.scene_name);

    if !ref_path.exists() {
        return Err(SnapshotTestError::ReferenceNotFound(ref_path));
    }

    capture_scene(&CaptureConfig {
        scene_name: config.scene_name.clone(),
        output_path: cap_path.clone(),
    })?;

    let compare_result = compare_snapshots(&ref_path, &cap_path)?;
    let passed = compare_result.identical;

    let diff = if !passed {
        let diff_file = diff_path(&config.scene_name);
        generate_diff(&ref_path, &cap_path, &diff_file)?;
        Some(diff_file)
    } else {
        None
    };

    Ok(SnapshotTestResult {
        passed,
        similarity: compare_result.similarity,
        captured_path: cap_path,
        reference_path: ref_path,
        diff_path: diff,
    })
}

/// Overwrite the reference snapshot for a scene
pub fn update_reference(scene_name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;

    let ref_path = reference_path(scene_name);
    capture_scene(&CaptureConfig {
        scene_name: scene_name.to_string(),
        output_path: ref_path.clone(),
    })?;

    println!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}
