use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static EXE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Day index of the shared restaurant info image.
pub const HEADER_INDEX: u32 = 0;

/// Returns the directory containing the executable.
pub fn get_exe_dir() -> &'static PathBuf {
    EXE_DIR.get_or_init(|| {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

/// Returns the logs directory: `<exe_dir>/logs/`
pub fn get_logs_dir() -> PathBuf {
    get_exe_dir().join("logs")
}

/// Returns the header image path: `<output_dir>/0.png`
pub fn header_image_path(output_dir: &Path) -> PathBuf {
    day_image_path(output_dir, HEADER_INDEX)
}

/// Returns the numbered day image path: `<output_dir>/<day>.png`
pub fn day_image_path(output_dir: &Path, day: u32) -> PathBuf {
    output_dir.join(format!("{}.png", day))
}

/// Returns the labelled day image path: `<output_dir>/<label>.png`
pub fn labelled_image_path(output_dir: &Path, label: &str) -> PathBuf {
    output_dir.join(format!("{}.png", label))
}

/// Returns the saved composite path: `<output_dir>/combined_<day>.png`
pub fn composite_path(output_dir: &Path, day: u32) -> PathBuf {
    output_dir.join(format!("combined_{}.png", day))
}

/// Returns the menu text path: `<output_dir>/menu_<day>.md`
pub fn result_path(output_dir: &Path, day: u32) -> PathBuf {
    output_dir.join(format!("menu_{}.md", day))
}

/// Ensures the logs directory exists. Call at startup.
pub fn ensure_directories() -> std::io::Result<()> {
    std::fs::create_dir_all(get_logs_dir())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_names() {
        let dir = Path::new("out");
        assert_eq!(header_image_path(dir), dir.join("0.png"));
        assert_eq!(day_image_path(dir, 3), dir.join("3.png"));
        assert_eq!(labelled_image_path(dir, "Monday"), dir.join("Monday.png"));
        assert_eq!(composite_path(dir, 2), dir.join("combined_2.png"));
        assert_eq!(result_path(dir, 5), dir.join("menu_5.md"));
    }
}
