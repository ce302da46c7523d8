use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::{OutputFormat, get_output_format, is_debug_enabled};

/// Spinner shown while a long install step runs. Hidden in JSON and debug
/// mode, where it would interleave with event lines.
pub fn create_spinner(message: String) -> ProgressBar {
    if get_output_format() == OutputFormat::Json || is_debug_enabled() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .map(|s| s.tick_chars("⠁⠉⠙⠚⠒⠂⠂⠒⠲⠴⠤⠄⠄⠤⠴⠲⠒⠂⠂⠒⠚⠙⠉⠁ "))
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
