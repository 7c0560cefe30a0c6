use lessbuild::setup::DirectoryStatus;

use crate::ui::theme::Icon;

pub fn render_directory_status(
    status: &DirectoryStatus,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let icon = match status {
        DirectoryStatus::Existing { .. } | DirectoryStatus::Created { .. } => Icon::Success,
        DirectoryStatus::NotWritable { .. } => Icon::Warning,
        DirectoryStatus::Failed { .. } => Icon::Error,
    };
    format!(
        "{} {}",
        icon.colored(supports_color, supports_unicode),
        status.message()
    )
}
