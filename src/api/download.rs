//! Download file naming for generated configs

/// Turn a user-supplied name into a safe attachment filename.
///
/// Directory components are dropped, anything outside `[A-Za-z0-9._-]` is
/// removed, and `.conf` is appended when no extension is left.
pub fn attachment_filename(requested: Option<&str>, fallback: &str) -> String {
    let name = requested
        .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name))
        .map(|name| {
            name.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
                .collect::<String>()
        })
        .map(|name| name.trim_start_matches('.').to_string())
        .unwrap_or_default();

    if name.is_empty() {
        return fallback.to_string();
    }

    if name.contains('.') {
        name
    } else {
        format!("{}.conf", name)
    }
}
