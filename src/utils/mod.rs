use std::io::ErrorKind;
use std::path::PathBuf;

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Render a list of relative paths for an audit record, e.g. `["a.txt", "sub/b.txt"]`.
pub fn format_paths(paths: &[PathBuf]) -> String {
    let rendered: Vec<String> = paths
        .iter()
        .map(|p| format!("{:?}", p.to_string_lossy()))
        .collect();
    format!("[{}]", rendered.join(", "))
}

/// Whether an IO error means the path was not there.
pub fn is_not_found(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_paths() {
        let paths = vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")];
        assert_eq!(format_paths(&paths), r#"["a.txt", "sub/b.txt"]"#);
        assert_eq!(format_paths(&[]), "[]");
    }

    #[test]
    fn test_now_iso_is_rfc3339() {
        assert!(chrono::DateTime::parse_from_rfc3339(&now_iso()).is_ok());
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(&std::io::Error::from(ErrorKind::NotFound)));
        assert!(!is_not_found(&std::io::Error::from(
            ErrorKind::PermissionDenied
        )));
    }
}
