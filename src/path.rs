//! Remote path helpers.

/// Joins a remote directory and an entry name, collapsing the doubled
/// separator a trailing slash on `dir` would produce.
pub fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir, name).replace("//", "/")
}

/// Flattens a remote path into a single local file name.
///
/// Distinct remote paths can flatten to the same name (`/a_b.pdf` and
/// `/a/b.pdf`); the later download overwrites the earlier one.
pub fn sanitize_filename(path: &str) -> String {
    path.trim_matches('/').replace('/', "_")
}

pub fn is_pdf(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// `.` and `..`, which some servers include in name listings.
pub fn is_pseudo_entry(name: &str) -> bool {
    name == "." || name == ".."
}
