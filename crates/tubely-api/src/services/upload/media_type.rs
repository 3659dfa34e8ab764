/// Match a declared `Content-Type` against `allowed` by essence (parameters stripped,
/// case-insensitive). Returns the canonical allowed value.
pub fn accepted_media_type(
    declared: Option<&str>,
    allowed: &[&'static str],
) -> Option<&'static str> {
    let essence = declared?.split(';').next()?.trim().to_ascii_lowercase();
    allowed.iter().copied().find(|candidate| *candidate == essence)
}
