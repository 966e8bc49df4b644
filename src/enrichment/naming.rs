//! Display names derived from repository names.

/// Prefixes that only say "this is a Stream Deck plugin"
const NOISE_PREFIXES: &[&str] = &["streamdeck-", "streamdeck_"];

/// Turn a repository name into a catalogue display name.
///
/// `streamdeck-spotify_controls` becomes `Spotify Controls`: lower-cased,
/// prefix stripped, separators turned into spaces, and every letter that
/// follows a non-letter upper-cased.
pub fn format_display_name(repo_name: &str) -> String {
    let lower = repo_name.to_lowercase();
    let base = NOISE_PREFIXES
        .iter()
        .find_map(|p| lower.strip_prefix(p))
        .unwrap_or(&lower);

    let mut out = String::with_capacity(base.len());
    let mut after_letter = false;
    for c in base.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if after_letter {
                out.push(c);
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}
