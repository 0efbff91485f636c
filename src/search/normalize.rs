/// Folds text into the form every comparison is made on
///
/// Lowercases, turns every non-alphanumeric character into a separator,
/// collapses separator runs into a single space and trims both ends. The
/// result only contains lowercase alphanumerics and single inner spaces,
/// so normalizing twice changes nothing.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(ch);
        } else {
            pending_space = true;
        }
    }

    normalized
}
