/// Outcome of looking up one field on a product card
///
/// Lookups never return `null`-like sentinels; a field is either read or it
/// is not, and callers decide whether `Missing` is fatal for the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Present(T),
    Missing,
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    /// Returns this field if present, otherwise evaluates the fallback
    pub fn or_else<F>(self, fallback: F) -> Field<T>
    where
        F: FnOnce() -> Field<T>,
    {
        match self {
            Field::Present(value) => Field::Present(value),
            Field::Missing => fallback(),
        }
    }

    pub fn map<U, F>(self, f: F) -> Field<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Field::Present(value) => Field::Present(f(value)),
            Field::Missing => Field::Missing,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Missing => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Present(value),
            None => Field::Missing,
        }
    }
}

/// Trims element text; whitespace-only text counts as missing
pub fn text_field(raw: &str) -> Field<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Field::Missing
    } else {
        Field::Present(trimmed.to_string())
    }
}
