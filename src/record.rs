/// Range of ratings representable by the star row.
pub const MAX_RATING: i32 = 10;

/// A single watch-history entry as supplied by the host application.
///
/// The record is pure input data: the compositor never mutates it. `rating`
/// is accepted as-is and clamped at render time rather than rejected.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MediaRecord {
    /// Display title. May be empty; empty titles render as empty text.
    pub title: String,
    /// Display-form year. May be non-numeric (for example `"????"`).
    pub year: String,
    /// Raw rating. Values outside `[0, 10]` are clamped before star math.
    pub rating: i32,
    /// Series vs film. Carried for completeness; rendering ignores it.
    #[serde(default)]
    pub is_series: bool,
}

impl MediaRecord {
    /// Rating clamped into `[0, 10]`, the only form star rendering consumes.
    pub fn clamped_rating(&self) -> u8 {
        self.rating.clamp(0, MAX_RATING) as u8
    }

    /// Lowercased, separator-folded title usable as a stable host-side key.
    pub fn normalized_title(&self) -> String {
        self.title
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '/' { '_' } else { c })
            .collect()
    }
}

/// Closed set of poster layouts. Each mode selects one fixed constant table
/// and one compositing algorithm; modes are not user-configurable beyond
/// this choice.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum LayoutMode {
    /// Framed white panel over a flat dominant-color background.
    #[default]
    Traditional,
    /// Rounded info box over a darkened-dominant-color gradient.
    Modern,
}

#[cfg(test)]
#[path = "../tests/unit/record.rs"]
mod tests;
