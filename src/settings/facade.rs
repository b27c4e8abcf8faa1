//! Appearance lookups
//!
//! Stored preferences keep plain integer indices; these tables turn them into
//! something a renderer can use. Unknown indices fall back to a default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TintColor {
    #[default]
    Blue,
    Green,
    Red,
    Orange,
    Pink,
    Purple,
}

impl TintColor {
    pub const ALL: [TintColor; 6] = [
        TintColor::Blue,
        TintColor::Green,
        TintColor::Red,
        TintColor::Orange,
        TintColor::Pink,
        TintColor::Purple,
    ];

    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }

    pub fn index(&self) -> i32 {
        *self as i32
    }

    pub fn name(&self) -> &'static str {
        match self {
            TintColor::Blue => "Blue",
            TintColor::Green => "Green",
            TintColor::Red => "Red",
            TintColor::Orange => "Orange",
            TintColor::Pink => "Pink",
            TintColor::Purple => "Purple",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            TintColor::Blue => "#007AFF",
            TintColor::Green => "#34C759",
            TintColor::Red => "#FF3B30",
            TintColor::Orange => "#FF9500",
            TintColor::Pink => "#FF2D55",
            TintColor::Purple => "#AF52DE",
        }
    }

    /// Colour for destructive actions; red unless the tint is already custom
    pub fn destructive(&self) -> Self {
        match self {
            TintColor::Blue => TintColor::Red,
            other => *other,
        }
    }

    /// Colour for switches; green unless the tint is already custom
    pub fn toggle(&self) -> Self {
        match self {
            TintColor::Blue => TintColor::Green,
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontSize {
    Smallest,
    ExtraSmall,
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
    Largest,
}

impl FontSize {
    pub const ALL: [FontSize; 7] = [
        FontSize::Smallest,
        FontSize::ExtraSmall,
        FontSize::Small,
        FontSize::Medium,
        FontSize::Large,
        FontSize::ExtraLarge,
        FontSize::Largest,
    ];

    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or_default()
    }

    pub fn index(&self) -> i32 {
        *self as i32
    }

    /// Point size
    pub fn points(&self) -> f32 {
        10.0 + 2.0 * self.index() as f32
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontSize::Smallest => "Smallest",
            FontSize::ExtraSmall => "Extra Small",
            FontSize::Small => "Small",
            FontSize::Medium => "Medium",
            FontSize::Large => "Large",
            FontSize::ExtraLarge => "Extra Large",
            FontSize::Largest => "Largest",
        }
    }

    /// Size nearest to `points`; the smaller one wins a tie
    pub fn closest_to(points: f32) -> Self {
        Self::ALL
            .into_iter()
            .min_by(|a, b| {
                let da = (a.points() - points).abs();
                let db = (b.points() - points).abs();
                da.total_cmp(&db)
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColorScheme {
    #[default]
    System,
    Light,
    Dark,
}

impl ColorScheme {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => ColorScheme::Light,
            2 => ColorScheme::Dark,
            _ => ColorScheme::System,
        }
    }

    pub fn index(&self) -> i32 {
        *self as i32
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::System => "System",
            ColorScheme::Light => "Light",
            ColorScheme::Dark => "Dark",
        }
    }
}

/// Resolved appearance settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub color_scheme: ColorScheme,
    pub tint: TintColor,
    pub font_size: FontSize,
}

impl Appearance {
    pub fn from_indices(color_scheme: i32, tint: i32, font_size: i32) -> Self {
        Self {
            color_scheme: ColorScheme::from_index(color_scheme),
            tint: TintColor::from_index(tint),
            font_size: FontSize::from_index(font_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_lookup() {
        assert_eq!(TintColor::from_index(0), TintColor::Blue);
        assert_eq!(TintColor::from_index(5), TintColor::Purple);
        assert_eq!(TintColor::from_index(6), TintColor::Blue);
        assert_eq!(TintColor::from_index(-1), TintColor::Blue);
        assert_eq!(TintColor::from_index(3).name(), "Orange");
        assert_eq!(TintColor::Pink.index(), 4);
    }

    #[test]
    fn test_tint_accents() {
        assert_eq!(TintColor::Blue.destructive(), TintColor::Red);
        assert_eq!(TintColor::Blue.toggle(), TintColor::Green);
        assert_eq!(TintColor::Purple.destructive(), TintColor::Purple);
        assert_eq!(TintColor::Orange.toggle(), TintColor::Orange);
    }

    #[test]
    fn test_font_size_table() {
        let points: Vec<f32> = FontSize::ALL.iter().map(|f| f.points()).collect();
        assert_eq!(points, vec![10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0]);
        assert_eq!(FontSize::from_index(1).label(), "Extra Small");
        assert_eq!(FontSize::from_index(42), FontSize::Medium);
    }

    #[test]
    fn test_font_size_closest() {
        assert_eq!(FontSize::closest_to(17.0), FontSize::Medium);
        assert_eq!(FontSize::closest_to(17.5), FontSize::Large);
        assert_eq!(FontSize::closest_to(2.0), FontSize::Smallest);
        assert_eq!(FontSize::closest_to(40.0), FontSize::Largest);
    }

    #[test]
    fn test_color_scheme_lookup() {
        assert_eq!(ColorScheme::from_index(1), ColorScheme::Light);
        assert_eq!(ColorScheme::from_index(2), ColorScheme::Dark);
        assert_eq!(ColorScheme::from_index(9), ColorScheme::System);
    }

    #[test]
    fn test_appearance_from_defaults() {
        let appearance = Appearance::from_indices(0, 0, 3);
        assert_eq!(appearance.color_scheme, ColorScheme::System);
        assert_eq!(appearance.tint, TintColor::Blue);
        assert_eq!(appearance.font_size.points(), 16.0);
    }
}
