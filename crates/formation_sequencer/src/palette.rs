// SPDX-License-Identifier: MIT OR Apache-2.0
//! Preset colour palettes for dancers.

/// A named set of preset colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    /// Palette name
    pub name: &'static str,
    /// Hex colours in display order
    pub colors: &'static [&'static str; 8],
}

impl ColorPalette {
    /// Check if this palette offers a colour (case-insensitive)
    pub fn contains(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(color))
    }
}

/// Saturated colours
pub const BRIGHT: ColorPalette = ColorPalette {
    name: "Bright",
    colors: &[
        "#e74c3c", "#3498db", "#2ecc71", "#f1c40f", "#9b59b6", "#e67e22", "#000000", "#888888",
    ],
};

/// Pastel colours
pub const SOFT: ColorPalette = ColorPalette {
    name: "Soft",
    colors: &[
        "#ffadad", "#ffd6a5", "#fdffb6", "#caffbf", "#9bf6ff", "#bdb2ff", "#000000", "#888888",
    ],
};

/// Muted colours
pub const DARK: ColorPalette = ColorPalette {
    name: "Dark",
    colors: &[
        "#c0392b", "#2980b9", "#27ae60", "#f39c12", "#8e44ad", "#d35400", "#000000", "#888888",
    ],
};

/// Get all palettes in display order
pub fn all() -> &'static [ColorPalette] {
    &[BRIGHT, SOFT, DARK]
}

/// Find a palette by name (case-insensitive)
pub fn by_name(name: &str) -> Option<&'static ColorPalette> {
    all().iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// First palette offering a colour
pub fn palette_of(color: &str) -> Option<&'static ColorPalette> {
    all().iter().find(|p| p.contains(color))
}
