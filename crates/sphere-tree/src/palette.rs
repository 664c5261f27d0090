//! Layer-indexed sphere colors.

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The default seven-entry palette. Index 0 colors the root.
pub const DEFAULT_COLORS: [Rgb; 7] = [
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 127, 25),
    Rgb::new(64, 64, 25),
    Rgb::new(127, 127, 127),
    Rgb::new(14, 60, 90),
];

/// An ordered list of colors indexed by generation layer.
///
/// Layers past the end of the palette reuse the last color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Creates a palette from an ordered list of colors.
    ///
    /// # Panics
    /// Panics if `colors` is empty.
    pub fn new(colors: Vec<Rgb>) -> Self {
        assert!(!colors.is_empty(), "Palette needs at least one color");
        Self { colors }
    }

    /// Returns the color for nodes created at `layer`, clamped to the last entry.
    pub fn color_for_layer(&self, layer: usize) -> Rgb {
        let index = layer.min(self.colors.len() - 1);
        self.colors[index]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.to_vec())
    }
}
