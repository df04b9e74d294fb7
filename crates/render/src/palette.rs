use serde::{Deserialize, Serialize};

use crate::scene::{Material, Rgb};

/// Convert a `0xRRGGBB` colour to linear-ish float channels.
pub const fn rgb(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Emissive tint of a highlighted block.
pub const HIGHLIGHT_EMISSIVE: Rgb = rgb(0xaaaaaa);
pub const NO_EMISSIVE: Rgb = rgb(0x000000);

/// Pale wood of the table top.
pub const TABLE_COLOR: Rgb = rgb(0xe8dcc8);

/// Wood variants a block can be cut from. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WoodGrain {
    Lite,
    Dark,
    Gray,
}

impl WoodGrain {
    pub const ALL: [WoodGrain; 3] = [WoodGrain::Lite, WoodGrain::Dark, WoodGrain::Gray];

    pub fn name(&self) -> &'static str {
        match self {
            WoodGrain::Lite => "lite",
            WoodGrain::Dark => "dark",
            WoodGrain::Gray => "gray",
        }
    }

    pub fn base_color(&self) -> Rgb {
        match self {
            WoodGrain::Lite => rgb(0xd9b382),
            WoodGrain::Dark => rgb(0x8a5a34),
            WoodGrain::Gray => rgb(0x9c958c),
        }
    }

    pub fn material(&self) -> Material {
        Material::new(self.base_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conversion() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x000000), NO_EMISSIVE);
        let grey = HIGHLIGHT_EMISSIVE;
        assert!((grey[0] - 170.0 / 255.0).abs() < 1e-6);
        assert_eq!(grey[0], grey[2]);
    }

    #[test]
    fn grains_are_distinct() {
        let colors: Vec<Rgb> = WoodGrain::ALL.iter().map(|g| g.base_color()).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_eq!(WoodGrain::Dark.name(), "dark");
    }

    #[test]
    fn grain_material_starts_unlit() {
        let m = WoodGrain::Lite.material();
        assert_eq!(m.emissive, NO_EMISSIVE);
        assert_eq!(m.base_color, WoodGrain::Lite.base_color());
    }
}
