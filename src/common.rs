pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into a 2bpp sprite palette (0-3)
pub type PaletteIdx = u8; // Index into the global palette table (0-7)
pub type TileIdx = u8; // Index into the global tile table (0-255)

pub const TILE_SIZE: usize = 8;
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;
pub const PALETTE_COLORS: usize = 4;
pub const MAX_PALETTES: usize = 8;
pub const MAX_TILES: usize = 256;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: ColorValue,
    pub g: ColorValue,
    pub b: ColorValue,
    pub a: ColorValue,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: ColorValue, g: ColorValue, b: ColorValue, a: ColorValue) -> Self {
        Self { r, g, b, a }
    }

    // Palettes are ordered by alpha first so transparent entries come first.
    pub fn sort_key(&self) -> (ColorValue, ColorValue, ColorValue, ColorValue) {
        (self.a, self.r, self.g, self.b)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}
