//! Colours used by the showcase screens, as `0xRRGGBB`
//!
//! Convert with [`Color::from_hex`](kinema_core::Color::from_hex) or [`color`].

use kinema_core::Color;

/// Carousel backdrop, one per page
pub const CAROUSEL_BACKDROPS: [u32; 4] = [0xA5BBFF, 0xDDBEFE, 0xFF63ED, 0xB98EFF];
pub const CAROUSEL_CHROME: u32 = 0xFFFFFF;

pub const TIMER_BACKGROUND: u32 = 0x323F4E;
pub const TIMER_ACCENT: u32 = 0xF76A6A;
pub const TIMER_TEXT: u32 = 0xFFFFFF;

pub const DRAWER_BACKGROUND: u32 = 0x222222;
/// Drawer entry colours: routes first, then secondary links
pub const DRAWER_ENTRIES: [u32; 10] = [
    0xFFC27A, 0x7EAEFF, 0xF4A9C4, 0x94D1C3, 0xB9A1F4, 0xF9E07F, 0xA3E4A1, 0xCFCFCF, 0xCFCFCF,
    0xCFCFCF,
];

pub const BOX: u32 = 0x333333;
pub const BALL_IDLE: u32 = 0x444444;
pub const BALL_PRESSED: u32 = 0xFEEF86;
pub const LABEL_IDLE: u32 = 0xFFFFFF;
pub const LABEL_PRESSED: u32 = 0x000000;

pub fn color(hex: u32) -> Color {
    Color::from_hex(hex)
}
