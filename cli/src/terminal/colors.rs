use colored::Color;

pub const PRIMARY: Color = Color::BrightCyan;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::BrightBlue;
pub const IPV6_ADDR: Color = Color::Blue;

pub const PORT_OPEN: Color = Color::Green;
pub const PORT_CLOSED: Color = Color::Red;
pub const PORT_FILTERED: Color = Color::Yellow;
pub const OS: Color = Color::Magenta;
