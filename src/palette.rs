use crate::error::{ChartError, Result};
use plotters::style::RGBColor;

/// Fill colors for the configuration series, in legend order
#[derive(Debug, Clone, PartialEq)]
pub struct Palette(Vec<RGBColor>);

impl Palette {
    pub fn new(colors: Vec<RGBColor>) -> Self {
        Self(colors)
    }

    /// Light red, red, green, yellow
    pub fn builtin() -> Self {
        Self(vec![
            RGBColor(0xFF, 0xCC, 0xCC),
            RGBColor(0xFF, 0x00, 0x00),
            RGBColor(0x66, 0xCC, 0x99),
            RGBColor(0xFF, 0xFF, 0x99),
        ])
    }

    /// Parse a list of `#RRGGBB` strings
    pub fn parse<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        colors
            .iter()
            .map(|c| parse_hex(c.as_ref()))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RGBColor> {
        self.0.get(index).copied()
    }

    pub fn colors(&self) -> &[RGBColor] {
        &self.0
    }

    /// Ensure there is one color per configuration
    pub fn check(&self, num_configs: usize) -> Result<()> {
        if self.0.len() < num_configs {
            return Err(ChartError::PaletteTooSmall {
                colors: self.0.len(),
                configs: num_configs,
            });
        }
        Ok(())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin()
    }
}

fn parse_hex(s: &str) -> Result<RGBColor> {
    let invalid = || ChartError::InvalidColor(s.to_string());

    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let palette = Palette::parse(&["#ffcc99", "00FF10", " #123abc "]).unwrap();
        assert_eq!(
            palette.colors(),
            &[
                RGBColor(0xFF, 0xCC, 0x99),
                RGBColor(0x00, 0xFF, 0x10),
                RGBColor(0x12, 0x3A, 0xBC),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_bad_colors() {
        for bad in ["#12345", "#1234567", "red", "#GG0000", ""] {
            assert!(
                matches!(Palette::parse(&[bad]), Err(ChartError::InvalidColor(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_builtin_matches_hex() {
        let parsed = Palette::parse(&["#FFCCCC", "#FF0000", "#66cc99", "#ffff99"]).unwrap();
        assert_eq!(parsed, Palette::builtin());
    }

    #[test]
    fn test_new() {
        assert!(Palette::new(Vec::new()).is_empty());

        let palette = Palette::new(vec![RGBColor(1, 2, 3)]);
        assert!(!palette.is_empty());
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get(0), Some(RGBColor(1, 2, 3)));
        assert_eq!(palette.get(1), None);
    }

    #[test]
    fn test_check() {
        let palette = Palette::builtin();
        assert!(palette.check(4).is_ok());
        assert!(palette.check(0).is_ok());
        match palette.check(5) {
            Err(ChartError::PaletteTooSmall { colors, configs }) => {
                assert_eq!(colors, 4);
                assert_eq!(configs, 5);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
