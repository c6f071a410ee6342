use serde::{Deserialize, Serialize};

/// Light or dark appearance
///
/// Owned by whichever view sits at the top and handed down by value;
/// there is no process-wide theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeMode::Light => Palette::light(),
            ThemeMode::Dark => Palette::dark(),
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(crate::Error::ConfigError(format!(
                "Unknown theme '{}', expected 'light' or 'dark'",
                other
            ))),
        }
    }
}

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

/// Colors the Projects page is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,
    pub muted: Color,
    pub primary: Color,
    pub error: Color,
    pub selected_bg: Color,
    pub skeleton: Color,
    pub stars: Color,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            background: Color::rgb(0x1e1e2e),
            foreground: Color::rgb(0xcdd6f4),
            border: Color::rgb(0x45475a),
            border_focused: Color::rgb(0x89b4fa),
            title: Color::rgb(0xcba6f7),
            muted: Color::rgb(0x6c7086),
            primary: Color::rgb(0x89b4fa),
            error: Color::rgb(0xf38ba8),
            selected_bg: Color::rgb(0x313244),
            skeleton: Color::rgb(0x313244),
            stars: Color::rgb(0xf9e2af),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::rgb(0xeff1f5),
            foreground: Color::rgb(0x4c4f69),
            border: Color::rgb(0xbcc0cc),
            border_focused: Color::rgb(0x1e66f5),
            title: Color::rgb(0x8839ef),
            muted: Color::rgb(0x8c8fa1),
            primary: Color::rgb(0x1e66f5),
            error: Color::rgb(0xd20f39),
            selected_bg: Color::rgb(0xccd0da),
            skeleton: Color::rgb(0xdce0e8),
            stars: Color::rgb(0xdf8e1d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggle(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggle().toggle(), ThemeMode::Dark);
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Light".parse::<ThemeMode>().unwrap(), ThemeMode::Light);
        assert_eq!(" dark ".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
        assert!("solarized".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(ThemeMode::Light.palette(), ThemeMode::Dark.palette());
        assert_eq!(Color::rgb(0x1e66f5), Color { r: 0x1e, g: 0x66, b: 0xf5 });
    }
}
