use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    /// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); a light background
    /// is 7 or 9..=15.
    pub fn detect() -> Self {
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| Self::from_colorfgbg(&v))
            .unwrap_or(ThemeKind::Dark)
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(if bg == 7 || (9..=15).contains(&bg) {
            ThemeKind::Light
        } else {
            ThemeKind::Dark
        })
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }
}

/// Palette handed to every render function; owned by `App`.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub kind: ThemeKind,
    pub accent: Color,
    pub primary: Color,
    pub dim: Color,
    pub ok: Color,
    pub warn: Color,
    pub err: Color,
    pub text: Color,
    pub no_color: bool,
}

impl Theme {
    pub fn detect() -> Self {
        let no_color = std::env::var("NO_COLOR").is_ok();
        Self::new(ThemeKind::detect(), no_color)
    }

    pub fn new(kind: ThemeKind, no_color: bool) -> Self {
        if no_color {
            return Self {
                kind,
                accent: Color::Reset,
                primary: Color::Reset,
                dim: Color::Reset,
                ok: Color::Reset,
                warn: Color::Reset,
                err: Color::Reset,
                text: Color::Reset,
                no_color,
            };
        }
        match kind {
            // Tokyo Night
            ThemeKind::Dark => Self {
                kind,
                accent: Color::Rgb(0x7d, 0xcf, 0xff),
                primary: Color::Rgb(0x7a, 0xa2, 0xf7),
                dim: Color::Rgb(0x56, 0x5f, 0x89),
                ok: Color::Rgb(0x9e, 0xce, 0x6a),
                warn: Color::Rgb(0xe0, 0xaf, 0x68),
                err: Color::Rgb(0xf7, 0x76, 0x8e),
                text: Color::Rgb(0xc0, 0xca, 0xf5),
                no_color,
            },
            // Tokyo Night Day
            ThemeKind::Light => Self {
                kind,
                accent: Color::Rgb(0x00, 0x71, 0x97),
                primary: Color::Rgb(0x2e, 0x7d, 0xe9),
                dim: Color::Rgb(0x84, 0x8c, 0xb5),
                ok: Color::Rgb(0x58, 0x75, 0x39),
                warn: Color::Rgb(0x8c, 0x6c, 0x3e),
                err: Color::Rgb(0xf5, 0x2a, 0x65),
                text: Color::Rgb(0x37, 0x60, 0xbf),
                no_color,
            },
        }
    }

    pub fn toggled(&self) -> Self {
        Self::new(self.kind.toggled(), self.no_color)
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            ThemeKind::Dark => "☾",
            ThemeKind::Light => "☀",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorfgbg_background_decides_kind() {
        assert_eq!(ThemeKind::from_colorfgbg("15;0"), Some(ThemeKind::Dark));
        assert_eq!(ThemeKind::from_colorfgbg("0;15"), Some(ThemeKind::Light));
        assert_eq!(ThemeKind::from_colorfgbg("0;default;7"), Some(ThemeKind::Light));
        assert_eq!(ThemeKind::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn toggle_keeps_no_color() {
        let theme = Theme::new(ThemeKind::Dark, true).toggled();
        assert_eq!(theme.kind, ThemeKind::Light);
        assert!(theme.no_color);
        assert_eq!(theme.accent, Color::Reset);
    }
}
