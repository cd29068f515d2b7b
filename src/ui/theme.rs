//! Colour palette and style helpers for the detail page
//!
//! Dark page, gold accents, green for the active episode cell.

use ratatui::style::{Color, Modifier, Style};

/// Detail page palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0b0d14 (near black)
    pub const BACKGROUND: Color = Color::Rgb(0x0b, 0x0d, 0x14);

    /// Primary: #f2ce71 (gold)
    pub const PRIMARY: Color = Color::Rgb(0xf2, 0xce, 0x71);

    /// Secondary: #8ab4f8 (soft blue)
    pub const SECONDARY: Color = Color::Rgb(0x8a, 0xb4, 0xf8);

    /// Text: #d1d5db (gray-300)
    pub const TEXT: Color = Color::Rgb(0xd1, 0xd5, 0xdb);

    /// Dim: #6b7280 (gray-500)
    pub const DIM: Color = Color::Rgb(0x6b, 0x72, 0x80);

    /// Error: #ff4d4f (red)
    pub const ERROR: Color = Color::Rgb(0xff, 0x4d, 0x4f);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panel background for cards and badges
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x28, 0x2b, 0x3a);

    /// Active episode cell: #5aac5a
    pub const EPISODE_ACTIVE: Color = Color::Rgb(0x5a, 0xac, 0x5a);

    pub const BORDER: Color = Color::Rgb(0x3a, 0x3f, 0x55);

    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    /// Page heading
    pub fn heading() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    /// Block titles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Genre badge
    pub fn badge() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// "show more" / "show less" control
    pub fn toggle() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn episode() -> Style {
        Style::default().fg(Color::White).bg(Self::BACKGROUND_LIGHT)
    }

    pub fn episode_active() -> Style {
        Style::default().fg(Color::White).bg(Self::EPISODE_ACTIVE)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Loading/spinner indicator
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Year/date metadata
    pub fn year() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Rating stars, coloured by score
    pub fn rating(vote_average: f32) -> Style {
        if vote_average >= 7.0 {
            Style::default().fg(Self::EPISODE_ACTIVE)
        } else if vote_average >= 5.0 {
            Style::default().fg(Self::PRIMARY)
        } else {
            Self::dimmed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_style_thresholds() {
        assert_eq!(Theme::rating(8.1).fg, Some(Theme::EPISODE_ACTIVE));
        assert_eq!(Theme::rating(6.0).fg, Some(Theme::PRIMARY));
        assert_eq!(Theme::rating(2.0).fg, Some(Theme::DIM));
    }

    #[test]
    fn test_episode_styles_differ() {
        assert_eq!(Theme::episode_active().bg, Some(Theme::EPISODE_ACTIVE));
        assert_eq!(Theme::episode().bg, Some(Theme::BACKGROUND_LIGHT));
    }
}
