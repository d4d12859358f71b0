use iced::widget::{button, container};
use iced::{Background, Border, Color, Shadow, Theme};

use crate::core::models::ThemeMode;

pub const PRIMARY_GREEN: Color = Color::from_rgb(0.098, 0.529, 0.329);
pub const NEUTRAL_GRAY: Color = Color::from_rgb(0.25, 0.25, 0.25);
pub const DANGER_RED: Color = Color::from_rgb(0.8, 0.25, 0.25);

pub const STATUS_OK: Color = Color::from_rgb(0.2, 0.8, 0.4);
pub const STATUS_BUSY: Color = Color::from_rgb(1.0, 0.8, 0.2);
pub const STATUS_ERROR: Color = Color::from_rgb(1.0, 0.3, 0.3);
pub const STATUS_IDLE: Color = Color::from_rgb(0.5, 0.5, 0.5);

pub fn get_theme(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::custom(
            "Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.08, 0.08, 0.1),
                text: Color::from_rgb(1.0, 1.0, 1.0),
                primary: Color::from_rgb(0.4, 0.6, 1.0),
                success: Color::from_rgb(0.2, 0.9, 0.4),
                danger: Color::from_rgb(1.0, 0.3, 0.3),
                warning: Color::from_rgb(1.0, 0.7, 0.0),
            },
        ),
        ThemeMode::Light => Theme::custom(
            "Light".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.95, 0.95, 0.97),
                text: Color::from_rgb(0.1, 0.1, 0.1),
                primary: Color::from_rgb(0.2, 0.4, 0.9),
                success: Color::from_rgb(0.1, 0.7, 0.3),
                danger: Color::from_rgb(0.9, 0.2, 0.2),
                warning: Color::from_rgb(0.9, 0.6, 0.0),
            },
        ),
    }
}

fn shade(color: Color, amount: f32) -> Color {
    Color::from_rgb(
        (color.r + amount).clamp(0.0, 1.0),
        (color.g + amount).clamp(0.0, 1.0),
        (color.b + amount).clamp(0.0, 1.0),
    )
}

/// Solid button in `base`, lighter on hover and darker when pressed.
fn filled_button_style(base: Color, text_color: Color, status: button::Status) -> button::Style {
    let (background, text_color) = match status {
        button::Status::Active => (base, text_color),
        button::Status::Hovered => (shade(base, 0.1), text_color),
        button::Status::Pressed => (shade(base, -0.05), text_color),
        button::Status::Disabled => (Color::from_rgb(0.3, 0.3, 0.3), Color::from_rgb(0.5, 0.5, 0.5)),
    };

    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: background,
            width: 1.0,
            radius: 6.0.into(),
        },
        shadow: Shadow::default(),
        snap: matches!(status, button::Status::Pressed),
    }
}

pub fn primary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    filled_button_style(PRIMARY_GREEN, Color::WHITE, status)
}

pub fn secondary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    filled_button_style(NEUTRAL_GRAY, Color::from_rgb(0.8, 0.8, 0.8), status)
}

pub fn danger_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    filled_button_style(DANGER_RED, Color::WHITE, status)
}

/// Slightly raised panel for the output area.
pub fn panel_style(mode: &ThemeMode) -> container::Style {
    let background = match mode {
        ThemeMode::Dark => Color::from_rgba(1.0, 1.0, 1.0, 0.05),
        ThemeMode::Light => Color::from_rgba(0.0, 0.0, 0.0, 0.04),
    };

    container::Style {
        background: Some(Background::Color(background)),
        border: Border {
            color: Color::from_rgba(0.5, 0.5, 0.5, 0.3),
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn background_of(style: &button::Style) -> Color {
        match style.background {
            Some(Background::Color(color)) => color,
            _ => panic!("Expected background color"),
        }
    }

    #[test]
    fn test_get_theme_dark_mode() {
        let palette = get_theme(&ThemeMode::Dark).palette();

        assert_eq!(palette.background, Color::from_rgb(0.08, 0.08, 0.1));
        assert_eq!(palette.text, Color::from_rgb(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_get_theme_light_mode() {
        let palette = get_theme(&ThemeMode::Light).palette();

        assert_eq!(palette.background, Color::from_rgb(0.95, 0.95, 0.97));
        assert_eq!(palette.text, Color::from_rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn test_primary_button_style_active_has_green_background() {
        let style = primary_button_style(&Theme::Dark, button::Status::Active);

        assert_eq!(background_of(&style), PRIMARY_GREEN);
        assert_eq!(style.text_color, Color::WHITE);
    }

    #[test]
    fn test_hovered_is_lighter_and_pressed_is_darker() {
        let active = background_of(&danger_button_style(&Theme::Dark, button::Status::Active));
        let hovered = background_of(&danger_button_style(&Theme::Dark, button::Status::Hovered));
        let pressed = background_of(&danger_button_style(&Theme::Dark, button::Status::Pressed));

        assert!(hovered.g > active.g);
        assert!(pressed.g < active.g);
    }

    #[test]
    fn test_disabled_buttons_are_gray() {
        let style = primary_button_style(&Theme::Dark, button::Status::Disabled);

        assert_eq!(background_of(&style), Color::from_rgb(0.3, 0.3, 0.3));
    }

    #[test]
    fn test_button_styles_share_radius_and_drop_shadows() {
        let styles = [
            primary_button_style(&Theme::Dark, button::Status::Active),
            secondary_button_style(&Theme::Dark, button::Status::Active),
            danger_button_style(&Theme::Dark, button::Status::Active),
        ];

        for style in styles {
            assert_eq!(style.border.radius, 6.0.into());
            assert_eq!(style.shadow.blur_radius, 0.0);
        }
    }

    #[test]
    fn test_shade_clamps_channels() {
        let brightened = shade(Color::WHITE, 0.5);

        assert_eq!(brightened, Color::from_rgb(1.0, 1.0, 1.0));
    }
}
