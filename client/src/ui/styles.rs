//! Shared UI styles

use bevy::prelude::*;

/// Dark background for panels
pub const PANEL_BACKGROUND: Color = Color::srgba(0.06, 0.06, 0.07, 0.95);

/// Entry button colors
pub const BUTTON_NORMAL: Color = Color::srgb(0.12, 0.12, 0.14);
pub const BUTTON_HOVERED: Color = Color::srgb(0.20, 0.20, 0.24);
pub const BUTTON_PRESSED: Color = Color::srgb(0.30, 0.36, 0.46);

pub const PANEL_BORDER: Color = Color::srgb(0.28, 0.30, 0.36);

pub const ACCENT_COLOR: Color = Color::srgb(0.45, 0.70, 0.95);

/// Text colors
pub const TEXT_COLOR: Color = Color::srgb(0.90, 0.91, 0.94);
pub const TEXT_MUTED: Color = Color::srgb(0.50, 0.52, 0.58);

/// One row in an item list
pub fn entry_button_style() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Px(40.0),
        justify_content: JustifyContent::SpaceBetween,
        align_items: AlignItems::Center,
        padding: UiRect::horizontal(Val::Px(12.0)),
        margin: UiRect::bottom(Val::Px(6.0)),
        border: UiRect::all(Val::Px(2.0)),
        ..default()
    }
}

pub fn entry_text_style() -> TextFont {
    TextFont {
        font_size: 18.0,
        ..default()
    }
}

pub fn panel_title_style() -> TextFont {
    TextFont {
        font_size: 26.0,
        ..default()
    }
}
