//! Defines custom traits, trait implementations for `egui` types, and general utility traits.
//!
//! This module centralizes extensions to existing types (`egui::Context`, `egui::Ui`, `std::path::Path`, `Vec`)
//! and defines interfaces (`Notification`, `DashboardWidgets`) for common UI patterns.
//! It interacts primarily with `layout.rs` (for styling, notifications, tables).

use egui::{
    Align, Color32, Context,
    FontFamily::Proportional,
    FontId, Frame, Layout, ProgressBar, Response, RichText, Spacing, Stroke, Style,
    TextStyle::{Body, Button, Heading, Monospace, Small},
    Ui, Vec2, Visuals, Window,
    style::ScrollStyle,
};

use std::{collections::HashSet, ffi::OsStr, hash::Hash, path::Path};

/// Defines custom text styles for the egui context.
/// Overrides default `egui` font sizes for different logical text styles (Heading, Body, etc.).
/// Used by `MyStyle::set_style_init`.
pub const CUSTOM_TEXT_STYLE: [(egui::TextStyle, egui::FontId); 5] = [
    (Heading, FontId::new(20.0, Proportional)),
    (Body, FontId::new(15.0, Proportional)),
    (Button, FontId::new(15.0, Proportional)),
    (Monospace, FontId::new(14.0, Proportional)),
    (Small, FontId::new(13.0, Proportional)),
];

/// A trait for applying custom styling to the `egui` context (`Context`).
/// Used at startup and on theme switches by `layout.rs::SalesViewApp`.
pub trait MyStyle {
    /// Applies a pre-defined application style to the `egui` context.
    fn set_style_init(&self, visuals: Visuals);
}

impl MyStyle for Context {
    /// Configures the application's look and feel (theme, spacing, text styles) by modifying `egui::Style`.
    ///
    /// ### Logic
    /// 1. Define custom scrollbar settings (`ScrollStyle`).
    /// 2. Define custom widget spacing (`Spacing`).
    /// 3. Create a full `Style` struct incorporating `Visuals` (theme), `Spacing`, and `CUSTOM_TEXT_STYLE`.
    /// 4. Apply the constructed `Style` to the `egui::Context`.
    fn set_style_init(&self, visuals: Visuals) {
        // 1. Define ScrollStyle.
        let scroll = ScrollStyle {
            handle_min_length: 32.0,
            ..ScrollStyle::default()
        };

        // 2. Define Spacing.
        let spacing = Spacing {
            scroll,
            item_spacing: [8.0, 6.0].into(),
            ..Spacing::default()
        };

        // 3. Create the main Style struct.
        let style = Style {
            visuals,
            spacing,
            text_styles: CUSTOM_TEXT_STYLE.into(),
            ..Style::default()
        };

        // 4. Set the style on the egui Context.
        self.set_style(style);
    }
}

/// Trait for modal Notification windows (errors, load confirmations).
/// Allows `layout.rs` to manage different notification types polymorphically via `Box<dyn Notification>`.
pub trait Notification: Send + Sync + 'static {
    /// Renders the notification window using `egui::Window`.
    /// Called every frame by `layout.rs::check_notification` while the notification is active.
    ///
    /// ### Returns
    /// `true` if the window should remain open, `false` if closed.
    fn show(&mut self, ctx: &Context) -> bool;
}

/// Notification struct for displaying error messages. Implements `Notification`.
pub struct Error {
    /// The error message content. Set by the caller in `layout.rs`.
    pub message: String,
}

/// Notification struct for short confirmations ("File uploaded successfully!").
pub struct Info {
    pub title: String,
    pub message: String,
}

/// Draws a framed message window with the given colours.
///
/// ### Returns
/// `true` while the window stays open.
fn framed_window(ctx: &Context, title: &str, message: &str, fill: Color32, stroke: Color32) -> bool {
    let mut open = true;

    Window::new(title)
        .collapsible(false)
        .open(&mut open)
        .show(ctx, |ui| {
            let width_max = ui.available_width() * 0.80;
            ui.allocate_ui_with_layout(
                Vec2::new(width_max, ui.available_height()),
                Layout::top_down(Align::LEFT),
                |ui| {
                    Frame::default()
                        .fill(fill)
                        .stroke(Stroke::new(1.0, stroke))
                        .outer_margin(2.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.colored_label(Color32::BLACK, message);
                        });
                },
            );
        });

    open
}

impl Notification for Error {
    fn show(&mut self, ctx: &Context) -> bool {
        framed_window(
            ctx,
            "Error",
            &self.message,
            Color32::from_rgb(255, 200, 200), // Light red bg
            Color32::DARK_RED,
        )
    }
}

impl Notification for Info {
    fn show(&mut self, ctx: &Context) -> bool {
        framed_window(
            ctx,
            &self.title,
            &self.message,
            Color32::from_rgb(200, 240, 200), // Light green bg
            Color32::DARK_GREEN,
        )
    }
}

/// Small widgets shared by the dashboard tables.
pub trait DashboardWidgets {
    /// Renders a bold, theme-coloured table header label.
    fn table_header(&mut self, column_name: &str) -> Response;

    /// Renders a horizontal bar filled to `fraction` (clamped to `0..=1`) with `text` on it.
    ///
    /// Stands in for the bar and pie charts: one bar per category, region or segment.
    fn share_bar(&mut self, fraction: f32, text: String) -> Response;
}

impl DashboardWidgets for Ui {
    fn table_header(&mut self, column_name: &str) -> Response {
        let color = get_column_header_text_color(self.visuals());
        self.add(egui::Label::new(RichText::new(column_name).strong().color(color)).wrap())
    }

    fn share_bar(&mut self, fraction: f32, text: String) -> Response {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.add(ProgressBar::new(fraction).text(text))
    }
}

/// Helper: Determines header text color based on theme for contrast.
fn get_column_header_text_color(visuals: &Visuals) -> Color32 {
    if visuals.dark_mode {
        Color32::from_rgb(160, 200, 255) // Lighter blue for dark mode
    } else {
        Color32::from_rgb(0, 80, 160) // Darker blue for light mode
    }
}

/// Trait to extend `Path` with a convenient method for getting the lowercase file extension.
/// Used by `FileExtension::from_path`.
pub trait PathExtension {
    /// Returns the file extension as a lowercase `String`, or `None`.
    fn extension_as_lowercase(&self) -> Option<String>;
}

impl PathExtension for Path {
    /// Implementation for `Path`. Gets extension, converts to &str, then lowercases.
    ///
    /// ### Logic
    /// 1. Call `self.extension()` -> `Option<&OsStr>`.
    /// 2. Convert `OsStr` to `&str` via `to_str` -> `Option<&str>`.
    /// 3. Map `&str` to lowercase `String` -> `Option<String>`.
    fn extension_as_lowercase(&self) -> Option<String> {
        self.extension() // 1. Get OsStr extension.
            .and_then(OsStr::to_str) // 2. Try converting to &str.
            .map(str::to_lowercase) // 3. Convert to lowercase String if successful.
    }
}

/// A trait for deduplicating vectors while preserving the original order of elements.
/// Added to `Vec<T>`. Used by `filters.rs` to list the distinct values of a column.
pub trait UniqueElements<T> {
    /// Removes duplicate elements in place, keeping the first occurrence.
    fn unique(&mut self)
    where
        T: Eq + Hash + Clone;
}

impl<T> UniqueElements<T> for Vec<T> {
    /// Keeps an element only the first time `HashSet::insert` sees it.
    fn unique(&mut self)
    where
        T: Eq + Hash + Clone,
    {
        let mut seen = HashSet::new();
        self.retain(|x| seen.insert(x.clone()));
    }
}

// --- Unit Tests ---


/// Run tests with:
/// `cargo test -- --show-output tests_unique`
#[cfg(test)]
mod tests_unique {
    use super::*;

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let mut regions = vec!["South", "West", "South", "Central", "East", "West"];
        regions.unique();
        assert_eq!(regions, vec!["South", "West", "Central", "East"]);
    }

    #[test]
    fn test_unique_empty() {
        let mut vec: Vec<String> = vec![];
        vec.unique();
        assert!(vec.is_empty());
    }
}
