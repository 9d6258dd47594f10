//! Frame of draw commands

use glam::Vec2;

use super::palette::Color;

/// A single primitive for the external rasterizer (pixel space)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Axis-aligned rectangle; `outline` draws only the border
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
        outline: bool,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    /// Text anchored at `pos` (center when `centered`, top-left otherwise)
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        centered: bool,
    },
}

/// Ordered draw commands for one frame (painter's order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            pos,
            size,
            color,
            outline: false,
        });
    }

    pub fn rect_outline(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            pos,
            size,
            color,
            outline: true,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
            size,
            color,
            centered: false,
        });
    }

    pub fn text_centered(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
            size,
            color,
            centered: true,
        });
    }

    /// Horizontal bar filled to `ratio` (health bars)
    pub fn bar(&mut self, pos: Vec2, size: Vec2, ratio: f32, back: Color, fill: Color) {
        self.rect(pos, size, back);
        let ratio = ratio.clamp(0.0, 1.0);
        if ratio > 0.0 {
            self.rect(pos, Vec2::new(size.x * ratio, size.y), fill);
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text strings in draw order (handy for HUD assertions)
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_skips_empty_fill() {
        let mut frame = Frame::new();
        frame.bar(Vec2::ZERO, Vec2::new(30.0, 5.0), 0.0, Color::NeonRed, Color::NeonGreen);
        assert_eq!(frame.len(), 1);

        frame.bar(Vec2::ZERO, Vec2::new(30.0, 5.0), 0.5, Color::NeonRed, Color::NeonGreen);
        assert_eq!(frame.len(), 3);
        assert_eq!(
            frame.commands[2],
            DrawCommand::Rect {
                pos: Vec2::ZERO,
                size: Vec2::new(15.0, 5.0),
                color: Color::NeonGreen,
                outline: false,
            }
        );
    }

    #[test]
    fn test_texts_in_draw_order() {
        let mut frame = Frame::new();
        frame.text("under", Vec2::ZERO, 12.0, Color::White);
        frame.line(Vec2::ZERO, Vec2::ONE, 1.0, Color::White);
        frame.text_centered("over", Vec2::ZERO, 12.0, Color::White);

        let texts: Vec<_> = frame.texts().collect();
        assert_eq!(texts, vec!["under", "over"]);
        assert!(frame.contains_text("ove"));
    }
}
