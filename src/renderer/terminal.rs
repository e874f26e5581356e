//! Terminal renderer for the numpad overlay.
//!
//! Draws a [`DisplayModel`] into the panel described by a [`KeypadLayout`]:
//! a box border, the trace row, the operand row and the twenty buttons.
//! Output is queued with crossterm and flushed once per draw.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::display::DisplayModel;
use crate::layout::{ButtonRect, CellRect, KeypadLayout};
use crate::types::ActionKey;

pub struct TerminalRenderer {
    decimal_separator: char,
}

impl TerminalRenderer {
    pub fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    /// Draw the overlay and flush.
    pub fn draw<W: Write>(&self, out: &mut W, model: &DisplayModel, keypad: &KeypadLayout) -> io::Result<()> {
        draw_border(out, keypad.panel())?;

        let display = keypad.display();
        let width = usize::from(display.width);
        queue!(
            out,
            MoveTo(display.x, display.y),
            SetAttribute(Attribute::Dim),
            Print(right_align(&model.trace, width)),
            SetAttribute(Attribute::Reset),
            MoveTo(display.x, display.y + 1),
            SetAttribute(Attribute::Bold),
            Print(right_align(&model.operand, width)),
            SetAttribute(Attribute::Reset),
        )?;

        // Spacer between display and keypad
        if display.bottom() < keypad.panel().bottom().saturating_sub(1) {
            queue!(out, MoveTo(display.x, display.bottom()), Print(" ".repeat(width)))?;
        }

        for button in keypad.buttons() {
            let highlight = button.key == ActionKey::Commit && model.ready;
            self.draw_button(out, button, highlight)?;
        }

        out.flush()
    }

    fn draw_button<W: Write>(&self, out: &mut W, button: &ButtonRect, highlight: bool) -> io::Result<()> {
        let rect = button.rect;
        let label = button.key.label(self.decimal_separator);
        let (_, label_row) = button.center();

        if highlight {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        for row in rect.y..rect.bottom() {
            let text = if row == label_row {
                center(&label, usize::from(rect.width))
            } else {
                " ".repeat(usize::from(rect.width))
            };
            queue!(out, MoveTo(rect.x, row), Print(text))?;
        }
        if highlight {
            queue!(out, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    /// Switch to the alternate screen and hide the cursor.
    pub fn enter_fullscreen<W: Write>(out: &mut W) -> io::Result<()> {
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))
    }

    /// Restore the main screen.
    pub fn exit_fullscreen<W: Write>(out: &mut W) -> io::Result<()> {
        execute!(out, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen)
    }
}

fn draw_border<W: Write>(out: &mut W, panel: CellRect) -> io::Result<()> {
    if panel.width < 2 || panel.height < 2 {
        return Ok(());
    }
    let inner = usize::from(panel.width - 2);
    let horizontal = "─".repeat(inner);

    queue!(out, MoveTo(panel.x, panel.y), Print(format!("┌{horizontal}┐")))?;
    for row in panel.y + 1..panel.bottom() - 1 {
        queue!(
            out,
            MoveTo(panel.x, row),
            Print('│'),
            MoveTo(panel.right() - 1, row),
            Print('│'),
        )?;
    }
    queue!(out, MoveTo(panel.x, panel.bottom() - 1), Print(format!("└{horizontal}┘")))
}

/// Right-align `text` in `width` cells, keeping the tail when it overflows.
fn right_align(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().skip(len - width).collect()
    } else {
        format!("{}{text}", " ".repeat(width - len))
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(width - len - left))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_keypad_layout;
    use crate::types::ElementId;

    fn model(trace: &str, operand: &str, ready: bool) -> DisplayModel {
        DisplayModel {
            field: ElementId(1),
            trace: trace.to_string(),
            operand: operand.to_string(),
            ready,
        }
    }

    fn render(model: &DisplayModel) -> String {
        let keypad = compute_keypad_layout(0, 0, 29, 15).unwrap();
        let mut out = Vec::new();
        TerminalRenderer::new(',').draw(&mut out, model, &keypad).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_right_align() {
        assert_eq!(right_align("12", 5), "   12");
        assert_eq!(right_align("123456", 4), "3456");
        assert_eq!(right_align("", 3), "   ");
    }

    #[test]
    fn test_center() {
        assert_eq!(center("7", 6), "  7   ");
        assert_eq!(center("BACK", 6), " BACK ");
        assert_eq!(center("toolong", 3), "too");
    }

    #[test]
    fn test_draw_contains_display_and_labels() {
        let output = render(&model("7 +", "3", false));
        assert!(output.contains("7 +"));
        assert!(output.contains("⌫"));
        assert!(output.contains("OK"));
        assert!(output.contains("÷"));
        assert!(output.contains('┌'));
        assert!(output.contains('┘'));
    }

    #[test]
    fn test_ready_highlights_commit() {
        let idle = render(&model("", "0", false));
        let ready = render(&model("", "5", true));
        let reverse = "\x1b[7m";
        assert!(!idle.contains(reverse));
        assert!(ready.contains(reverse));
    }
}
