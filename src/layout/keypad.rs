//! Keypad Layout - Flexbox placement of the overlay panel using Taffy.
//!
//! The panel is a column: a two-row display (trace over operand), a one-row
//! spacer, then five button rows of four buttons each. A one-cell border is
//! reserved as padding. Taffy computes positions relative to each parent;
//! they are accumulated into absolute terminal cells here.
//!
//! ```text
//! ┌───────────────────────────┐
//! │              7 + 3        │
//! │                  3        │
//! │                           │
//! │  C    BACK    %     ÷     │
//! │  7     8      9     ×     │
//! │  4     5      6     -     │
//! │  1     2      3     +     │
//! │  0     ,      =     OK    │
//! └───────────────────────────┘
//! ```

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, LengthPercentage, NodeId, Rect, Size,
    Style, TaffyError, TaffyTree,
};

use crate::error::{NumpadError, Result};
use crate::types::{ActionKey, NumpadKey, Operator};

// =============================================================================
// KEY GRID
// =============================================================================

const fn pad(key: NumpadKey) -> ActionKey {
    ActionKey::Keypad(key)
}

/// Button grid, row by row.
pub const KEYPAD_ROWS: [[ActionKey; 4]; 5] = [
    [
        pad(NumpadKey::Clear),
        pad(NumpadKey::Back),
        pad(NumpadKey::Percent),
        pad(NumpadKey::Operator(Operator::Divide)),
    ],
    [
        pad(NumpadKey::Digit(7)),
        pad(NumpadKey::Digit(8)),
        pad(NumpadKey::Digit(9)),
        pad(NumpadKey::Operator(Operator::Multiply)),
    ],
    [
        pad(NumpadKey::Digit(4)),
        pad(NumpadKey::Digit(5)),
        pad(NumpadKey::Digit(6)),
        pad(NumpadKey::Operator(Operator::Subtract)),
    ],
    [
        pad(NumpadKey::Digit(1)),
        pad(NumpadKey::Digit(2)),
        pad(NumpadKey::Digit(3)),
        pad(NumpadKey::Operator(Operator::Add)),
    ],
    [
        pad(NumpadKey::Digit(0)),
        pad(NumpadKey::Decimal),
        pad(NumpadKey::Equals),
        ActionKey::Commit,
    ],
];

const DISPLAY_ROWS: f32 = 2.0;

// =============================================================================
// TYPES
// =============================================================================

/// Rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        let (x, y) = (u32::from(x), u32::from(y));
        x >= u32::from(self.x)
            && x < u32::from(self.x) + u32::from(self.width)
            && y >= u32::from(self.y)
            && y < u32::from(self.y) + u32::from(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }
}

/// One placed button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRect {
    pub key: ActionKey,
    pub rect: CellRect,
}

impl ButtonRect {
    /// Cell in the middle of the button (where its label goes).
    pub fn center(&self) -> (u16, u16) {
        (
            self.rect.x + self.rect.width / 2,
            self.rect.y + self.rect.height / 2,
        )
    }
}

/// Computed overlay geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypadLayout {
    panel: CellRect,
    display: CellRect,
    buttons: Vec<ButtonRect>,
}

impl KeypadLayout {
    pub fn panel(&self) -> CellRect {
        self.panel
    }

    /// Trace row is `display.y`, operand row is `display.y + 1`.
    pub fn display(&self) -> CellRect {
        self.display
    }

    pub fn buttons(&self) -> &[ButtonRect] {
        &self.buttons
    }

    /// Whether a cell lies on the panel (border included).
    pub fn contains(&self, x: u16, y: u16) -> bool {
        self.panel.contains(x, y)
    }

    /// Key under a cell, if any.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<ActionKey> {
        self.buttons
            .iter()
            .find(|button| button.rect.contains(x, y))
            .map(|button| button.key)
    }
}

// =============================================================================
// STYLES
// =============================================================================

fn panel_style(width: u16, height: u16) -> Style {
    let border = LengthPercentage::Length(1.0);
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        size: Size {
            width: Dimension::Length(width as f32),
            height: Dimension::Length(height as f32),
        },
        padding: Rect { top: border, right: border, bottom: border, left: border },
        gap: Size {
            width: LengthPercentage::Length(0.0),
            height: LengthPercentage::Length(1.0),
        },
        ..Default::default()
    }
}

fn display_style() -> Style {
    Style {
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(DISPLAY_ROWS),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn grid_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        flex_grow: 1.0,
        flex_basis: Dimension::Length(0.0),
        ..Default::default()
    }
}

fn row_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        flex_grow: 1.0,
        flex_basis: Dimension::Length(0.0),
        gap: Size {
            width: LengthPercentage::Length(1.0),
            height: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    }
}

fn button_style() -> Style {
    Style {
        flex_grow: 1.0,
        flex_basis: Dimension::Length(0.0),
        ..Default::default()
    }
}

fn layout_error(err: TaffyError) -> NumpadError {
    NumpadError::Layout(err.to_string())
}

// =============================================================================
// COMPUTATION
// =============================================================================

/// Origin that centers a `width` x `height` panel in the terminal.
pub fn centered_origin(terminal_width: u16, terminal_height: u16, width: u16, height: u16) -> (u16, u16) {
    (
        terminal_width.saturating_sub(width) / 2,
        terminal_height.saturating_sub(height) / 2,
    )
}

/// Lay out the panel with its top-left corner at `(x, y)`.
pub fn compute_keypad_layout(x: u16, y: u16, width: u16, height: u16) -> Result<KeypadLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let mut rows: Vec<(NodeId, Vec<(ActionKey, NodeId)>)> = Vec::with_capacity(KEYPAD_ROWS.len());
    for keys in KEYPAD_ROWS.iter() {
        let mut cells = Vec::with_capacity(keys.len());
        for &key in keys {
            cells.push((key, tree.new_leaf(button_style()).map_err(layout_error)?));
        }
        let children: Vec<NodeId> = cells.iter().map(|&(_, node)| node).collect();
        let row = tree
            .new_with_children(row_style(), &children)
            .map_err(layout_error)?;
        rows.push((row, cells));
    }

    let row_nodes: Vec<NodeId> = rows.iter().map(|(row, _)| *row).collect();
    let grid = tree
        .new_with_children(grid_style(), &row_nodes)
        .map_err(layout_error)?;
    let display = tree.new_leaf(display_style()).map_err(layout_error)?;
    let panel = tree
        .new_with_children(panel_style(width, height), &[display, grid])
        .map_err(layout_error)?;

    tree.compute_layout(
        panel,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::Definite(height as f32),
        },
    )
    .map_err(layout_error)?;

    let place = |node: NodeId, origin: (f32, f32)| -> Result<(CellRect, (f32, f32))> {
        let layout = tree.layout(node).map_err(layout_error)?;
        let left = origin.0 + layout.location.x;
        let top = origin.1 + layout.location.y;
        let rect = CellRect {
            x: left.round() as u16,
            y: top.round() as u16,
            width: ((left + layout.size.width).round() - left.round()) as u16,
            height: ((top + layout.size.height).round() - top.round()) as u16,
        };
        Ok((rect, (left, top)))
    };

    let origin = (x as f32, y as f32);
    let (panel_rect, panel_origin) = place(panel, origin)?;
    let (display_rect, _) = place(display, panel_origin)?;
    let (_, grid_origin) = place(grid, panel_origin)?;

    let mut buttons = Vec::with_capacity(KEYPAD_ROWS.len() * 4);
    for (row, cells) in &rows {
        let (_, row_origin) = place(*row, grid_origin)?;
        for &(key, node) in cells {
            let (rect, _) = place(node, row_origin)?;
            buttons.push(ButtonRect { key, rect });
        }
    }

    Ok(KeypadLayout {
        panel: panel_rect,
        display: display_rect,
        buttons,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> KeypadLayout {
        compute_keypad_layout(0, 0, 29, 15).unwrap()
    }

    fn button(layout: &KeypadLayout, key: ActionKey) -> ButtonRect {
        *layout.buttons().iter().find(|b| b.key == key).unwrap()
    }

    #[test]
    fn test_panel_and_display() {
        let layout = setup();
        assert_eq!(layout.panel(), CellRect { x: 0, y: 0, width: 29, height: 15 });
        assert_eq!(layout.display(), CellRect { x: 1, y: 1, width: 27, height: 2 });
    }

    #[test]
    fn test_twenty_buttons_in_grid_order() {
        let layout = setup();
        assert_eq!(layout.buttons().len(), 20);
        let keys: Vec<ActionKey> = layout.buttons().iter().map(|b| b.key).collect();
        let expected: Vec<ActionKey> = KEYPAD_ROWS.iter().flatten().copied().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_button_geometry() {
        let layout = setup();
        let clear = button(&layout, pad(NumpadKey::Clear));
        assert_eq!(clear.rect, CellRect { x: 1, y: 4, width: 6, height: 2 });

        let ok = button(&layout, ActionKey::Commit);
        assert_eq!(ok.rect, CellRect { x: 22, y: 12, width: 6, height: 2 });
        assert_eq!(ok.rect.right(), 28);
        assert_eq!(ok.rect.bottom(), 14);
    }

    #[test]
    fn test_hit_test() {
        let layout = setup();
        assert_eq!(layout.hit_test(1, 4), Some(pad(NumpadKey::Clear)));
        assert_eq!(layout.hit_test(9, 7), Some(pad(NumpadKey::Digit(8))));
        assert_eq!(layout.hit_test(27, 13), Some(ActionKey::Commit));
        // Gap column between the first and second button
        assert_eq!(layout.hit_test(7, 4), None);
        // Border and display
        assert_eq!(layout.hit_test(0, 0), None);
        assert_eq!(layout.hit_test(5, 1), None);
        assert!(layout.contains(0, 0));
        assert!(!layout.contains(29, 0));
    }

    #[test]
    fn test_offset_origin() {
        let layout = compute_keypad_layout(10, 3, 29, 15).unwrap();
        let seven = button(&layout, pad(NumpadKey::Digit(7)));
        assert_eq!(seven.rect, CellRect { x: 11, y: 9, width: 6, height: 2 });
        assert_eq!(seven.center(), (14, 10));
        assert_eq!(layout.hit_test(14, 10), Some(seven.key));
    }

    #[test]
    fn test_centered_origin() {
        assert_eq!(centered_origin(80, 24, 29, 15), (25, 4));
        assert_eq!(centered_origin(20, 10, 29, 15), (0, 0));
    }
}
