use super::text::{Font, text_ops, text_width, truncate_to_width};
use lopdf::content::Operation;

pub(crate) const ROW_HEIGHT: f32 = 18.0;
const FONT_SIZE: f32 = 10.0;
const PADDING: f32 = 6.0;
const LABEL_SHARE: f32 = 0.7;
const HEADER_GRAY: f32 = 0.85;
const GRID_WIDTH: f32 = 0.5;

/// A two-column table: a text label and a right-aligned value.
///
/// Styling is fixed: shaded bold header row, full grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: (String, String),
    pub rows: Vec<(String, String)>,
}

impl Table {
    pub fn new(label_header: impl Into<String>, value_header: impl Into<String>) -> Self {
        Self {
            header: (label_header.into(), value_header.into()),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.rows.push((label.into(), value.into()));
    }

    pub fn with_rows<L, V>(mut self, rows: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        for (label, value) in rows {
            self.push_row(label, value);
        }
        self
    }
}

/// Operations for one table row whose top edge is at `y_top`
pub(crate) fn row_ops(
    label: &str,
    value: &str,
    x: f32,
    y_top: f32,
    width: f32,
    header: bool,
) -> Vec<Operation> {
    let label_width = width * LABEL_SHARE;
    let value_width = width - label_width;
    let y_bottom = y_top - ROW_HEIGHT;
    let baseline = y_bottom + (ROW_HEIGHT - FONT_SIZE) / 2.0 + 2.0;
    let font = if header { Font::Bold } else { Font::Regular };

    let mut ops = Vec::new();

    if header {
        ops.extend([
            Operation::new("q", vec![]),
            Operation::new("g", vec![HEADER_GRAY.into()]),
            Operation::new(
                "re",
                vec![x.into(), y_bottom.into(), width.into(), ROW_HEIGHT.into()],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    ops.extend([
        Operation::new("q", vec![]),
        Operation::new("w", vec![GRID_WIDTH.into()]),
        Operation::new("G", vec![0.into()]),
        Operation::new(
            "re",
            vec![x.into(), y_bottom.into(), label_width.into(), ROW_HEIGHT.into()],
        ),
        Operation::new(
            "re",
            vec![
                (x + label_width).into(),
                y_bottom.into(),
                value_width.into(),
                ROW_HEIGHT.into(),
            ],
        ),
        Operation::new("S", vec![]),
        Operation::new("Q", vec![]),
    ]);

    let label = truncate_to_width(label, font, FONT_SIZE, label_width - 2.0 * PADDING);
    ops.extend(text_ops(&label, font, FONT_SIZE, x + PADDING, baseline));

    let value = truncate_to_width(value, font, FONT_SIZE, value_width - 2.0 * PADDING);
    let value_x = x + width - PADDING - text_width(&value, font, FONT_SIZE);
    ops.extend(text_ops(&value, font, FONT_SIZE, value_x, baseline));

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_rows() {
        let table = Table::new("Title", "Count").with_rows([("Vase", "3"), ("Bowl", "1")]);
        assert_eq!(table.header, ("Title".to_string(), "Count".to_string()));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], ("Bowl".to_string(), "1".to_string()));
    }

    #[test]
    fn test_header_row_is_shaded_and_bold() {
        let ops = row_ops("Title", "Count", 50.0, 700.0, 400.0, true);
        assert!(ops.iter().any(|op| op.operator == "f"));
        assert!(
            ops.iter()
                .any(|op| op.operator == "Tf" && op.operands[0].as_name().ok() == Some(&b"F2"[..]))
        );
    }

    #[test]
    fn test_body_row_has_grid_but_no_fill() {
        let ops = row_ops("Vase", "3", 50.0, 700.0, 400.0, false);
        assert!(!ops.iter().any(|op| op.operator == "f"));
        assert_eq!(ops.iter().filter(|op| op.operator == "re").count(), 2);
        assert!(ops.iter().any(|op| op.operator == "S"));
    }

    #[test]
    fn test_value_is_right_aligned() {
        let ops = row_ops("Vase", "3", 50.0, 700.0, 400.0, false);
        let positions: Vec<f32> = ops
            .iter()
            .filter(|op| op.operator == "Td")
            .map(|op| op.operands[0].as_float().unwrap())
            .collect();

        // label starts after the padding; value ends at the right padding
        assert_eq!(positions[0], 56.0);
        let expected = 50.0 + 400.0 - 6.0 - text_width("3", Font::Regular, 10.0);
        assert!((positions[1] - expected).abs() < 0.001);
    }
}
