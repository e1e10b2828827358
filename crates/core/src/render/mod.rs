use std::fmt::Write as _;

/// Formats sequence snapshots as a textual bar chart.
///
/// Each value becomes one row: a run of filled blocks scaled against the
/// configured maximum, followed by the numeric value (the classic
/// visualiser labels every bar with its magnitude).
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    width: usize,
    max_value: u32,
}

impl FrameRenderer {
    /// Creates a renderer scaling bars to at most `width` cells against
    /// `max_value`. Both are raised to at least one to keep the scaling
    /// well-defined.
    pub fn new(width: usize, max_value: u32) -> Self {
        Self {
            width: width.max(1),
            max_value: max_value.max(1),
        }
    }

    /// Renders one frame for the given snapshot.
    pub fn frame(&self, values: &[u32]) -> String {
        let mut out = String::new();
        for &value in values {
            let filled = self.scale(value);
            let bar = "█".repeat(filled);
            let _ = writeln!(out, "{bar:<width$} {value}", width = self.width);
        }
        out
    }

    fn scale(&self, value: u32) -> usize {
        let cells = u64::from(value) * self.width as u64 / u64::from(self.max_value);
        (cells as usize).min(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_labelled_row_per_value() {
        let renderer = FrameRenderer::new(4, 4);
        let frame = renderer.frame(&[4, 2, 0]);
        assert_eq!(frame, "████ 4\n██   2\n     0\n");
    }

    #[test]
    fn bars_cap_at_the_configured_width() {
        let renderer = FrameRenderer::new(8, 10);
        let frame = renderer.frame(&[250]);
        let row = frame.lines().next().unwrap();
        assert!(row.starts_with(&"█".repeat(8)));
        assert!(row.ends_with("250"));
    }

    #[test]
    fn empty_snapshot_renders_an_empty_frame() {
        let renderer = FrameRenderer::new(10, 250);
        assert!(renderer.frame(&[]).is_empty());
    }

    #[test]
    fn degenerate_dimensions_are_raised_to_one() {
        let renderer = FrameRenderer::new(0, 0);
        let frame = renderer.frame(&[1]);
        assert_eq!(frame, "█ 1\n");
    }
}
