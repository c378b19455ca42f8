use gpui::*;

#[derive(Clone, Debug)]
pub struct ChartTheme {
    pub background: Hsla,
    pub grid_line: Hsla,
    pub axis_line: Hsla,
    pub axis_label: Hsla,
    pub axis_label_size: Pixels,
    /// Categorical colors, cycled by series index.
    pub palette: Vec<Hsla>,
    pub link: Hsla,
    pub highlight: Hsla,
}

impl ChartTheme {
    pub fn series_color(&self, index: usize) -> Hsla {
        if self.palette.is_empty() {
            return self.highlight;
        }
        self.palette[index % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: gpui::black(),
            grid_line: gpui::white().alpha(0.1),
            axis_line: gpui::white().alpha(0.2),
            axis_label: gpui::white().alpha(0.8),
            axis_label_size: px(11.0),
            palette: vec![
                hsla(141.0 / 360.0, 0.73, 0.42, 1.0),
                hsla(206.0 / 360.0, 0.70, 0.50, 1.0),
                hsla(28.0 / 360.0, 0.85, 0.55, 1.0),
                hsla(340.0 / 360.0, 0.70, 0.55, 1.0),
                hsla(268.0 / 360.0, 0.55, 0.60, 1.0),
                hsla(52.0 / 360.0, 0.80, 0.50, 1.0),
            ],
            link: gpui::white().alpha(0.25),
            highlight: gpui::white(),
        }
    }
}
