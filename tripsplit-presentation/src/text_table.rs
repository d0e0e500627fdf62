use std::{borrow::Cow, fmt::Write};

const CELL_PADDING: usize = 1;
const COLUMN_SEPARATOR: char = '│';
const RULE: char = '─';
const RULE_CROSS: char = '┼';

#[derive(Default)]
pub struct TextTableBuilder<'a, Seq> {
    headers: &'a [Cow<'a, str>],
    rows: Vec<Seq>,
    alignments: Cow<'a, [Alignment]>,
}

#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl<'a, Seq> TextTableBuilder<'a, Seq>
where
    Seq: AsRef<[Cow<'a, str>]> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alignments(mut self, alignments: &'a [Alignment]) -> Self {
        self.alignments = Cow::Borrowed(alignments);
        self
    }

    pub fn headers(mut self, headers: &'a [Cow<'a, str>]) -> Self {
        self.headers = headers;
        if self.alignments.is_empty() {
            self.alignments = Cow::Owned(vec![Alignment::default(); self.headers.len()]);
        }
        self
    }

    pub fn row(mut self, row: Seq) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Seq>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn build(self) -> String {
        let col_count = self.headers.len();
        if col_count == 0 {
            return String::new();
        }

        let mut col_widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.as_ref().iter().enumerate().take(col_count) {
                col_widths[i] = col_widths[i].max(display_width(cell));
            }
        }

        let mut out = String::with_capacity(256);
        self.write_line(&mut out, self.headers, &col_widths);

        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                out.push(RULE_CROSS);
            }
            out.extend(std::iter::repeat_n(RULE, width + CELL_PADDING * 2));
        }
        out.push('\n');

        for row in &self.rows {
            self.write_line(&mut out, row.as_ref(), &col_widths);
        }
        out
    }

    fn write_line(&self, out: &mut String, cells: &[Cow<'_, str>], col_widths: &[usize]) {
        for (i, width) in col_widths.iter().enumerate() {
            if i > 0 {
                out.push(COLUMN_SEPARATOR);
            }
            let cell = cells.get(i).map_or("", |c| &**c);
            let alignment = self.alignments.get(i).copied().unwrap_or_default();
            let (left, right) = padding(*width - display_width(cell), alignment);
            let _ = write!(
                out,
                "{:left$}{cell}{:right$}",
                "",
                "",
                left = left + CELL_PADDING,
                right = right + CELL_PADDING
            );
        }
        // No trailing whitespace.
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
}

/// Terminal columns taken by `text`; non-ASCII characters count double.
fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn padding(slack: usize, alignment: Alignment) -> (usize, usize) {
    match alignment {
        Alignment::Left => (0, slack),
        Alignment::Center => (slack / 2, slack - slack / 2),
        Alignment::Right => (slack, 0),
    }
}
