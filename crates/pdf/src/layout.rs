//! Vertical-flow page layout.
//!
//! Blocks are placed top to bottom inside the page margins. Text wraps on
//! word boundaries using Helvetica metrics, and a block that does not fit
//! moves to a new page. Tables repeat their header row after a break.

// ---------------------------------------------------------------------------
// Page geometry
// ---------------------------------------------------------------------------

/// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 36.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const LINE_SPACING: f32 = 1.4;
const CELL_PADDING: f32 = 4.0;

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// Advance widths (1/1000 em) for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn glyph_width(ch: char, font: Font) -> u16 {
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    match ch {
        ' '..='~' => table[ch as usize - 0x20],
        '\u{2014}' => 1000,
        '\u{2022}' => 350,
        _ => 556,
    }
}

/// Rendered width of `text` in points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, font))).sum();
    units as f32 * size / 1000.0
}

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines are kept. A single word wider than the line is split
/// between characters.
pub fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, font, size) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for ch in word.chars() {
                line.push(ch);
                if line.chars().count() > 1 && text_width(&line, font, size) > max_width {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, ch.to_string()));
                }
            }
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    Normal,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub tone: Tone,
}

impl TextStyle {
    pub const BODY: Self = Self {
        font: Font::Regular,
        size: 11.0,
        tone: Tone::Normal,
    };
    pub const MUTED: Self = Self {
        font: Font::Regular,
        size: 11.0,
        tone: Tone::Muted,
    };
    pub const STRONG: Self = Self {
        font: Font::Bold,
        size: 11.0,
        tone: Tone::Normal,
    };
    pub const HEADING: Self = Self {
        font: Font::Bold,
        size: 12.0,
        tone: Tone::Normal,
    };
    pub const TITLE: Self = Self {
        font: Font::Bold,
        size: 18.0,
        tone: Tone::Normal,
    };

    fn line_height(&self) -> f32 {
        self.size * LINE_SPACING
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: &'static str,
    /// Relative share of the content width.
    pub weight: f32,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

/// One unit of vertical flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Wrapped text.
    Text { text: String, style: TextStyle },
    /// A label on the left and a right-aligned value on the same line.
    Row {
        label: String,
        value: String,
        style: TextStyle,
    },
    Table(Table),
    /// Full-width horizontal rule.
    Rule,
    /// Vertical gap, dropped at the top of a page.
    Space(f32),
}

impl Block {
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        Self::Text {
            text: text.into(),
            style,
        }
    }

    pub fn row(label: impl Into<String>, value: impl Into<String>, style: TextStyle) -> Self {
        Self::Row {
            label: label.into(),
            value: value.into(),
            style,
        }
    }
}

// ---------------------------------------------------------------------------
// Placed output
// ---------------------------------------------------------------------------

/// Something drawn at absolute page coordinates (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f32,
        /// Baseline.
        y: f32,
        text: String,
        font: Font,
        size: f32,
        tone: Tone,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

impl Page {
    /// All text on the page in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text { text, .. } => Some(text.as_str()),
            Mark::Line { .. } => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

struct Flow {
    pages: Vec<Page>,
    /// Top of the remaining space on the current page.
    cursor: f32,
}

impl Flow {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn at_top(&self) -> bool {
        self.cursor >= PAGE_HEIGHT - MARGIN
    }

    /// Start a new page unless `height` still fits. Returns `true` if a
    /// break happened. Content taller than a whole page is placed anyway.
    fn reserve(&mut self, height: f32) -> bool {
        if self.cursor - height >= MARGIN || self.at_top() {
            return false;
        }
        self.pages.push(Page::default());
        self.cursor = PAGE_HEIGHT - MARGIN;
        true
    }

    fn text(&mut self, x: f32, top: f32, text: String, style: TextStyle) {
        self.page().marks.push(Mark::Text {
            x,
            y: top - style.size,
            text,
            font: style.font,
            size: style.size,
            tone: style.tone,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.page().marks.push(Mark::Line { from, to });
    }

    fn place(&mut self, block: &Block) {
        match block {
            Block::Text { text, style } => {
                for line in wrap(text, style.font, style.size, CONTENT_WIDTH) {
                    self.reserve(style.line_height());
                    self.text(MARGIN, self.cursor, line, *style);
                    self.cursor -= style.line_height();
                }
            }
            Block::Row {
                label,
                value,
                style,
            } => {
                let value_width = text_width(value, style.font, style.size);
                let label_width = (CONTENT_WIDTH - value_width - 12.0).max(CONTENT_WIDTH / 2.0);
                let lines = wrap(label, style.font, style.size, label_width);
                self.reserve(style.line_height() * lines.len() as f32);
                self.text(
                    MARGIN + CONTENT_WIDTH - value_width,
                    self.cursor,
                    value.clone(),
                    *style,
                );
                for line in lines {
                    self.text(MARGIN, self.cursor, line, *style);
                    self.cursor -= style.line_height();
                }
            }
            Block::Table(table) => self.table(table),
            Block::Rule => {
                self.reserve(8.0);
                let y = self.cursor - 4.0;
                self.line((MARGIN, y), (MARGIN + CONTENT_WIDTH, y));
                self.cursor -= 8.0;
            }
            Block::Space(height) => {
                if !self.at_top() {
                    self.cursor -= height;
                }
            }
        }
    }

    fn table(&mut self, table: &Table) {
        let total_weight: f32 = table.columns.iter().map(|c| c.weight).sum();
        let widths: Vec<f32> = table
            .columns
            .iter()
            .map(|c| CONTENT_WIDTH * c.weight / total_weight)
            .collect();
        let header: Vec<String> = table.columns.iter().map(|c| c.title.to_string()).collect();

        self.table_row(table, &widths, &header, true);
        for row in &table.rows {
            let height = row_height(&widths, row, CELL_STYLE);
            if self.reserve(height) {
                self.table_row(table, &widths, &header, true);
            }
            self.table_row(table, &widths, row, false);
        }
    }

    fn table_row(&mut self, table: &Table, widths: &[f32], cells: &[String], header: bool) {
        let style = if header {
            TextStyle {
                font: Font::Bold,
                ..CELL_STYLE
            }
        } else {
            CELL_STYLE
        };
        let height = row_height(widths, cells, style);
        self.reserve(height);

        let top = self.cursor;
        let bottom = top - height;
        let right = MARGIN + CONTENT_WIDTH;
        self.line((MARGIN, top), (right, top));
        self.line((MARGIN, bottom), (right, bottom));

        let mut x = MARGIN;
        for (i, width) in widths.iter().enumerate() {
            self.line((x, top), (x, bottom));
            let align = table.columns.get(i).map_or(Align::Left, |c| c.align);
            let text = cells.get(i).map(String::as_str).unwrap_or_default();
            let mut line_top = top - CELL_PADDING;
            for line in wrap(text, style.font, style.size, width - 2.0 * CELL_PADDING) {
                let line_x = match align {
                    Align::Left => x + CELL_PADDING,
                    Align::Right => x + width - CELL_PADDING - text_width(&line, style.font, style.size),
                };
                self.text(line_x, line_top, line, style);
                line_top -= style.line_height();
            }
            x += width;
        }
        self.line((right, top), (right, bottom));
        self.cursor = bottom;
    }
}

const CELL_STYLE: TextStyle = TextStyle {
    font: Font::Regular,
    size: 10.0,
    tone: Tone::Normal,
};

fn row_height(widths: &[f32], cells: &[String], style: TextStyle) -> f32 {
    let lines = widths
        .iter()
        .zip(cells)
        .map(|(w, text)| wrap(text, style.font, style.size, w - 2.0 * CELL_PADDING).len())
        .max()
        .unwrap_or(1);
    lines as f32 * style.line_height() + 2.0 * CELL_PADDING
}

/// Flow `blocks` onto as many pages as needed. Always yields at least
/// one page.
pub fn paginate(blocks: &[Block]) -> Vec<Page> {
    let mut flow = Flow::new();
    for block in blocks {
        flow.place(block);
    }
    flow.pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_helvetica() {
        // "Hi" = H(722) + i(222)
        assert!((text_width("Hi", Font::Regular, 10.0) - 9.44).abs() < 1e-4);
        assert!(text_width("Hi", Font::Bold, 10.0) > text_width("Hi", Font::Regular, 10.0));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta", Font::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Regular, 10.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(
            wrap("one\ntwo", Font::Regular, 11.0, CONTENT_WIDTH),
            vec!["one", "two"]
        );
    }

    #[test]
    fn splits_overlong_words() {
        let lines = wrap(&"W".repeat(40), Font::Regular, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "W".repeat(40));
    }

    #[test]
    fn long_text_breaks_pages() {
        let blocks: Vec<Block> = (0..120)
            .map(|i| Block::text(format!("Line {i}"), TextStyle::BODY))
            .collect();
        let pages = paginate(&blocks);
        assert!(pages.len() >= 3);
        for page in &pages {
            for mark in &page.marks {
                if let Mark::Text { y, .. } = mark {
                    assert!(*y >= MARGIN - 1.0);
                }
            }
        }
    }

    #[test]
    fn table_header_repeats_after_break() {
        let table = Table {
            columns: vec![
                Column {
                    title: "Description",
                    weight: 3.0,
                    align: Align::Left,
                },
                Column {
                    title: "Total",
                    weight: 1.0,
                    align: Align::Right,
                },
            ],
            rows: (0..80)
                .map(|i| vec![format!("Item {i}"), "$1.00".to_string()])
                .collect(),
        };
        let pages = paginate(&[Block::Table(table)]);
        assert!(pages.len() >= 2);
        for page in &pages {
            assert_eq!(page.texts().next(), Some("Description"));
        }
    }

    #[test]
    fn space_is_dropped_at_page_top() {
        let pages = paginate(&[Block::Space(100.0), Block::text("x", TextStyle::BODY)]);
        let Mark::Text { y, .. } = &pages[0].marks[0] else {
            panic!("expected text");
        };
        assert_eq!(*y, PAGE_HEIGHT - MARGIN - 11.0);
    }
}
