use std::mem;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use super::report_rows;
use crate::AnalysisResult;
use crate::chart::{ChartData, TOP_N};
use crate::error::{AnalysisError, Result};

// US letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const TOP: f32 = 750.0;
const BOTTOM: f32 = 50.0;
const LEFT: f32 = 50.0;
const LINE: f32 = 20.0;
const CHART_WIDTH: f32 = 400.0;
const CHART_HEIGHT: f32 = 150.0;

const COLORS: [(f32, f32, f32); 3] = [(0.12, 0.47, 0.71), (1.0, 0.5, 0.05), (0.17, 0.63, 0.17)];

/// The base Helvetica font is used without an embedded encoding, so only
/// printable ASCII survives; anything else is shown as `?`.
fn pdf_text(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if (' '..='~').contains(&c) { c as u8 } else { b'?' })
        .collect()
}

/// Content streams, one per page, filled top to bottom.
struct PageFlow {
    done: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl PageFlow {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Vec::new(),
            y: TOP,
        }
    }

    fn reserve(&mut self, height: f32) {
        if self.y - height < BOTTOM && !self.current.is_empty() {
            self.done.push(mem::take(&mut self.current));
            self.y = TOP;
        }
    }

    fn text_at(&mut self, x: f32, y: f32, size: f32, s: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(pdf_text(s))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// One line of text at the cursor, then move down by `advance`.
    fn line(&mut self, size: f32, s: &str, advance: f32) {
        self.reserve(advance);
        let y = self.y;
        self.text_at(LEFT, y, size, s);
        self.y -= advance;
    }

    fn fill_color(&mut self, (r, g, b): (f32, f32, f32)) {
        self.current
            .push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.current.extend([
            Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]),
            Operation::new("f", vec![]),
        ]);
    }

    fn polygon(&mut self, points: &[(f32, f32)]) {
        let Some(((x0, y0), rest)) = points.split_first() else {
            return;
        };
        self.current
            .push(Operation::new("m", vec![(*x0).into(), (*y0).into()]));
        for (x, y) in rest {
            self.current
                .push(Operation::new("l", vec![(*x).into(), (*y).into()]));
        }
        self.current.extend([Operation::new("h", vec![]), Operation::new("f", vec![])]);
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.done.is_empty() {
            self.done.push(self.current);
        }
        self.done
    }
}

/// Draws bars on the left half and the pie on the right half of a
/// `CHART_WIDTH` x `CHART_HEIGHT` box whose lower-left corner is `(x, y)`.
fn draw_chart(flow: &mut PageFlow, data: &ChartData, x: f32, y: f32) {
    let bar_area = CHART_WIDTH * 0.55;
    let label_width = 60.0;
    flow.fill_color((0.0, 0.0, 0.0));
    flow.text_at(x, y + CHART_HEIGHT + 4.0, 9.0, data.title);
    flow.text_at(x + bar_area + 20.0, y + CHART_HEIGHT + 4.0, 9.0, data.pie_title);

    let max = data.bars.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1) as f32;
    let slot = CHART_HEIGHT / data.bars.len().max(1) as f32;
    for (i, (word, count)) in data.bars.iter().enumerate() {
        let top = y + CHART_HEIGHT - i as f32 * slot;
        let w = (bar_area - label_width) * *count as f32 / max;
        flow.fill_color((0.0, 0.0, 0.0));
        flow.text_at(x, top - slot * 0.7, 7.0, word);
        flow.fill_color(COLORS[0]);
        flow.rect(x + label_width, top - slot * 0.9, w, slot * 0.8);
    }

    let radius = CHART_HEIGHT * 0.4;
    let (cx, cy) = (x + bar_area + 20.0 + radius, y + CHART_HEIGHT / 2.0);
    let mut start = 0.0_f64;
    for (i, (slice, f)) in data.slices.iter().zip(data.fractions()).enumerate() {
        if f <= 0.0 {
            continue;
        }
        let sweep = f * std::f64::consts::TAU;
        let steps = ((sweep / 0.05).ceil() as usize).max(1);
        let mut points = vec![(cx, cy)];
        for s in 0..=steps {
            let a = start + sweep * s as f64 / steps as f64;
            let (px, py) = (
                cx as f64 + radius as f64 * a.cos(),
                cy as f64 + radius as f64 * a.sin(),
            );
            points.push((px as f32, py as f32));
        }
        flow.fill_color(COLORS[i % COLORS.len()]);
        flow.polygon(&points);
        flow.fill_color((0.0, 0.0, 0.0));
        let legend_y = y + CHART_HEIGHT - 12.0 * (i as f32 + 1.0);
        flow.text_at(
            cx + radius + 10.0,
            legend_y,
            7.0,
            &format!("{} {:.1}%", slice.label, f * 100.0),
        );
        start += sweep;
    }
}

fn layout(result: &AnalysisResult, chart: Option<&ChartData>) -> Vec<Vec<Operation>> {
    let mut flow = PageFlow::new();
    flow.line(16.0, "Text Analysis Report", 30.0);
    for (item, value) in report_rows(result) {
        flow.line(12.0, &format!("{item}: {value}"), LINE);
    }

    if let Some(data) = chart {
        // image box sits 200pt below the cursor, 150pt tall
        flow.reserve(200.0);
        let bottom = flow.y - 200.0;
        draw_chart(&mut flow, data, LEFT, bottom);
        flow.y = bottom - LINE;
    }

    if !result.sentiment.keywords.is_empty() {
        flow.line(12.0, "Sentiment keywords:", LINE);
        for k in &result.sentiment.keywords {
            flow.line(10.0, &format!("  {} ({})", k.word, k.tag), 14.0);
        }
    }

    let top = result.top_words(TOP_N);
    if !top.is_empty() {
        flow.line(12.0, "Top words:", LINE);
        for (word, count) in top {
            flow.line(10.0, &format!("  {word}: {count}"), 14.0);
        }
    }
    flow.finish()
}

/// Writes the paginated document report. `chart` is drawn below the summary
/// rows when present.
pub fn write_pdf(result: &AnalysisResult, chart: Option<&ChartData>, path: &Path) -> Result<()> {
    let pages = layout(result, chart);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| AnalysisError::export(path, e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path).map_err(|e| AnalysisError::export(path, e))?;
    Ok(())
}
