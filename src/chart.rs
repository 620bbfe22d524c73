//! Summary chart: top-10 word frequencies next to the sentiment distribution.
//!
//! The chart is described by [`ChartData`] and written as an SVG file. The
//! PDF exporter draws the same data as vector graphics, so a document
//! report always needs a chart render first.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::AnalysisResult;
use crate::error::{AnalysisError, Result};
use crate::language::Language;

pub const CHART_FILE_NAME: &str = "analysis_result.svg";
pub const TOP_N: usize = 10;

const WIDTH: f64 = 1200.0;
const HEIGHT: f64 = 600.0;
const PALETTE: [&str; 3] = ["#1f77b4", "#ff7f0e", "#2ca02c"];

/// One wedge of the sentiment pie.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub value: f64,
}

/// Everything the chart shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: &'static str,
    pub axis_label: &'static str,
    pub bars: Vec<(String, u32)>,
    pub slices: Vec<Slice>,
    pub pie_title: &'static str,
}

impl ChartData {
    /// Chart content for a result; `None` when the document has no tokens.
    pub fn from_result(result: &AnalysisResult) -> Option<Self> {
        if result.token_count == 0 {
            return None;
        }
        let sentiment = &result.sentiment;
        let (title, axis_label, slices) = match result.language {
            Language::Zh => (
                "Top 10 High Frequency words",
                "Occurrences",
                vec![
                    Slice {
                        label: "positive",
                        value: sentiment.score,
                    },
                    Slice {
                        label: "negative",
                        value: 1.0 - sentiment.score,
                    },
                ],
            ),
            Language::En => (
                "Top 10 Words",
                "Count",
                vec![
                    Slice {
                        label: "Positive",
                        value: sentiment.intensity.positive,
                    },
                    Slice {
                        label: "Negative",
                        value: sentiment.intensity.negative,
                    },
                    Slice {
                        label: "Neutral",
                        value: sentiment.intensity.neutral,
                    },
                ],
            ),
        };
        Some(Self {
            title,
            axis_label,
            bars: result.top_words(TOP_N),
            slices,
            pie_title: "Emotional distribution",
        })
    }

    /// Wedge fractions summing to 1; negative values count as zero.
    /// Empty when there is nothing to draw.
    pub fn fractions(&self) -> Vec<f64> {
        let values: Vec<f64> = self.slices.iter().map(|s| s.value.max(0.0)).collect();
        let total: f64 = values.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Vec::new();
        }
        values.into_iter().map(|v| v / total).collect()
    }

    pub fn render_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        self.render_bars(&mut svg);
        self.render_pie(&mut svg);
        svg.push_str("</svg>\n");
        svg
    }

    fn render_bars(&self, svg: &mut String) {
        let (left, top, width, height) = (160.0, 60.0, 380.0, 470.0);
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="35" font-size="18" text-anchor="middle">{}</text>"#,
            left + width / 2.0,
            escape(self.title)
        );
        let max = self.bars.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1) as f64;
        let slot = height / self.bars.len().max(1) as f64;
        // first bar at the top, as in a horizontal bar chart read top-down
        for (i, (word, count)) in self.bars.iter().enumerate() {
            let y = top + i as f64 * slot + slot * 0.1;
            let w = width * *count as f64 / max;
            let _ = writeln!(
                svg,
                r#"<rect x="{left}" y="{y:.1}" width="{w:.1}" height="{:.1}" fill="{}"/>"#,
                slot * 0.8,
                PALETTE[0]
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{:.1}" font-size="13" text-anchor="end">{}</text>"#,
                left - 8.0,
                y + slot * 0.5,
                escape(word)
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-size="12">{count}</text>"#,
                left + w + 4.0,
                y + slot * 0.5
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="14" text-anchor="middle">{}</text>"#,
            left + width / 2.0,
            top + height + 35.0,
            escape(self.axis_label)
        );
    }

    fn render_pie(&self, svg: &mut String) {
        let (cx, cy, r) = (900.0, 310.0, 200.0);
        let _ = writeln!(
            svg,
            r#"<text x="{cx}" y="35" font-size="18" text-anchor="middle">{}</text>"#,
            escape(self.pie_title)
        );
        let fractions = self.fractions();
        let mut start = 0.0_f64;
        for (i, (slice, f)) in self.slices.iter().zip(&fractions).enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            if *f >= 1.0 {
                let _ = writeln!(svg, r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"/>"#);
            } else if *f > 0.0 {
                let end = start + f * std::f64::consts::TAU;
                let (x0, y0) = polar(cx, cy, r, start);
                let (x1, y1) = polar(cx, cy, r, end);
                let large = if *f > 0.5 { 1 } else { 0 };
                let _ = writeln!(
                    svg,
                    r#"<path d="M {cx} {cy} L {x0:.2} {y0:.2} A {r} {r} 0 {large} 0 {x1:.2} {y1:.2} Z" fill="{color}"/>"#
                );
            }
            if *f > 0.0 {
                let mid = start + f * std::f64::consts::PI;
                let (lx, ly) = polar(cx, cy, r * 0.6, mid);
                let (tx, ty) = polar(cx, cy, r * 1.12, mid);
                let _ = writeln!(
                    svg,
                    r#"<text x="{lx:.1}" y="{ly:.1}" font-size="13" text-anchor="middle">{:.1}%</text>"#,
                    f * 100.0
                );
                let _ = writeln!(
                    svg,
                    r#"<text x="{tx:.1}" y="{ty:.1}" font-size="14" text-anchor="middle">{}</text>"#,
                    escape(slice.label)
                );
            }
            start += f * std::f64::consts::TAU;
        }
    }
}

/// Point on a circle; angles run counter-clockwise from three o'clock.
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy - r * angle.sin())
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// A chart written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub path: PathBuf,
    pub data: ChartData,
}

/// Renders the chart for `result` into `out_dir`. Returns `None` without
/// writing anything when the document has no tokens.
pub fn generate_chart(result: &AnalysisResult, out_dir: &Path) -> Result<Option<ChartArtifact>> {
    let Some(data) = ChartData::from_result(result) else {
        return Ok(None);
    };
    let path = out_dir.join(CHART_FILE_NAME);
    fs::write(&path, data.render_svg()).map_err(|e| AnalysisError::export(&path, e))?;
    info!("Chart saved to {}", path.display());
    Ok(Some(ChartArtifact { path, data }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::{Intensity, SentimentProfile};
    use crate::stats::count_words;

    fn result(language: Language, words: &[&str], sentiment: SentimentProfile) -> AnalysisResult {
        let tokens: Vec<String> = words.iter().map(|s| s.to_string()).collect();
        AnalysisResult {
            file_name: "t.txt".into(),
            file_size_bytes: 0,
            char_count: 0,
            line_count: 0,
            language,
            token_count: tokens.len(),
            frequency: count_words(&tokens),
            tokens,
            sentiment,
        }
    }

    #[test]
    fn no_chart_without_tokens() {
        let r = result(Language::En, &[], SentimentProfile::default());
        assert!(ChartData::from_result(&r).is_none());
        let dir = tempfile::tempdir().unwrap();
        assert!(generate_chart(&r, dir.path()).unwrap().is_none());
        assert!(!dir.path().join(CHART_FILE_NAME).exists());
    }

    #[test]
    fn chinese_pie_splits_score() {
        let sentiment = SentimentProfile::new(0.8, Intensity::ZERO, vec![]);
        let r = result(Language::Zh, &["好", "好", "产品"], sentiment);
        let data = ChartData::from_result(&r).unwrap();
        assert_eq!(data.title, "Top 10 High Frequency words");
        assert_eq!(data.axis_label, "Occurrences");
        assert_eq!(data.bars, vec![("好".to_string(), 2), ("产品".to_string(), 1)]);
        let f = data.fractions();
        assert!((f[0] - 0.8).abs() < 1e-12 && (f[1] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn english_pie_uses_intensity_and_clamps() {
        let intensity = Intensity {
            positive: 0.5,
            negative: 0.0,
            neutral: 0.5,
        };
        let r = result(Language::En, &["a"], SentimentProfile::new(0.9, intensity, vec![]));
        let data = ChartData::from_result(&r).unwrap();
        assert_eq!(data.title, "Top 10 Words");
        assert_eq!(data.fractions(), vec![0.5, 0.0, 0.5]);

        let mut odd = data.clone();
        odd.slices[0].value = -1.0;
        odd.slices[2].value = 0.0;
        assert!(odd.fractions().is_empty());
    }

    #[test]
    fn svg_contains_bars_and_labels() {
        let intensity = Intensity {
            positive: 0.7,
            negative: 0.1,
            neutral: 0.2,
        };
        let r = result(
            Language::En,
            &["fish", "&", "chips", "fish"],
            SentimentProfile::new(0.9, intensity, vec![]),
        );
        let dir = tempfile::tempdir().unwrap();
        let artifact = generate_chart(&r, dir.path()).unwrap().unwrap();
        let svg = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">fish</text>"));
        assert!(svg.contains("&amp;"));
        assert!(svg.contains("70.0%"));
        assert!(svg.contains("Emotional distribution"));
        assert_eq!(artifact.data.bars[0], ("fish".to_string(), 2));
    }
}
