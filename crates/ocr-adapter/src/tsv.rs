//! Parser for Tesseract's TSV output
//!
//! Tesseract emits one row per layout element with the columns
//! `level page_num block_num par_num line_num word_num left top width height conf text`.
//! Level 4 rows describe a text line and carry its bounding box; level 5 rows
//! are the words inside that line with a 0-100 confidence. Lines are turned
//! into text blocks in the order Tesseract reports them.

use std::collections::HashMap;

use shared_types::TextBlock;

const LEVEL_LINE: u32 = 4;
const LEVEL_WORD: u32 = 5;
const COLUMN_COUNT: usize = 12;

type LineKey = (u32, u32, u32, u32);

#[derive(Debug, Default)]
struct LineAccumulator {
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    words: Vec<String>,
    confidences: Vec<f64>,
}

/// Group word rows into line-level text blocks
pub fn parse_tsv(tsv: &str) -> Vec<TextBlock> {
    let mut lines: Vec<LineAccumulator> = Vec::new();
    let mut index: HashMap<LineKey, usize> = HashMap::new();

    for row in tsv.lines() {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < COLUMN_COUNT - 1 {
            continue;
        }
        // Header row and anything malformed fail here
        let Some(level) = cols[0].trim().parse::<u32>().ok() else {
            continue;
        };
        let Some(key) = line_key(&cols) else {
            continue;
        };

        match level {
            LEVEL_LINE => {
                let Some((left, top, width, height)) = rect(&cols) else {
                    continue;
                };
                let slot = *index.entry(key).or_insert_with(|| {
                    lines.push(LineAccumulator::default());
                    lines.len() - 1
                });
                let line = &mut lines[slot];
                line.left = left;
                line.top = top;
                line.width = width;
                line.height = height;
            }
            LEVEL_WORD => {
                let text = cols.get(11).map(|t| t.trim()).unwrap_or_default();
                let conf = cols[10].trim().parse::<f64>().unwrap_or(-1.0);
                if text.is_empty() || conf < 0.0 {
                    continue;
                }
                let slot = *index.entry(key).or_insert_with(|| {
                    lines.push(LineAccumulator::default());
                    lines.len() - 1
                });
                let line = &mut lines[slot];
                line.words.push(text.to_string());
                line.confidences.push((conf / 100.0).clamp(0.0, 1.0));
            }
            _ => {}
        }
    }

    lines
        .into_iter()
        .filter(|line| !line.words.is_empty())
        .map(|line| {
            let confidence =
                line.confidences.iter().sum::<f64>() / line.confidences.len() as f64;
            TextBlock::from_rect(
                line.words.join(" "),
                confidence,
                line.left,
                line.top,
                line.width,
                line.height,
            )
        })
        .collect()
}

fn line_key(cols: &[&str]) -> Option<LineKey> {
    Some((
        cols[1].trim().parse().ok()?,
        cols[2].trim().parse().ok()?,
        cols[3].trim().parse().ok()?,
        cols[4].trim().parse().ok()?,
    ))
}

fn rect(cols: &[&str]) -> Option<(i32, i32, i32, i32)> {
    Some((
        cols[6].trim().parse().ok()?,
        cols[7].trim().parse().ok()?,
        cols[8].trim().parse().ok()?,
        cols[9].trim().parse().ok()?,
    ))
}
