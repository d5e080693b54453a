// Minimal console presentation for the sliding window view
//
// The renderer is a downstream consumer of the core: it re-reads the window
// snapshot on every update and draws with sequence on the horizontal axis
// and value on the vertical axis. Charting proper (themes, layout, axes) is
// out of scope; this sink exists so the binary has something to show.

use crate::types::Sample;
use std::io::Write;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Consumer of window snapshots
pub trait Renderer {
    fn render(&mut self, view: &[Sample]);
}

/// One-line terminal sparkline of the most recent samples
pub struct SparklineRenderer {
    width: usize,
}

impl SparklineRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }
}

impl Renderer for SparklineRenderer {
    fn render(&mut self, view: &[Sample]) {
        let Some(latest) = view.last() else {
            return;
        };

        let tail = &view[view.len().saturating_sub(self.width)..];
        print!(
            "\r{} {:>12.4} (#{})",
            sparkline(tail),
            latest.value,
            latest.sequence
        );
        std::io::stdout().flush().ok();
    }
}

/// Scale samples into bar glyphs; value range is computed from the view
fn sparkline(samples: &[Sample]) -> String {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for sample in samples {
        min = min.min(sample.value);
        max = max.max(sample.value);
    }
    let span = max - min;

    samples
        .iter()
        .map(|sample| {
            let level = if span > 0.0 {
                (((sample.value - min) / span) * (BARS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            BARS[level.min(BARS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| Sample {
                value,
                sequence: i as u64 + 1,
            })
            .collect()
    }

    #[test]
    fn test_empty_view() {
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_flat_signal_uses_one_level() {
        let line = sparkline(&samples(&[5.0, 5.0, 5.0]));
        assert_eq!(line, "▁▁▁");
    }

    #[test]
    fn test_ramp_spans_full_range() {
        let line: Vec<char> = sparkline(&samples(&[0.0, 1.0, 2.0, 3.0]))
            .chars()
            .collect();
        assert_eq!(line.first(), Some(&'▁'));
        assert_eq!(line.last(), Some(&'█'));
    }
}
