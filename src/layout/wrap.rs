use crate::foundation::error::CapclipResult;

/// Multiplier from font size to the stacked line advance.
pub const LINE_HEIGHT_FACTOR: f64 = 1.1;

/// Line advance in logical pixels for a given font size.
pub fn line_height(size: f64) -> f64 {
    size * LINE_HEIGHT_FACTOR
}

/// Pixel-width measurement seam used by [`wrap`].
///
/// The production implementation shapes text with Parley; tests may
/// substitute a deterministic fake. Measurement must be a pure function of
/// `(text, font, size)`: the preview and export paths rely on identical
/// wraps for the same inputs.
pub trait TextMeasure {
    /// Measured advance width of `text` in logical pixels.
    fn measure_width(&mut self, text: &str, font: &str, size: f64) -> CapclipResult<f64>;
}

/// Greedily wrap `text` into lines that fit within `max_width`.
///
/// Paragraphs are split on literal newlines; a whitespace-only paragraph
/// yields one empty output line so user-intended blank lines survive. Within
/// a paragraph, words accumulate onto the running line while the measured
/// width of `line + " " + word` stays strictly below `max_width`. A single
/// word wider than `max_width` is still placed alone on its own line.
pub fn wrap(
    text: &str,
    measure: &mut dyn TextMeasure,
    font: &str,
    size: f64,
    max_width: f64,
) -> CapclipResult<Vec<String>> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut words = paragraph.split(' ');
        let mut current = words.next().unwrap_or_default().to_owned();
        for word in words {
            let width = measure.measure_width(&format!("{current} {word}"), font, size)?;
            if width < max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_owned();
            }
        }
        lines.push(current);
    }

    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
