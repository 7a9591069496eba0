use super::*;

/// Deterministic fake: every character advances by `per_char` pixels.
struct FixedCharWidth(f64);

impl TextMeasure for FixedCharWidth {
    fn measure_width(&mut self, text: &str, _font: &str, _size: f64) -> CapclipResult<f64> {
        Ok(text.chars().count() as f64 * self.0)
    }
}

#[test]
fn newline_paragraphs_become_their_own_lines() {
    let mut m = FixedCharWidth(10.0);
    let lines = wrap("HELLO\nWORLD", &mut m, "Impact", 78.0, 1000.0).unwrap();
    assert_eq!(lines, vec!["HELLO".to_owned(), "WORLD".to_owned()]);
}

#[test]
fn empty_paragraphs_are_preserved_as_blank_lines() {
    let mut m = FixedCharWidth(10.0);
    let lines = wrap("A\n\nB", &mut m, "Impact", 78.0, 1000.0).unwrap();
    assert_eq!(lines, vec!["A".to_owned(), String::new(), "B".to_owned()]);

    let lines = wrap("A\n   \nB", &mut m, "Impact", 78.0, 1000.0).unwrap();
    assert_eq!(lines, vec!["A".to_owned(), String::new(), "B".to_owned()]);
}

#[test]
fn greedy_fill_commits_on_overflow() {
    let mut m = FixedCharWidth(10.0);
    // "WORD WORD" is 90px; four words are 190px and cross the 150px budget.
    let lines = wrap(
        "WORD WORD WORD WORD",
        &mut m,
        "Impact",
        78.0,
        150.0,
    )
    .unwrap();
    assert_eq!(lines, vec!["WORD WORD".to_owned(), "WORD WORD".to_owned()]);
}

#[test]
fn fit_test_is_strictly_less_than() {
    let mut m = FixedCharWidth(10.0);
    // "AB CD" measures exactly 50px; equality must not keep the word.
    let lines = wrap("AB CD", &mut m, "Impact", 78.0, 50.0).unwrap();
    assert_eq!(lines, vec!["AB".to_owned(), "CD".to_owned()]);
}

#[test]
fn overwide_single_word_gets_its_own_line() {
    let mut m = FixedCharWidth(10.0);
    let lines = wrap("A ABSURDLYOVERLONGWORD B", &mut m, "Impact", 78.0, 60.0).unwrap();
    assert_eq!(
        lines,
        vec![
            "A".to_owned(),
            "ABSURDLYOVERLONGWORD".to_owned(),
            "B".to_owned()
        ]
    );
}

#[test]
fn long_caption_wraps_within_budget() {
    let mut m = FixedCharWidth(10.0);
    let caption = "one two three four five six seven eight nine ten";
    let max_width = 200.0;
    let lines = wrap(caption, &mut m, "Impact", 78.0, max_width).unwrap();
    assert!(lines.len() >= 2);
    for line in &lines {
        let w = m.measure_width(line, "Impact", 78.0).unwrap();
        assert!(w < max_width, "line '{line}' measures {w} >= {max_width}");
    }
}

#[test]
fn wrap_is_deterministic_across_calls_and_instances() {
    let caption = "the quick brown fox jumps over the lazy dog\n\nagain and again";
    let mut a = FixedCharWidth(9.0);
    let first = wrap(caption, &mut a, "Impact", 64.0, 240.0).unwrap();
    let second = wrap(caption, &mut a, "Impact", 64.0, 240.0).unwrap();
    assert_eq!(first, second);

    let mut b = FixedCharWidth(9.0);
    let third = wrap(caption, &mut b, "Impact", 64.0, 240.0).unwrap();
    assert_eq!(first, third);
}

#[test]
fn empty_text_yields_one_blank_line() {
    let mut m = FixedCharWidth(10.0);
    let lines = wrap("", &mut m, "Impact", 78.0, 1000.0).unwrap();
    assert_eq!(lines, vec![String::new()]);
}

#[test]
fn line_height_is_size_times_factor() {
    assert!((line_height(78.0) - 85.8).abs() < 1e-9);
    assert!((line_height(40.0) - 44.0).abs() < 1e-9);
}
