//! Text preparation for scripts that need contextual joining and
//! right-to-left reordering before they can be drawn glyph by glyph.
//!
//! The glyph renderer places characters left to right with no shaping
//! engine behind it, so Arabic input has to be turned into presentation
//! forms and put into visual order first.

use ar_reshaper::reshape_line;
use unicode_bidi::BidiInfo;

/// Reshape and reorder `text` into the order glyphs should be drawn in.
///
/// Text without right-to-left characters comes back unchanged.
pub fn shape_for_display(text: &str) -> String {
    let reshaped = if needs_reshaping(text) {
        reshape_line(text)
    } else {
        text.to_string()
    };

    let bidi_info = BidiInfo::new(&reshaped, None);
    if !bidi_info.has_rtl() {
        return reshaped;
    }

    let mut visual = String::with_capacity(reshaped.len());
    for paragraph in &bidi_info.paragraphs {
        let line = paragraph.range.clone();
        visual.push_str(&bidi_info.reorder_line(paragraph, line));
    }
    visual
}

fn needs_reshaping(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}'))
}
