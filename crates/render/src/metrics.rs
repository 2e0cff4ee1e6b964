//! Helvetica advance widths and WinAnsi encoding.
//!
//! PDF labels use the standard Type1 Helvetica faces, so text can be
//! measured without loading a font program. Widths are in 1/1000 em.

// Advance widths for U+0020..=U+007E.
#[rustfmt::skip]
const REGULAR: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

pub const ELLIPSIS: char = '…';

pub const MM_PER_PT: f32 = 25.4 / 72.0;

fn advance(c: char, bold: bool) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        let table = if bold { &BOLD } else { &REGULAR };
        return table[(code - 0x20) as usize];
    }
    match c {
        '—' | '…' | '‰' => 1000,
        '–' | '€' => 556,
        '•' => 350,
        '\u{A0}' => 278,
        c if c.is_uppercase() => 722,
        _ => 556,
    }
}

/// Width of `text` in millimetres when set at `size_pt`.
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(advance(c, bold))).sum();
    units as f32 / 1000.0 * size_pt * MM_PER_PT
}

/// Text fitted into a fixed-width box.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub text: String,
    pub size_pt: f32,
    pub width_mm: f32,
}

const SHRINK_STEP_PT: f32 = 0.25;

/// Shrinks `text` toward `min_size_pt` until it fits `box_mm`, then
/// truncates with an ellipsis if it still overflows at the minimum size.
pub fn fit_text(text: &str, box_mm: f32, size_pt: f32, min_size_pt: f32, bold: bool) -> FittedText {
    let min_size_pt = min_size_pt.min(size_pt);
    let mut size = size_pt;
    while text_width_mm(text, size, bold) > box_mm && size - SHRINK_STEP_PT >= min_size_pt {
        size -= SHRINK_STEP_PT;
    }

    let width = text_width_mm(text, size, bold);
    if width <= box_mm {
        return FittedText { text: text.to_string(), size_pt: size, width_mm: width };
    }

    let mut chars: Vec<char> = text.chars().collect();
    loop {
        while chars.last().is_some_and(|c| c.is_whitespace()) {
            chars.pop();
        }
        let candidate: String = chars.iter().chain(std::iter::once(&ELLIPSIS)).collect();
        let width = text_width_mm(&candidate, size, bold);
        if width <= box_mm || chars.is_empty() {
            return FittedText { text: candidate, size_pt: size, width_mm: width };
        }
        chars.pop();
    }
}

/// Encodes `text` as WinAnsiEncoding bytes; unmappable characters become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            match code {
                0x20..=0x7E | 0xA0..=0xFF => code as u8,
                _ => match c {
                    '€' => 0x80,
                    '‚' => 0x82,
                    'ƒ' => 0x83,
                    '„' => 0x84,
                    '…' => 0x85,
                    '†' => 0x86,
                    '‡' => 0x87,
                    'ˆ' => 0x88,
                    '‰' => 0x89,
                    'Š' => 0x8A,
                    '‹' => 0x8B,
                    'Œ' => 0x8C,
                    'Ž' => 0x8E,
                    '‘' => 0x91,
                    '’' => 0x92,
                    '“' => 0x93,
                    '”' => 0x94,
                    '•' => 0x95,
                    '–' => 0x96,
                    '—' => 0x97,
                    '˜' => 0x98,
                    '™' => 0x99,
                    'š' => 0x9A,
                    '›' => 0x9B,
                    'œ' => 0x9C,
                    'ž' => 0x9E,
                    'Ÿ' => 0x9F,
                    _ => b'?',
                },
            }
        })
        .collect()
}
