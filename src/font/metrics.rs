//! AFM advance widths for the standard fonts, in 1/1000 em.
//!
//! Tables cover printable ASCII (0x20..=0x7E). A handful of Latin-1 and
//! WinAnsi punctuation characters are mapped explicitly; everything else
//! falls back to the font's default advance.

pub struct StandardFontMetrics {
    widths: [u16; 95],
    default_width: u16,
}

impl StandardFontMetrics {
    fn advance(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.widths[(cp - 0x20) as usize];
        }
        match ch {
            '\u{00A0}' => self.widths[0],
            // Curly quotes and dashes borrow their ASCII counterparts.
            '\u{2018}' | '\u{2019}' => self.widths[(b'\'' - 0x20) as usize],
            '\u{201C}' | '\u{201D}' => self.widths[(b'"' - 0x20) as usize],
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{2022}' => 350,
            '\u{2026}' => 1000,
            '\u{00B7}' => 278,
            '\u{20AC}' => 556,
            _ => self.default_width,
        }
    }

    /// Advance width of `ch` in points at `font_size`.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 / 1000.0 * font_size
    }

    /// Width of `text` in points at `font_size`. Newlines and other control
    /// characters take no space.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars()
            .filter(|c| !c.is_control())
            .map(|c| self.char_width(c, font_size))
            .sum()
    }
}

pub(crate) static HELVETICA: StandardFontMetrics = StandardFontMetrics {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
    ],
    default_width: 556,
};

pub(crate) static HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
        975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
        333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
        611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
    ],
    default_width: 611,
};
