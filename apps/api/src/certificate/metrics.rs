//! Glyph widths for the two built-in PDF faces the certificate uses.
//!
//! Widths are the standard Helvetica AFM advances in thousandths of an em,
//! WinAnsi layout for ASCII 0x20..=0x7E. Index = (char as usize) - 32.
//! Anything outside that range falls back to the face's average width.

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Typeface {
    Helvetica,
    HelveticaBold,
}

pub struct MetricTable {
    widths: [u16; 95],
    average: u16,
}

impl MetricTable {
    /// Width of `s` in em units.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                let units = if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average
                };
                f32::from(units) / 1000.0
            })
            .sum()
    }

    /// Width of `s` in millimetres when set at `size_pt`.
    pub fn width_mm(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_em(s) * size_pt * PT_TO_MM
    }

    /// Largest size in `min_pt..=max_pt` (whole points) at which `s` fits
    /// within `max_width_mm`. Returns `min_pt` when nothing fits.
    pub fn fit_size(&self, s: &str, max_pt: f32, min_pt: f32, max_width_mm: f32) -> f32 {
        let mut size = max_pt;
        while size > min_pt && self.width_mm(s, size) > max_width_mm {
            size -= 1.0;
        }
        size.max(min_pt)
    }
}

static HELVETICA: MetricTable = MetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :   ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [   \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {   |    }    ~
        334, 260, 334, 584,
    ],
    average: 540,
};

static HELVETICA_BOLD: MetricTable = MetricTable {
    #[rustfmt::skip]
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    average: 580,
};

pub fn metrics(face: Typeface) -> &'static MetricTable {
    match face {
        Typeface::Helvetica => &HELVETICA,
        Typeface::HelveticaBold => &HELVETICA_BOLD,
    }
}
