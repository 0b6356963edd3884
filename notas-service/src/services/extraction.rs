//! Heuristic field extraction: keyword-anchored regex cascades that pull a
//! monetary total and a client name out of free-form document text. An
//! extraction miss is never an error; the functions return `None` and the
//! nota keeps null fields for manual correction.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Amount patterns tried in order against each candidate line. Each allows
/// an optional `:`/`-` separator and an optional currency mark before the
/// digits. The bare TOTAL pattern is word-anchored so it cannot fire inside
/// SUBTOTAL.
static TOTAL_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)TOTAL\s+A\s+PAGAR\s*[:\-]?\s*\$?\s*([\d.,]+)").unwrap(),
        Regex::new(r"(?i)IMPORTE\s+TOTAL\s*[:\-]?\s*\$?\s*([\d.,]+)").unwrap(),
        Regex::new(r"(?i)\bTOTAL\s*[:\-]?\s*\$?\s*([\d.,]+)").unwrap(),
    ]
});

static ANY_TOTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)total").unwrap());
static SUBTOTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)sub\s*total").unwrap());

/// `LABEL [:\-]? value` where LABEL is one of the client labels,
/// accent-insensitive.
static CLIENTE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:CLIENTE|NOMBRE|RAZ[OÓ]N\s+SOCIAL)\s*[:\-]?\s*(.+)$").unwrap()
});

/// A line that is exactly a client label (allowing a trailing colon), with
/// the value expected on the following line.
static CLIENTE_LABEL_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:CLIENTE|NOMBRE|RAZ[OÓ]N\s+SOCIAL)\s*:?\s*$").unwrap());

/// `<digits 4+> - <free text>`, read as client code + name.
static CLIENTE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4,})\s*-\s*(.+)$").unwrap());

/// Keywords that disqualify a line from being a client name.
static RESERVED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:RFC|FECHA|FOLIO|TOTAL|SUBTOTAL)\b").unwrap());

/// Parse a free-form monetary string such as `1.234,56`, `1,234.56` or
/// `$ 1234`.
///
/// The rightmost `.` or `,` is the decimal separator; the other character is
/// a thousands separator and is discarded. With neither present the whole
/// string is read as an integer amount. The fractional part is truncated to
/// two digits. Returns `None` on empty or unparseable input; never fails.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let sep = match (compact.rfind('.'), compact.rfind(',')) {
        (Some(d), Some(c)) => Some(d.max(c)),
        (Some(d), None) => Some(d),
        (None, Some(c)) => Some(c),
        (None, None) => None,
    };

    let normalized = match sep {
        None => {
            let digits: String = compact.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                return None;
            }
            digits
        }
        Some(idx) => {
            let int_digits: String = compact[..idx]
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            let frac_digits: String = compact[idx + 1..]
                .chars()
                .filter(|c| c.is_ascii_digit())
                .take(2)
                .collect();
            if int_digits.is_empty() && frac_digits.is_empty() {
                return None;
            }
            let int_digits = if int_digits.is_empty() {
                "0".to_string()
            } else {
                int_digits
            };
            if frac_digits.is_empty() {
                int_digits
            } else {
                format!("{int_digits}.{frac_digits}")
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}

/// Extract the grand total from document text.
///
/// Lines mentioning TOTAL (but not SUBTOTAL) are tried first. If no line
/// yields a value, the whole text is scanned and only the last match per
/// pattern is kept: documents often restate TOTAL during itemization, and
/// the last occurrence is the likeliest grand total. The maximum over all
/// candidates wins, which keeps a smaller figure such as a discount or
/// partial subtotal from shadowing the real total.
pub fn extract_total(text: &str) -> Option<Decimal> {
    let mut candidates: Vec<Decimal> = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !ANY_TOTAL.is_match(line) || SUBTOTAL.is_match(line) {
            continue;
        }
        for re in TOTAL_PATTERNS.iter() {
            if let Some(cap) = re.captures(line) {
                if let Some(value) = parse_money(&cap[1]) {
                    candidates.push(value);
                }
            }
        }
    }

    if candidates.is_empty() {
        for re in TOTAL_PATTERNS.iter() {
            if let Some(cap) = re.captures_iter(text).last() {
                if let Some(value) = parse_money(&cap[1]) {
                    candidates.push(value);
                }
            }
        }
    }

    candidates.into_iter().max()
}

/// Extract the client name from document text, first matching rule wins:
/// a labeled line, a label with the value on the next line, or a
/// `code - name` line.
pub fn extract_cliente(text: &str) -> Option<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    for line in &lines {
        if let Some(cap) = CLIENTE_LABELED.captures(line) {
            let value = cap[1].trim();
            if value.chars().count() >= 3 {
                return Some(value.to_string());
            }
        }
    }

    for (i, line) in lines.iter().enumerate() {
        if CLIENTE_LABEL_ONLY.is_match(line) {
            if let Some(next) = lines.get(i + 1) {
                let value = next.trim();
                if value.chars().count() >= 3 && !RESERVED.is_match(value) {
                    return Some(value.to_string());
                }
            }
        }
    }

    for line in &lines {
        if let Some(cap) = CLIENTE_CODE.captures(line) {
            return Some(format!("{} - {}", &cap[1], cap[2].trim()));
        }
    }

    None
}
