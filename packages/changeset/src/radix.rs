//! Base-36 numbers as used throughout the changeset wire format.

pub fn to_base36(mut value: usize) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        // digit < 36 always has a representation
        digits.push(char::from_digit((value % 36) as u32, 36).unwrap_or('0'));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Parse lowercase base-36 digits; `None` on empty input, bad digits or overflow
pub fn parse_base36(text: &str) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    text.chars().try_fold(0usize, |acc, c| {
        let digit = c.to_digit(36)?;
        if c.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(36)?.checked_add(digit as usize)
    })
}
