//! Input shaping for the card payment form.

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups the first 4 to 16 digits into blocks of four separated by single
/// spaces. Input with fewer than four digits is returned unchanged.
pub fn format_card_number(value: &str) -> String {
    let digits = digits(value);
    if digits.len() < 4 {
        return value.to_string();
    }

    let run = &digits[..digits.len().min(16)];
    run.as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MMYY` typed in any shape becomes `MM/YY`. The slash appears once two
/// digits are present.
pub fn format_expiry(value: &str) -> String {
    let digits = digits(value);
    if digits.len() < 2 {
        return digits;
    }

    let year = &digits[2..digits.len().min(4)];
    format!("{}/{}", &digits[..2], year)
}

pub fn sanitize_cvv(value: &str) -> String {
    digits(value).chars().take(4).collect()
}

/// Last four digits of a card number, ignoring grouping spaces.
pub fn card_last_four(number: &str) -> Option<String> {
    let digits = digits(number);
    if digits.is_empty() {
        return None;
    }
    let start = digits.len().saturating_sub(4);
    Some(digits[start..].to_string())
}
