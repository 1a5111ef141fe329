use crate::error::CoreError;

pub const DEFAULT_COUNTRY_CODE: &str = "34";
pub const DEFAULT_LEADING_DIGITS: &str = "6789";
const INTERNATIONAL_PREFIX: &str = "00";

/// Country handling applied after a phone number has been reduced to digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneRules {
    country_code: String,
    leading_digits: String,
}

impl Default for PhoneRules {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            leading_digits: DEFAULT_LEADING_DIGITS.to_string(),
        }
    }
}

impl PhoneRules {
    pub fn new(country_code: &str, leading_digits: &str) -> Result<Self, CoreError> {
        let country_code = country_code.trim().trim_start_matches('+');
        if country_code.is_empty() || !country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidCountryCode(country_code.to_string()));
        }
        let leading_digits = leading_digits.trim();
        if leading_digits.is_empty() || !leading_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidLeadingDigits(leading_digits.to_string()));
        }
        Ok(Self {
            country_code: country_code.to_string(),
            leading_digits: leading_digits.to_string(),
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn leading_digits(&self) -> &str {
        &self.leading_digits
    }
}

/// Reduces a phone number to `+<digits>` form for matching.
///
/// Formatting characters and leading labels are dropped, anything after an
/// extension marker that follows the number is ignored, `00` becomes `+`, and national numbers gain the configured country
/// code. No plausibility check is made on the number of digits.
pub fn normalize_phone(value: &str, rules: &PhoneRules) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut digits = String::new();
    let mut plus = false;

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        if ch == '+' && digits.is_empty() {
            plus = true;
            continue;
        }

        // Labels such as "Tel/Fax:" precede the number.
        if !digits.is_empty() && matches!(ch, 'x' | 'X' | '#' | ';' | ',') {
            break;
        }
    }

    if digits.is_empty() {
        return None;
    }

    if plus {
        return Some(format!("+{digits}"));
    }

    if let Some(rest) = digits.strip_prefix(INTERNATIONAL_PREFIX) {
        if rest.is_empty() {
            return None;
        }
        return Some(format!("+{rest}"));
    }

    if digits.starts_with(rules.country_code.as_str()) {
        return Some(format!("+{digits}"));
    }

    let leading = digits.chars().next().unwrap_or_default();
    if rules.leading_digits.contains(leading) {
        return Some(format!("+{}{digits}", rules.country_code));
    }

    Some(digits)
}
