pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  Info@JPerez.es ");
        assert_eq!(value.as_deref(), Some("info@jperez.es"));
    }

    #[test]
    fn normalize_email_rejects_blank() {
        assert!(normalize_email("   ").is_none());
    }
}
