/// Trim surrounding whitespace and case-fold a typed answer
pub fn normalize_answer(input: &str) -> String {
    input.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("Paris"), "paris");
        assert_eq!(normalize_answer(" paris "), "paris");
        assert_eq!(normalize_answer("PARIS"), "paris");
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_eq!(normalize_answer("  Thank You\n"), "thank you");
    }

    #[test]
    fn test_normalize_blank_input() {
        assert_eq!(normalize_answer(""), "");
        assert_eq!(normalize_answer(" \t "), "");
    }

    #[test]
    fn test_normalize_keeps_diacritics() {
        assert_eq!(normalize_answer("ÉCOLE"), "école");
    }
}
