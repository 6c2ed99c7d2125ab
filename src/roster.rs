/// One name per line, trimmed, with blank lines dropped.
#[must_use]
pub fn parse_roster(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_roster;

    #[test]
    fn trims_and_skips_blanks() {
        assert_eq!(
            parse_roster("  Alice \r\n\nBob\n\t\n Carol"),
            ["Alice", "Bob", "Carol"]
        );
        assert!(parse_roster("").is_empty());
    }
}
