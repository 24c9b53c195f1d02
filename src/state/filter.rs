use regex::{Regex, RegexBuilder};

/// Case-insensitive substring filter over item paths.
///
/// The query is matched literally (regex metacharacters are escaped) with
/// Unicode case folding.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    query: String,
    pattern: Regex,
}

impl SearchFilter {
    /// Compile a filter for `query`. A blank query yields `None`, meaning
    /// "no filter".
    pub fn new(query: &str) -> Result<Option<Self>, regex::Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()?;

        Ok(Some(Self {
            query: query.to_string(),
            pattern,
        }))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_case_insensitive() {
        let filter = SearchFilter::new("ap").unwrap().unwrap();
        let data = ["Apple", "Banana", "Apricot", "Cherry"];
        let matched: Vec<_> = data.iter().filter(|s| filter.matches(s)).collect();

        assert_eq!(matched, vec![&"Apple", &"Apricot"]);
    }

    #[test]
    fn test_blank_query_is_none() {
        assert!(SearchFilter::new("").unwrap().is_none());
        assert!(SearchFilter::new("   ").unwrap().is_none());
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let filter = SearchFilter::new("a.png").unwrap().unwrap();
        assert!(filter.matches("/pics/a.png"));
        assert!(!filter.matches("/pics/abpng"));
    }
}
