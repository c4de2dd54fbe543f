//! Evaluation prompt construction

/// Default grading persona: a senior Chinese teacher applying the Hong Kong
/// DSE essay marking scheme
pub const DEFAULT_RUBRIC: &str = "你是資深中文老師，要按香港中學文憑試嘅評分標準，評鑑呢篇以「（題目）」為題嘅文章，並提出改善建議";

/// Header placed between the instruction and the essay
pub const ARTICLE_HEADER: &str = "\n\n文章內容：\n";

/// Build the provider-independent evaluation prompt.
///
/// A non-blank `custom_instruction` replaces the default rubric verbatim;
/// otherwise the default rubric is used. Exactly one of the two appears.
pub fn build_evaluation_prompt(text: &str, custom_instruction: Option<&str>) -> String {
    let instruction = match custom_instruction {
        Some(custom) if !custom.trim().is_empty() => custom,
        _ => DEFAULT_RUBRIC,
    };

    format!("{}{}{}", instruction, ARTICLE_HEADER, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rubric_when_instruction_missing_or_blank() {
        let expected = format!("{}\n\n文章內容：\nessay body", DEFAULT_RUBRIC);
        assert_eq!(build_evaluation_prompt("essay body", None), expected);
        assert_eq!(build_evaluation_prompt("essay body", Some("")), expected);
        assert_eq!(build_evaluation_prompt("essay body", Some("  \n ")), expected);
    }

    #[test]
    fn test_custom_instruction_replaces_rubric() {
        let prompt = build_evaluation_prompt("essay body", Some("只評內容，給分 1-10"));
        assert_eq!(prompt, "只評內容，給分 1-10\n\n文章內容：\nessay body");
        assert!(!prompt.contains(DEFAULT_RUBRIC));
    }
}
