//! Fixed prompt, separator and inline markers used in extracted text

/// Instruction sent with every file: output all text verbatim, nothing else
pub const EXTRACTION_PROMPT: &str =
    "請直接輸出文件中的所有文字，不要有任何其他的描述或說明。";

/// Divider between files in the combined text; rendered as a page break
pub const PAGE_SEPARATOR: &str = "\n\n<hr>\n\n";

/// Marker for a file whose extraction failed
pub fn error_marker(filename: &str, error: &str) -> String {
    format!("[處理 '{}' 時發生錯誤: {}]", filename, error)
}

/// Marker for a file whose type cannot be extracted
pub fn unsupported_marker(filename: &str) -> String {
    format!("[不支援的文件類型: {}]", filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_name_the_file() {
        assert_eq!(
            error_marker("file2.png", "quota exceeded"),
            "[處理 'file2.png' 時發生錯誤: quota exceeded]"
        );
        assert_eq!(unsupported_marker("notes.txt"), "[不支援的文件類型: notes.txt]");
    }
}
