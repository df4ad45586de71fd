/// Strips leading/trailing markdown code fences (``` with an optional
/// language tag) and surrounding whitespace from LLM output, leaving a bare
/// SQL statement. Interior content is never touched; re-sanitizing clean
/// text is a no-op.
pub fn strip_code_fences(text: &str) -> String {
    let mut sql = text.trim();

    // Fences are stripped to a fixpoint: removing an outer pair can expose a
    // fence nested directly at the boundary, which then gets stripped too.
    loop {
        let before = sql;

        if let Some(rest) = sql.strip_prefix("```") {
            // An optional language tag sits between the fence and the first
            // newline; anything else on that line is content, not a tag
            sql = match rest.split_once('\n') {
                Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
                _ => rest,
            };
        }

        if let Some(rest) = sql.strip_suffix("```") {
            sql = rest;
        }

        sql = sql.trim();
        if sql == before {
            return sql.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_fences() {
        assert_eq!(
            strip_code_fences("```sql\nSELECT COUNT(*) FROM users;\n```"),
            "SELECT COUNT(*) FROM users;"
        );
    }

    #[test]
    fn strips_bare_fences() {
        assert_eq!(
            strip_code_fences("```\nSELECT 1;\n```"),
            "SELECT 1;"
        );
    }

    #[test]
    fn clean_input_is_untouched() {
        assert_eq!(strip_code_fences("SELECT 1;"), "SELECT 1;");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "```sql\nSELECT name FROM users WHERE id = 1;\n```",
            "SELECT 1;",
            "  SELECT 2;  ",
            "```\nSELECT 3;```",
            "```\n```sql\nSELECT 4;\n```",
            "",
        ];
        for input in inputs {
            let once = strip_code_fences(input);
            assert_eq!(strip_code_fences(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn nested_boundary_fences_strip_to_statement() {
        assert_eq!(
            strip_code_fences("```\n```sql\nSELECT 1;\n```"),
            "SELECT 1;"
        );
    }

    #[test]
    fn fence_without_newline_keeps_content() {
        assert_eq!(strip_code_fences("```SELECT 1```"), "SELECT 1");
    }

    #[test]
    fn interior_backticks_survive() {
        let sql = "SELECT `name` FROM `users`;";
        assert_eq!(strip_code_fences(sql), sql);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(strip_code_fences("  \n SELECT 1; \n "), "SELECT 1;");
        assert_eq!(strip_code_fences("   "), "");
    }
}
