//! Prompt sanitization and shell escaping.
//!
//! Sanitization strips substrings that look like the tool's own control
//! flags, so a hostile prompt cannot widen tool permissions or hijack
//! another user's session by smuggling `--resume <token>`. It is pattern
//! removal, not a grammar — a defense-in-depth layer, not a guarantee.

use regex::Regex;

/// Flag-injection patterns removed from prompts, case-insensitively.
const FLAG_PATTERNS: &[&str] = &[
    r"--allowed-?tools",
    r"--dangerously\S*",
    r"--output-format",
    r"--append-system-prompt",
    r"--session-id",
    r"--resume",
    r"--continue",
    r"--print",
    r"-p\s",
];

/// Compiled flag-stripping patterns. Built once per bridge instance.
pub struct Sanitizer {
    patterns: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self, regex::Error> {
        let joined = FLAG_PATTERNS.join("|");
        let patterns = Regex::new(&format!("(?i){joined}"))?;
        Ok(Self { patterns })
    }

    /// Strip control-flag lookalikes from a prompt.
    pub fn sanitize(&self, prompt: &str) -> String {
        self.patterns.replace_all(prompt, "").into_owned()
    }
}

/// Escape text for interpolation inside a double-quoted shell argument.
///
/// Backslash, double quote, dollar and backtick get a backslash. `!` is
/// handled by splicing it in single quotes instead (`"'!'"`): a backslash
/// before `!` would survive double-quote processing in `sh` and corrupt
/// the argument, while a bare `!` risks history expansion under
/// interactive shells.
pub fn shell_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '"' | '$' | '`' => {
                out.push('\\');
                out.push(c);
            },
            '!' => out.push_str("\"'!'\""),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new().unwrap()
    }

    #[test]
    fn test_strips_permission_flags() {
        let out = sanitizer().sanitize("do it --allowedTools Bash please");
        assert!(!out.contains("--allowedTools"));
        assert!(out.contains("do it"));
        assert!(out.contains("please"));
    }

    #[test]
    fn test_strips_session_hijack_flags() {
        let out = sanitizer().sanitize("hello --resume abc-123 --continue");
        assert!(!out.contains("--resume"));
        assert!(!out.contains("--continue"));
        // The token itself stays; only the flag is removed.
        assert!(out.contains("abc-123"));
    }

    #[test]
    fn test_strips_case_insensitively() {
        let out = sanitizer().sanitize("x --ALLOWEDTOOLS --Dangerously-skip-permissions y");
        assert!(!out.to_lowercase().contains("allowedtools"));
        assert!(!out.to_lowercase().contains("dangerously"));
    }

    #[test]
    fn test_plain_prompt_untouched() {
        let prompt = "create a file report.txt with a summary";
        assert_eq!(sanitizer().sanitize(prompt), prompt);
    }

    #[test]
    fn test_escape_metacharacters() {
        assert_eq!(
            shell_escape(r#"say "hi" to $USER and `date` \ ok"#),
            r#"say \"hi\" to \$USER and \`date\` \\ ok"#
        );
    }

    #[test]
    fn test_escape_exclamation_via_single_quotes() {
        assert_eq!(shell_escape("done!"), r#"done"'!'""#);
    }
}
