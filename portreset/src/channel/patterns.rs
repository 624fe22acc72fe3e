//! Prompt pattern helpers and output line normalization.

use regex::bytes::Regex;

/// Compile a prompt pattern string into a regex.
///
/// Patterns without an end anchor get `\s*$` appended so that a prompt
/// string echoed in the middle of output never terminates a read.
pub fn compile_prompt_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let pattern = if pattern.ends_with('$') {
        pattern.to_string()
    } else {
        format!("{}\\s*$", pattern)
    };

    Regex::new(&pattern)
}

/// Split raw shell output into lines.
///
/// Carriage returns and blank lines are dropped, and the first line is
/// removed when it is the echo of `command`. The trailing prompt line is
/// kept as the last element.
pub fn split_output(raw: &[u8], command: &str) -> Vec<String> {
    let text = String::from_utf8_lossy(raw);
    let mut lines = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .peekable();

    let command = command.trim();
    if !command.is_empty() && lines.peek().is_some_and(|first| first.trim_end().ends_with(command)) {
        lines.next();
    }

    lines.map(str::to_string).collect()
}

/// Whether `line` is a prompt according to `prompt`.
pub fn is_prompt_line(prompt: &Regex, line: &str) -> bool {
    prompt.is_match(line.trim_end().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_prompt_pattern() {
        let pattern = compile_prompt_pattern(r"sw1#").unwrap();
        assert!(pattern.is_match(b"sw1# "));
        assert!(!pattern.is_match(b"sw1# show run"));

        let pattern = compile_prompt_pattern(r"sw1#$").unwrap();
        assert!(pattern.is_match(b"sw1#"));
    }

    #[test]
    fn test_split_output_strips_echo_and_blanks() {
        let raw = b"description Office 12\r\n\r\nsw1(config-if)#";
        let lines = split_output(raw, "description Office 12");
        assert_eq!(lines, vec!["sw1(config-if)#"]);
    }

    #[test]
    fn test_split_output_keeps_device_messages() {
        let raw = b"speed 10000\r\n                 ^\r\n% Invalid input detected at '^' marker.\r\n\r\nsw1(config-if)#";
        let lines = split_output(raw, "speed 10000");
        assert_eq!(
            lines,
            vec![
                "                 ^",
                "% Invalid input detected at '^' marker.",
                "sw1(config-if)#",
            ]
        );
    }

    #[test]
    fn test_split_output_without_echo() {
        let lines = split_output(b"Gi1/0/1 x\nsw1#", "show interfaces status");
        assert_eq!(lines, vec!["Gi1/0/1 x", "sw1#"]);
    }
}
