//! Deterministic source formatting for the generated startup module
//!
//! Indentation is recomputed from bracket nesting alone, so the input's own
//! indentation never leaks through and formatting twice is a no-op.

const INDENT: &str = "  ";

fn is_opener(c: char) -> bool {
    matches!(c, '(' | '[' | '{')
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Collapse whitespace outside literals/comments and collect bracket chars
fn scan_line(line: &str) -> (String, Vec<char>) {
    let mut normalized = String::with_capacity(line.len());
    let mut brackets = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut last_was_space = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            normalized.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                normalized.push(c);
                last_was_space = false;
            }
            '/' if chars.peek() == Some(&'/') => {
                // line comment: keep verbatim, no more brackets on this line
                normalized.push(c);
                normalized.extend(chars.by_ref());
                break;
            }
            c if c.is_whitespace() => {
                if !last_was_space {
                    normalized.push(' ');
                    last_was_space = true;
                }
            }
            c => {
                if is_opener(c) || is_closer(c) {
                    brackets.push(c);
                }
                normalized.push(c);
                last_was_space = false;
            }
        }
    }

    (normalized.trim_end().to_string(), brackets)
}

fn close_level(levels: &mut Vec<usize>) {
    if let Some(count) = levels.last_mut() {
        *count -= 1;
        if *count == 0 {
            levels.pop();
        }
    }
}

/// Reindent and normalize spacing of JS/TS source
///
/// - two spaces per nesting level; brackets opened on one line add one level
/// - runs of whitespace outside literals become a single space
/// - consecutive blank lines collapse, leading/trailing blanks are dropped
/// - output ends with exactly one newline
pub fn format_source(source: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    // open bracket count per indentation level
    let mut levels: Vec<usize> = Vec::new();
    let mut pending_blank = false;

    for raw in source.lines() {
        let (line, brackets) = scan_line(raw.trim());
        if line.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }

        let leading = line
            .chars()
            .take_while(|c| is_closer(*c) || *c == ' ')
            .filter(|c| is_closer(*c))
            .count();

        for _ in 0..leading {
            close_level(&mut levels);
        }
        let indent = levels.len();

        for &c in &brackets[leading..] {
            if !is_opener(c) {
                close_level(&mut levels);
            } else if levels.len() > indent {
                // already opened a level on this line
                if let Some(count) = levels.last_mut() {
                    *count += 1;
                }
            } else {
                levels.push(1);
            }
        }

        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(format!("{}{}", INDENT.repeat(indent), line));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reindents_by_nesting() {
        let input = "module.exports = async () => {\nawait run(\nnew Set([\n{\ninstance: A,\n},\n]),\n);\n};";
        let expected = "module.exports = async () => {\n  await run(\n    new Set([\n      {\n        instance: A,\n      },\n    ]),\n  );\n};\n";
        assert_eq!(format_source(input), expected);
    }

    #[test]
    fn test_collapses_spacing_outside_literals() {
        let input = "const {  registerBulk }  =   require('@bitbeat/core');\nthrow  new Error('a   b');";
        let expected =
            "const { registerBulk } = require('@bitbeat/core');\nthrow new Error('a   b');\n";
        assert_eq!(format_source(input), expected);
    }

    #[test]
    fn test_brackets_in_strings_and_comments_ignored() {
        let input = "if (x) {\n// closes } here ( not really\nlog('}{)(');\n}";
        let expected = "if (x) {\n  // closes } here ( not really\n  log('}{)(');\n}\n";
        assert_eq!(format_source(input), expected);
    }

    #[test]
    fn test_blank_lines_collapse_and_trim() {
        let input = "\n\n\na();\n\n\n\nb();\n\n";
        assert_eq!(format_source(input), "a();\n\nb();\n");
    }

    #[test]
    fn test_same_line_open_and_close() {
        let input = "x.hook = () => {\ny(a).z({\nk: 1,\n});\n};";
        let expected = "x.hook = () => {\n  y(a).z({\n    k: 1,\n  });\n};\n";
        assert_eq!(format_source(input), expected);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let inputs = [
            "  a(  {\n\tb:   [1,\n2],\n     }  )\n\n\n",
            "export default async () => {\nconst s = `x  y`;\n}",
            "})\n}\n{",
            "",
        ];
        for input in inputs {
            let once = format_source(input);
            assert_eq!(format_source(&once), once);
        }
    }
}
