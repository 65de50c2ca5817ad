/// Blank out `#`, `//` and `/* */` comments that appear outside JSON strings.
///
/// Kea accepts all three comment styles in its configuration files. Every
/// removed byte is replaced by a space and newlines are kept, so parser
/// positions reported on the stripped text still match the input.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut state = State::Code;

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    state = State::String;
                    out.push(c);
                }
                '#' => {
                    state = State::LineComment;
                    out.push(' ');
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                    out.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            State::String => {
                out.push(c);
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    '"' => state = State::Code,
                    _ => {}
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }

    out
}

#[derive(Clone, Copy)]
enum State {
    Code,
    String,
    LineComment,
    BlockComment,
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}

#[cfg(test)]
mod tests {
    use super::strip_comments;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_all_comment_styles() {
        let raw = "{\n  # hash\n  \"a\": 1, // slash\n  /* block */ \"b\": 2\n}";
        let stripped = strip_comments(raw);
        let value: serde_json::Value = serde_json::from_str(&stripped).expect("json");
        assert_eq!(value, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn keeps_comment_markers_inside_strings() {
        let raw = r#"{"url": "http://host/#frag", "q": "say \"/*hi*/\""}"#;
        assert_eq!(strip_comments(raw), raw);
    }

    #[test]
    fn preserves_line_and_column_layout() {
        let raw = "/* one\n two */ {\n  \"é\": 1 // ünïcode\n}";
        let stripped = strip_comments(raw);
        assert_eq!(stripped.len(), raw.len());
        assert_eq!(stripped.lines().count(), raw.lines().count());
    }

    #[test]
    fn unterminated_block_comment_swallows_rest() {
        assert_eq!(strip_comments("1 /* open"), "1        ");
    }
}
