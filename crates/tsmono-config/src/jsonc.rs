//! JSONC normalization for tsconfig files.
//!
//! tsconfig.json allows `//` and `/* */` comments plus trailing commas;
//! `serde_json` does not. These passes rewrite the source into strict JSON
//! while preserving string contents and line numbers.

/// Strip line and block comments, keeping newlines so error positions
/// stay meaningful.
pub fn strip_comments(input: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str { escaped: bool },
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(input.len());
    let mut state = State::Code;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::LineComment => {
                if ch == '\n' {
                    state = State::Code;
                    out.push(ch);
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                } else if ch == '\n' {
                    out.push(ch);
                }
            }
            State::Str { escaped } => {
                out.push(ch);
                state = match (escaped, ch) {
                    (true, _) => State::Str { escaped: false },
                    (false, '\\') => State::Str { escaped: true },
                    (false, '"') => State::Code,
                    _ => State::Str { escaped: false },
                };
            }
            State::Code => match ch {
                '"' => {
                    out.push(ch);
                    state = State::Str { escaped: false };
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => out.push(ch),
            },
        }
    }

    out
}

/// Drop commas that directly precede a closing `}` or `]`.
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                // Peek past whitespace; a closer means the comma is trailing.
                let mut lookahead = chars.clone();
                let next_token = loop {
                    match lookahead.next() {
                        Some(c) if c.is_whitespace() => continue,
                        other => break other,
                    }
                };
                match next_token {
                    Some('}') | Some(']') => {}
                    _ => out.push(ch),
                }
            }
            _ => out.push(ch),
        }
    }

    out
}
