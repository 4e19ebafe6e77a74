//! Renderer-safety escaping for MDX.
//!
//! A small state machine instead of chained regex passes:
//! - across lines: inside / outside a fenced code block
//! - within a line: inline code spans vs. plain characters
//!
//! Escaping decisions always look at the original text, never at output
//! produced earlier in the same pass, so already-escaped input is stable.

/// Escape numeric `<`/`>` comparisons and stray `{...}` spans outside code.
pub fn escape_for_mdx(content: &str) -> String {
    let mut open_fence: Option<&str> = None;
    let mut lines: Vec<String> = Vec::new();

    for line in content.split('\n') {
        if let Some(token) = fence_token(line) {
            match open_fence {
                None => open_fence = Some(token),
                Some(open) if line.starts_with(open) => open_fence = None,
                Some(_) => {}
            }
            lines.push(line.to_string());
            continue;
        }

        if open_fence.is_some() {
            lines.push(line.to_string());
        } else {
            lines.push(escape_line(line));
        }
    }

    lines.join("\n")
}

/// Leading run of three or more backticks or tildes.
fn fence_token(line: &str) -> Option<&str> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.len() - line.trim_start_matches(marker).len();
    (len >= 3).then(|| &line[..len])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Char(char),
    /// Backtick-delimited span, delimiters included. Copied verbatim.
    Code(&'a str),
}

/// Split a line into plain characters and non-empty inline code spans.
///
/// Each backtick is paired with the next backtick on the same line; an empty
/// pair (two adjacent backticks) is not a span.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::with_capacity(line.len());
    let mut i = 0;

    while let Some(c) = line[i..].chars().next() {
        if c == '`' {
            let body = &line[i + 1..];
            if let Some(close) = body.find('`').filter(|&close| close > 0) {
                let end = i + close + 2;
                tokens.push(Token::Code(&line[i..end]));
                i = end;
                continue;
            }
        }
        tokens.push(Token::Char(c));
        i += c.len_utf8();
    }

    tokens
}

fn escape_line(line: &str) -> String {
    let tokens = tokenize(line);
    let mut out = String::with_capacity(line.len() + 8);
    // Closing index of the brace span being copied, and whether it is escaped.
    let mut brace: Option<(usize, bool)> = None;

    for (i, token) in tokens.iter().enumerate() {
        let c = match *token {
            Token::Code(span) => {
                out.push_str(span);
                continue;
            }
            Token::Char(c) => c,
        };
        let after_backslash = i > 0 && tokens[i - 1] == Token::Char('\\');

        match c {
            '<' | '>'
                if !after_backslash
                    && matches!(tokens.get(i + 1), Some(Token::Char(d)) if d.is_ascii_digit()) =>
            {
                out.push('\\');
                out.push(c);
            }
            '{' if brace.is_none() && !after_backslash => {
                if let Some(close) = closing_brace(&tokens, i) {
                    let stray = !tokens[i + 1..close]
                        .iter()
                        .any(|t| matches!(t, Token::Char(':' | '=')));
                    if stray {
                        out.push('\\');
                    }
                    brace = Some((close, stray));
                }
                out.push('{');
            }
            '}' if brace.is_some_and(|(close, _)| close == i) => {
                if brace.is_some_and(|(_, stray)| stray) {
                    out.push('\\');
                }
                brace = None;
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    out
}

fn closing_brace(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    tokens[open + 1..]
        .iter()
        .position(|t| *t == Token::Char('}'))
        .map(|offset| open + 1 + offset)
}
