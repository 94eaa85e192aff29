//! Wildcard patterns as understood by the engine's `wildcard` query.
//!
//! `*` matches any run of characters (including none), `?` exactly one,
//! and `\` makes the next character literal.

/// Escape the wildcard metacharacters in `text` so it matches literally.
pub fn escape_wildcard(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '?') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Returns `true` if `text` matches `pattern` in full.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    WildcardPattern::new(pattern).is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Any,
    One,
    Literal(char),
}

/// A compiled wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    tokens: Vec<Token>,
}

impl WildcardPattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            let token = match c {
                // A trailing backslash is a literal backslash.
                '\\' => Token::Literal(chars.next().unwrap_or('\\')),
                '*' => Token::Any,
                '?' => Token::One,
                other => Token::Literal(other),
            };
            if token == Token::Any && tokens.last() == Some(&Token::Any) {
                continue;
            }
            tokens.push(token);
        }
        Self { tokens }
    }

    /// Returns `true` if `text` matches the whole pattern.
    pub fn is_match(&self, text: &str) -> bool {
        let text: Vec<char> = text.chars().collect();
        let (mut p, mut t) = (0, 0);
        let mut backtrack: Option<(usize, usize)> = None;

        while t < text.len() {
            match self.tokens.get(p) {
                Some(Token::Literal(c)) if *c == text[t] => {
                    p += 1;
                    t += 1;
                }
                Some(Token::One) => {
                    p += 1;
                    t += 1;
                }
                Some(Token::Any) => {
                    backtrack = Some((p, t));
                    p += 1;
                }
                _ => match backtrack {
                    Some((star, consumed)) => {
                        p = star + 1;
                        t = consumed + 1;
                        backtrack = Some((star, consumed + 1));
                    }
                    None => return false,
                },
            }
        }

        self.tokens[p..].iter().all(|token| *token == Token::Any)
    }
}

// ============================================================================
// Tests
// ============================================================================
