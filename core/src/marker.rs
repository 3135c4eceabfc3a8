//! Marked-line detection.
//!
//! A mark is a plain text pattern, never a parser construct: an inline
//! marker anchored to the end of the line (`x = 1  #=`), or a standalone
//! marker filling the whole line (`# <<<`). Detection tolerates whitespace
//! around and inside the token, matching how the patterns were historically
//! written as anchored regexes.

/// Marker tokens of one session. The defaults recognize `#=` and `# <<<`
/// at end of line, and a lone `# <<<` line.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Tokens matched end-anchored (after optional trailing whitespace).
    pub inline: Vec<String>,
    /// Token matched as the sole content of a line.
    pub standalone: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            inline: vec!["#=".to_string(), "# <<<".to_string()],
            standalone: "# <<<".to_string(),
        }
    }
}

impl MarkerConfig {
    /// Does this line request an annotation?
    pub fn is_marked(&self, line: &str) -> bool {
        self.inline.iter().any(|token| ends_with_token(line, token))
            || self.is_standalone(line)
    }

    /// Is this line nothing but the standalone marker?
    pub fn is_standalone(&self, line: &str) -> bool {
        match strip_token_suffix(line, &self.standalone) {
            Some(prefix) => prefix.trim().is_empty(),
            None => false,
        }
    }
}

fn ends_with_token(line: &str, token: &str) -> bool {
    strip_token_suffix(line, token).is_some()
}

/// Match `token` at the end of `line`, ignoring trailing whitespace and
/// allowing whitespace runs between the token's significant characters.
/// Returns the unmatched prefix on success.
fn strip_token_suffix<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    let mut rest = line.trim_end();
    let mut expected: Vec<char> = token.split_whitespace().flat_map(str::chars).collect();

    while let Some(c) = expected.pop() {
        rest = rest.trim_end();
        rest = rest.strip_suffix(c)?;
    }
    Some(rest)
}
