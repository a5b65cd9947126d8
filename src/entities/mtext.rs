//! MTEXT content without inline formatting

use super::embedded::TEXT_CHUNK;
use super::Entity;
use crate::error::Result;

impl Entity {
    /// MTEXT content without formatting, `3` chunks followed by the `1` tag
    pub fn plain_text(&self) -> Result<String> {
        let mut content: String = self
            .unknown_tags()
            .into_iter()
            .filter(|t| t.code() == TEXT_CHUNK)
            .filter_map(|t| t.value().as_str())
            .collect();
        content.push_str(self.dxf().get_str("text")?);
        Ok(plain_mtext(&content))
    }
}

/// Remove inline formatting codes from MTEXT content.
///
/// `\P` becomes a line break, `\~` a space, stacked fractions `\Sa^b;`
/// become `a/b`. Font, height, color and similar property codes are removed
/// up to their terminating `;`, group braces are dropped and escaped
/// characters (`\\`, `\{`, `\}`) are kept literally.
pub fn plain_mtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {}
            '\\' => match chars.next() {
                Some('P') | Some('X') => out.push('\n'),
                Some('~') => out.push(' '),
                Some(escaped @ ('\\' | '{' | '}')) => out.push(escaped),
                // on/off toggles: underline, overline, strike-through
                Some('L' | 'l' | 'O' | 'o' | 'K' | 'k') => {}
                Some('S') => {
                    let mut stacked = String::new();
                    for s in chars.by_ref() {
                        if s == ';' {
                            break;
                        }
                        stacked.push(s);
                    }
                    out.push_str(&stacked.replace(['^', '#'], "/"));
                }
                Some('A' | 'C' | 'c' | 'f' | 'F' | 'H' | 'Q' | 'T' | 'W' | 'p') => {
                    for s in chars.by_ref() {
                        if s == ';' {
                            break;
                        }
                    }
                }
                Some('U') if chars.peek() == Some(&'+') => {
                    chars.next();
                    let hex: String = chars.by_ref().take(4).collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(ch) => out.push(ch),
                        None => {
                            out.push_str("\\U+");
                            out.push_str(&hex);
                        }
                    }
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        assert_eq!(plain_mtext("TEST VENUE\\PTEST FLOOR PLAN"), "TEST VENUE\nTEST FLOOR PLAN");
    }

    #[test]
    fn test_formatting_removed() {
        assert_eq!(plain_mtext("{\\fArial|b1|i0;Bold} text"), "Bold text");
        assert_eq!(plain_mtext("\\H2.5x;big\\~gap"), "big gap");
        assert_eq!(plain_mtext("\\C1;red \\Lunder\\l"), "red under");
    }

    #[test]
    fn test_escapes_and_stacking() {
        assert_eq!(plain_mtext("a\\{b\\}c\\\\"), "a{b}c\\");
        assert_eq!(plain_mtext("1\\S1^2;"), "11/2");
        assert_eq!(plain_mtext("\\U+00B0C"), "\u{b0}C");
    }
}
