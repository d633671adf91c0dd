//! Splits constraint text into logical entries.

/// One logical entry of a constraint file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// An empty line.
    Blank,
    /// A full-line comment, without the leading `#`.
    Comment(String),
    /// A constraint line (continuations joined), numbered by its first
    /// physical line.
    Line { number: usize, text: String },
}

/// Iterates over the logical entries of `text`.
///
/// A physical line ending in `\` is joined with the next one.
pub fn entries(text: &str) -> Entries<'_> {
    Entries {
        lines: text.lines().enumerate(),
    }
}

pub struct Entries<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        let (index, first) = self.lines.next()?;
        let trimmed = first.trim();

        if trimmed.is_empty() {
            return Some(Entry::Blank);
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            return Some(Entry::Comment(comment.trim().to_string()));
        }

        let mut text = String::new();
        let mut current = first.trim_end();
        loop {
            match current.strip_suffix('\\') {
                Some(head) => {
                    text.push_str(head);
                    text.push(' ');
                    match self.lines.next() {
                        Some((_, next)) => current = next.trim_end(),
                        None => break,
                    }
                }
                None => {
                    text.push_str(current);
                    break;
                }
            }
        }

        Some(Entry::Line {
            number: index + 1,
            text: text.trim().to_string(),
        })
    }
}

/// Removes a trailing `# comment` that is preceded by whitespace and
/// sits outside quotes.
pub fn strip_inline_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut previous_is_space = false;

    for (i, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '\'' || ch == '"' => quote = Some(ch),
            None if ch == '#' && previous_is_space => return line[..i].trim_end(),
            None => {}
        }
        previous_is_space = ch.is_whitespace();
    }
    line
}
