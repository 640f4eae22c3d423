//! Front matter splitting and joining
//!
//! The metadata block is carried through migration byte for byte; only the
//! body is compiled. A leading byte order mark is split off and written back
//! by [`Document::join`].

const DELIMITER: &str = "---";
const BOM: char = '\u{feff}';

/// A document split into its front matter and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Whether the text started with a byte order mark
    pub bom: bool,
    /// Text between the delimiters, each line keeping its line ending
    pub matter: Option<String>,
    pub body: String,
}

impl Document {
    /// Split `text` into front matter and body.
    ///
    /// Front matter starts with a `---` line on the first line of the
    /// document and ends at the next `---` line. Without a closing line the
    /// whole text is body.
    pub fn split(text: &str) -> Self {
        let (bom, text) = match text.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let Some(rest) = strip_delimiter_line(text) else {
            return Self::body_only(bom, text);
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if is_delimiter(line) {
                return Self {
                    bom,
                    matter: Some(rest[..offset].to_string()),
                    body: rest[offset + line.len()..].to_string(),
                };
            }
            offset += line.len();
        }

        Self::body_only(bom, text)
    }

    fn body_only(bom: bool, text: &str) -> Self {
        Self {
            bom,
            matter: None,
            body: text.to_string(),
        }
    }

    /// Join front matter and body, with a blank line after the closing
    /// delimiter
    pub fn join(&self) -> String {
        let mut out = String::with_capacity(
            self.matter.as_ref().map_or(0, String::len) + self.body.len() + 13,
        );
        if self.bom {
            out.push(BOM);
        }

        let Some(matter) = &self.matter else {
            out.push_str(&self.body);
            return out;
        };

        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(matter);
        if !matter.is_empty() && !matter.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push_str("\n\n");
        out.push_str(&self.body);
        out
    }

    /// A copy with the body replaced
    pub fn with_body(&self, body: String) -> Self {
        Self {
            bom: self.bom,
            matter: self.matter.clone(),
            body,
        }
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// The text after an opening delimiter line, if `text` starts with one
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let line_end = text.find('\n')?;
    if is_delimiter(&text[..line_end]) {
        Some(&text[line_end + 1..])
    } else {
        None
    }
}
