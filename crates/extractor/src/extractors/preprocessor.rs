/// A slice of the document text and its byte offset in the full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    pub offset: usize,
    pub text: &'a str,
}

pub struct Preprocessor;

impl Preprocessor {
    /// Splits `text` into consecutive chunks of at most `max_chars` bytes.
    ///
    /// Cuts prefer a line break, then a sentence end, then whitespace, and
    /// never split a UTF-8 character. Concatenating the chunks yields `text`.
    pub fn chunk_text(text: &str, max_chars: usize) -> Vec<TextChunk<'_>> {
        let max_chars = max_chars.max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < text.len() {
            let remaining = &text[start..];
            if remaining.len() <= max_chars {
                chunks.push(TextChunk {
                    offset: start,
                    text: remaining,
                });
                break;
            }

            let limit = Self::char_boundary_at_or_before(remaining, max_chars);
            let cut = Self::cut_point(&remaining[..limit]).unwrap_or(limit);

            chunks.push(TextChunk {
                offset: start,
                text: &remaining[..cut],
            });
            start += cut;
        }

        if chunks.len() > 1 {
            tracing::debug!(
                "Split {} bytes of text into {} chunks",
                text.len(),
                chunks.len()
            );
        }
        chunks
    }

    fn cut_point(window: &str) -> Option<usize> {
        if let Some(pos) = window.rfind('\n') {
            return Some(pos + 1);
        }

        let sentence_end = [". ", "! ", "? "]
            .iter()
            .filter_map(|marker| window.rfind(marker))
            .max();
        if let Some(pos) = sentence_end {
            return Some(pos + 2);
        }

        window
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(pos, c)| pos + c.len_utf8())
    }

    /// Largest char boundary `<= max`, but always past the first character.
    fn char_boundary_at_or_before(text: &str, max: usize) -> usize {
        let mut index = max.min(text.len());
        while index > 0 && !text.is_char_boundary(index) {
            index -= 1;
        }
        if index == 0 {
            text.chars().next().map_or(text.len(), char::len_utf8)
        } else {
            index
        }
    }
}
