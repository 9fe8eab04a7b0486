//! Splitting source text into bounded segments.
//!
//! Translation services reject requests above a length limit, so long text
//! is cut into fixed-stride pieces of at most `max_len` characters. Lengths
//! are counted in `char`s, which keeps every cut on a UTF-8 boundary.
//!
//! Segments are contiguous and non-overlapping: concatenating them in order
//! gives back the input exactly. Empty input produces no segments.

use std::iter::FusedIterator;

use crate::config::DEFAULT_MAX_CHUNK_LENGTH;
use crate::error::{Error, Result};

/// A contiguous slice of the source text with its position in the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Position in the segment sequence (0-indexed)
    pub index: usize,
    pub text: &'a str,
}

impl Segment<'_> {
    /// Whitespace-only segments are not sent for translation
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Fixed-stride text splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_len: usize,
}

impl Chunker {
    /// Create a chunker producing segments of at most `max_len` characters.
    pub fn new(max_len: usize) -> Result<Self> {
        if max_len == 0 {
            return Err(Error::ConfigInvalid {
                field: "max_chunk_length".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { max_len })
    }

    /// Lazily split `text`. Text no longer than `max_len` comes back as a
    /// single segment equal to the whole input.
    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            rest: text,
            max_len: self.max_len,
            next_index: 0,
            remaining: self.segment_count(text),
        }
    }

    /// Number of segments [`Chunker::chunks`] yields for `text`
    pub fn segment_count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.max_len)
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_CHUNK_LENGTH,
        }
    }
}

/// Iterator over the segments of a text.
///
/// Cloning it before (or during) iteration gives an independent cursor, so
/// the sequence can be replayed without re-splitting.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    max_len: usize,
    next_index: usize,
    remaining: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let cut = self
            .rest
            .char_indices()
            .nth(self.max_len)
            .map_or(self.rest.len(), |(offset, _)| offset);
        let (text, rest) = self.rest.split_at(cut);

        let segment = Segment {
            index: self.next_index,
            text,
        };
        self.rest = rest;
        self.next_index += 1;
        self.remaining = self.remaining.saturating_sub(1);
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}

impl FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(max_len: usize) -> Chunker {
        Chunker::new(max_len).unwrap()
    }

    #[test]
    fn test_short_text_is_single_segment() {
        let segments: Vec<_> = Chunker::default().chunks("Hello world").collect();
        assert_eq!(segments, vec![Segment { index: 0, text: "Hello world" }]);
    }

    #[test]
    fn test_exact_limit_is_single_segment() {
        let text = "abcde";
        let segments: Vec<_> = chunker(5).chunks(text).collect();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, text);
    }

    #[test]
    fn test_fixed_stride_split() {
        let text = "a".repeat(9000);
        let segments: Vec<_> = Chunker::default().chunks(&text).collect();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.char_len() == 4500));
        assert_eq!(segments[1].index, 1);
    }

    #[test]
    fn test_last_segment_holds_remainder() {
        let texts: Vec<_> = chunker(4).chunks("abcdefghij").map(|s| s.text).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_concatenation_is_lossless() {
        let text = "Line one.\n\n   \nLine two with more words.\tTabs\r\nand CRLF.";
        for max_len in 1..=text.len() + 1 {
            let joined: String = chunker(max_len).chunks(text).map(|s| s.text).collect();
            assert_eq!(joined, text, "max_len = {max_len}");
        }
    }

    #[test]
    fn test_multibyte_text_splits_on_chars() {
        let text = "ආයුබෝවන් ලෝකය";
        let segments: Vec<_> = chunker(3).chunks(text).collect();
        assert!(segments.iter().all(|s| s.char_len() <= 3));
        assert_eq!(segments.len(), text.chars().count().div_ceil(3));
        let joined: String = segments.iter().map(|s| s.text).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert_eq!(Chunker::default().chunks("").count(), 0);
        assert_eq!(Chunker::default().segment_count(""), 0);
    }

    #[test]
    fn test_whitespace_text_is_chunked_like_any_text() {
        let segments: Vec<_> = chunker(2).chunks("   ").collect();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(Segment::is_blank));
    }

    #[test]
    fn test_chunks_are_restartable() {
        let chunks = chunker(3).chunks("abcdefgh");
        let first: Vec<_> = chunks.clone().collect();
        let second: Vec<_> = chunks.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exact_size_hint() {
        let mut chunks = chunker(3).chunks("abcdefgh");
        assert_eq!(chunks.len(), 3);
        chunks.next();
        assert_eq!(chunks.len(), 2);
        chunks.by_ref().for_each(drop);
        assert_eq!(chunks.len(), 0);
        assert_eq!(chunks.next(), None);
    }

    #[test]
    fn test_zero_max_len_rejected() {
        assert!(matches!(Chunker::new(0), Err(Error::ConfigInvalid { .. })));
    }
}
