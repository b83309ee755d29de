/// Lazily yields the word-by-word reveal frames of a text.
///
/// Tokens are produced by a plain split on `' '`, so runs of spaces and
/// leading/trailing spaces become empty tokens. Frame `k` is the first `k`
/// tokens joined with single spaces, which is always the prefix of the text that
/// ends right before the `k`-th space. The final frame is the whole text.
#[derive(Debug, Clone)]
pub struct RevealSequence {
    text: String,
    next_start: Option<usize>,
}

impl RevealSequence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            next_start: Some(0),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True once the final frame has been yielded.
    pub fn is_exhausted(&self) -> bool {
        self.next_start.is_none()
    }

    /// Total number of frames, i.e. the number of single-space tokens.
    pub fn frame_count(&self) -> usize {
        self.text.matches(' ').count() + 1
    }
}

impl Iterator for RevealSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let start = self.next_start?;
        match self.text[start..].find(' ') {
            Some(offset) => {
                let end = start + offset;
                self.next_start = Some(end + 1);
                Some(self.text[..end].to_string())
            }
            None => {
                self.next_start = None;
                Some(self.text.clone())
            }
        }
    }
}
