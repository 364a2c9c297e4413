//! Conversion candidates and the paged selection cursor.

/// One conversion candidate.
///
/// `text` is the raw dictionary form (numeric entries keep their `#N`
/// template here); `output` is what gets committed and displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub midasi: String,
    pub okuri: bool,
    pub text: String,
    pub annotation: Option<String>,
    pub output: String,
}

impl Candidate {
    pub fn new(
        midasi: impl Into<String>,
        okuri: bool,
        text: impl Into<String>,
        annotation: Option<String>,
    ) -> Self {
        let text = text.into();
        Self {
            midasi: midasi.into(),
            okuri,
            output: text.clone(),
            text,
            annotation,
        }
    }
}

/// Candidate list with the conventional inline-then-paged cursor.
///
/// The first `page_start` candidates are offered one at a time; past that
/// the cursor jumps a whole page per step, and a lookup table UI would show
/// `page_size` candidates at once.
#[derive(Debug)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
    cursor: isize,
    page_start: usize,
    page_size: usize,
}

impl CandidateList {
    pub const DEFAULT_PAGE_START: usize = 4;
    pub const DEFAULT_PAGE_SIZE: usize = 7;

    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            cursor: -1,
            page_start: Self::DEFAULT_PAGE_START,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page_start(&self) -> usize {
        self.page_start
    }

    pub fn set_page_start(&mut self, page_start: usize) {
        self.page_start = page_start;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn cursor_pos(&self) -> isize {
        self.cursor
    }

    pub fn set_cursor_pos(&mut self, pos: isize) {
        if pos >= -1 && pos < self.candidates.len() as isize {
            self.cursor = pos;
        }
    }

    /// Replace the list contents; the cursor is reset to before the first
    /// candidate.
    pub fn set(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.cursor = -1;
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.cursor = -1;
    }

    /// Candidate at `index`; negative indices count from the end.
    pub fn get(&self, index: isize) -> Option<&Candidate> {
        let len = self.candidates.len() as isize;
        let index = if index < 0 { len + index } else { index };
        if (0..len).contains(&index) {
            self.candidates.get(index as usize)
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<&Candidate> {
        if self.cursor < 0 {
            return None;
        }
        self.candidates.get(self.cursor as usize)
    }

    /// Whether the cursor is in the paged region where a lookup table would
    /// be shown.
    pub fn page_visible(&self) -> bool {
        self.cursor >= self.page_start as isize
    }

    /// Range of indices on the page the cursor is on.
    pub fn page_range(&self) -> Option<std::ops::Range<usize>> {
        if !self.page_visible() {
            return None;
        }
        let cursor = self.cursor as usize;
        let offset = self.page_start + (cursor - self.page_start) / self.page_size * self.page_size;
        let end = (offset + self.page_size).min(self.candidates.len());
        Some(offset..end)
    }

    /// Advance the cursor: one step inside the inline region, one page past
    /// it. Returns false when the list is exhausted, leaving the cursor put.
    pub fn next(&mut self) -> bool {
        let step = if self.cursor < self.page_start as isize {
            1
        } else {
            self.page_size as isize
        };
        let pos = self.cursor + step;
        if pos >= self.candidates.len() as isize {
            return false;
        }
        self.cursor = pos;
        true
    }

    /// Step the cursor back, mirroring `next`.
    pub fn previous(&mut self) -> bool {
        let step = if self.cursor > self.page_start as isize {
            self.page_size as isize
        } else {
            1
        };
        let pos = self.cursor - step;
        if pos < 0 {
            return false;
        }
        self.cursor = pos;
        true
    }

    pub fn cursor_up(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn cursor_down(&mut self) -> bool {
        if self.cursor >= 0 && self.cursor + 1 < self.candidates.len() as isize {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn page_down(&mut self) -> bool {
        if !self.page_visible() {
            return false;
        }
        let pos = self.cursor + self.page_size as isize;
        if pos >= self.candidates.len() as isize {
            return false;
        }
        self.cursor = pos;
        true
    }

    pub fn page_up(&mut self) -> bool {
        if self.cursor < (self.page_start + self.page_size) as isize {
            return false;
        }
        self.cursor -= self.page_size as isize;
        true
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new()
    }
}
