//! Command history.
//!
//! Fixed array of up to `H` lines, stored oldest to newest. When full the
//! oldest entry is shifted out to admit a new one. Static allocation only.

use super::line_buffer::{floor_char_boundary, LINE_SIZE};

/// Number of history entries.
pub const HISTORY_SIZE: usize = 10;

/// Browse direction for [`History::recall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Up arrow: toward older entries, stops at the oldest.
    Older,
    /// Down arrow: toward newer entries, then back to a fresh line.
    Newer,
}

/// What the editor should show after a recall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall<'a> {
    /// Nothing to do (empty history, or `Newer` while not browsing).
    Unchanged,
    /// Display this entry.
    Entry(&'a str),
    /// Browsing ended past the newest entry: display an empty line.
    Fresh,
}

/// Outcome of [`History::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// Appended to free space.
    Added,
    /// Appended after shifting out the oldest entry.
    Evicted,
    /// Same as the newest entry, not stored.
    Duplicate,
    /// Empty line, not stored.
    Empty,
}

/// Command history ring.
pub struct History<const H: usize = HISTORY_SIZE, const N: usize = LINE_SIZE> {
    /// Lines, index 0 is the oldest.
    entries: [[u8; N]; H],
    /// Length of each entry
    lengths: [usize; H],
    /// Number of valid entries
    count: usize,
    /// Entry currently shown, `None` while editing a fresh line.
    browse: Option<usize>,
}

impl<const H: usize, const N: usize> History<H, N> {
    /// Create empty history
    pub const fn new() -> Self {
        assert!(H > 0, "history needs at least one slot");
        assert!(N > 1, "history lines need room for one character");

        Self {
            entries: [[0u8; N]; H],
            lengths: [0; H],
            count: 0,
            browse: None,
        }
    }

    /// Record a submitted line.
    ///
    /// Empty lines and exact repeats of the newest entry are skipped. Lines
    /// longer than `N - 1` bytes are truncated at a character boundary.
    /// Browsing always stops.
    pub fn record(&mut self, line: &str) -> Recorded {
        self.browse = None;

        if line.is_empty() {
            return Recorded::Empty;
        }
        if self.newest() == Some(line) {
            return Recorded::Duplicate;
        }

        let outcome = if self.count == H {
            self.entries.copy_within(1.., 0);
            self.lengths.copy_within(1.., 0);
            self.count -= 1;
            Recorded::Evicted
        } else {
            Recorded::Added
        };

        let bytes = line.as_bytes();
        let len = floor_char_boundary(line, N - 1);
        let slot = &mut self.entries[self.count];
        slot[..len].copy_from_slice(&bytes[..len]);
        slot[len..].fill(0);
        self.lengths[self.count] = len;
        self.count += 1;

        outcome
    }

    /// Step the browse position.
    pub fn recall(&mut self, direction: Direction) -> Recall<'_> {
        if self.count == 0 {
            return Recall::Unchanged;
        }

        match direction {
            Direction::Older => {
                let pos = match self.browse {
                    None => self.count - 1,
                    Some(p) => p.saturating_sub(1),
                };
                self.browse = Some(pos);
                self.entry(pos).map_or(Recall::Unchanged, Recall::Entry)
            }
            Direction::Newer => match self.browse {
                None => Recall::Unchanged,
                Some(p) if p + 1 >= self.count => {
                    self.browse = None;
                    Recall::Fresh
                }
                Some(p) => {
                    self.browse = Some(p + 1);
                    self.entry(p + 1).map_or(Recall::Unchanged, Recall::Entry)
                }
            },
        }
    }

    /// Stop browsing (next `Older` starts from the newest entry again).
    pub fn reset_browse(&mut self) {
        self.browse = None;
    }

    /// Index (0 = oldest) of the entry being shown, if browsing.
    pub fn browse_position(&self) -> Option<usize> {
        self.browse
    }

    /// Entry by index, 0 = oldest.
    pub fn entry(&self, idx: usize) -> Option<&str> {
        if idx >= self.count {
            return None;
        }
        core::str::from_utf8(&self.entries[idx][..self.lengths[idx]]).ok()
    }

    /// Most recently recorded line.
    pub fn newest(&self) -> Option<&str> {
        self.count.checked_sub(1).and_then(|i| self.entry(i))
    }

    /// Entries oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.count).filter_map(move |i| self.entry(i))
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == H
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.count = 0;
        self.browse = None;
    }
}

impl<const H: usize, const N: usize> Default for History<H, N> {
    fn default() -> Self {
        Self::new()
    }
}
