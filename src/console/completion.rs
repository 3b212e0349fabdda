//! Command-name tab completion.
//!
//! Only the leading word of a line is ever completed. Candidates are found by
//! case-sensitive prefix match in table order, capped at [`MAX_MATCHES`].

use heapless::Vec;

use super::line_buffer::floor_char_boundary;

/// Maximum candidates reported per request.
pub const MAX_MATCHES: usize = 10;

/// Candidate names for one request, in table order.
pub type Matches<'a> = Vec<&'a str, MAX_MATCHES>;

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<'a> {
    /// Not completable here: empty line, cursor past the first word, or no
    /// candidate matches.
    None,
    /// The word already equals the only candidate.
    AlreadyComplete,
    /// Exactly one candidate; replace the word with it.
    Unique(&'a str),
    /// Several candidates sharing the first `common_len` bytes.
    Ambiguous {
        matches: Matches<'a>,
        common_len: usize,
    },
}

/// Collect names that start with `prefix`. An empty prefix matches nothing.
pub fn find_matches<'a, I>(prefix: &str, names: I) -> Matches<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut matches = Matches::new();
    if prefix.is_empty() {
        return matches;
    }

    for name in names.into_iter().filter(|n| n.starts_with(prefix)) {
        if matches.push(name).is_err() {
            break;
        }
    }
    matches
}

/// Length in bytes of the longest prefix shared by every name.
///
/// Always a char boundary, so the result can slice any of the names.
pub fn common_prefix_len(names: &[&str]) -> usize {
    let Some((first, rest)) = names.split_first() else {
        return 0;
    };

    let common = rest.iter().fold(first.len(), |common, name| {
        first
            .bytes()
            .zip(name.bytes())
            .take(common)
            .take_while(|(a, b)| a == b)
            .count()
    });
    floor_char_boundary(first, common)
}

/// Decide how to complete `line`, whose cursor is at its end.
pub fn complete<'a, I>(line: &str, names: I) -> Completion<'a>
where
    I: IntoIterator<Item = &'a str>,
{
    // Completion is restricted to the first word.
    if line.is_empty() || line.contains(' ') {
        return Completion::None;
    }

    let matches = find_matches(line, names);
    match matches.len() {
        0 => Completion::None,
        1 if matches[0] == line => Completion::AlreadyComplete,
        1 => Completion::Unique(matches[0]),
        _ => {
            let common_len = common_prefix_len(&matches);
            Completion::Ambiguous { matches, common_len }
        }
    }
}
