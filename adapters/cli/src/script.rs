//! Scripted player input: one character per frame.

use anyhow::{bail, Result};
use push_knight_core::Direction;

/// Parses `w`/`a`/`s`/`d` into moves and `.` into an idle frame.
///
/// Whitespace is ignored so long scripts may be wrapped.
pub(crate) fn parse(script: &str) -> Result<Vec<Option<Direction>>> {
    let mut frames = Vec::with_capacity(script.len());
    for (position, glyph) in script.chars().enumerate() {
        let frame = match glyph.to_ascii_lowercase() {
            'w' => Some(Direction::North),
            'a' => Some(Direction::West),
            's' => Some(Direction::South),
            'd' => Some(Direction::East),
            '.' => None,
            blank if blank.is_whitespace() => continue,
            other => bail!("unknown move {other:?} at position {position}; expected w, a, s, d or ."),
        };
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_map_to_directions() {
        assert_eq!(
            parse("wa.SD").expect("valid script"),
            vec![
                Some(Direction::North),
                Some(Direction::West),
                None,
                Some(Direction::South),
                Some(Direction::East),
            ]
        );
    }

    #[test]
    fn whitespace_is_skipped() {
        assert_eq!(parse(" d \n d ").expect("valid script").len(), 2);
        assert!(parse("").expect("empty script").is_empty());
    }

    #[test]
    fn unknown_letters_are_rejected() {
        let error = parse("wdx").expect_err("x is not a move");
        assert!(error.to_string().contains("position 2"));
    }
}
