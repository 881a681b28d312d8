//! Parser for the plain-text level format.

use snaze_core::{Position, TileKind};
use thiserror::Error;

use crate::grid::Grid;

/// Largest accepted row or column count.
pub const MAX_DIMENSION: usize = 100;

/// Reasons a level stream cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// A block header was not two integers.
    #[error("line {line}: expected a `rows cols` header, found {found:?}")]
    InvalidHeader {
        /// 1-based line number of the header.
        line: usize,
        /// Text of the offending line.
        found: String,
    },
    /// A block header named dimensions outside `[1, 100]`.
    #[error("line {line}: level dimensions {rows}x{columns} must each lie in [1, 100]")]
    DimensionsOutOfRange {
        /// 1-based line number of the header.
        line: usize,
        /// Declared row count.
        rows: usize,
        /// Declared column count.
        columns: usize,
    },
    /// The stream ended before every declared row was read.
    #[error("line {line}: level declares {expected} rows but only {found} follow")]
    TruncatedLevel {
        /// 1-based line number of the block header.
        line: usize,
        /// Declared row count.
        expected: usize,
        /// Rows actually present.
        found: usize,
    },
    /// A row contained a character outside the level alphabet.
    #[error("line {line}: illegal symbol {symbol:?}")]
    IllegalSymbol {
        /// 1-based line number of the row.
        line: usize,
        /// Offending character.
        symbol: char,
    },
    /// A row held more tiles than the declared column count.
    #[error("line {line}: row has {length} tiles but the level declares {columns} columns")]
    RowTooLong {
        /// 1-based line number of the row.
        line: usize,
        /// Tiles found on the row.
        length: usize,
        /// Declared column count.
        columns: usize,
    },
    /// A block contained more than one spawn marker.
    #[error("line {line}: a level may contain only one spawn marker '*'")]
    MultipleSpawns {
        /// 1-based line number of the second marker.
        line: usize,
    },
    /// The stream yielded no level with a spawn marker.
    #[error("no valid level found, every level needs a spawn marker '*'")]
    NoLevels,
}

/// Parses every level block in `source`, in file order.
///
/// Blocks without a spawn marker are skipped. Any other defect rejects the
/// whole stream.
pub fn parse_levels(source: &str) -> Result<Vec<Grid>, LevelError> {
    let mut lines = source
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .enumerate()
        .map(|(index, line)| (index + 1, line));
    let mut levels = Vec::new();

    while let Some((header_line, header)) =
        lines.by_ref().find(|(_, line)| !line.trim().is_empty())
    {
        let (rows, columns) = parse_header(header_line, header)?;

        let mut tiles = Vec::with_capacity(rows * columns);
        let mut spawn = None;

        for row in 0..rows {
            let Some((line, text)) = lines.next() else {
                return Err(LevelError::TruncatedLevel {
                    line: header_line,
                    expected: rows,
                    found: row,
                });
            };

            let length = text.chars().count();
            if length > columns {
                return Err(LevelError::RowTooLong {
                    line,
                    length,
                    columns,
                });
            }

            for (column, symbol) in text.chars().enumerate() {
                let kind = match symbol {
                    ' ' => TileKind::Empty,
                    '#' => TileKind::Wall,
                    '.' => TileKind::OutOfBounds,
                    '*' => {
                        if spawn.is_some() {
                            return Err(LevelError::MultipleSpawns { line });
                        }
                        spawn = Some(position(row, column));
                        TileKind::Empty
                    }
                    symbol => return Err(LevelError::IllegalSymbol { line, symbol }),
                };
                tiles.push(kind);
            }
            tiles.resize(tiles.len() + (columns - length), TileKind::Empty);
        }

        match spawn {
            Some(spawn) => levels.push(Grid::from_tiles(rows, columns, tiles, spawn)),
            None => tracing::warn!(line = header_line, "skipping level without a spawn marker"),
        }
    }

    if levels.is_empty() {
        return Err(LevelError::NoLevels);
    }

    tracing::debug!(count = levels.len(), "parsed levels");
    Ok(levels)
}

fn parse_header(line: usize, text: &str) -> Result<(usize, usize), LevelError> {
    let invalid = || LevelError::InvalidHeader {
        line,
        found: text.to_owned(),
    };

    let mut fields = text.split_whitespace();
    let rows = fields.next().ok_or_else(invalid)?;
    let columns = fields.next().ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }

    let rows: usize = rows.parse().map_err(|_| invalid())?;
    let columns: usize = columns.parse().map_err(|_| invalid())?;

    let accepted = 1..=MAX_DIMENSION;
    if !accepted.contains(&rows) || !accepted.contains(&columns) {
        return Err(LevelError::DimensionsOutOfRange {
            line,
            rows,
            columns,
        });
    }

    Ok((rows, columns))
}

fn position(row: usize, column: usize) -> Position {
    Position::new(
        i32::try_from(row).unwrap_or(i32::MAX),
        i32::try_from(column).unwrap_or(i32::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_consecutive_blocks_in_file_order() {
        let source = "3 4\n####\n#* #\n####\n\n\n2 2\n*.\n #\n";
        let levels = parse_levels(source).expect("levels parse");

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].rows(), 3);
        assert_eq!(levels[0].columns(), 4);
        assert_eq!(levels[0].spawn(), Position::new(1, 1));
        assert_eq!(levels[1].spawn(), Position::new(0, 0));
        assert_eq!(levels[1].tile_at(Position::new(0, 1)), TileKind::OutOfBounds);
        assert_eq!(levels[1].tile_at(Position::new(1, 1)), TileKind::Wall);
    }

    #[test]
    fn spawn_marker_is_stored_as_empty_floor() {
        let levels = parse_levels("1 2\n* \n").expect("levels parse");
        assert_eq!(levels[0].tile_at(Position::new(0, 0)), TileKind::Empty);
        assert_eq!(levels[0].food(), None);
    }

    #[test]
    fn short_rows_are_padded_and_carriage_returns_stripped() {
        let levels = parse_levels("2 3\r\n#*\r\n\r\n").expect("levels parse");
        let grid = &levels[0];
        assert_eq!(grid.tile_at(Position::new(0, 2)), TileKind::Empty);
        assert_eq!(grid.tile_at(Position::new(1, 0)), TileKind::Empty);
        assert_eq!(grid.tiles().len(), 6);
    }

    #[test]
    fn blocks_without_spawn_are_skipped() {
        let levels = parse_levels("1 1\n#\n1 2\n *\n").expect("levels parse");
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].spawn(), Position::new(0, 1));
    }

    #[test]
    fn stream_without_spawn_reports_no_levels() {
        assert_eq!(parse_levels("1 1\n#\n"), Err(LevelError::NoLevels));
        assert_eq!(parse_levels(""), Err(LevelError::NoLevels));
        assert_eq!(parse_levels("\n\n"), Err(LevelError::NoLevels));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(
            parse_levels("three 4\n"),
            Err(LevelError::InvalidHeader {
                line: 1,
                found: "three 4".to_owned(),
            })
        );
        assert!(matches!(
            parse_levels("3\n"),
            Err(LevelError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_levels("1 2 3\n"),
            Err(LevelError::InvalidHeader { line: 1, .. })
        ));
    }

    #[test]
    fn dimensions_are_bounded() {
        assert_eq!(
            parse_levels("\n0 5\n"),
            Err(LevelError::DimensionsOutOfRange {
                line: 2,
                rows: 0,
                columns: 5,
            })
        );
        assert!(matches!(
            parse_levels("1 101\n*\n"),
            Err(LevelError::DimensionsOutOfRange { columns: 101, .. })
        ));
    }

    #[test]
    fn row_defects_carry_their_line_number() {
        assert_eq!(
            parse_levels("2 2\n*#\n#x\n"),
            Err(LevelError::IllegalSymbol {
                line: 3,
                symbol: 'x',
            })
        );
        assert_eq!(
            parse_levels("1 2\n* #\n"),
            Err(LevelError::RowTooLong {
                line: 2,
                length: 3,
                columns: 2,
            })
        );
        assert_eq!(
            parse_levels("1 3\n*#*\n"),
            Err(LevelError::MultipleSpawns { line: 2 })
        );
    }

    #[test]
    fn missing_rows_report_truncation() {
        assert_eq!(
            parse_levels("3 2\n* \n##\n"),
            Err(LevelError::TruncatedLevel {
                line: 1,
                expected: 3,
                found: 2,
            })
        );
    }

    #[test]
    fn errors_render_readable_messages() {
        let message = LevelError::IllegalSymbol {
            line: 4,
            symbol: '?',
        }
        .to_string();
        assert_eq!(message, "line 4: illegal symbol '?'");
    }
}
