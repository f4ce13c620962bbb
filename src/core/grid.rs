use crate::core::constants::GRID_SQUARE_SIZE;

/// Number of 100 km bands east-west.
pub const GRID_COLUMNS: usize = 7;

/// Number of 100 km bands south-north.
pub const GRID_ROWS: usize = 13;

/// Two-letter 100 km square codes, indexed `[row][col]` with row 0 the
/// southernmost band and col 0 the westernmost.
pub const GRID_PREFIXES: [[&str; GRID_COLUMNS]; GRID_ROWS] = [
    ["SV", "SW", "SX", "SY", "SZ", "TV", "TW"],
    ["SQ", "SR", "SS", "ST", "SU", "TQ", "TR"],
    ["SL", "SM", "SN", "SO", "SP", "TL", "TM"],
    ["SF", "SG", "SH", "SJ", "SK", "TF", "TG"],
    ["SA", "SB", "SC", "SD", "SE", "TA", "TB"],
    ["NV", "NW", "NX", "NY", "NZ", "OV", "OW"],
    ["NQ", "NR", "NS", "NT", "NU", "OQ", "OR"],
    ["NL", "NM", "NN", "NO", "NP", "OL", "OM"],
    ["NF", "NG", "NH", "NJ", "NK", "OF", "OG"],
    ["NA", "NB", "NC", "ND", "NE", "OA", "OB"],
    ["HV", "HW", "HX", "HY", "HZ", "JV", "JW"],
    ["HQ", "HR", "HS", "HT", "HU", "JQ", "JR"],
    ["HL", "HM", "HN", "HO", "HP", "JL", "JM"],
];

/// Returns the square code for a `(col, row)` band pair, if it is on the grid.
pub fn prefix_at(col: usize, row: usize) -> Option<&'static str> {
    GRID_PREFIXES.get(row)?.get(col).copied()
}

/// Returns the `(col, row)` band pair of a square code. Case-insensitive.
pub fn prefix_bands(prefix: &str) -> Option<(usize, usize)> {
    GRID_PREFIXES.iter().enumerate().find_map(|(row, codes)| {
        codes
            .iter()
            .position(|code| code.eq_ignore_ascii_case(prefix))
            .map(|col| (col, row))
    })
}

/// Returns the south-west corner `(easting, northing)` of a square code.
pub fn prefix_origin(prefix: &str) -> Option<(f64, f64)> {
    let (col, row) = prefix_bands(prefix)?;
    Some((col as f64 * GRID_SQUARE_SIZE, row as f64 * GRID_SQUARE_SIZE))
}

/// Converts an easting/northing to its `(col, row)` band pair.
///
/// Returns `None` for points west or south of the false origin and for
/// points beyond the lettered grid.
pub fn point_to_bands(easting: f64, northing: f64) -> Option<(usize, usize)> {
    if !easting.is_finite() || !northing.is_finite() || easting < 0.0 || northing < 0.0 {
        return None;
    }

    let col = (easting / GRID_SQUARE_SIZE).floor() as usize;
    let row = (northing / GRID_SQUARE_SIZE).floor() as usize;

    (col < GRID_COLUMNS && row < GRID_ROWS).then_some((col, row))
}
