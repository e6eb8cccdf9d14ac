//! Stage coordinates encoded in tile names.
//!
//! Two naming schemes are accepted, tried in this order:
//!
//! ```text
//! <anything>x_<X><anything>y_<Y><anything>z_<Z><anything>   e.g. img_x_005_y_010_z_020.tif
//! <X>_<Y>_<Z><anything>                                      e.g. 005_010_020_extra.tif
//! ```
//!
//! Only the base name is inspected, so the same rules apply to tile files
//! and tile directories.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

// The leading `.*` is greedy: with several `x_` markers the last one that is
// still followed by `y_` and `z_` wins.
static RE_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*x_([0-9]+).*y_([0-9]+).*z_([0-9]+).*").expect("valid labelled name regex")
});
static RE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)_([0-9]+)_([0-9]+)").expect("valid prefix name regex")
});

/// Stage coordinates of a tile, as parsed from its name.
pub type StageCoordinates = (i64, i64, i64);

/// Parse the `(x, y, z)` stage coordinates from the base name of `name`.
///
/// # Errors
/// Returns a [`ParseError`] carrying the base name if it matches neither
/// naming scheme, or if a coordinate does not fit in an `i64`.
pub fn parse_coordinates(name: impl AsRef<Path>) -> Result<StageCoordinates, ParseError> {
    let path = name.as_ref();
    let base = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy();

    let captures = RE_LABELLED
        .captures(&base)
        .or_else(|| RE_PREFIX.captures(&base))
        .ok_or_else(|| ParseError::new(base.to_string()))?;

    let field = |i: usize| -> Result<i64, ParseError> {
        captures[i].parse().map_err(|_| ParseError::new(base.to_string()))
    };

    Ok((field(1)?, field(2)?, field(3)?))
}

/// Whether the base name of `name` carries stage coordinates.
pub fn is_tile_name(name: impl AsRef<Path>) -> bool {
    parse_coordinates(name).is_ok()
}
