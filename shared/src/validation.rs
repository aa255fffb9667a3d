//! Validation utilities for the vertical-lift operations platform

use rust_decimal::Decimal;

use crate::models::TrayType;

/// Largest accepted tray dimension on either axis
pub const MAX_TRAY_DIMENSION: u32 = 100;

/// Largest accepted zero-padding width for cell names
pub const MAX_XY_PADDING: usize = 6;

/// Validate a tray type's row/column counts
pub fn validate_tray_dimensions(rows: u32, cols: u32) -> Result<(), &'static str> {
    if rows == 0 || cols == 0 {
        return Err("Tray dimensions must be at least 1x1");
    }
    if rows > MAX_TRAY_DIMENSION || cols > MAX_TRAY_DIMENSION {
        return Err("Tray dimensions exceed the supported maximum");
    }
    Ok(())
}

/// Validate the zero-padding width used in generated cell names
pub fn validate_xy_padding(padding: usize) -> Result<(), &'static str> {
    if padding == 0 {
        return Err("Cell name padding must be at least 1");
    }
    if padding > MAX_XY_PADDING {
        return Err("Cell name padding exceeds the supported maximum");
    }
    Ok(())
}

/// Validate an axis prefix used in generated cell names
pub fn validate_axis_prefix(prefix: &str) -> Result<(), &'static str> {
    if prefix.chars().any(|c| c.is_ascii_digit()) {
        return Err("Axis prefixes must not contain digits");
    }
    if prefix.len() > 8 {
        return Err("Axis prefix is too long");
    }
    Ok(())
}

/// Validate 1-based cell coordinates against a tray type's layout
pub fn validate_cell_coords(tray_type: &TrayType, col: u32, row: u32) -> Result<(), &'static str> {
    if col == 0 || row == 0 {
        return Err("Cell coordinates are 1-based");
    }
    if col > tray_type.cols || row > tray_type.rows {
        return Err("Cell coordinates are outside the tray layout");
    }
    Ok(())
}

/// Validate a demanded or done quantity
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Quantities cannot be negative");
    }
    Ok(())
}
