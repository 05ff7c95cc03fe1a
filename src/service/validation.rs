//! Field-level request validation shared by the entity services.

use crate::error::AppError;
use crate::model::non_blank;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_SKU_LENGTH: usize = 64;

/// Trimmed value, or `Validation(message)` when missing or blank.
pub fn required_text(value: Option<String>, message: &str) -> Result<String, AppError> {
    non_blank(value).ok_or_else(|| AppError::Validation(message.to_string()))
}

pub fn max_length(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn non_negative_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() {
        return Err(AppError::Validation("Price must be a finite number".into()));
    }
    if price < 0.0 {
        return Err(AppError::Validation("Price cannot be negative".into()));
    }
    Ok(())
}

pub fn non_negative_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::Validation("Stock cannot be negative".into()));
    }
    Ok(())
}
