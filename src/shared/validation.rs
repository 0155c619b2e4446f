use rust_decimal::Decimal;
use validator::ValidationError;

/// Trim text and turn blank values into `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Required text must contain something other than whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Prices are stored as NUMERIC(10,2) and may not be negative
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("negative_price");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    if price.scale() > 2 {
        let mut err = ValidationError::new("price_scale");
        err.message = Some("Price must have at most two decimal places".into());
        return Err(err);
    }
    if price.trunc() >= Decimal::from(100_000_000) {
        let mut err = ValidationError::new("price_range");
        err.message = Some("Price must be below 100000000".into());
        return Err(err);
    }
    Ok(())
}

/// Absolute http(s) URL, as stored for image links
pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    let mut err = ValidationError::new("http_url");
    err.message = Some("URL must be an absolute http(s) URL".into());
    Err(err)
}
