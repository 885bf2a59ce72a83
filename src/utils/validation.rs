use regex::Regex;

use crate::error::ValidationError;

lazy_static::lazy_static! {
    // ASCII digits only: `\d` would also accept other Unicode digits
    static ref MOBILE_RE: Regex = Regex::new(r"^[0-9]{10}$").expect("valid mobile regex");
    static ref OTP_RE: Regex = Regex::new(r"^[0-9]{4}$").expect("valid otp regex");
}

pub fn validate_mobile_no(mobile_no: &str) -> Result<(), ValidationError> {
    if mobile_no.is_empty() {
        return Err(ValidationError::MobileRequired);
    }
    if !MOBILE_RE.is_match(mobile_no) {
        return Err(ValidationError::InvalidMobile);
    }
    Ok(())
}

pub fn validate_otp(otp: &str) -> Result<(), ValidationError> {
    if otp.is_empty() {
        return Err(ValidationError::OtpRequired);
    }
    if !OTP_RE.is_match(otp) {
        return Err(ValidationError::InvalidOtp);
    }
    Ok(())
}

/// Price must parse as a finite decimal. Sign and precision are not checked.
pub fn validate_price(price: &str) -> Result<f64, ValidationError> {
    let value: f64 = price
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidPrice)?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(value)
}

/// `0712345678` -> `******5678`, for logs.
pub fn mask_mobile(mobile_no: &str) -> String {
    let visible = mobile_no.chars().count().saturating_sub(4);
    mobile_no
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}
