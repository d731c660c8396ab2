use chrono::DateTime;

use super::domain::BuyerInput;
use super::orchestrator::CompilerOptions;

/// Malformed input rejected before it reaches the compiler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("returnPolicy.restockingFeePercent must be between 0 and 100 (got {0})")]
    RestockingFeeOutOfRange(f64),
    #[error("options.timestamp '{value}' is not an ISO-8601 / RFC 3339 timestamp")]
    InvalidTimestamp { value: String },
}

/// Structural checks the intake layer applies before calling the compiler.
///
/// Degenerate but well-formed values pass through: a retail price of zero is legal and
/// simply produces a zero discount.
pub fn validate_request(input: &BuyerInput, options: &CompilerOptions) -> Result<(), InputError> {
    let appliance = &input.appliance;
    if !appliance.retail_price.is_finite() {
        return Err(InputError::NonFinite {
            field: "appliance.retailPrice",
        });
    }
    if !appliance.asking_price.is_finite() {
        return Err(InputError::NonFinite {
            field: "appliance.askingPrice",
        });
    }
    if appliance.asking_price < 0.0 {
        return Err(InputError::Negative {
            field: "appliance.askingPrice",
            value: appliance.asking_price,
        });
    }

    let fee = input.return_policy.restocking_fee_percent;
    if !fee.is_finite() || !(0.0..=100.0).contains(&fee) {
        return Err(InputError::RestockingFeeOutOfRange(fee));
    }

    DateTime::parse_from_rfc3339(options.timestamp.trim()).map_err(|_| {
        InputError::InvalidTimestamp {
            value: options.timestamp.clone(),
        }
    })?;

    Ok(())
}
