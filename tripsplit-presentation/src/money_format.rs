use rust_decimal::Decimal;
use tripsplit_domain::Money;

/// Whole amounts print without decimals; anything else with two.
///
/// Amounts carrying more than two decimal places keep their own precision.
pub fn format_money(amount: Money) -> String {
    let value = amount.as_decimal();
    if value.fract().is_zero() {
        return value.trunc().normalize().to_string();
    }
    if value.scale() > 2 {
        return value.normalize().to_string();
    }
    format!("{value:.2}")
}

/// Like [`format_money`] with an explicit `+` on positive amounts.
pub fn format_signed(amount: Money) -> String {
    if amount.as_decimal() > Decimal::ZERO {
        format!("+{}", format_money(amount))
    } else {
        format_money(amount)
    }
}
