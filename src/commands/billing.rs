//! `docli billing` handler

use super::Context;
use crate::api::Balance;
use crate::error::AppError;
use crate::output::{render_one, Tabular};

impl Tabular for Balance {
    fn headers() -> Vec<&'static str> {
        vec!["MONTH-TO-DATE USAGE", "ACCOUNT BALANCE", "MONTH-TO-DATE BALANCE"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            dollars(&self.month_to_date_usage),
            dollars(&self.account_balance),
            dollars(&self.month_to_date_balance),
        ]
    }
}

/// Formats a decimal string from the API as dollars with two places
///
/// Amounts that do not parse are shown as received.
fn dollars(amount: &str) -> String {
    let value = match amount.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => return amount.to_string(),
    };

    // Sign is decided after rounding so tiny negatives print as $0.00
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}

pub async fn run(ctx: &Context) -> Result<String, AppError> {
    let balance = ctx
        .cached("billing:balance", || ctx.client().get_balance())
        .await?;
    Ok(render_one(&balance, ctx.format())?)
}
