use super::types::{MONTHS_PER_YEAR, MonthlySample, SimulationResult, YearlySample};

/// Contribution and interest collected since the last year boundary.
#[derive(Debug, Default)]
struct YearAccumulator {
    invested: f64,
    interest: f64,
}

impl YearAccumulator {
    fn add(&mut self, contribution: f64, interest: f64) {
        self.invested += contribution;
        self.interest += interest;
    }

    fn close(&mut self, initial_capital: f64, month: &MonthlySample) -> YearlySample {
        let invested_this_year = if month.year_index == 1 {
            self.invested + initial_capital
        } else {
            self.invested
        };
        let sample = YearlySample {
            year_index: month.year_index,
            cumulative_invested: month.cumulative_invested,
            cumulative_interest: month.cumulative_interest,
            balance: month.balance,
            invested_this_year,
            interest_this_year: self.interest,
        };
        *self = Self::default();
        sample
    }
}

/// Runs the month-by-month projection.
///
/// Interest for a month accrues on the balance carried in from the previous
/// month; the contribution lands at month end and starts earning the month
/// after. A yearly sample is closed every twelfth month and on the final
/// month, so a horizon that stops mid-year still reports that partial year.
pub fn simulate(
    initial_capital: f64,
    monthly_contribution: f64,
    monthly_rate: f64,
    horizon_months: u32,
) -> SimulationResult {
    let mut balance = initial_capital;
    let mut total_invested = initial_capital;

    let mut monthly = Vec::with_capacity(horizon_months as usize);
    let mut yearly = Vec::with_capacity(horizon_months.div_ceil(MONTHS_PER_YEAR) as usize);
    let mut year = YearAccumulator::default();

    for month_index in 1..=horizon_months {
        let interest = balance * monthly_rate;
        balance = balance + interest + monthly_contribution;
        total_invested += monthly_contribution;

        let sample = MonthlySample {
            month_index,
            year_index: month_index.div_ceil(MONTHS_PER_YEAR),
            cumulative_invested: total_invested,
            interest_this_month: interest,
            cumulative_interest: balance - total_invested,
            balance,
        };
        monthly.push(sample);
        year.add(monthly_contribution, interest);

        if month_index % MONTHS_PER_YEAR == 0 || month_index == horizon_months {
            yearly.push(year.close(initial_capital, &sample));
        }
    }

    SimulationResult {
        total_invested,
        total_interest: balance - total_invested,
        total_amount: balance,
        horizon_months,
        monthly,
        yearly,
    }
}
