//! Dashboard metrics and time-bucketed sales series.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{Product, Query, Transaction, TransactionsOf, VisibleTo};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Averaging window for `avg_daily_sales`, in days.
const AVERAGE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Coarse proxy: 5% of all-time sales, not a same-day total.
    pub today_sales: Decimal,
    pub monthly_sales: Decimal,
    pub total_expenses: Decimal,
    pub low_stock_count: usize,
    pub profit: Decimal,
    pub avg_daily_sales: Decimal,
    pub money_flow: Decimal,
}

fn sum_matching(transactions: &[Transaction], query: &impl Query<Transaction>) -> Decimal {
    transactions
        .iter()
        .filter(|tx| query.matches(*tx))
        .map(|tx| tx.amount)
        .sum()
}

pub fn summarize(transactions: &[Transaction], products: &[Product], owner_id: &str) -> DashboardSummary {
    let sales = sum_matching(transactions, &TransactionsOf::income(owner_id));
    let expenses = sum_matching(transactions, &TransactionsOf::expenses(owner_id));
    let money_flow = sales - expenses;

    let visible = VisibleTo(owner_id);
    let low_stock_count = products
        .iter()
        .filter(|p| visible.matches(*p) && p.stock <= p.reorder_level)
        .count();

    let avg_daily_sales = (sales / Decimal::from(AVERAGE_WINDOW_DAYS))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    DashboardSummary {
        today_sales: sales * Decimal::new(5, 2),
        monthly_sales: sales,
        total_expenses: expenses,
        low_stock_count,
        profit: money_flow,
        avg_daily_sales,
        money_flow,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

/// Index-aligned bucket labels and income sums, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSeries {
    pub labels: Vec<String>,
    pub data: Vec<Decimal>,
}

pub fn sales_series(
    transactions: &[Transaction],
    owner_id: &str,
    timeframe: Timeframe,
    now: DateTime<Utc>,
) -> SalesSeries {
    let query = TransactionsOf::income(owner_id);
    let income: Vec<&Transaction> = transactions.iter().filter(|tx| query.matches(*tx)).collect();

    match timeframe {
        Timeframe::Daily => daily_series(&income, now.date_naive()),
        Timeframe::Weekly => weekly_series(&income, now),
        Timeframe::Monthly => monthly_series(&income, now.date_naive()),
    }
}

/// Trailing seven calendar days, today inclusive, matched on exact date.
fn daily_series(income: &[&Transaction], today: NaiveDate) -> SalesSeries {
    let mut labels = Vec::with_capacity(7);
    let mut data: Vec<Decimal> = Vec::with_capacity(7);

    for offset in (0..7).rev() {
        let Some(day) = today.checked_sub_days(Days::new(offset)) else {
            continue;
        };
        labels.push(day.format("%Y-%m-%d").to_string());
        data.push(income.iter().filter(|tx| tx.date == day).map(|tx| tx.amount).sum());
    }

    SalesSeries { labels, data }
}

/// Whole days between `now` and midnight UTC of `date`, rounded up.
fn age_in_days(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let elapsed_ms = (now - midnight).num_milliseconds().abs();
    (elapsed_ms + DAY_MS - 1) / DAY_MS
}

/// Four seven-day buckets; bucket `i` from the newest holds ages in `(i*7, (i+1)*7]`.
fn weekly_series(income: &[&Transaction], now: DateTime<Utc>) -> SalesSeries {
    let mut labels = Vec::with_capacity(4);
    let mut data: Vec<Decimal> = Vec::with_capacity(4);

    for i in (0..4i64).rev() {
        labels.push(format!("Week {}", 4 - i));
        let (lower, upper) = (i * 7, (i + 1) * 7);
        data.push(
            income
                .iter()
                .filter(|tx| {
                    let age = age_in_days(tx.date, now);
                    age > lower && age <= upper
                })
                .map(|tx| tx.amount)
                .sum(),
        );
    }

    SalesSeries { labels, data }
}

/// Trailing six calendar months including the current one.
fn monthly_series(income: &[&Transaction], today: NaiveDate) -> SalesSeries {
    let current = today.year() * 12 + today.month0() as i32;
    let mut labels = Vec::with_capacity(6);
    let mut data: Vec<Decimal> = Vec::with_capacity(6);

    for back in (0..6).rev() {
        let index = current - back;
        let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
        labels.push(MONTH_LABELS[month0 as usize].to_string());
        data.push(
            income
                .iter()
                .filter(|tx| tx.date.year() == year && tx.date.month0() == month0)
                .map(|tx| tx.amount)
                .sum(),
        );
    }

    SalesSeries { labels, data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionType, SYSTEM_OWNER};
    use chrono::TimeZone;

    fn tx(owner: &str, kind: TransactionType, amount: i64, date: NaiveDate) -> Transaction {
        Transaction {
            id: String::new(),
            owner_id: owner.into(),
            kind,
            amount: Decimal::from(amount),
            description: String::new(),
            date,
            payment_method: None,
            status: None,
        }
    }

    fn income(amount: i64, date: NaiveDate) -> Transaction {
        tx("u1", TransactionType::Income, amount, date)
    }

    fn product(owner: &str, stock: u32, reorder_level: u32) -> Product {
        Product {
            id: String::new(),
            owner_id: owner.into(),
            name: "Item".into(),
            stock,
            price: Decimal::ONE,
            reorder_level,
            category: None,
            cost_price: None,
            last_restocked: None,
        }
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn amounts(values: &[i64]) -> Vec<Decimal> {
        values.iter().copied().map(Decimal::from).collect()
    }

    #[test]
    fn summary_money_flow_and_average() {
        let ledger = vec![
            income(1000, day(2026, 10, 1)),
            income(500, day(2026, 10, 2)),
            tx("u1", TransactionType::Expense, 300, day(2026, 10, 2)),
            tx("u2", TransactionType::Income, 99_999, day(2026, 10, 2)),
        ];

        let summary = summarize(&ledger, &[], "u1");

        assert_eq!(summary.monthly_sales, Decimal::from(1500));
        assert_eq!(summary.total_expenses, Decimal::from(300));
        assert_eq!(summary.money_flow, Decimal::from(1200));
        assert_eq!(summary.profit, summary.money_flow);
        assert_eq!(summary.avg_daily_sales, Decimal::from(50));
        assert_eq!(summary.today_sales, Decimal::from(75));
    }

    #[test]
    fn average_rounds_half_up() {
        // 45 / 30 = 1.5
        let summary = summarize(&[income(45, day(2026, 1, 1))], &[], "u1");
        assert_eq!(summary.avg_daily_sales, Decimal::from(2));

        // 44 / 30 = 1.4666...
        let summary = summarize(&[income(44, day(2026, 1, 1))], &[], "u1");
        assert_eq!(summary.avg_daily_sales, Decimal::from(1));
    }

    #[test]
    fn empty_ledger_summarizes_to_zero() {
        let summary = summarize(&[], &[], "u1");
        assert_eq!(summary.monthly_sales, Decimal::ZERO);
        assert_eq!(summary.money_flow, Decimal::ZERO);
        assert_eq!(summary.avg_daily_sales, Decimal::ZERO);
        assert_eq!(summary.low_stock_count, 0);
    }

    #[test]
    fn low_stock_counts_own_and_shared_products() {
        let products = vec![
            product("u1", 10, 10),
            product("u1", 11, 10),
            product(SYSTEM_OWNER, 5, 10),
            product("u2", 0, 10),
        ];

        assert_eq!(summarize(&[], &products, "u1").low_stock_count, 2);
    }

    #[test]
    fn daily_series_follows_trailing_week() {
        let now = noon(2026, 10, 17);
        let ledger: Vec<Transaction> = (0..7)
            .map(|i| income((i + 1) * 10, day(2026, 10, 11 + i as u32)))
            .chain([
                income(1000, day(2026, 10, 10)),
                tx("u1", TransactionType::Expense, 5, day(2026, 10, 17)),
            ])
            .collect();

        let series = sales_series(&ledger, "u1", Timeframe::Daily, now);

        assert_eq!(series.data, amounts(&[10, 20, 30, 40, 50, 60, 70]));
        assert_eq!(series.labels.first().unwrap(), "2026-10-11");
        assert_eq!(series.labels.last().unwrap(), "2026-10-17");
    }

    #[test]
    fn daily_series_crosses_month_boundary() {
        let series = sales_series(&[income(7, day(2026, 2, 28))], "u1", Timeframe::Daily, noon(2026, 3, 2));

        assert_eq!(series.labels[0], "2026-02-24");
        assert_eq!(series.labels[4], "2026-02-28");
        assert_eq!(series.data[4], Decimal::from(7));
    }

    #[test]
    fn weekly_buckets_use_rounded_up_age() {
        let now = noon(2026, 10, 17);
        let ledger = vec![
            income(1, day(2026, 10, 17)), // age 1
            income(2, day(2026, 10, 11)), // age 7
            income(4, day(2026, 10, 10)), // age 8
            income(8, day(2026, 9, 20)),  // age 28
            income(16, day(2026, 9, 19)), // age 29, outside
        ];

        let series = sales_series(&ledger, "u1", Timeframe::Weekly, now);

        assert_eq!(series.labels, vec!["Week 1", "Week 2", "Week 3", "Week 4"]);
        assert_eq!(series.data, amounts(&[8, 0, 4, 3]));
    }

    #[test]
    fn transaction_at_exact_midnight_has_no_weekly_bucket() {
        let midnight = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap();
        let series = sales_series(&[income(5, day(2026, 10, 17))], "u1", Timeframe::Weekly, midnight);
        assert_eq!(series.data, amounts(&[0, 0, 0, 0]));
    }

    #[test]
    fn monthly_series_current_month_lands_last() {
        let now = noon(2026, 10, 17);
        let ledger = vec![
            income(100, day(2026, 10, 1)),
            income(50, day(2026, 10, 16)),
            income(999, day(2026, 3, 31)), // seven months back
        ];

        let series = sales_series(&ledger, "u1", Timeframe::Monthly, now);

        assert_eq!(series.labels, vec!["May", "Jun", "Jul", "Aug", "Sep", "Oct"]);
        assert_eq!(series.data, amounts(&[0, 0, 0, 0, 0, 150]));
    }

    #[test]
    fn monthly_series_wraps_year_and_checks_year() {
        let now = noon(2026, 2, 10);
        let ledger = vec![
            income(10, day(2025, 9, 5)),
            income(20, day(2025, 12, 31)),
            income(40, day(2024, 12, 1)), // same month name, wrong year
        ];

        let series = sales_series(&ledger, "u1", Timeframe::Monthly, now);

        assert_eq!(series.labels, vec!["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
        assert_eq!(series.data, amounts(&[10, 0, 0, 20, 0, 0]));
    }

    #[test]
    fn month_end_does_not_skip_previous_month() {
        let series = sales_series(&[income(3, day(2026, 9, 15))], "u1", Timeframe::Monthly, noon(2026, 10, 31));
        assert_eq!(series.labels[4], "Sep");
        assert_eq!(series.data[4], Decimal::from(3));
    }

    #[test]
    fn series_arrays_stay_aligned() {
        for timeframe in [Timeframe::Daily, Timeframe::Weekly, Timeframe::Monthly] {
            let series = sales_series(&[], "u1", timeframe, noon(2026, 10, 17));
            assert_eq!(series.labels.len(), series.data.len());
            assert!(series.data.iter().all(|v| v.is_zero()));
        }
    }

    #[test]
    fn timeframe_parses_lowercase() {
        let tf: Timeframe = serde_json::from_str(r#""weekly""#).unwrap();
        assert_eq!(tf, Timeframe::Weekly);
        assert_eq!(Timeframe::default(), Timeframe::Monthly);
        assert!(serde_json::from_str::<Timeframe>(r#""yearly""#).is_err());
    }
}
