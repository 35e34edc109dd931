use std::collections::HashMap;

use crate::constants::{BREAK_EVEN_BAND, TOP_CITIES_LIMIT};
use crate::properties::properties_constants::{
    PROPERTY_TYPE_COMMERCIAL, PROPERTY_TYPE_MIXED_USE, PROPERTY_TYPE_RESIDENTIAL,
};
use crate::properties::Property;

use super::portfolios_model::{CityBreakdown, PortfolioMetrics};

/// Folds a folder's properties into its [`PortfolioMetrics`] summary.
///
/// Single pass over the set, then derived ratios. Absent financial data
/// counts as zero throughout; an empty folder yields an all-zero summary.
/// Pure function, no I/O.
pub fn aggregate(properties: &[Property]) -> PortfolioMetrics {
    let mut metrics = PortfolioMetrics {
        property_count: properties.len(),
        ..Default::default()
    };

    if properties.is_empty() {
        return metrics;
    }

    let mut weighted_cap_rate = 0.0;
    let mut value_for_cap_rate = 0.0;
    let mut total_rent = 0.0;
    let mut total_expenses = 0.0;
    let mut city_counts: HashMap<String, usize> = HashMap::new();
    let mut city_values: HashMap<String, f64> = HashMap::new();

    for property in properties {
        let current_value = property.current_value;
        metrics.total_value += current_value;

        match property.property_type.as_str() {
            t if t == PROPERTY_TYPE_RESIDENTIAL => metrics.residential_count += 1,
            t if t == PROPERTY_TYPE_COMMERCIAL => metrics.commercial_count += 1,
            t if t == PROPERTY_TYPE_MIXED_USE => metrics.mixed_use_count += 1,
            // Land, industrial, and anything unrecognized
            _ => metrics.other_count += 1,
        }

        // Properties without a city are left out of the breakdown rather
        // than lumped into an "unknown" bucket
        if let Some(city) = &property.city {
            *city_counts.entry(city.clone()).or_insert(0) += 1;
            *city_values.entry(city.clone()).or_insert(0.0) += current_value;
        }

        metrics.total_equity += property.equity();

        let monthly_cash_flow = property
            .financials
            .as_ref()
            .and_then(|f| f.cash_flow)
            .unwrap_or(0.0);
        metrics.total_monthly_cash_flow += monthly_cash_flow;

        if monthly_cash_flow > BREAK_EVEN_BAND {
            metrics.positive_cash_flow_count += 1;
        } else if monthly_cash_flow < -BREAK_EVEN_BAND {
            metrics.negative_cash_flow_count += 1;
        } else {
            metrics.break_even_count += 1;
        }

        if let Some(fin) = &property.financials {
            if let Some(cap_rate) = fin.cap_rate {
                if current_value > 0.0 {
                    weighted_cap_rate += cap_rate * current_value;
                    value_for_cap_rate += current_value;
                }
            }
            total_rent += fin.monthly_rent;
            total_expenses += fin.mortgage_payment
                + fin.property_taxes
                + fin.insurance
                + fin.hoa_fees
                + fin.maintenance_costs
                + fin.other_expenses;
        }
    }

    metrics.total_annual_cash_flow = metrics.total_monthly_cash_flow * 12.0;

    if value_for_cap_rate > 0.0 {
        metrics.average_cap_rate = weighted_cap_rate / value_for_cap_rate;
    }

    let count = properties.len() as f64;
    metrics.average_monthly_rent = total_rent / count;
    metrics.average_monthly_expenses = total_expenses / count;

    let mut cities: Vec<(String, f64)> = city_values.into_iter().collect();
    // Display ranking; equal values keep their relative order
    cities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    metrics.top_cities = cities
        .into_iter()
        .take(TOP_CITIES_LIMIT)
        .map(|(city, value)| CityBreakdown {
            property_count: city_counts.get(&city).copied().unwrap_or(0),
            percentage: if metrics.total_value > 0.0 {
                value / metrics.total_value * 100.0
            } else {
                0.0
            },
            total_value: value,
            city,
        })
        .collect();

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyFinancials;

    fn make_property(
        name: &str,
        property_type: &str,
        city: Option<&str>,
        current_value: f64,
        financials: Option<PropertyFinancials>,
    ) -> Property {
        let now = chrono::Utc::now().naive_utc();
        Property {
            id: name.to_lowercase().replace(' ', "-"),
            user_id: "user-1".to_string(),
            portfolio_id: Some("folder-1".to_string()),
            name: name.to_string(),
            address: None,
            city: city.map(str::to_string),
            state: None,
            zip_code: None,
            country: "USA".to_string(),
            property_type: property_type.to_string(),
            status: "owned".to_string(),
            purchase_date: None,
            purchase_price: None,
            current_value,
            down_payment: 0.0,
            created_at: now,
            updated_at: now,
            financials,
        }
    }

    fn make_financials(
        monthly_rent: f64,
        cash_flow: Option<f64>,
        cap_rate: Option<f64>,
        remaining_loan_balance: Option<f64>,
    ) -> PropertyFinancials {
        PropertyFinancials {
            monthly_rent,
            property_taxes: 0.0,
            insurance: 0.0,
            hoa_fees: 0.0,
            maintenance_costs: 0.0,
            other_expenses: 0.0,
            mortgage_payment: 0.0,
            vacancy_rate: 0.05,
            remaining_loan_balance,
            cap_rate,
            cash_flow,
            cash_on_cash_return: None,
            last_calculated: None,
        }
    }

    #[test]
    fn test_empty_folder_yields_zero_metrics() {
        let metrics = aggregate(&[]);
        assert_eq!(metrics.property_count, 0);
        assert_eq!(metrics.total_value, 0.0);
        assert_eq!(metrics.average_cap_rate, 0.0);
        assert_eq!(metrics.average_monthly_rent, 0.0);
        assert!(metrics.top_cities.is_empty());
    }

    #[test]
    fn test_cash_flow_totals_and_annualization() {
        let properties = vec![
            make_property(
                "A",
                "residential",
                None,
                100000.0,
                Some(make_financials(1000.0, Some(300.0), None, None)),
            ),
            make_property(
                "B",
                "residential",
                None,
                100000.0,
                Some(make_financials(1200.0, Some(-120.0), None, None)),
            ),
        ];
        let metrics = aggregate(&properties);
        assert!((metrics.total_monthly_cash_flow - 180.0).abs() < 1e-9);
        assert!((metrics.total_annual_cash_flow - 2160.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_cap_rate() {
        let properties = vec![
            make_property(
                "A",
                "residential",
                None,
                100000.0,
                Some(make_financials(0.0, None, Some(5.0), None)),
            ),
            make_property(
                "B",
                "commercial",
                None,
                300000.0,
                Some(make_financials(0.0, None, Some(10.0), None)),
            ),
        ];
        let metrics = aggregate(&properties);
        // (5*100000 + 10*300000) / 400000
        assert!((metrics.average_cap_rate - 8.75).abs() < 1e-9);
    }

    #[test]
    fn test_zero_value_property_excluded_from_cap_rate_weighting() {
        let properties = vec![
            make_property(
                "A",
                "residential",
                None,
                0.0,
                Some(make_financials(0.0, None, Some(50.0), None)),
            ),
            make_property(
                "B",
                "residential",
                None,
                200000.0,
                Some(make_financials(0.0, None, Some(6.0), None)),
            ),
        ];
        assert!((aggregate(&properties).average_cap_rate - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_property_type_breakdown_with_unknown_types() {
        let properties = vec![
            make_property("A", "residential", None, 0.0, None),
            make_property("B", "residential", None, 0.0, None),
            make_property("C", "commercial", None, 0.0, None),
            make_property("D", "mixed_use", None, 0.0, None),
            make_property("E", "land", None, 0.0, None),
            make_property("F", "houseboat", None, 0.0, None),
        ];
        let metrics = aggregate(&properties);
        assert_eq!(metrics.residential_count, 2);
        assert_eq!(metrics.commercial_count, 1);
        assert_eq!(metrics.mixed_use_count, 1);
        assert_eq!(metrics.other_count, 2);
    }

    #[test]
    fn test_cash_flow_buckets_use_break_even_band() {
        let properties = vec![
            make_property(
                "A",
                "residential",
                None,
                0.0,
                Some(make_financials(0.0, Some(51.0), None, None)),
            ),
            make_property(
                "B",
                "residential",
                None,
                0.0,
                Some(make_financials(0.0, Some(50.0), None, None)),
            ),
            make_property(
                "C",
                "residential",
                None,
                0.0,
                Some(make_financials(0.0, Some(-50.0), None, None)),
            ),
            make_property(
                "D",
                "residential",
                None,
                0.0,
                Some(make_financials(0.0, Some(-50.01), None, None)),
            ),
            // No financial record counts as zero cash flow
            make_property("E", "residential", None, 0.0, None),
        ];
        let metrics = aggregate(&properties);
        assert_eq!(metrics.positive_cash_flow_count, 1);
        assert_eq!(metrics.negative_cash_flow_count, 1);
        assert_eq!(metrics.break_even_count, 3);
    }

    #[test]
    fn test_top_cities_ranked_by_value_with_percentages() {
        let properties = vec![
            make_property("A", "residential", Some("Atlanta"), 300000.0, None),
            make_property("B", "residential", Some("Atlanta"), 200000.0, None),
            make_property("C", "residential", Some("Boise"), 400000.0, None),
            make_property("D", "residential", Some("Chicago"), 50000.0, None),
            make_property("E", "residential", Some("Denver"), 25000.0, None),
            make_property("F", "residential", None, 25000.0, None),
        ];
        let metrics = aggregate(&properties);
        assert_eq!(metrics.top_cities.len(), 3);

        assert_eq!(metrics.top_cities[0].city, "Atlanta");
        assert_eq!(metrics.top_cities[0].property_count, 2);
        assert!((metrics.top_cities[0].total_value - 500000.0).abs() < 1e-9);
        assert!((metrics.top_cities[0].percentage - 50.0).abs() < 1e-9);

        assert_eq!(metrics.top_cities[1].city, "Boise");
        assert!((metrics.top_cities[1].percentage - 40.0).abs() < 1e-9);

        assert_eq!(metrics.top_cities[2].city, "Chicago");
    }

    #[test]
    fn test_equity_uses_loan_balance_with_full_value_fallback() {
        let properties = vec![
            // 300k value, 180k loan -> 120k equity
            make_property(
                "A",
                "residential",
                None,
                300000.0,
                Some(make_financials(0.0, None, None, Some(180000.0))),
            ),
            // Underwater loans floor at zero
            make_property(
                "B",
                "residential",
                None,
                100000.0,
                Some(make_financials(0.0, None, None, Some(150000.0))),
            ),
            // No loan data -> full value
            make_property("C", "residential", None, 50000.0, None),
        ];
        let metrics = aggregate(&properties);
        assert!((metrics.total_equity - 170000.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_averages_over_property_count() {
        let properties = vec![
            make_property(
                "A",
                "residential",
                None,
                0.0,
                Some(make_financials(1000.0, None, None, None)),
            ),
            make_property(
                "B",
                "residential",
                None,
                0.0,
                Some(make_financials(2000.0, None, None, None)),
            ),
            // Counts toward the denominator even without financials
            make_property("C", "residential", None, 0.0, None),
        ];
        let metrics = aggregate(&properties);
        assert!((metrics.average_monthly_rent - 1000.0).abs() < 1e-9);
    }
}
