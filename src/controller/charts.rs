//! Chart builders for the two report modes.
//!
//! Each builder aggregates one slice of the table and wraps the groups in a
//! descriptor. Titles and axis labels are the ones the dashboard shows.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::domain::{
    Category, ChartDescriptor, ChartKind, ChartSet, DataPoint, DataScope, SalesRecord, SalesTable, Series,
    month_label,
};
use crate::stats::{Group, group_mean, group_sum};

const SALES: &str = "Automobile_Sales";
const AD_SPEND: &str = "Advertising_Expenditure";
const YEAR: &str = "Year";
const MONTH: &str = "Month";
const VEHICLE: &str = "Vehicle_Type";
const UNEMPLOYMENT: &str = "unemployment_rate";

/// Four charts over the recession rows.
pub fn recession_charts(table: &SalesTable) -> ChartSet {
    let rows: Vec<&SalesRecord> = table.recession_rows().collect();
    let scope = DataScope::Recession;

    ChartSet {
        charts: vec![
            mean_sales_by_year(&rows, scope, "Average Automobile Sales Over Recession Years"),
            mean_sales_by_vehicle(&rows, scope, "Average Vehicle Sales by Type During Recession"),
            ad_spend_by_vehicle(&rows, scope, "Ad Expenditure Share by Vehicle Type During Recession"),
            sales_by_unemployment(&rows, scope),
        ],
    }
}

/// Four charts for a selected year.
///
/// The two trend lines use the whole table; only the vehicle
/// breakdowns are restricted to `year`.
pub fn yearly_charts(table: &SalesTable, year: i32) -> ChartSet {
    let all: Vec<&SalesRecord> = table.iter().collect();
    let in_year: Vec<&SalesRecord> = table.rows_for_year(year).collect();
    let year_scope = DataScope::Year(year);

    ChartSet {
        charts: vec![
            mean_sales_by_year(&all, DataScope::Full, "Average Automobile Sales Over Years"),
            mean_sales_by_month(&all, DataScope::Full),
            mean_sales_by_vehicle(&in_year, year_scope, &format!("Avg Vehicles Sold by Type in {year}")),
            ad_spend_by_vehicle(&in_year, year_scope, "Total Advertisement Expenditure per Vehicle Type"),
        ],
    }
}

fn mean_sales_by_year(rows: &[&SalesRecord], scope: DataScope, title: &str) -> ChartDescriptor {
    let groups = group_mean(rows.iter().copied(), |r| r.year, |r| r.automobile_sales);
    let points = to_points(groups, |year| Category::Int(i64::from(year)));
    descriptor(ChartKind::Line, title, YEAR, SALES, scope, rows.len(), vec![Series::unnamed(points)])
}

fn mean_sales_by_month(rows: &[&SalesRecord], scope: DataScope) -> ChartDescriptor {
    let groups = group_mean(rows.iter().copied(), SalesRecord::month_number, |r| r.automobile_sales);
    let points = to_points(groups, |month| Category::Text(month_label(month).to_string()));
    descriptor(
        ChartKind::Line,
        "Average Monthly Automobile Sales",
        MONTH,
        SALES,
        scope,
        rows.len(),
        vec![Series::unnamed(points)],
    )
}

fn mean_sales_by_vehicle(rows: &[&SalesRecord], scope: DataScope, title: &str) -> ChartDescriptor {
    let groups = group_mean(rows.iter().copied(), |r| r.vehicle_type.clone(), |r| r.automobile_sales);
    let points = to_points(groups, Category::Text);
    descriptor(ChartKind::Bar, title, VEHICLE, SALES, scope, rows.len(), vec![Series::unnamed(points)])
}

fn ad_spend_by_vehicle(rows: &[&SalesRecord], scope: DataScope, title: &str) -> ChartDescriptor {
    let groups = group_sum(
        rows.iter().copied(),
        |r| r.vehicle_type.clone(),
        |r| r.advertising_expenditure,
    );
    let points = to_points(groups, Category::Text);
    descriptor(ChartKind::Pie, title, VEHICLE, AD_SPEND, scope, rows.len(), vec![Series::unnamed(points)])
}

/// Mean sales per (unemployment rate, vehicle type), one series per type.
fn sales_by_unemployment(rows: &[&SalesRecord], scope: DataScope) -> ChartDescriptor {
    let groups = group_mean(
        rows.iter().copied(),
        |r| (OrderedFloat(r.unemployment_rate), r.vehicle_type.clone()),
        |r| r.automobile_sales,
    );

    // Groups are ordered by rate first, so each series stays rate-ordered.
    let mut by_vehicle: BTreeMap<String, Vec<DataPoint>> = BTreeMap::new();
    for group in groups {
        let (OrderedFloat(rate), vehicle) = group.key;
        by_vehicle.entry(vehicle).or_default().push(DataPoint {
            category: Category::Float(rate),
            value: group.value,
        });
    }

    let series = by_vehicle
        .into_iter()
        .map(|(vehicle, points)| Series::named(vehicle, points))
        .collect();

    let mut chart = descriptor(
        ChartKind::GroupedBar,
        "Unemployment Rate vs Sales by Vehicle Type",
        UNEMPLOYMENT,
        SALES,
        scope,
        rows.len(),
        series,
    );
    chart.x_label = "Unemployment Rate".to_string();
    chart.y_label = "Avg Sales".to_string();
    chart
}

fn to_points<K>(groups: Vec<Group<K>>, category: impl Fn(K) -> Category) -> Vec<DataPoint> {
    groups
        .into_iter()
        .map(|g| DataPoint {
            category: category(g.key),
            value: g.value,
        })
        .collect()
}

fn descriptor(
    kind: ChartKind,
    title: &str,
    x_field: &str,
    y_field: &str,
    scope: DataScope,
    source_rows: usize,
    series: Vec<Series>,
) -> ChartDescriptor {
    ChartDescriptor {
        kind,
        title: title.to_string(),
        x_field: x_field.to_string(),
        y_field: y_field.to_string(),
        x_label: x_field.to_string(),
        y_label: y_field.to_string(),
        scope,
        source_rows,
        series,
    }
}
