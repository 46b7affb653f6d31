//! Shared fixture for unit tests.

use crate::domain::SalesTable;

/// Small dataset with the published column layout (including the columns the
/// dashboard ignores).
///
/// Recession rows: 1980 (three months) and 2006-01. Year 2005 has three
/// non-recession rows.
pub const SAMPLE_CSV: &str = "\
Date,Year,Month,Recession,Consumer_Confidence,Seasonality_Weight,Price,Advertising_Expenditure,Competition,GDP,Growth_Rate,unemployment_rate,Automobile_Sales,Vehicle_Type,City
1980-01-31,1980,Jan,1,108.24,0.5,27483.57,1000,7,60.223,0.01,5.0,100,Sports,Georgia
1980-02-29,1980,Feb,1,98.75,0.75,24308.51,2000,4,45.986,-0.2,5.0,200,Mediumfamilycar,New York
1980-03-31,1980,Mar,1,107.48,0.2,28238.49,500,3,35.141,-0.3,6.0,300,Sports,New York
1981-01-31,1981,Jan,0,115.67,1.0,32615.15,1500,8,45.673,0.2,4.0,400,Smallfamiliycar,California
2005-01-31,2005,Jan,0,118.63,0.5,33154.31,3000,6,55.123,0.3,4.5,500,Sports,Illinois
2005-02-28,2005,Feb,0,119.12,0.75,31201.99,1000,5,54.222,0.2,4.5,700,Sports,California
2005-03-31,2005,Mar,0,120.77,0.2,34567.10,2500,9,56.789,0.4,4.5,900,Mediumfamilycar,Georgia
2006-01-31,2006,Jan,1,95.01,0.5,26789.33,4000,3,41.456,-0.1,6.0,150,Mediumfamilycar,Illinois
";

pub fn sample_table() -> SalesTable {
    crate::io::ingest::parse_sales_csv(SAMPLE_CSV.as_bytes()).expect("fixture parses")
}
