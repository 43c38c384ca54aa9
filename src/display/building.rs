//! Building display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Building;
use crate::reports::FundReport;

#[derive(Tabled)]
struct BuildingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "UNITS")]
    units: usize,
    #[tabled(rename = "EXPENSES")]
    expenses: usize,
}

/// Format the building collection as a table
pub fn format_building_list(buildings: &[Building]) -> String {
    if buildings.is_empty() {
        return "No buildings found.".to_string();
    }

    let rows: Vec<BuildingRow> = buildings
        .iter()
        .map(|b| BuildingRow {
            id: b.id.to_string(),
            name: b.name.clone(),
            units: b.units.len(),
            expenses: b.expenses.len(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format a single building's details
pub fn format_building_details(building: &Building) -> String {
    let fund = FundReport::generate(building);

    let mut output = String::new();
    output.push_str(&format!("Building: {}\n", building.name));
    output.push_str(&format!("  ID:           {}\n", building.id));
    output.push_str(&format!("  Units:        {}\n", building.units.len()));
    output.push_str(&format!(
        "  Vacant units: {}\n",
        building.vacant_unit_count()
    ));
    output.push_str(&format!("  Expenses:     {}\n", building.expenses.len()));
    output.push_str(&format!("  Fund balance: {}\n", fund.balance));

    output
}
