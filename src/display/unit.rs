//! Unit display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Unit;

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "#")]
    number: u32,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "AREA")]
    area: String,
    #[tabled(rename = "OCCUPANTS")]
    occupants: u32,
    #[tabled(rename = "OWNER")]
    owner: String,
    #[tabled(rename = "TENANT")]
    tenant: String,
}

/// Format a building's units as a table
pub fn format_unit_list(units: &[Unit]) -> String {
    if units.is_empty() {
        return "No units found.".to_string();
    }

    let rows: Vec<UnitRow> = units
        .iter()
        .map(|u| UnitRow {
            number: u.unit_number,
            name: u.display_name(),
            area: format!("{:.1}", u.area),
            occupants: u.occupants,
            owner: u.owner_name.clone(),
            tenant: u.tenant_name.clone().unwrap_or_default(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitName;

    #[test]
    fn test_format_unit_list() {
        let mut units = vec![Unit::seeded(1), Unit::seeded(2)];
        units[0].name = UnitName::Custom("Garden flat".to_string());
        units[1].tenant_name = Some("S. Karimi".to_string());

        let output = format_unit_list(&units);
        assert!(output.contains("Garden flat"));
        assert!(output.contains("Unit 2"));
        assert!(output.contains("S. Karimi"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_unit_list(&[]).contains("No units found"));
    }
}
