//! Spreadsheet workbook export and import
//!
//! The spreadsheet interchange format is a *workbook directory* of CSV
//! sheets. Export writes `report.csv` (one row per expense/unit pair with a
//! nonzero share), `metadata.csv`, full `units.csv` and `expenses.csv`
//! record sheets, and one `unit-<n>.csv` per unit. Import reads the
//! `metadata`, `units`, and `expenses` sheets back into a [`Building`];
//! a missing sheet, missing column, or unparsable row fails the whole
//! import before anything is applied.
//!
//! Amount cells are raw whole-unit integers, never display-grouped.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::allocation::{total_contribution, unit_share};
use crate::error::{StrataError, StrataResult};
use crate::models::{
    Building, BuildingId, ChargeTo, DistributionMethod, Expense, ExpenseId, PaymentStatus, Unit,
    UnitId, UnitName,
};

const REPORT_HEADER: &str =
    "Description,Date,Total Amount,Method,Paid By Manager,Charge To,Unit,Owner,Tenant,Share,Status";

/// Export a building as a workbook directory of CSV sheets
pub fn export_workbook(building: &Building, dir: &Path) -> StrataResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| StrataError::Export(format!("Failed to create workbook directory: {}", e)))?;

    write_report_sheet(building, &dir.join("report.csv"), None)?;
    write_metadata_sheet(building, &dir.join("metadata.csv"))?;
    write_units_sheet(building, &dir.join("units.csv"))?;
    write_expenses_sheet(building, &dir.join("expenses.csv"))?;

    for unit in &building.units {
        write_report_sheet(
            building,
            &dir.join(format!("unit-{}.csv", unit.unit_number)),
            Some(unit.id),
        )?;
    }

    Ok(())
}

/// Read a workbook directory back into a building
///
/// Only the `metadata`, `units`, and `expenses` sheets participate; the
/// report sheets are derived data and ignored.
pub fn import_workbook(dir: &Path) -> StrataResult<Building> {
    let metadata = find_sheet(dir, "metadata")?;
    let units = find_sheet(dir, "units")?;
    let expenses = find_sheet(dir, "expenses")?;

    let (building_id, name) = read_metadata_sheet(&metadata)?;
    let units = read_units_sheet(&units)?;
    let expenses = read_expenses_sheet(&expenses, building_id, &units)?;

    Ok(Building {
        id: building_id,
        name,
        units,
        expenses,
    })
}

fn write_report_sheet(
    building: &Building,
    path: &Path,
    only_unit: Option<UnitId>,
) -> StrataResult<()> {
    let mut file = create_sheet(path)?;
    writeln!(file, "{}", REPORT_HEADER).map_err(export_err)?;

    for expense in &building.expenses {
        for unit in &building.units {
            if let Some(id) = only_unit {
                if unit.id != id {
                    continue;
                }
            }

            let share = unit_share(expense, unit, &building.units);
            if share.is_zero() {
                continue;
            }

            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{}",
                escape_csv(&expense.description),
                expense.date,
                total_contribution(expense).amount(),
                expense.distribution_method,
                expense.paid_by_manager,
                expense.charge_to,
                escape_csv(&unit.display_name()),
                escape_csv(&unit.owner_name),
                escape_csv(unit.tenant_name.as_deref().unwrap_or("")),
                share.amount(),
                expense.status_for(unit.id)
            )
            .map_err(export_err)?;
        }
    }

    Ok(())
}

fn write_metadata_sheet(building: &Building, path: &Path) -> StrataResult<()> {
    let mut file = create_sheet(path)?;
    writeln!(file, "Building ID,Name").map_err(export_err)?;
    writeln!(
        file,
        "{},{}",
        building.id.as_uuid(),
        escape_csv(&building.name)
    )
    .map_err(export_err)?;
    Ok(())
}

fn write_units_sheet(building: &Building, path: &Path) -> StrataResult<()> {
    let mut file = create_sheet(path)?;
    writeln!(file, "ID,Name,Unit Number,Area,Occupants,Owner,Tenant").map_err(export_err)?;

    for unit in &building.units {
        // An empty name cell means the unit keeps its default display name
        let name = match &unit.name {
            UnitName::Default => "",
            UnitName::Custom(name) => name.as_str(),
        };
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            unit.id.as_uuid(),
            escape_csv(name),
            unit.unit_number,
            unit.area,
            unit.occupants,
            escape_csv(&unit.owner_name),
            escape_csv(unit.tenant_name.as_deref().unwrap_or(""))
        )
        .map_err(export_err)?;
    }

    Ok(())
}

fn write_expenses_sheet(building: &Building, path: &Path) -> StrataResult<()> {
    let mut file = create_sheet(path)?;
    writeln!(
        file,
        "ID,Description,Total Amount,Date,Method,Charge To,Paid By Manager,Building Charge,Deduct From Fund,Applicable Units,Paid Units"
    )
    .map_err(export_err)?;

    for expense in &building.expenses {
        let applicable = join_ids(expense.applicable_units.iter());
        let paid = join_ids(
            expense
                .payment_status
                .iter()
                .filter(|(_, s)| **s == PaymentStatus::Paid)
                .map(|(id, _)| id),
        );

        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{}",
            expense.id.as_uuid(),
            escape_csv(&expense.description),
            expense.total_amount.amount(),
            expense.date,
            expense.distribution_method,
            expense.charge_to,
            expense.paid_by_manager,
            expense.is_building_charge,
            expense.deduct_from_fund,
            applicable,
            paid
        )
        .map_err(export_err)?;
    }

    Ok(())
}

fn read_metadata_sheet(path: &Path) -> StrataResult<(BuildingId, String)> {
    let mut reader = open_sheet(path)?;
    let headers = sheet_headers(&mut reader, path)?;
    let id_col = column_index(&headers, "building id", path)?;
    let name_col = column_index(&headers, "name", path)?;

    let record = reader
        .records()
        .next()
        .ok_or_else(|| StrataError::Import(format!("{}: no data row", path.display())))?
        .map_err(|e| import_err(path, e))?;

    let id = field(&record, id_col, path)?
        .parse::<BuildingId>()
        .map_err(|e| import_err(path, e))?;
    let name = field(&record, name_col, path)?.to_string();

    Ok((id, name))
}

fn read_units_sheet(path: &Path) -> StrataResult<Vec<Unit>> {
    let mut reader = open_sheet(path)?;
    let headers = sheet_headers(&mut reader, path)?;
    let id_col = column_index(&headers, "id", path)?;
    let name_col = column_index(&headers, "name", path)?;
    let number_col = column_index(&headers, "unit number", path)?;
    let area_col = column_index(&headers, "area", path)?;
    let occupants_col = column_index(&headers, "occupants", path)?;
    let owner_col = column_index(&headers, "owner", path)?;
    let tenant_col = column_index(&headers, "tenant", path)?;

    let mut units = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| import_err(path, e))?;

        let name = field(&record, name_col, path)?;
        let tenant = field(&record, tenant_col, path)?;

        units.push(Unit {
            id: field(&record, id_col, path)?
                .parse::<UnitId>()
                .map_err(|e| import_err(path, e))?,
            name: if name.is_empty() {
                UnitName::Default
            } else {
                UnitName::Custom(name.to_string())
            },
            unit_number: field(&record, number_col, path)?
                .parse::<u32>()
                .map_err(|e| import_err(path, e))?,
            area: field(&record, area_col, path)?
                .parse::<f64>()
                .map_err(|e| import_err(path, e))?,
            occupants: field(&record, occupants_col, path)?
                .parse::<u32>()
                .map_err(|e| import_err(path, e))?,
            owner_name: field(&record, owner_col, path)?.to_string(),
            tenant_name: if tenant.is_empty() {
                None
            } else {
                Some(tenant.to_string())
            },
        });
    }

    Ok(units)
}

fn read_expenses_sheet(
    path: &Path,
    building_id: BuildingId,
    units: &[Unit],
) -> StrataResult<Vec<Expense>> {
    let mut reader = open_sheet(path)?;
    let headers = sheet_headers(&mut reader, path)?;
    let id_col = column_index(&headers, "id", path)?;
    let description_col = column_index(&headers, "description", path)?;
    let amount_col = column_index(&headers, "total amount", path)?;
    let date_col = column_index(&headers, "date", path)?;
    let method_col = column_index(&headers, "method", path)?;
    let charge_to_col = column_index(&headers, "charge to", path)?;
    let manager_col = column_index(&headers, "paid by manager", path)?;
    let charge_col = column_index(&headers, "building charge", path)?;
    let fund_col = column_index(&headers, "deduct from fund", path)?;
    let applicable_col = column_index(&headers, "applicable units", path)?;
    let paid_col = column_index(&headers, "paid units", path)?;

    let mut expenses = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| import_err(path, e))?;

        let method_str = field(&record, method_col, path)?;
        let method = DistributionMethod::parse(method_str).ok_or_else(|| {
            StrataError::Import(format!(
                "{}: unknown distribution method '{}'",
                path.display(),
                method_str
            ))
        })?;

        let charge_to_str = field(&record, charge_to_col, path)?;
        let charge_to = ChargeTo::parse(charge_to_str).ok_or_else(|| {
            StrataError::Import(format!(
                "{}: unknown charge-to scope '{}'",
                path.display(),
                charge_to_str
            ))
        })?;

        let applicable_units = split_ids(field(&record, applicable_col, path)?, path)?;
        let paid_units = split_ids(field(&record, paid_col, path)?, path)?;

        // Listed units are paid; the rest of the applicable set is unpaid.
        // An empty applicable set tracks every unit, and general expenses
        // carry no per-unit status at all.
        let mut payment_status = BTreeMap::new();
        if method != DistributionMethod::General {
            if applicable_units.is_empty() {
                for unit in units {
                    payment_status.insert(unit.id, PaymentStatus::Unpaid);
                }
            } else {
                for unit_id in &applicable_units {
                    payment_status.insert(*unit_id, PaymentStatus::Unpaid);
                }
            }
            for unit_id in &paid_units {
                payment_status.insert(*unit_id, PaymentStatus::Paid);
            }
        }

        expenses.push(Expense {
            id: field(&record, id_col, path)?
                .parse::<ExpenseId>()
                .map_err(|e| import_err(path, e))?,
            building_id,
            description: field(&record, description_col, path)?.to_string(),
            total_amount: crate::models::Money::new(
                field(&record, amount_col, path)?
                    .parse::<i64>()
                    .map_err(|e| import_err(path, e))?,
            ),
            date: field(&record, date_col, path)?
                .parse::<NaiveDate>()
                .map_err(|e| import_err(path, e))?,
            distribution_method: method,
            charge_to,
            paid_by_manager: parse_bool(field(&record, manager_col, path)?, path)?,
            is_building_charge: parse_bool(field(&record, charge_col, path)?, path)?,
            deduct_from_fund: parse_bool(field(&record, fund_col, path)?, path)?,
            applicable_units,
            payment_status,
        });
    }

    Ok(expenses)
}

/// Locate a sheet in the workbook directory by case-insensitive file stem
fn find_sheet(dir: &Path, stem: &str) -> StrataResult<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| StrataError::Import(format!("Failed to read workbook directory: {}", e)))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| StrataError::Import(format!("Failed to read workbook directory: {}", e)))?;
        let path = entry.path();

        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let matches = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case(stem))
            .unwrap_or(false);

        if is_csv && matches {
            return Ok(path);
        }
    }

    Err(StrataError::Import(format!(
        "Workbook is missing the '{}' sheet",
        stem
    )))
}

fn create_sheet(path: &Path) -> StrataResult<File> {
    File::create(path).map_err(|e| StrataError::Export(e.to_string()))
}

fn open_sheet(path: &Path) -> StrataResult<csv::Reader<File>> {
    csv::Reader::from_path(path).map_err(|e| import_err(path, e))
}

fn sheet_headers(reader: &mut csv::Reader<File>, path: &Path) -> StrataResult<StringRecord> {
    reader
        .headers()
        .map(|h| h.clone())
        .map_err(|e| import_err(path, e))
}

fn column_index(headers: &StringRecord, name: &str, path: &Path) -> StrataResult<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            StrataError::Import(format!("{}: missing column '{}'", path.display(), name))
        })
}

fn field<'r>(record: &'r StringRecord, index: usize, path: &Path) -> StrataResult<&'r str> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| StrataError::Import(format!("{}: short row", path.display())))
}

fn parse_bool(s: &str, path: &Path) -> StrataResult<bool> {
    match s.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" | "" => Ok(false),
        other => Err(StrataError::Import(format!(
            "{}: expected a boolean, got '{}'",
            path.display(),
            other
        ))),
    }
}

fn join_ids<'a, I: Iterator<Item = &'a UnitId>>(ids: I) -> String {
    ids.map(|id| id.as_uuid().to_string())
        .collect::<Vec<_>>()
        .join(";")
}

fn split_ids(s: &str, path: &Path) -> StrataResult<Vec<UnitId>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .map(|part| part.trim().parse::<UnitId>().map_err(|e| import_err(path, e)))
        .collect()
}

fn export_err(e: std::io::Error) -> StrataError {
    StrataError::Export(e.to_string())
}

fn import_err<E: std::fmt::Display>(path: &Path, e: E) -> StrataError {
    StrataError::Import(format!("{}: {}", path.display(), e))
}

/// Escape a string for CSV format
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
