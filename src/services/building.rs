//! Building service
//!
//! Business logic for building, unit, and expense lifecycle. Every mutation
//! reads the current collection, produces a replacement, and commits it
//! through the store in one step; validation happens before any commit.

use std::collections::BTreeMap;

use crate::error::{StrataError, StrataResult};
use crate::models::{
    Building, BuildingId, DistributionMethod, Expense, ExpenseId, PaymentStatus, Unit, UnitId,
    UnitName,
};
use crate::storage::Storage;

/// A validated unit record supplied by the presentation layer
#[derive(Debug, Clone)]
pub struct UnitDraft {
    pub name: UnitName,
    pub area: f64,
    pub occupants: u32,
    pub owner_name: String,
    pub tenant_name: Option<String>,
}

/// A validated expense record supplied by the presentation layer
///
/// For `custom` distribution, `total_amount` is the amount per selected
/// unit and `applicable_units` names the selection; for other methods the
/// selection is ignored and snapshotted from the building's units.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub description: String,
    pub total_amount: crate::models::Money,
    pub date: chrono::NaiveDate,
    pub distribution_method: DistributionMethod,
    pub charge_to: crate::models::ChargeTo,
    pub paid_by_manager: bool,
    pub is_building_charge: bool,
    pub deduct_from_fund: bool,
    pub applicable_units: Vec<UnitId>,
}

/// Service for building management
pub struct BuildingService<'a> {
    storage: &'a Storage,
}

impl<'a> BuildingService<'a> {
    /// Create a new building service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a building with `unit_count` seeded units
    pub fn create_building(&self, name: &str, unit_count: u32) -> StrataResult<Building> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StrataError::Validation(
                "Building name cannot be empty".into(),
            ));
        }
        if unit_count == 0 {
            return Err(StrataError::Validation(
                "A building needs at least one unit".into(),
            ));
        }

        let building = Building::new(name, unit_count);

        let mut all = self.storage.buildings.get_all()?;
        all.push(building.clone());
        self.storage.buildings.replace_all(all)?;

        Ok(building)
    }

    /// Get a building by ID
    pub fn get_building(&self, id: BuildingId) -> StrataResult<Option<Building>> {
        self.storage.buildings.get(id)
    }

    /// Get all buildings
    pub fn list_buildings(&self) -> StrataResult<Vec<Building>> {
        self.storage.buildings.get_all()
    }

    /// Find a building by name or ID string
    pub fn find_building(&self, identifier: &str) -> StrataResult<Option<Building>> {
        if let Some(building) = self.storage.buildings.get_by_name(identifier)? {
            return Ok(Some(building));
        }

        if let Ok(id) = identifier.parse::<BuildingId>() {
            return self.storage.buildings.get(id);
        }

        Ok(None)
    }

    /// Add a unit to a building; the unit number is assigned sequentially
    pub fn add_unit(&self, building_id: BuildingId, draft: UnitDraft) -> StrataResult<Unit> {
        let mut all = self.storage.buildings.get_all()?;
        let building = find_mut(&mut all, building_id)?;

        let unit = Unit {
            id: UnitId::new(),
            name: draft.name,
            unit_number: building.next_unit_number(),
            area: draft.area,
            occupants: draft.occupants,
            owner_name: draft.owner_name,
            tenant_name: draft.tenant_name,
        };
        unit.validate()
            .map_err(|e| StrataError::Validation(e.to_string()))?;

        building.units.push(unit.clone());
        self.storage.buildings.replace_all(all)?;

        Ok(unit)
    }

    /// Update an existing unit in place; the unit number is preserved
    pub fn update_unit(
        &self,
        building_id: BuildingId,
        unit_id: UnitId,
        draft: UnitDraft,
    ) -> StrataResult<Unit> {
        let mut all = self.storage.buildings.get_all()?;
        let building = find_mut(&mut all, building_id)?;

        let unit = building
            .units
            .iter_mut()
            .find(|u| u.id == unit_id)
            .ok_or_else(|| StrataError::unit_not_found(unit_id.to_string()))?;

        unit.name = draft.name;
        unit.area = draft.area;
        unit.occupants = draft.occupants;
        unit.owner_name = draft.owner_name;
        unit.tenant_name = draft.tenant_name;
        unit.validate()
            .map_err(|e| StrataError::Validation(e.to_string()))?;

        let updated = unit.clone();
        self.storage.buildings.replace_all(all)?;

        Ok(updated)
    }

    /// Add an expense, initializing payment status for every eligible unit
    pub fn add_expense(
        &self,
        building_id: BuildingId,
        draft: ExpenseDraft,
    ) -> StrataResult<Expense> {
        let mut all = self.storage.buildings.get_all()?;
        let building = find_mut(&mut all, building_id)?;

        let applicable_units = resolve_applicable_units(&draft, building);
        let payment_status = initial_payment_status(&draft, building, &applicable_units);

        let expense = Expense {
            id: ExpenseId::new(),
            building_id,
            description: draft.description,
            total_amount: draft.total_amount,
            date: draft.date,
            distribution_method: draft.distribution_method,
            charge_to: draft.charge_to,
            paid_by_manager: draft.paid_by_manager,
            is_building_charge: draft.is_building_charge,
            deduct_from_fund: draft.deduct_from_fund,
            applicable_units,
            payment_status,
        };
        expense
            .validate()
            .map_err(|e| StrataError::Validation(e.to_string()))?;

        building.expenses.push(expense.clone());
        self.storage.buildings.replace_all(all)?;

        Ok(expense)
    }

    /// Update an expense in place
    ///
    /// Existing payment-status entries are preserved, except when the
    /// distribution method transitions to or from `general`: to `general`
    /// clears the map (general expenses carry no per-unit status), from
    /// `general` re-initializes it the way creation does.
    pub fn update_expense(
        &self,
        building_id: BuildingId,
        expense_id: ExpenseId,
        draft: ExpenseDraft,
    ) -> StrataResult<Expense> {
        let mut all = self.storage.buildings.get_all()?;
        let building = find_mut(&mut all, building_id)?;

        let applicable_units = resolve_applicable_units(&draft, building);
        let fresh_status = initial_payment_status(&draft, building, &applicable_units);

        let expense = building
            .expenses
            .iter_mut()
            .find(|e| e.id == expense_id)
            .ok_or_else(|| StrataError::expense_not_found(expense_id.to_string()))?;

        let was_general = expense.distribution_method == DistributionMethod::General;
        let becomes_general = draft.distribution_method == DistributionMethod::General;

        let payment_status = if becomes_general {
            BTreeMap::new()
        } else if was_general {
            fresh_status
        } else {
            expense.payment_status.clone()
        };

        expense.description = draft.description;
        expense.total_amount = draft.total_amount;
        expense.date = draft.date;
        expense.distribution_method = draft.distribution_method;
        expense.charge_to = draft.charge_to;
        expense.paid_by_manager = draft.paid_by_manager;
        expense.is_building_charge = draft.is_building_charge;
        expense.deduct_from_fund = draft.deduct_from_fund;
        expense.applicable_units = applicable_units;
        expense.payment_status = payment_status;

        expense
            .validate()
            .map_err(|e| StrataError::Validation(e.to_string()))?;

        let updated = expense.clone();
        self.storage.buildings.replace_all(all)?;

        Ok(updated)
    }

    /// Delete an expense
    pub fn delete_expense(
        &self,
        building_id: BuildingId,
        expense_id: ExpenseId,
    ) -> StrataResult<()> {
        let mut all = self.storage.buildings.get_all()?;
        let building = find_mut(&mut all, building_id)?;

        let before = building.expenses.len();
        building.expenses.retain(|e| e.id != expense_id);
        if building.expenses.len() == before {
            return Err(StrataError::expense_not_found(expense_id.to_string()));
        }

        self.storage.buildings.replace_all(all)?;
        Ok(())
    }

    /// Set a unit's payment status on an expense
    pub fn set_payment_status(
        &self,
        building_id: BuildingId,
        expense_id: ExpenseId,
        unit_id: UnitId,
        status: PaymentStatus,
    ) -> StrataResult<()> {
        let mut all = self.storage.buildings.get_all()?;
        let building = find_mut(&mut all, building_id)?;

        if building.unit(unit_id).is_none() {
            return Err(StrataError::unit_not_found(unit_id.to_string()));
        }

        let expense = building
            .expenses
            .iter_mut()
            .find(|e| e.id == expense_id)
            .ok_or_else(|| StrataError::expense_not_found(expense_id.to_string()))?;

        if expense.distribution_method == DistributionMethod::General {
            return Err(StrataError::Validation(
                "General expenses carry no per-unit payment status".into(),
            ));
        }

        expense.payment_status.insert(unit_id, status);
        self.storage.buildings.replace_all(all)?;
        Ok(())
    }

    /// Export one building, or the whole collection, as pretty-printed JSON
    pub fn export_json(&self, building_id: Option<BuildingId>) -> StrataResult<String> {
        match building_id {
            Some(id) => {
                let building = self
                    .storage
                    .buildings
                    .get(id)?
                    .ok_or_else(|| StrataError::building_not_found(id.to_string()))?;
                serde_json::to_string_pretty(&building)
                    .map_err(|e| StrataError::Export(e.to_string()))
            }
            None => {
                let all = self.storage.buildings.get_all()?;
                serde_json::to_string_pretty(&all).map_err(|e| StrataError::Export(e.to_string()))
            }
        }
    }

    /// Import a JSON document
    ///
    /// An array replaces the whole collection; a single building object is
    /// merged by id (replace if the id exists, append otherwise). Parsing
    /// and validation complete before any mutation, so a failed import
    /// leaves the store untouched.
    pub fn import_json(&self, json: &str) -> StrataResult<()> {
        if let Ok(buildings) = serde_json::from_str::<Vec<Building>>(json) {
            for building in &buildings {
                building.validate().map_err(StrataError::Import)?;
            }
            self.storage.buildings.replace_all(buildings)?;
            return Ok(());
        }

        if let Ok(building) = serde_json::from_str::<Building>(json) {
            building.validate().map_err(StrataError::Import)?;
            return self.import_building(building);
        }

        Err(StrataError::Import(
            "Expected a building object or an array of buildings".into(),
        ))
    }

    /// Merge one building into the collection by id
    pub fn import_building(&self, building: Building) -> StrataResult<()> {
        building.validate().map_err(StrataError::Import)?;

        let mut all = self.storage.buildings.get_all()?;
        match all.iter_mut().find(|b| b.id == building.id) {
            Some(existing) => *existing = building,
            None => all.push(building),
        }
        self.storage.buildings.replace_all(all)?;
        Ok(())
    }
}

fn find_mut(all: &mut [Building], id: BuildingId) -> StrataResult<&mut Building> {
    all.iter_mut()
        .find(|b| b.id == id)
        .ok_or_else(|| StrataError::building_not_found(id.to_string()))
}

/// The unit-id list stored on an expense: the selection for `custom`, a
/// snapshot of all units for everything else
fn resolve_applicable_units(draft: &ExpenseDraft, building: &Building) -> Vec<UnitId> {
    if draft.distribution_method == DistributionMethod::Custom {
        draft.applicable_units.clone()
    } else {
        building.units.iter().map(|u| u.id).collect()
    }
}

/// Initial payment-status map: unpaid for every eligible unit, empty for
/// `general`. A `custom` expense with no selection still tracks every unit.
fn initial_payment_status(
    draft: &ExpenseDraft,
    building: &Building,
    applicable_units: &[UnitId],
) -> BTreeMap<UnitId, PaymentStatus> {
    let mut status = BTreeMap::new();
    if draft.distribution_method == DistributionMethod::General {
        return status;
    }
    if applicable_units.is_empty() {
        for unit in &building.units {
            status.insert(unit.id, PaymentStatus::Unpaid);
        }
    } else {
        for unit_id in applicable_units {
            status.insert(*unit_id, PaymentStatus::Unpaid);
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::StrataPaths;
    use crate::models::{ChargeTo, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StrataPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn expense_draft(method: DistributionMethod) -> ExpenseDraft {
        ExpenseDraft {
            description: "Water bill".to_string(),
            total_amount: Money::new(45000),
            date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            distribution_method: method,
            charge_to: ChargeTo::All,
            paid_by_manager: false,
            is_building_charge: false,
            deduct_from_fund: false,
            applicable_units: Vec::new(),
        }
    }

    fn unit_draft() -> UnitDraft {
        UnitDraft {
            name: UnitName::Default,
            area: 85.0,
            occupants: 3,
            owner_name: "H. Sadeghi".to_string(),
            tenant_name: None,
        }
    }

    #[test]
    fn test_create_building() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 4).unwrap();
        assert_eq!(building.units.len(), 4);

        let listed = service.list_buildings().unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_create_building_rejects_empty_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        assert!(matches!(
            service.create_building("  ", 3),
            Err(StrataError::Validation(_))
        ));
        assert!(matches!(
            service.create_building("Maple House", 0),
            Err(StrataError::Validation(_))
        ));
    }

    #[test]
    fn test_find_building_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let created = service.create_building("Maple House", 2).unwrap();

        let by_name = service.find_building("maple house").unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        let by_id = service
            .find_building(&created.id.as_uuid().to_string())
            .unwrap()
            .unwrap();
        assert_eq!(by_id.id, created.id);

        assert!(service.find_building("nowhere").unwrap().is_none());
    }

    #[test]
    fn test_add_unit_assigns_next_number() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 3).unwrap();
        let unit = service.add_unit(building.id, unit_draft()).unwrap();
        assert_eq!(unit.unit_number, 4);

        let reloaded = service.get_building(building.id).unwrap().unwrap();
        assert_eq!(reloaded.units.len(), 4);
    }

    #[test]
    fn test_update_unit_preserves_number() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 2).unwrap();
        let unit_id = building.units[1].id;

        let mut draft = unit_draft();
        draft.name = UnitName::Custom("Garden flat".to_string());
        draft.tenant_name = Some("S. Karimi".to_string());

        let updated = service.update_unit(building.id, unit_id, draft).unwrap();
        assert_eq!(updated.unit_number, 2);
        assert_eq!(updated.display_name(), "Garden flat");
        assert!(!updated.is_owner_occupied());
    }

    #[test]
    fn test_add_expense_initializes_unpaid_status() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 3).unwrap();
        let expense = service
            .add_expense(building.id, expense_draft(DistributionMethod::UnitCount))
            .unwrap();

        assert_eq!(expense.payment_status.len(), 3);
        assert!(expense
            .payment_status
            .values()
            .all(|s| *s == PaymentStatus::Unpaid));
        // Non-custom methods snapshot all unit ids
        assert_eq!(expense.applicable_units.len(), 3);
    }

    #[test]
    fn test_add_custom_expense_initializes_selected_units_only() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 3).unwrap();
        let mut draft = expense_draft(DistributionMethod::Custom);
        draft.applicable_units = vec![building.units[0].id];

        let expense = service.add_expense(building.id, draft).unwrap();
        assert_eq!(expense.payment_status.len(), 1);
        assert_eq!(expense.applicable_units, vec![building.units[0].id]);
    }

    #[test]
    fn test_add_custom_expense_without_selection_tracks_all_units() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 3).unwrap();
        let expense = service
            .add_expense(building.id, expense_draft(DistributionMethod::Custom))
            .unwrap();

        // The selection stays empty, but every unit gets an unpaid entry
        assert!(expense.applicable_units.is_empty());
        assert_eq!(expense.payment_status.len(), 3);
        assert!(expense
            .payment_status
            .values()
            .all(|s| *s == PaymentStatus::Unpaid));
    }

    #[test]
    fn test_add_general_expense_has_no_status() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 3).unwrap();
        let expense = service
            .add_expense(building.id, expense_draft(DistributionMethod::General))
            .unwrap();

        assert!(expense.payment_status.is_empty());
    }

    #[test]
    fn test_update_expense_preserves_payment_status() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 2).unwrap();
        let expense = service
            .add_expense(building.id, expense_draft(DistributionMethod::UnitCount))
            .unwrap();

        let unit_id = building.units[0].id;
        service
            .set_payment_status(building.id, expense.id, unit_id, PaymentStatus::Paid)
            .unwrap();

        let mut draft = expense_draft(DistributionMethod::Area);
        draft.total_amount = Money::new(90000);
        let updated = service
            .update_expense(building.id, expense.id, draft)
            .unwrap();

        assert_eq!(updated.total_amount, Money::new(90000));
        assert_eq!(updated.status_for(unit_id), PaymentStatus::Paid);
    }

    #[test]
    fn test_update_to_general_clears_status() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 2).unwrap();
        let expense = service
            .add_expense(building.id, expense_draft(DistributionMethod::UnitCount))
            .unwrap();

        let updated = service
            .update_expense(building.id, expense.id, expense_draft(DistributionMethod::General))
            .unwrap();
        assert!(updated.payment_status.is_empty());

        // And back: status re-initialized to unpaid for all units
        let restored = service
            .update_expense(building.id, expense.id, expense_draft(DistributionMethod::UnitCount))
            .unwrap();
        assert_eq!(restored.payment_status.len(), 2);
    }

    #[test]
    fn test_set_payment_status_rejects_general_and_unknown_unit() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 2).unwrap();
        let general = service
            .add_expense(building.id, expense_draft(DistributionMethod::General))
            .unwrap();

        let unit_id = building.units[0].id;
        assert!(matches!(
            service.set_payment_status(building.id, general.id, unit_id, PaymentStatus::Paid),
            Err(StrataError::Validation(_))
        ));

        let normal = service
            .add_expense(building.id, expense_draft(DistributionMethod::UnitCount))
            .unwrap();
        assert!(service
            .set_payment_status(building.id, normal.id, UnitId::new(), PaymentStatus::Paid)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_delete_expense() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 2).unwrap();
        let expense = service
            .add_expense(building.id, expense_draft(DistributionMethod::UnitCount))
            .unwrap();

        service.delete_expense(building.id, expense.id).unwrap();
        let reloaded = service.get_building(building.id).unwrap().unwrap();
        assert!(reloaded.expenses.is_empty());

        assert!(service
            .delete_expense(building.id, expense.id)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_export_import_round_trip_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        let building = service.create_building("Maple House", 2).unwrap();
        service
            .add_expense(building.id, expense_draft(DistributionMethod::Area))
            .unwrap();

        let exported = service.export_json(Some(building.id)).unwrap();
        let before = service.get_building(building.id).unwrap().unwrap();

        service.import_json(&exported).unwrap();

        let after = service.get_building(building.id).unwrap().unwrap();
        assert_eq!(before, after);
        assert_eq!(service.list_buildings().unwrap().len(), 1);
    }

    #[test]
    fn test_import_single_building_appends_when_new() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        service.create_building("Maple House", 1).unwrap();
        let other = Building::new("Oak Court", 2);
        let json = serde_json::to_string(&other).unwrap();

        service.import_json(&json).unwrap();
        assert_eq!(service.list_buildings().unwrap().len(), 2);
    }

    #[test]
    fn test_import_array_replaces_collection() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        service.create_building("Maple House", 1).unwrap();
        let replacement = vec![Building::new("Oak Court", 2)];
        let json = serde_json::to_string(&replacement).unwrap();

        service.import_json(&json).unwrap();
        let buildings = service.list_buildings().unwrap();
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].name, "Oak Court");
    }

    #[test]
    fn test_malformed_import_leaves_store_untouched() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BuildingService::new(&storage);

        service.create_building("Maple House", 1).unwrap();

        assert!(matches!(
            service.import_json("not json"),
            Err(StrataError::Import(_))
        ));
        assert!(matches!(
            service.import_json(r#"{"unexpected": true}"#),
            Err(StrataError::Import(_))
        ));

        let buildings = service.list_buildings().unwrap();
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].name, "Maple House");
    }
}
