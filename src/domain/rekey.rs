//! Ownership re-key planning.
//!
//! Tasks and notifications used to reference their owner by employee
//! document id; they now reference the owner's authentication UID. A plan is
//! computed from exported records and applied without touching the store.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::domain::entities::{EmployeeRecord, OwnedRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rekey {
    pub record_id: String,
    pub collection: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RekeyPlan {
    pub rekeys: Vec<Rekey>,
    /// Records already owned by a known UID.
    pub already_migrated: usize,
    /// Record ids whose owner matches no employee id or UID.
    pub unresolved: Vec<String>,
    /// Referenced employees that have no UID yet.
    pub missing_uid: BTreeSet<String>,
}

impl RekeyPlan {
    pub fn is_noop(&self) -> bool {
        self.rekeys.is_empty()
    }
}

/// Work out which owner references must move from employee id to UID.
pub fn plan_owner_rekey(employees: &[EmployeeRecord], records: &[OwnedRecord]) -> RekeyPlan {
    let by_id: HashMap<&str, &EmployeeRecord> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();
    let uids: HashSet<&str> = employees.iter().filter_map(|e| e.uid.as_deref()).collect();

    let mut plan = RekeyPlan::default();
    for record in records {
        let owner = record.owner_id.as_str();
        if uids.contains(owner) {
            plan.already_migrated += 1;
            continue;
        }
        match by_id.get(owner) {
            Some(employee) => match employee.uid.as_deref() {
                Some(uid) => plan.rekeys.push(Rekey {
                    record_id: record.id.clone(),
                    collection: record.collection.clone(),
                    from: owner.to_string(),
                    to: uid.to_string(),
                }),
                None => {
                    plan.missing_uid.insert(employee.id.clone());
                }
            },
            None => plan.unresolved.push(record.id.clone()),
        }
    }
    plan
}

/// Apply `plan` to `records`, returning the updated copies.
///
/// A rekey only fires while the record still holds its `from` owner, so
/// applying the same plan twice changes nothing the second time.
pub fn apply_plan(records: &[OwnedRecord], plan: &RekeyPlan) -> Vec<OwnedRecord> {
    let moves: HashMap<(&str, &str), &Rekey> = plan
        .rekeys
        .iter()
        .map(|r| ((r.collection.as_str(), r.record_id.as_str()), r))
        .collect();

    records
        .iter()
        .map(|record| {
            let mut updated = record.clone();
            if let Some(rekey) = moves.get(&(record.collection.as_str(), record.id.as_str())) {
                if record.owner_id == rekey.from {
                    updated.owner_id = rekey.to.clone();
                }
            }
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    fn owned(id: &str, collection: &str, owner: &str) -> OwnedRecord {
        OwnedRecord {
            id: id.into(),
            collection: collection.into(),
            owner_id: owner.into(),
        }
    }

    fn staff() -> Vec<EmployeeRecord> {
        vec![
            EmployeeRecord::new("emp-1", "Alice", "Eng", Role::Admin).with_uid("uid-a"),
            EmployeeRecord::new("emp-2", "Bob", "Eng", Role::Employee),
        ]
    }

    #[test]
    fn given_mixed_owners_when_planning_then_classifies_each_record() {
        let records = vec![
            owned("t1", "tasks", "emp-1"),
            owned("t2", "tasks", "uid-a"),
            owned("n1", "notifications", "emp-2"),
            owned("n2", "notifications", "ghost"),
        ];
        let plan = plan_owner_rekey(&staff(), &records);

        assert_eq!(plan.rekeys.len(), 1);
        assert_eq!(plan.rekeys[0].record_id, "t1");
        assert_eq!(plan.rekeys[0].to, "uid-a");
        assert_eq!(plan.already_migrated, 1);
        assert_eq!(plan.unresolved, vec!["n2".to_string()]);
        assert!(plan.missing_uid.contains("emp-2"));
    }

    #[test]
    fn given_applied_plan_when_replanning_then_noop() {
        let records = vec![owned("t1", "tasks", "emp-1"), owned("n1", "notifications", "emp-1")];
        let plan = plan_owner_rekey(&staff(), &records);
        let migrated = apply_plan(&records, &plan);

        assert!(migrated.iter().all(|r| r.owner_id == "uid-a"));
        assert!(plan_owner_rekey(&staff(), &migrated).is_noop());
        assert_eq!(apply_plan(&migrated, &plan), migrated);
    }

    #[test]
    fn given_same_id_in_two_collections_when_applying_then_keyed_by_collection() {
        let records = vec![owned("x", "tasks", "emp-1"), owned("x", "notifications", "ghost")];
        let plan = plan_owner_rekey(&staff(), &records);
        let migrated = apply_plan(&records, &plan);
        assert_eq!(migrated[0].owner_id, "uid-a");
        assert_eq!(migrated[1].owner_id, "ghost");
    }
}
