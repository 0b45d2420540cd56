//! Employee salary report and CRUD over `employees_salaries`.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::storage::EMPLOYEES_COLLECTION;

use super::{f64_field, i64_field, str_field};

/// One row of the salaries-by-department report.
///
/// The group key stays under `_id` — this report re-exposes the department
/// name there instead of renaming it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeptSalaryRow {
    #[serde(rename = "_id")]
    pub dept: String,
    pub total_salaries: f64,
    pub avg_salary: f64,
    pub employees_count: i64,
    pub min_salary: f64,
    pub max_salary: f64,
}

/// Employee document shaped for output: `_id` as a hex string, timestamps as
/// RFC 3339.
#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub salary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Employee {
    fn from_document(doc: &Document) -> Self {
        Self {
            id: doc
                .get_object_id("_id")
                .map(|oid| oid.to_hex())
                .unwrap_or_default(),
            first_name: str_field(doc, "first_name"),
            last_name: str_field(doc, "last_name"),
            email: str_field(doc, "email"),
            position: str_field(doc, "position"),
            department: str_field(doc, "department"),
            salary: f64_field(doc, "salary"),
            created_at: rfc3339_field(doc, "created_at"),
            updated_at: rfc3339_field(doc, "updated_at"),
        }
    }
}

fn rfc3339_field(doc: &Document, key: &str) -> Option<String> {
    doc.get_datetime(key)
        .ok()
        .and_then(|dt| dt.try_to_rfc3339_string().ok())
}

/// Fields accepted when creating an employee. Unset optional fields get
/// server-side defaults (empty string, zero salary).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

/// Partial update; only supplied fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub salary: Option<f64>,
}

impl UpdateEmployee {
    /// Build the `$set` document: supplied fields plus `updated_at`.
    fn set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(v) = &self.first_name {
            set.insert("first_name", v.as_str());
        }
        if let Some(v) = &self.last_name {
            set.insert("last_name", v.as_str());
        }
        if let Some(v) = &self.email {
            set.insert("email", v.as_str());
        }
        if let Some(v) = &self.position {
            set.insert("position", v.as_str());
        }
        if let Some(v) = &self.department {
            set.insert("department", v.as_str());
        }
        if let Some(v) = self.salary {
            set.insert("salary", v);
        }
        set.insert("updated_at", DateTime::now());
        set
    }
}

/// Report and CRUD operations over the employees collection.
#[derive(Clone)]
pub struct EmployeeReports {
    employees: Collection<Document>,
}

impl EmployeeReports {
    pub fn new(database: &Database) -> Self {
        Self {
            employees: database.collection(EMPLOYEES_COLLECTION),
        }
    }

    /// Salary totals per department, largest payroll first.
    pub async fn salaries_by_dept(&self) -> Result<Vec<DeptSalaryRow>> {
        let mut cursor = self.employees.aggregate(salaries_by_dept_pipeline()).await?;

        let mut rows = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            rows.push(DeptSalaryRow {
                dept: str_field(&doc, "_id"),
                total_salaries: f64_field(&doc, "total_salaries"),
                avg_salary: f64_field(&doc, "avg_salary"),
                employees_count: i64_field(&doc, "employees_count"),
                min_salary: f64_field(&doc, "min_salary"),
                max_salary: f64_field(&doc, "max_salary"),
            });
        }

        Ok(rows)
    }

    /// All employee documents.
    pub async fn list(&self) -> Result<Vec<Employee>> {
        let mut cursor = self.employees.find(doc! {}).await?;

        let mut employees = Vec::new();
        while cursor.advance().await? {
            let doc = cursor.deserialize_current()?;
            employees.push(Employee::from_document(&doc));
        }

        Ok(employees)
    }

    /// Insert a new employee with server-assigned `created_at`.
    pub async fn create(&self, new: NewEmployee) -> Result<Employee> {
        let mut doc = doc! {
            "first_name": new.first_name.unwrap_or_default(),
            "last_name": new.last_name.unwrap_or_default(),
            "email": new.email.unwrap_or_default(),
            "position": new.position.unwrap_or_default(),
            "department": new.department.unwrap_or_default(),
            "salary": new.salary.unwrap_or(0.0),
            "created_at": DateTime::now(),
        };

        let inserted = self.employees.insert_one(&doc).await?;
        if let Some(id) = inserted.inserted_id.as_object_id() {
            doc.insert("_id", id);
        }

        Ok(Employee::from_document(&doc))
    }

    /// Merge supplied fields into an existing employee, setting `updated_at`.
    /// Returns the modified-document count.
    pub async fn update(&self, id: &str, update: UpdateEmployee) -> Result<u64> {
        let id = parse_object_id(id)?;

        let result = self
            .employees
            .update_one(doc! { "_id": id }, doc! { "$set": update.set_document() })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("employee"));
        }
        Ok(result.modified_count)
    }

    /// Delete an employee. Returns the deleted-document count.
    pub async fn delete(&self, id: &str) -> Result<u64> {
        let id = parse_object_id(id)?;

        let result = self.employees.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("employee"));
        }
        Ok(result.deleted_count)
    }
}

fn parse_object_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|e| AppError::InvalidParameter {
        name: "id",
        reason: e.to_string(),
    })
}

/// Group salaries by department name, computing sum/avg/count/min/max.
pub fn salaries_by_dept_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": "$dept_name",
            "total_salaries": { "$sum": "$salary" },
            "avg_salary": { "$avg": "$salary" },
            "employees_count": { "$sum": 1 },
            "min_salary": { "$min": "$salary" },
            "max_salary": { "$max": "$salary" },
        }},
        doc! { "$sort": { "total_salaries": -1 } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salaries_pipeline_groups_then_sorts() {
        let pipeline = salaries_by_dept_pipeline();
        assert_eq!(pipeline.len(), 2);

        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$dept_name");
        assert!(group.contains_key("total_salaries"));
        assert!(group.contains_key("avg_salary"));
        assert!(group.contains_key("employees_count"));
        assert!(group.contains_key("min_salary"));
        assert!(group.contains_key("max_salary"));

        let sort = pipeline[1].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("total_salaries").unwrap(), -1);
    }

    #[test]
    fn test_update_set_document_only_writes_supplied_fields() {
        let update = UpdateEmployee {
            salary: Some(60_000.0),
            ..Default::default()
        };
        let set = update.set_document();

        assert_eq!(set.get_f64("salary").unwrap(), 60_000.0);
        assert!(set.contains_key("updated_at"));
        assert!(!set.contains_key("first_name"));
        assert!(!set.contains_key("email"));
    }

    #[test]
    fn test_employee_from_document_shapes_output() {
        let oid = ObjectId::new();
        let doc = doc! {
            "_id": oid,
            "first_name": "Grace",
            "last_name": "Hopper",
            "salary": 120_000_i32,
            "created_at": DateTime::now(),
        };

        let employee = Employee::from_document(&doc);
        assert_eq!(employee.id, oid.to_hex());
        assert_eq!(employee.first_name, "Grace");
        assert_eq!(employee.salary, 120_000.0);
        assert_eq!(employee.email, "");
        assert!(employee.created_at.is_some());
        assert!(employee.updated_at.is_none());
    }
}
