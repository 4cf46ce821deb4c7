use std::collections::HashMap;

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::education::{EducationDetail, EducationRow};
use crate::models::employee::{EmployeeAggregate, EmployeeRow};
use crate::models::employment::{EmploymentDetail, EmploymentRow};

/// Every onboarding table, children first so deletes respect the foreign keys.
pub const ONBOARDING_TABLES: [&str; 8] = [
    "signatures",
    "employment_history",
    "education",
    "bank_details",
    "addresses",
    "previous_employment",
    "government_ids",
    "employees",
];

const EMPLOYEE_JOIN: &str = r#"
    SELECT
        e.id, e.full_name, e.email, e.phone_no, e.alternate_number, e.guardian_name,
        e.guardian_contact, e.marital_status, e.gender, e.blood_group, e.date_of_birth,
        e.created_at,
        g.aadhar_no, g.aadhar_file, g.pan_no, g.pan_file,
        p.pf_no, p.uan_no,
        a.current_address, a.current_city, a.current_state, a.current_pincode,
        a.permanent_address, a.permanent_city, a.permanent_state, a.permanent_pincode,
        b.bank_name, b.account_no, b.ifsc_code, b.branch_name,
        s.signature_file, s.consent, s.status
    FROM employees e
    LEFT JOIN government_ids g ON e.id = g.employee_id
    LEFT JOIN previous_employment p ON e.id = p.employee_id
    LEFT JOIN addresses a ON e.id = a.employee_id
    LEFT JOIN bank_details b ON e.id = b.employee_id
    LEFT JOIN signatures s ON e.id = s.employee_id
    ORDER BY e.id
"#;

pub async fn list_all(pool: &PgPool) -> Result<Vec<EmployeeAggregate>, AppError> {
    let rows = sqlx::query_as::<_, EmployeeRow>(EMPLOYEE_JOIN)
        .fetch_all(pool)
        .await
        .map_err(|err| AppError::QueryError("Database query error", err.to_string()))?;

    let education = sqlx::query_as::<_, EducationRow>("SELECT * FROM education ORDER BY id")
        .fetch_all(pool)
        .await
        .map_err(|err| AppError::QueryError("Error fetching details", err.to_string()))?;

    let employment =
        sqlx::query_as::<_, EmploymentRow>("SELECT * FROM employment_history ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(|err| AppError::QueryError("Error fetching details", err.to_string()))?;

    Ok(assemble(rows, education, employment))
}

/// Attaches each employee's education and employment rows, keeping row order.
pub fn assemble(
    rows: Vec<EmployeeRow>,
    education: Vec<EducationRow>,
    employment: Vec<EmploymentRow>,
) -> Vec<EmployeeAggregate> {
    let mut education = group_by_employee(education, |row| row.employee_id);
    let mut employment = group_by_employee(employment, |row| row.employee_id);

    rows.into_iter()
        .map(|row| {
            let mut employee = EmployeeAggregate::from(row);
            employee.education_details = education
                .remove(&employee.id)
                .unwrap_or_default()
                .into_iter()
                .map(EducationDetail::from)
                .collect();
            employee.employment_details = employment
                .remove(&employee.id)
                .unwrap_or_default()
                .into_iter()
                .map(EmploymentDetail::from)
                .collect();
            employee
        })
        .collect()
}

fn group_by_employee<T, F>(rows: Vec<T>, key: F) -> HashMap<i32, Vec<T>>
where
    F: Fn(&T) -> i32,
{
    let mut groups: HashMap<i32, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// Sets the review status on an employee's signature record.
///
/// Returns the number of rows touched; an unknown id touches none and is not an error.
pub async fn set_status(pool: &PgPool, employee_id: i32, status: &str) -> Result<u64, AppError> {
    let update_error = |err: sqlx::Error| AppError::QueryError("Error updating status", err.to_string());

    let mut tx = pool.begin().await.map_err(update_error)?;

    let result = sqlx::query("UPDATE signatures SET status = $1 WHERE employee_id = $2")
        .bind(status)
        .bind(employee_id)
        .execute(&mut *tx)
        .await
        .map_err(update_error)?;

    tx.commit().await.map_err(update_error)?;

    Ok(result.rows_affected())
}

/// Deletes every onboarding record in one transaction.
pub async fn clear_all(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|err| AppError::TransactionError(err.to_string()))?;

    for table in ONBOARDING_TABLES {
        // Table names come from the constant above, never from input.
        let deleted = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                AppError::QueryError("Error clearing records", format!("{}: {}", table, err))
            })?;
        log::debug!("Cleared {} rows from {}", deleted.rows_affected(), table);
    }

    tx.commit()
        .await
        .map_err(|err| AppError::CommitError(err.to_string()))
}
