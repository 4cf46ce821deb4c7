use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::{AppError, Section};
use crate::models::onboarding::OnboardingForm;
use crate::utils::upload_schema::UploadSlot;

/// Paths written by the file store, keyed by the slot they were uploaded to.
pub type StoredFiles = HashMap<UploadSlot, String>;

fn section_error(section: Section) -> impl Fn(sqlx::Error) -> AppError {
    move |err| AppError::SectionWriteError(section, err.to_string())
}

/// Persists one onboarding submission and returns the new employee id.
///
/// All eight tables are written in one transaction; the first failing insert
/// rolls everything back.
pub async fn submit(
    pool: &PgPool,
    form: &OnboardingForm,
    files: &StoredFiles,
) -> Result<i32, AppError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|err| AppError::TransactionError(err.to_string()))?;

    match insert_aggregate(&mut tx, form, files).await {
        Ok(employee_id) => {
            tx.commit()
                .await
                .map_err(|err| AppError::CommitError(err.to_string()))?;
            Ok(employee_id)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                log::error!("Rollback failed after {}: {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

async fn insert_aggregate(
    tx: &mut Transaction<'_, Postgres>,
    form: &OnboardingForm,
    files: &StoredFiles,
) -> Result<i32, AppError> {
    let file = |slot: UploadSlot| files.get(&slot).cloned();

    let personal = &form.personal;
    let employee_id: i32 = sqlx::query_scalar(
        "INSERT INTO employees (full_name, email, phone_no, alternate_number, guardian_name, \
         guardian_contact, marital_status, gender, blood_group, date_of_birth) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
    )
    .bind(&personal.full_name)
    .bind(&personal.email)
    .bind(&personal.phone_no)
    .bind(&personal.alternate_number)
    .bind(&personal.guardian_name)
    .bind(&personal.guardian_contact)
    .bind(&personal.marital_status)
    .bind(&personal.gender)
    .bind(&personal.blood_group)
    .bind(&personal.date_of_birth)
    .fetch_one(&mut **tx)
    .await
    .map_err(section_error(Section::PersonalInfo))?;

    sqlx::query(
        "INSERT INTO government_ids (employee_id, aadhar_no, aadhar_file, pan_no, pan_file) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(employee_id)
    .bind(&form.government_ids.aadhar_no)
    .bind(file(UploadSlot::AadhaarFile))
    .bind(&form.government_ids.pan_no)
    .bind(file(UploadSlot::PanFile))
    .execute(&mut **tx)
    .await
    .map_err(section_error(Section::GovernmentIds))?;

    sqlx::query("INSERT INTO previous_employment (employee_id, pf_no, uan_no) VALUES ($1, $2, $3)")
        .bind(employee_id)
        .bind(&form.previous_employment.pf_no)
        .bind(&form.previous_employment.uan_no)
        .execute(&mut **tx)
        .await
        .map_err(section_error(Section::PreviousEmployment))?;

    let address = &form.address;
    sqlx::query(
        "INSERT INTO addresses (employee_id, current_address, current_city, current_state, \
         current_pincode, permanent_address, permanent_city, permanent_state, permanent_pincode) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(employee_id)
    .bind(&address.current_address)
    .bind(&address.current_city)
    .bind(&address.current_state)
    .bind(&address.current_pincode)
    .bind(&address.permanent_address)
    .bind(&address.permanent_city)
    .bind(&address.permanent_state)
    .bind(&address.permanent_pincode)
    .execute(&mut **tx)
    .await
    .map_err(section_error(Section::Address))?;

    let bank = &form.bank_details;
    sqlx::query(
        "INSERT INTO bank_details (employee_id, bank_name, account_no, ifsc_code, branch_name) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(employee_id)
    .bind(&bank.bank_name)
    .bind(&bank.account_no)
    .bind(&bank.ifsc_code)
    .bind(&bank.branch_name)
    .execute(&mut **tx)
    .await
    .map_err(section_error(Section::BankDetails))?;

    for (index, entry) in form.education.iter().enumerate() {
        sqlx::query(
            "INSERT INTO education (employee_id, level, stream, institution, year, score, doc_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(employee_id)
        .bind(&entry.level)
        .bind(&entry.stream)
        .bind(&entry.institution)
        .bind(&entry.year)
        .bind(&entry.score)
        .bind(file(UploadSlot::EducationDoc(index)))
        .execute(&mut **tx)
        .await
        .map_err(section_error(Section::Education))?;
    }

    for (index, entry) in form.employment.iter().enumerate() {
        sqlx::query(
            "INSERT INTO employment_history (employee_id, company_name, designation, last_project, \
             start_date, end_date, doc_path) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(employee_id)
        .bind(&entry.company_name)
        .bind(&entry.designation)
        .bind(&entry.last_project)
        .bind(&entry.start_date)
        .bind(&entry.end_date)
        .bind(file(UploadSlot::EmploymentDoc(index)))
        .execute(&mut **tx)
        .await
        .map_err(section_error(Section::Employment))?;
    }

    sqlx::query("INSERT INTO signatures (employee_id, signature_file, consent) VALUES ($1, $2, $3)")
        .bind(employee_id)
        .bind(file(UploadSlot::SignatureFile))
        .bind(form.consent)
        .execute(&mut **tx)
        .await
        .map_err(section_error(Section::Signature))?;

    Ok(employee_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::employees::{self, ONBOARDING_TABLES};
    use crate::utils::multipart::FormFields;
    use sqlx::Executor;

    fn form(pairs: &[(&str, &str)]) -> OnboardingForm {
        let fields: FormFields = pairs.iter().copied().collect();
        OnboardingForm::from_fields(&fields).unwrap()
    }

    async fn row_count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn minimal_submission_is_visible_as_one_aggregate(pool: PgPool) {
        let form = form(&[
            ("fullName", "Jane Doe"),
            ("email", "jane@x.com"),
            ("educationDetails", r#"[{"level":"BSc","year":"2020"}]"#),
            ("employmentDetails", "[]"),
        ]);
        let files = StoredFiles::from([(
            UploadSlot::SignatureFile,
            "uploads/1700000000000-abcd1234-sig.png".to_string(),
        )]);

        let id = submit(&pool, &form, &files).await.unwrap();

        let all = employees::list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        let jane = &all[0];
        assert_eq!(jane.id, id);
        assert_eq!(jane.full_name, "Jane Doe");
        assert_eq!(jane.email.as_deref(), Some("jane@x.com"));
        assert_eq!(jane.aadhar_no, None);
        assert_eq!(jane.pan_no, None);
        assert_eq!(
            jane.signature.as_deref(),
            Some("/uploads/1700000000000-abcd1234-sig.png")
        );
        assert!(!jane.consent);
        assert_eq!(jane.status, "pending");
        assert_eq!(jane.education_details.len(), 1);
        assert_eq!(jane.education_details[0].level.as_deref(), Some("BSc"));
        assert_eq!(jane.education_details[0].year.as_deref(), Some("2020"));
        assert!(jane.employment_details.is_empty());

        for table in ONBOARDING_TABLES {
            let expected = if table == "employment_history" { 0 } else { 1 };
            assert_eq!(row_count(&pool, table).await, expected, "{}", table);
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn filled_sections_round_trip(pool: PgPool) {
        let form = form(&[
            ("fullName", "Ravi Kumar"),
            ("aadharNo", "123412341234"),
            ("panNo", "ABCDE1234F"),
            ("uanNo", "100200300400"),
            ("currentCity", "Pune"),
            ("permanentPincode", "411001"),
            ("ifscCode", "SBIN0000001"),
            ("consentCheckbox", "on"),
        ]);
        let files = StoredFiles::from([(UploadSlot::PanFile, "uploads/9-f-pan.pdf".to_string())]);

        submit(&pool, &form, &files).await.unwrap();

        let ravi = employees::list_all(&pool).await.unwrap().remove(0);
        assert_eq!(ravi.aadhar_no.as_deref(), Some("123412341234"));
        assert_eq!(ravi.pan_no.as_deref(), Some("ABCDE1234F"));
        assert_eq!(ravi.pan_file.as_deref(), Some("/uploads/9-f-pan.pdf"));
        assert_eq!(ravi.aadhar_file, None);
        assert_eq!(ravi.pf_no, None);
        assert_eq!(ravi.uan_no.as_deref(), Some("100200300400"));
        assert_eq!(ravi.current_city.as_deref(), Some("Pune"));
        assert_eq!(ravi.permanent_pincode.as_deref(), Some("411001"));
        assert_eq!(ravi.ifsc_code.as_deref(), Some("SBIN0000001"));
        assert!(ravi.consent);
        assert_eq!(ravi.signature, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn failing_section_rolls_back_every_table(pool: PgPool) {
        // Make the last insert of the aggregate fail.
        pool.execute(
            "CREATE FUNCTION reject_signature() RETURNS trigger AS $$ \
             BEGIN RAISE EXCEPTION 'signature rejected'; END; $$ LANGUAGE plpgsql",
        )
        .await
        .unwrap();
        pool.execute(
            "CREATE TRIGGER reject_signature BEFORE INSERT ON signatures \
             FOR EACH ROW EXECUTE FUNCTION reject_signature()",
        )
        .await
        .unwrap();

        let form = form(&[
            ("fullName", "Jane Doe"),
            ("aadharNo", "123412341234"),
            ("educationDetails", r#"[{"level":"BSc"}]"#),
            ("employmentDetails", r#"[{"companyName":"Acme"}]"#),
        ]);
        let files = StoredFiles::from([(UploadSlot::EducationDoc(0), "uploads/1-a-bsc.pdf".to_string())]);

        let err = submit(&pool, &form, &files).await.unwrap_err();
        assert!(matches!(err, AppError::SectionWriteError(Section::Signature, _)));
        assert_eq!(err.public_message(), "Error inserting signature");

        for table in ONBOARDING_TABLES {
            assert_eq!(row_count(&pool, table).await, 0, "{}", table);
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn missing_name_fails_on_personal_info(pool: PgPool) {
        let form = form(&[("aadharNo", "1"), ("panNo", "P")]);

        let err = submit(&pool, &form, &StoredFiles::new()).await.unwrap_err();
        assert!(matches!(err, AppError::SectionWriteError(Section::PersonalInfo, _)));
        assert_eq!(err.public_message(), "Error inserting personal info");
        assert_eq!(row_count(&pool, "employees").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn child_documents_follow_their_entry_index(pool: PgPool) {
        let form = form(&[
            ("fullName", "Ravi Kumar"),
            ("aadharNo", "999988887777"),
            ("panNo", "PQRSX9876Z"),
            (
                "educationDetails",
                r#"[{"level":"10th"},{"level":"12th"},{"level":"BTech","score":8.1}]"#,
            ),
            (
                "employmentDetails",
                r#"[{"companyName":"Acme"},{"companyName":"Initech"}]"#,
            ),
        ]);
        let files = StoredFiles::from([
            (UploadSlot::EducationDoc(2), "uploads/3-c-btech.pdf".to_string()),
            (UploadSlot::EmploymentDoc(1), "uploads/4-d-initech.pdf".to_string()),
        ]);

        let id = submit(&pool, &form, &files).await.unwrap();

        let all = employees::list_all(&pool).await.unwrap();
        let ravi = all.iter().find(|e| e.id == id).unwrap();

        let education: Vec<_> = ravi
            .education_details
            .iter()
            .map(|e| (e.level.as_deref(), e.doc.as_deref()))
            .collect();
        assert_eq!(
            education,
            [
                (Some("10th"), None),
                (Some("12th"), None),
                (Some("BTech"), Some("/uploads/3-c-btech.pdf")),
            ]
        );
        assert_eq!(ravi.education_details[2].score.as_deref(), Some("8.1"));

        let employment: Vec<_> = ravi
            .employment_details
            .iter()
            .map(|e| (e.company_name.as_deref(), e.doc.as_deref()))
            .collect();
        assert_eq!(
            employment,
            [(Some("Acme"), None), (Some("Initech"), Some("/uploads/4-d-initech.pdf"))]
        );
    }
}
