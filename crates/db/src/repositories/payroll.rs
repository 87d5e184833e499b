//! Employees, payroll history and timesheets.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ledgerly_core::payroll::{PayRun, TimesheetPeriod};
use ledgerly_shared::types::{BusinessId, EmployeeId, Money};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;

use super::error::{RepoError, RepoResult};
use crate::entities::{employees, payroll_history, timesheets};

/// Input for hiring an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Employing business.
    pub business_id: BusinessId,
    /// Full name.
    pub name: String,
    /// Home address.
    pub address: Option<String>,
    /// Salary or hourly rate.
    pub salary_rate: Option<Money>,
    /// Tax codes and allowances, schema owned by the payroll UI.
    pub tax_details: Option<Value>,
    /// Account the salary is paid into.
    pub bank_account: Option<String>,
}

/// Payroll repository.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: Arc<DatabaseConnection>,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Adds an employee.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the business does not exist.
    pub async fn create_employee(&self, input: NewEmployee) -> RepoResult<employees::Model> {
        let now = Utc::now().naive_utc();
        let employee = employees::ActiveModel {
            business_id: Set(input.business_id.get()),
            name: Set(input.name),
            address: Set(input.address),
            salary_rate: Set(input.salary_rate.map(Money::value)),
            tax_details: Set(input.tax_details),
            bank_account: Set(input.bank_account),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(employee.insert(self.db.as_ref()).await?)
    }

    /// Lists a business's employees by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_employees(&self, business_id: BusinessId) -> RepoResult<Vec<employees::Model>> {
        Ok(employees::Entity::find()
            .filter(employees::Column::BusinessId.eq(business_id.get()))
            .order_by_asc(employees::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Changes an employee's rate and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotFound`] if the employee does not exist.
    pub async fn update_salary_rate(
        &self,
        id: EmployeeId,
        salary_rate: Option<Money>,
    ) -> RepoResult<employees::Model> {
        let employee = employees::Entity::find_by_id(id.get())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepoError::not_found("employee", id.get()))?;

        let mut active: employees::ActiveModel = employee.into();
        active.salary_rate = Set(salary_rate.map(Money::value));
        active.updated_at = Set(Some(Utc::now().naive_utc()));

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Records a pay run; net pay is derived from gross less deductions.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Domain`] if deductions exceed gross pay
    /// - [`RepoError::MissingReference`] if the employee does not exist
    pub async fn record_payroll(
        &self,
        employee_id: EmployeeId,
        pay_date: NaiveDate,
        run: PayRun,
    ) -> RepoResult<payroll_history::Model> {
        let net_pay = run.net_pay()?;
        let now = Utc::now().naive_utc();

        let row = payroll_history::ActiveModel {
            employee_id: Set(employee_id.get()),
            pay_date: Set(pay_date),
            gross_pay: Set(run.gross_pay.value()),
            taxes_withheld: Set(Some(run.taxes_withheld.value())),
            other_deductions: Set(Some(run.other_deductions.value())),
            net_pay: Set(net_pay.value()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(employee_id = employee_id.get(), net_pay = %net_pay, "pay run recorded");
        Ok(row)
    }

    /// Lists an employee's pay runs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_payroll(&self, employee_id: EmployeeId) -> RepoResult<Vec<payroll_history::Model>> {
        Ok(payroll_history::Entity::find()
            .filter(payroll_history::Column::EmployeeId.eq(employee_id.get()))
            .order_by_desc(payroll_history::Column::PayDate)
            .all(self.db.as_ref())
            .await?)
    }

    /// Records hours worked over a period.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::MissingReference`] if the employee does not exist.
    pub async fn record_timesheet(
        &self,
        employee_id: EmployeeId,
        period: TimesheetPeriod,
    ) -> RepoResult<timesheets::Model> {
        let now = Utc::now().naive_utc();
        let row = timesheets::ActiveModel {
            employee_id: Set(employee_id.get()),
            start_date: Set(period.start()),
            end_date: Set(period.end()),
            hours_worked: Set(period.hours().value()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        Ok(row.insert(self.db.as_ref()).await?)
    }

    /// Lists an employee's timesheets overlapping `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_timesheets(
        &self,
        employee_id: EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepoResult<Vec<timesheets::Model>> {
        Ok(timesheets::Entity::find()
            .filter(timesheets::Column::EmployeeId.eq(employee_id.get()))
            .filter(timesheets::Column::StartDate.lte(to))
            .filter(timesheets::Column::EndDate.gte(from))
            .order_by_asc(timesheets::Column::StartDate)
            .all(self.db.as_ref())
            .await?)
    }

    /// Deletes an employee with their pay history and timesheets.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete_employee(&self, id: EmployeeId) -> RepoResult<bool> {
        let result = employees::Entity::delete_by_id(id.get())
            .exec(self.db.as_ref())
            .await
            .map_err(RepoError::on_delete)?;
        Ok(result.rows_affected > 0)
    }
}
