//! Initial database migration.
//!
//! Creates every table, then attaches foreign keys once all targets exist.
//! Constraint names (`fkBusiness`, `<table>_<column>_unique`, ...) are part
//! of the schema contract and must not be renamed.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TABLES
        // ============================================================
        db.execute_unprepared(BUSINESS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(COUNTERPARTIES_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(MONETARY_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        db.execute_unprepared(SETTINGS_SQL).await?;

        // ============================================================
        // PART 2: FOREIGN KEYS
        // ============================================================
        db.execute_unprepared(FOREIGN_KEYS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const BUSINESS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "businesses" (
	"id" serial PRIMARY KEY NOT NULL,
	"name" varchar(255) NOT NULL,
	"type" varchar(50),
	"industry" varchar(100),
	"address" text,
	"contact_phone" varchar(50),
	"contact_email" varchar(255),
	"tax_id" varchar(50),
	"fiscal_year_start" date,
	"currency" varchar(3) DEFAULT 'USD',
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "employees" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"name" varchar(255) NOT NULL,
	"address" text,
	"salary_rate" numeric(10, 2),
	"tax_details" jsonb,
	"bank_account" varchar(100),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "payroll_history" (
	"id" serial PRIMARY KEY NOT NULL,
	"employee_id" integer NOT NULL,
	"pay_date" date NOT NULL,
	"gross_pay" numeric(10, 2) NOT NULL,
	"taxes_withheld" numeric(10, 2),
	"other_deductions" numeric(10, 2),
	"net_pay" numeric(10, 2) NOT NULL,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "timesheets" (
	"id" serial PRIMARY KEY NOT NULL,
	"employee_id" integer NOT NULL,
	"start_date" date NOT NULL,
	"end_date" date NOT NULL,
	"hours_worked" numeric(5, 2) NOT NULL,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "documents" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"file_name" varchar(255) NOT NULL,
	"file_path" text NOT NULL,
	"reference_id" integer,
	"reference_type" varchar(50),
	"uploaded_by" integer NOT NULL,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);
"#;

const USERS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "users" (
	"id" serial PRIMARY KEY NOT NULL,
	"name" varchar(255) NOT NULL,
	"email" varchar(255) NOT NULL,
	"phone" varchar(50),
	"password_hash" text NOT NULL,
	"role" varchar(50) NOT NULL,
	"business_id" integer NOT NULL,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "users_email_unique" UNIQUE("email")
);

CREATE TABLE IF NOT EXISTS "user_activity_logs" (
	"id" serial PRIMARY KEY NOT NULL,
	"user_id" integer NOT NULL,
	"action" varchar(255) NOT NULL,
	"details" jsonb,
	"timestamp" timestamp DEFAULT now() NOT NULL
);

CREATE TABLE IF NOT EXISTS "audit_trails" (
	"id" serial PRIMARY KEY NOT NULL,
	"table_name" varchar(255) NOT NULL,
	"record_id" integer NOT NULL,
	"action" varchar(50) NOT NULL,
	"old_data" jsonb,
	"new_data" jsonb,
	"user_id" integer NOT NULL,
	"timestamp" timestamp DEFAULT now() NOT NULL
);
"#;

const COUNTERPARTIES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "customers" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"name" varchar(255) NOT NULL,
	"phone" varchar(50),
	"email" varchar(255),
	"address" text,
	"payment_terms" varchar(100),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "suppliers" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"name" varchar(255) NOT NULL,
	"phone" varchar(50),
	"email" varchar(255),
	"address" text,
	"payment_terms" varchar(100),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "products" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"name" varchar(255) NOT NULL,
	"sku" varchar(100),
	"description" text,
	"purchase_price" numeric(10, 2),
	"sales_price" numeric(10, 2),
	"quantity_on_hand" integer DEFAULT 0,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "products_sku_unique" UNIQUE("sku")
);

CREATE TABLE IF NOT EXISTS "services" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"name" varchar(255) NOT NULL,
	"description" text,
	"sales_price" numeric(10, 2),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);
"#;

const INVOICES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "invoices" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"invoice_number" varchar(100) NOT NULL,
	"date" date NOT NULL,
	"due_date" date NOT NULL,
	"customer_id" integer NOT NULL,
	"total_amount" numeric(10, 2) NOT NULL,
	"taxes" numeric(10, 2) DEFAULT '0.00',
	"payment_status" varchar(50) DEFAULT 'unpaid',
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "invoices_invoice_number_unique" UNIQUE("invoice_number")
);

CREATE TABLE IF NOT EXISTS "invoice_items" (
	"id" serial PRIMARY KEY NOT NULL,
	"invoice_id" integer NOT NULL,
	"item_type" varchar(50) NOT NULL,
	"product_id" integer,
	"service_id" integer,
	"quantity" integer DEFAULT 1,
	"price" numeric(10, 2) NOT NULL,
	"total" numeric(10, 2) NOT NULL
);
"#;

const MONETARY_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "bills" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"bill_number" varchar(100) NOT NULL,
	"date" date NOT NULL,
	"due_date" date NOT NULL,
	"supplier_id" integer NOT NULL,
	"total_amount" numeric(10, 2) NOT NULL,
	"taxes" numeric(10, 2) DEFAULT '0.00',
	"payment_status" varchar(50) DEFAULT 'unpaid',
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "bills_bill_number_unique" UNIQUE("bill_number")
);

CREATE TABLE IF NOT EXISTS "bill_items" (
	"id" serial PRIMARY KEY NOT NULL,
	"bill_id" integer NOT NULL,
	"item_type" varchar(50) NOT NULL,
	"product_id" integer,
	"service_id" integer,
	"quantity" integer DEFAULT 1,
	"price" numeric(10, 2) NOT NULL,
	"total" numeric(10, 2) NOT NULL
);

CREATE TABLE IF NOT EXISTS "bank_accounts" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"bank_name" varchar(255),
	"account_name" varchar(255),
	"account_number" varchar(100),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "bank_accounts_account_number_unique" UNIQUE("account_number")
);

CREATE TABLE IF NOT EXISTS "cash_accounts" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"account_name" varchar(255),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "payments_made" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"date" date NOT NULL,
	"amount" numeric(10, 2) NOT NULL,
	"payment_method" varchar(50),
	"bill_id" integer,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "payments_received" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"date" date NOT NULL,
	"amount" numeric(10, 2) NOT NULL,
	"payment_method" varchar(50),
	"invoice_id" integer,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "bank_transactions" (
	"id" serial PRIMARY KEY NOT NULL,
	"bank_account_id" integer NOT NULL,
	"date" date NOT NULL,
	"description" text,
	"amount" numeric(10, 2) NOT NULL,
	"reconciled" boolean DEFAULT false,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "bank_reconciliations" (
	"id" serial PRIMARY KEY NOT NULL,
	"bank_account_id" integer NOT NULL,
	"statement_date" date NOT NULL,
	"statement_balance" numeric(10, 2) NOT NULL,
	"reconciled_balance" numeric(10, 2),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "fixed_assets" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"name" varchar(255) NOT NULL,
	"purchase_date" date NOT NULL,
	"purchase_price" numeric(10, 2) NOT NULL,
	"depreciation_schedule" jsonb,
	"current_value" numeric(10, 2),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "loans" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"creditor_name" varchar(255) NOT NULL,
	"original_amount" numeric(10, 2) NOT NULL,
	"interest_rate" numeric(5, 2),
	"payment_schedule" jsonb,
	"outstanding_balance" numeric(10, 2) NOT NULL,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "chart_of_accounts" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"account_name" varchar(255) NOT NULL,
	"account_type" varchar(50) NOT NULL,
	"account_number" varchar(50),
	"description" text,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);
"#;

const DOCUMENTS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "expense_receipts" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"date" date NOT NULL,
	"supplier_id" integer,
	"amount" numeric(10, 2) NOT NULL,
	"category" varchar(100),
	"payment_method" varchar(50),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "debit_notes" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"debit_number" varchar(100) NOT NULL,
	"date" date NOT NULL,
	"supplier_id" integer NOT NULL,
	"amount" numeric(10, 2) NOT NULL,
	"reason" text,
	"bill_id" integer,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "debit_notes_debit_number_unique" UNIQUE("debit_number")
);

CREATE TABLE IF NOT EXISTS "sales_receipts" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"date" date NOT NULL,
	"customer_id" integer,
	"total_amount" numeric(10, 2) NOT NULL,
	"payment_method" varchar(50),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "credit_notes" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"credit_number" varchar(100) NOT NULL,
	"date" date NOT NULL,
	"customer_id" integer NOT NULL,
	"amount" numeric(10, 2) NOT NULL,
	"reason" text,
	"invoice_id" integer,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "credit_notes_credit_number_unique" UNIQUE("credit_number")
);

CREATE TABLE IF NOT EXISTS "general_ledger" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"transaction_date" date NOT NULL,
	"description" text,
	"account_id" integer NOT NULL,
	"debit" numeric(10, 2) DEFAULT '0.00',
	"credit" numeric(10, 2) DEFAULT '0.00',
	"reference_id" integer,
	"reference_type" varchar(50),
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);

CREATE TABLE IF NOT EXISTS "tax_records" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"period_start" date NOT NULL,
	"period_end" date NOT NULL,
	"tax_type" varchar(50),
	"amount_due" numeric(10, 2),
	"filed" boolean DEFAULT false,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now()
);
"#;

const SETTINGS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "settings" (
	"id" serial PRIMARY KEY NOT NULL,
	"business_id" integer NOT NULL,
	"invoice_template" jsonb,
	"tax_rates" jsonb,
	"reporting_periods" jsonb,
	"created_at" timestamp DEFAULT now(),
	"updated_at" timestamp DEFAULT now(),
	CONSTRAINT "settings_business_id_unique" UNIQUE("business_id")
);
"#;

const FOREIGN_KEYS_SQL: &str = r#"
ALTER TABLE "employees" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "payroll_history" ADD CONSTRAINT "fkEmployee" FOREIGN KEY ("employee_id") REFERENCES "public"."employees"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "timesheets" ADD CONSTRAINT "fkEmployee" FOREIGN KEY ("employee_id") REFERENCES "public"."employees"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "documents" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "documents" ADD CONSTRAINT "fkUser" FOREIGN KEY ("uploaded_by") REFERENCES "public"."users"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "users" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "user_activity_logs" ADD CONSTRAINT "fkUser" FOREIGN KEY ("user_id") REFERENCES "public"."users"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "audit_trails" ADD CONSTRAINT "fkUser" FOREIGN KEY ("user_id") REFERENCES "public"."users"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "customers" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "suppliers" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "products" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "services" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "invoices" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "invoices" ADD CONSTRAINT "fkCustomer" FOREIGN KEY ("customer_id") REFERENCES "public"."customers"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "invoice_items" ADD CONSTRAINT "fkInvoice" FOREIGN KEY ("invoice_id") REFERENCES "public"."invoices"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "invoice_items" ADD CONSTRAINT "fkProduct" FOREIGN KEY ("product_id") REFERENCES "public"."products"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "invoice_items" ADD CONSTRAINT "fkService" FOREIGN KEY ("service_id") REFERENCES "public"."services"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "bills" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "bills" ADD CONSTRAINT "fkSupplier" FOREIGN KEY ("supplier_id") REFERENCES "public"."suppliers"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "bill_items" ADD CONSTRAINT "fkBill" FOREIGN KEY ("bill_id") REFERENCES "public"."bills"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "bill_items" ADD CONSTRAINT "fkProduct" FOREIGN KEY ("product_id") REFERENCES "public"."products"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "bill_items" ADD CONSTRAINT "fkService" FOREIGN KEY ("service_id") REFERENCES "public"."services"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "bank_accounts" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "cash_accounts" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "payments_made" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "payments_made" ADD CONSTRAINT "fkBill" FOREIGN KEY ("bill_id") REFERENCES "public"."bills"("id") ON DELETE set null ON UPDATE no action;
ALTER TABLE "payments_received" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "payments_received" ADD CONSTRAINT "fkInvoice" FOREIGN KEY ("invoice_id") REFERENCES "public"."invoices"("id") ON DELETE set null ON UPDATE no action;
ALTER TABLE "bank_transactions" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("bank_account_id") REFERENCES "public"."bank_accounts"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "bank_reconciliations" ADD CONSTRAINT "fkBankAccount" FOREIGN KEY ("bank_account_id") REFERENCES "public"."bank_accounts"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "fixed_assets" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "loans" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "chart_of_accounts" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "expense_receipts" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "expense_receipts" ADD CONSTRAINT "fkSupplier" FOREIGN KEY ("supplier_id") REFERENCES "public"."suppliers"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "debit_notes" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "debit_notes" ADD CONSTRAINT "fkSupplier" FOREIGN KEY ("supplier_id") REFERENCES "public"."suppliers"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "debit_notes" ADD CONSTRAINT "fkBill" FOREIGN KEY ("bill_id") REFERENCES "public"."bills"("id") ON DELETE set null ON UPDATE no action;
ALTER TABLE "sales_receipts" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "sales_receipts" ADD CONSTRAINT "fkCustomer" FOREIGN KEY ("customer_id") REFERENCES "public"."customers"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "credit_notes" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "credit_notes" ADD CONSTRAINT "fkCustomer" FOREIGN KEY ("customer_id") REFERENCES "public"."customers"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "credit_notes" ADD CONSTRAINT "fkInvoice" FOREIGN KEY ("invoice_id") REFERENCES "public"."invoices"("id") ON DELETE set null ON UPDATE no action;
ALTER TABLE "general_ledger" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "general_ledger" ADD CONSTRAINT "fkAccount" FOREIGN KEY ("account_id") REFERENCES "public"."chart_of_accounts"("id") ON DELETE restrict ON UPDATE no action;
ALTER TABLE "tax_records" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
ALTER TABLE "settings" ADD CONSTRAINT "fkBusiness" FOREIGN KEY ("business_id") REFERENCES "public"."businesses"("id") ON DELETE cascade ON UPDATE no action;
"#;

const DROP_ALL_SQL: &str = r#"
DROP TABLE IF EXISTS "settings" CASCADE;
DROP TABLE IF EXISTS "tax_records" CASCADE;
DROP TABLE IF EXISTS "general_ledger" CASCADE;
DROP TABLE IF EXISTS "credit_notes" CASCADE;
DROP TABLE IF EXISTS "sales_receipts" CASCADE;
DROP TABLE IF EXISTS "debit_notes" CASCADE;
DROP TABLE IF EXISTS "expense_receipts" CASCADE;
DROP TABLE IF EXISTS "chart_of_accounts" CASCADE;
DROP TABLE IF EXISTS "loans" CASCADE;
DROP TABLE IF EXISTS "fixed_assets" CASCADE;
DROP TABLE IF EXISTS "bank_reconciliations" CASCADE;
DROP TABLE IF EXISTS "bank_transactions" CASCADE;
DROP TABLE IF EXISTS "payments_received" CASCADE;
DROP TABLE IF EXISTS "payments_made" CASCADE;
DROP TABLE IF EXISTS "cash_accounts" CASCADE;
DROP TABLE IF EXISTS "bank_accounts" CASCADE;
DROP TABLE IF EXISTS "bill_items" CASCADE;
DROP TABLE IF EXISTS "bills" CASCADE;
DROP TABLE IF EXISTS "invoice_items" CASCADE;
DROP TABLE IF EXISTS "invoices" CASCADE;
DROP TABLE IF EXISTS "services" CASCADE;
DROP TABLE IF EXISTS "products" CASCADE;
DROP TABLE IF EXISTS "suppliers" CASCADE;
DROP TABLE IF EXISTS "customers" CASCADE;
DROP TABLE IF EXISTS "audit_trails" CASCADE;
DROP TABLE IF EXISTS "user_activity_logs" CASCADE;
DROP TABLE IF EXISTS "users" CASCADE;
DROP TABLE IF EXISTS "documents" CASCADE;
DROP TABLE IF EXISTS "timesheets" CASCADE;
DROP TABLE IF EXISTS "payroll_history" CASCADE;
DROP TABLE IF EXISTS "employees" CASCADE;
DROP TABLE IF EXISTS "businesses" CASCADE;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::TABLES;

    const CREATE: [&str; 7] = [
        BUSINESS_SQL,
        USERS_SQL,
        COUNTERPARTIES_SQL,
        INVOICES_SQL,
        MONETARY_SQL,
        DOCUMENTS_SQL,
        SETTINGS_SQL,
    ];

    #[test]
    fn test_every_table_is_created_and_dropped() {
        let create = CREATE.concat();
        for table in TABLES {
            assert!(
                create.contains(&format!("CREATE TABLE IF NOT EXISTS \"{table}\" (")),
                "{table} is never created"
            );
            assert!(
                DROP_ALL_SQL.contains(&format!("DROP TABLE IF EXISTS \"{table}\" CASCADE;")),
                "{table} is never dropped"
            );
        }
        assert_eq!(create.matches("CREATE TABLE").count(), TABLES.len());
    }

    #[test]
    fn test_unique_constraint_names() {
        let create = CREATE.concat();
        for (table, column) in [
            ("users", "email"),
            ("products", "sku"),
            ("bank_accounts", "account_number"),
            ("invoices", "invoice_number"),
            ("bills", "bill_number"),
            ("credit_notes", "credit_number"),
            ("debit_notes", "debit_number"),
            ("settings", "business_id"),
        ] {
            let constraint = format!("CONSTRAINT \"{table}_{column}_unique\" UNIQUE(\"{column}\")");
            assert!(create.contains(&constraint), "missing {constraint}");
        }
        assert_eq!(create.matches(" UNIQUE(").count(), 8);
    }

    #[test]
    fn test_delete_actions() {
        let fk = |table: &str, name: &str, column: &str, target: &str, action: &str| {
            format!(
                "ALTER TABLE \"{table}\" ADD CONSTRAINT \"{name}\" FOREIGN KEY (\"{column}\") \
                 REFERENCES \"public\".\"{target}\"(\"id\") ON DELETE {action} ON UPDATE no action;"
            )
        };

        for expected in [
            fk("users", "fkBusiness", "business_id", "businesses", "cascade"),
            fk("documents", "fkUser", "uploaded_by", "users", "restrict"),
            fk("audit_trails", "fkUser", "user_id", "users", "restrict"),
            fk("user_activity_logs", "fkUser", "user_id", "users", "cascade"),
            fk("invoices", "fkCustomer", "customer_id", "customers", "restrict"),
            fk("invoice_items", "fkInvoice", "invoice_id", "invoices", "cascade"),
            fk("invoice_items", "fkProduct", "product_id", "products", "restrict"),
            fk("payments_received", "fkInvoice", "invoice_id", "invoices", "set null"),
            fk("payments_made", "fkBill", "bill_id", "bills", "set null"),
            fk("credit_notes", "fkInvoice", "invoice_id", "invoices", "set null"),
            fk("debit_notes", "fkBill", "bill_id", "bills", "set null"),
            fk("general_ledger", "fkAccount", "account_id", "chart_of_accounts", "restrict"),
            fk("bank_transactions", "fkBusiness", "bank_account_id", "bank_accounts", "cascade"),
            fk("bank_reconciliations", "fkBankAccount", "bank_account_id", "bank_accounts", "cascade"),
            fk("timesheets", "fkEmployee", "employee_id", "employees", "cascade"),
        ] {
            assert!(FOREIGN_KEYS_SQL.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_column_defaults() {
        let create = CREATE.concat();
        for fragment in [
            "\"currency\" varchar(3) DEFAULT 'USD'",
            "\"taxes\" numeric(10, 2) DEFAULT '0.00'",
            "\"payment_status\" varchar(50) DEFAULT 'unpaid'",
            "\"quantity\" integer DEFAULT 1",
            "\"quantity_on_hand\" integer DEFAULT 0",
            "\"reconciled\" boolean DEFAULT false",
            "\"filed\" boolean DEFAULT false",
            "\"hours_worked\" numeric(5, 2) NOT NULL",
            "\"interest_rate\" numeric(5, 2)",
            "\"timestamp\" timestamp DEFAULT now() NOT NULL",
        ] {
            assert!(create.contains(fragment), "missing {fragment}");
        }
    }
}
