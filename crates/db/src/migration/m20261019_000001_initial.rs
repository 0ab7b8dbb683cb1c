//! Initial database migration.
//!
//! Creates the enums, tables, constraints and triggers for accounts,
//! proposals, projects, inventory, lands, messages and shipments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS AND SEQUENCES
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(SEQUENCES_SQL).await?;

        // ============================================================
        // PART 2: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ROLES_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(STAFF_SQL).await?;

        // ============================================================
        // PART 3: PROPOSALS & PROJECTS
        // ============================================================
        db.execute_unprepared(PROPOSALS_SQL).await?;
        db.execute_unprepared(PROJECTS_SQL).await?;
        db.execute_unprepared(PROGRESS_SQL).await?;

        // ============================================================
        // PART 4: INVENTORY, LANDS, MESSAGES, SHIPMENTS
        // ============================================================
        db.execute_unprepared(INVENTORY_SQL).await?;
        db.execute_unprepared(LANDS_SQL).await?;
        db.execute_unprepared(MESSAGES_SQL).await?;
        db.execute_unprepared(SHIPMENTS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

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

const ENUMS_SQL: &str = r"
CREATE TYPE project_type AS ENUM ('Agarwood', 'Sandalwood', 'Vanilla', 'Other');
CREATE TYPE payment_mode AS ENUM ('full', 'installments');
CREATE TYPE project_status AS ENUM ('Pending', 'Ongoing', 'Completed');
";

const SEQUENCES_SQL: &str = r"
-- Human-readable proposal numbers: PRO1, PRO2, ...
CREATE SEQUENCE proposal_number_seq START 1;
";

const ROLES_SQL: &str = r"
CREATE TABLE roles (
    id SERIAL PRIMARY KEY,
    name VARCHAR(50) NOT NULL UNIQUE
);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    nic_number VARCHAR(12) NOT NULL UNIQUE,
    phone VARCHAR(15),
    address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const STAFF_SQL: &str = r"
CREATE TABLE staff (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(100) NOT NULL,
    username VARCHAR(30) NOT NULL UNIQUE,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role_id INTEGER NOT NULL REFERENCES roles(id),
    phone VARCHAR(15),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_staff_role ON staff(role_id);
";

const PROPOSALS_SQL: &str = r"
CREATE TABLE proposals (
    id VARCHAR(20) PRIMARY KEY DEFAULT ('PRO' || nextval('proposal_number_seq')),
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    project_type project_type NOT NULL,
    project_duration INTEGER NOT NULL CHECK (project_duration > 0),
    project_value NUMERIC(14, 2) NOT NULL CHECK (project_value >= 0),
    payment_mode payment_mode NOT NULL,
    installment_count INTEGER CHECK (installment_count > 0),
    installment_amount NUMERIC(14, 2) CHECK (installment_amount >= 0),
    discount_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    final_amount NUMERIC(14, 2) NOT NULL,
    proposal_date DATE NOT NULL DEFAULT CURRENT_DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Installment fields are present exactly when paying by installments
    CONSTRAINT chk_installment_fields CHECK (
        (payment_mode = 'full' AND installment_count IS NULL AND installment_amount IS NULL)
        OR
        (payment_mode = 'installments' AND installment_count IS NOT NULL AND installment_amount IS NOT NULL)
    )
);

CREATE INDEX idx_proposals_customer ON proposals(customer_id);
";

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    staff_id UUID REFERENCES staff(id) ON DELETE SET NULL,
    proposal_id VARCHAR(20) NOT NULL UNIQUE REFERENCES proposals(id) ON DELETE CASCADE,
    status project_status NOT NULL DEFAULT 'Pending',
    start_date DATE,
    end_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_start_not_pending CHECK (start_date IS NULL OR status <> 'Pending'),
    CONSTRAINT chk_end_only_completed CHECK (end_date IS NULL OR status = 'Completed'),
    CONSTRAINT chk_end_after_start CHECK (
        start_date IS NULL OR end_date IS NULL OR end_date >= start_date
    )
);

CREATE INDEX idx_projects_staff ON projects(staff_id);
";

const PROGRESS_SQL: &str = r"
CREATE TABLE progress_updates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    progress_date DATE NOT NULL DEFAULT CURRENT_DATE,
    created_by UUID REFERENCES staff(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_progress_project ON progress_updates(project_id, progress_date);
";

const INVENTORY_SQL: &str = r"
CREATE TABLE inventory_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    item_name VARCHAR(100) NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    unit VARCHAR(20),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE UNIQUE INDEX uq_inventory_item_name ON inventory_items(LOWER(item_name));
";

const LANDS_SQL: &str = r"
CREATE TABLE lands (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    location VARCHAR(255) NOT NULL,
    size_acres NUMERIC(10, 2) NOT NULL CHECK (size_acres > 0),
    soil_type VARCHAR(50),
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_lands_customer ON lands(customer_id);
";

const MESSAGES_SQL: &str = r"
CREATE TABLE messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone VARCHAR(15),
    subject VARCHAR(200) NOT NULL,
    body TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_messages_unread ON messages(is_read, created_at DESC);
";

const SHIPMENTS_SQL: &str = r"
CREATE TABLE shipments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    inventory_id UUID NOT NULL REFERENCES inventory_items(id) ON DELETE CASCADE,
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    notes TEXT,
    shipped_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_shipments_customer ON shipments(customer_id);
CREATE INDEX idx_shipments_inventory ON shipments(inventory_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_customers_updated_at BEFORE UPDATE ON customers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_staff_updated_at BEFORE UPDATE ON staff
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_projects_updated_at BEFORE UPDATE ON projects
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_inventory_updated_at BEFORE UPDATE ON inventory_items
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_lands_updated_at BEFORE UPDATE ON lands
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TABLE IF EXISTS shipments CASCADE;
DROP TABLE IF EXISTS messages CASCADE;
DROP TABLE IF EXISTS lands CASCADE;
DROP TABLE IF EXISTS inventory_items CASCADE;
DROP TABLE IF EXISTS progress_updates CASCADE;
DROP TABLE IF EXISTS projects CASCADE;
DROP TABLE IF EXISTS proposals CASCADE;
DROP TABLE IF EXISTS staff CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS roles CASCADE;

DROP FUNCTION IF EXISTS set_updated_at();
DROP SEQUENCE IF EXISTS proposal_number_seq;

DROP TYPE IF EXISTS project_status;
DROP TYPE IF EXISTS payment_mode;
DROP TYPE IF EXISTS project_type;
";
