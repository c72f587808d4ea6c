//! Direct schema-creation statements.
//!
//! Every statement is guarded by `IF NOT EXISTS` and runs on its own, so a
//! failure on one leaves the others unaffected. Ordered parents first.

/// A named, independently executed DDL statement.
pub struct FallbackStatement {
    /// Object the statement creates.
    pub name: &'static str,
    pub sql: &'static str,
}

pub static FALLBACK_STATEMENTS: &[FallbackStatement] = &[
    FallbackStatement {
        name: "items_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS items_id_seq START 1",
    },
    FallbackStatement {
        name: "events_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS events_id_seq START 1",
    },
    FallbackStatement {
        name: "credentials_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS credentials_id_seq START 1",
    },
    FallbackStatement {
        name: "units_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS units_id_seq START 1",
    },
    FallbackStatement {
        name: "barcodes_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS barcodes_id_seq START 1",
    },
    FallbackStatement {
        name: "eventitems_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS eventitems_id_seq START 1",
    },
    FallbackStatement {
        name: "ocritems_id_seq",
        sql: "CREATE SEQUENCE IF NOT EXISTS ocritems_id_seq START 1",
    },
    FallbackStatement {
        name: "Items",
        sql: "CREATE TABLE IF NOT EXISTS Items (
            Id           INTEGER PRIMARY KEY DEFAULT nextval('items_id_seq'),
            Name         VARCHAR NOT NULL,
            Description  VARCHAR NOT NULL,
            Img          VARCHAR NOT NULL,
            LastEditTime TIMESTAMP NOT NULL DEFAULT current_timestamp
        )",
    },
    FallbackStatement {
        name: "Events",
        sql: "CREATE TABLE IF NOT EXISTS Events (
            Id             INTEGER PRIMARY KEY DEFAULT nextval('events_id_seq'),
            Name           VARCHAR(50) NOT NULL,
            \"Time\"       TIMESTAMP NOT NULL,
            DoctorName     VARCHAR(100) NOT NULL,
            PatientName    VARCHAR(100) NOT NULL,
            TheaterNumber  VARCHAR(100),
            LastEditTime   TIMESTAMP NOT NULL DEFAULT current_timestamp,
            LastEditPerson VARCHAR(100) NOT NULL
        )",
    },
    FallbackStatement {
        name: "Credentials",
        sql: "CREATE TABLE IF NOT EXISTS Credentials (
            Id                 INTEGER PRIMARY KEY DEFAULT nextval('credentials_id_seq'),
            InvitationCodeHash VARCHAR NOT NULL
        )",
    },
    FallbackStatement {
        name: "Units",
        sql: "CREATE TABLE IF NOT EXISTS Units (
            Id     INTEGER PRIMARY KEY DEFAULT nextval('units_id_seq'),
            Name   VARCHAR NOT NULL,
            Img    VARCHAR NOT NULL,
            ItemId INTEGER NOT NULL,
            FOREIGN KEY (ItemId) REFERENCES Items (Id)
        )",
    },
    FallbackStatement {
        name: "BarCodes",
        sql: "CREATE TABLE IF NOT EXISTS BarCodes (
            Id      INTEGER PRIMARY KEY DEFAULT nextval('barcodes_id_seq'),
            \"Type\" INTEGER NOT NULL,
            Content VARCHAR NOT NULL,
            UnitId  INTEGER NOT NULL,
            FOREIGN KEY (UnitId) REFERENCES Units (Id)
        )",
    },
    FallbackStatement {
        name: "EventItems",
        sql: "CREATE TABLE IF NOT EXISTS EventItems (
            Id       INTEGER PRIMARY KEY DEFAULT nextval('eventitems_id_seq'),
            EventId  INTEGER NOT NULL,
            ItemId   INTEGER NOT NULL,
            Quantity INTEGER NOT NULL,
            UnitId   INTEGER NOT NULL,
            EditTime TIMESTAMP NOT NULL DEFAULT current_timestamp,
            FOREIGN KEY (EventId) REFERENCES Events (Id),
            FOREIGN KEY (ItemId) REFERENCES Items (Id),
            FOREIGN KEY (UnitId) REFERENCES Units (Id)
        )",
    },
    FallbackStatement {
        name: "OCRItems",
        sql: "CREATE TABLE IF NOT EXISTS OCRItems (
            Id         INTEGER PRIMARY KEY DEFAULT nextval('ocritems_id_seq'),
            ItemId     INTEGER NOT NULL,
            OCRKeyword VARCHAR NOT NULL,
            UnitId     INTEGER,
            FOREIGN KEY (ItemId) REFERENCES Items (Id),
            FOREIGN KEY (UnitId) REFERENCES Units (Id)
        )",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use sr_core::RequiredTable;

    #[test]
    fn test_every_required_table_has_a_statement() {
        for table in RequiredTable::ALL {
            assert!(
                FALLBACK_STATEMENTS.iter().any(|s| s.name == table.name()),
                "no fallback DDL for {table}"
            );
        }
    }

    #[test]
    fn test_all_statements_are_guarded() {
        for stmt in FALLBACK_STATEMENTS {
            assert!(stmt.sql.contains("IF NOT EXISTS"), "{} unguarded", stmt.name);
        }
    }
}
