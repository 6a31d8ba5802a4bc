use super::*;

#[test]
fn schema_lists_application_tables() {
    let names: Vec<&str> = SCHEMA.tables.iter().map(|t| t.name).collect();
    assert_eq!(names, ["user", "session"]);
}

#[test]
fn table_lookup_by_name() {
    assert_eq!(SCHEMA.table("session"), Some(&SESSION));
    assert!(SCHEMA.table("sessions").is_none());
}

#[test]
fn every_table_has_a_primary_key() {
    for table in SCHEMA.tables {
        let pk = table.primary_key().unwrap();
        assert!(!pk.nullable, "{} primary key must be non-null", table.name);
    }
}

#[test]
fn column_lookup_reports_nullability() {
    let user = SCHEMA.table("user").unwrap();
    assert!(user.column("age").unwrap().nullable);
    assert!(!user.column("username").unwrap().nullable);
    assert!(user.column("email").is_none());
}
