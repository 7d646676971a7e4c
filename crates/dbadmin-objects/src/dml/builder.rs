//! Row write statement builders

use dbadmin_core::Record;

/// Render a value as a single-quoted literal, verbatim
pub(crate) fn literal(value: &str) -> String {
    format!("'{}'", value)
}

/// Render a column name as a double-quoted identifier, verbatim
pub(crate) fn quoted_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// Build an `INSERT` for every key/value pair of the record.
///
/// # Examples
///
/// ```
/// use dbadmin_core::Record;
/// use dbadmin_objects::build_insert;
///
/// let record = Record::new(
///     "people",
///     0,
///     vec!["id".to_string(), "name".to_string()],
///     vec!["7".to_string(), "Bob".to_string()],
/// );
/// assert_eq!(
///     build_insert(&record),
///     r#"INSERT INTO people ("id", "name") VALUES ('7', 'Bob')"#
/// );
/// ```
pub fn build_insert(record: &Record) -> String {
    let columns = record
        .keys
        .iter()
        .map(|key| quoted_identifier(key))
        .collect::<Vec<_>>()
        .join(", ");
    let values = record
        .values
        .iter()
        .map(|value| literal(value))
        .collect::<Vec<_>>()
        .join(", ");

    format!("INSERT INTO {} ({}) VALUES ({})", record.name, columns, values)
}

/// Build an `UPDATE` that sets every non-key column of the record.
///
/// The row is addressed by the value paired with the first occurrence of
/// `key_column` in `record.keys`. Returns `None` when the record does not
/// carry the key column.
///
/// # Examples
///
/// ```
/// use dbadmin_core::Record;
/// use dbadmin_objects::build_update;
///
/// let record = Record::new(
///     "t",
///     0,
///     vec!["id".to_string(), "name".to_string()],
///     vec!["7".to_string(), "Bob".to_string()],
/// );
/// assert_eq!(
///     build_update(&record, "id").as_deref(),
///     Some(r#"UPDATE t SET "name" = 'Bob' WHERE id = '7'"#)
/// );
/// assert_eq!(build_update(&record, "missing"), None);
/// ```
pub fn build_update(record: &Record, key_column: &str) -> Option<String> {
    let key_index = record.keys.iter().position(|key| key == key_column)?;
    let key_value = record.values.get(key_index)?;

    let assignments = record
        .pairs()
        .enumerate()
        .filter(|(idx, _)| *idx != key_index)
        .map(|(_, (key, value))| format!("{} = {}", quoted_identifier(key), literal(value)))
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!(
        "UPDATE {} SET {} WHERE {} = {}",
        record.name,
        assignments,
        key_column,
        literal(key_value)
    ))
}

/// Build a `DELETE` addressing one row by its key value
pub fn build_delete(table: &str, key_column: &str, key_value: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = {}",
        table,
        key_column,
        literal(key_value)
    )
}

/// Build a full scan of a table
pub fn build_select_all(table: &str) -> String {
    format!("SELECT * FROM {}", table)
}

/// Build a scan of a table restricted to one key value
pub fn build_select_by_key(table: &str, key_column: &str, key_value: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = {}",
        table,
        key_column,
        literal(key_value)
    )
}
