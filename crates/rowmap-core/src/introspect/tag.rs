use crate::{
    model::{ColumnMapping, ForeignKey},
    normalize::snake_case,
};

/// Tag value that excludes a field from the mapping.
pub const EXCLUDE: &str = "-";

/// True when a raw `db` tag excludes its field.
#[must_use]
pub fn is_excluded(tag: Option<&str>) -> bool {
    tag.is_some_and(|t| t.trim() == EXCLUDE)
}

/// Classify one leaf field from its declared name and raw `db` tag.
///
/// Tag grammar: `<column>[,pk|ro|readonly|fk=<table>.<column>]*`. An empty
/// column segment falls back to the normalized field name; unknown
/// modifiers are ignored.
#[must_use]
pub fn column_mapping(field_name: &str, tag: Option<&str>) -> ColumnMapping {
    let tag = tag.map(str::trim).filter(|t| !t.is_empty());
    let Some(tag) = tag else {
        let column = snake_case(field_name);
        let primary_key = column == "id";

        return ColumnMapping {
            column,
            primary_key,
            read_only: primary_key,
            foreign_key: None,
        };
    };

    let mut parts = tag.split(',');
    let head = parts.next().unwrap_or_default().trim();
    let column = if head.is_empty() {
        snake_case(field_name)
    } else {
        head.to_string()
    };
    let primary_key = column == "id" || head == "pk";

    let mut mapping = ColumnMapping {
        column,
        primary_key,
        read_only: primary_key,
        foreign_key: None,
    };

    for modifier in parts.map(str::trim) {
        if let Some(target) = modifier.strip_prefix("fk=") {
            if let Some(fk) = parse_foreign_key(target) {
                mapping.foreign_key = Some(fk);
            }
            continue;
        }

        match modifier {
            "ro" | "readonly" => mapping.read_only = true,
            "pk" => {
                mapping.primary_key = true;
                mapping.read_only = true;
            }
            _ => {}
        }
    }

    mapping
}

// `<table>.<column>`; anything else is ignored
fn parse_foreign_key(target: &str) -> Option<ForeignKey> {
    let (table, column) = target.trim().split_once('.')?;
    let (table, column) = (table.trim(), column.trim());

    if table.is_empty() || column.is_empty() || column.contains('.') {
        return None;
    }

    Some(ForeignKey {
        table: table.to_string(),
        column: column.to_string(),
    })
}
