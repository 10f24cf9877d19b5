//! Pairing of tables and columns between two projections.
//!
//! Tables are paired in three passes, each only over what is still
//! unpaired: shared entity type, then exact schema-qualified name, then
//! property overlap. Columns of a paired table are matched by property
//! first and by column name second.

use crate::catalog::{Projection, PropertyMapping, Table};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Entity,
    Name,
    Fuzzy,
}

/// Indexes into the source and target table lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMatch {
    pub source: usize,
    pub target: usize,
    pub kind: MatchKind,
}

struct Pairing {
    source_used: Vec<bool>,
    target_used: Vec<bool>,
    matches: Vec<TableMatch>,
}

impl Pairing {
    fn pair(&mut self, source: usize, target: usize, kind: MatchKind) {
        self.source_used[source] = true;
        self.target_used[target] = true;
        self.matches.push(TableMatch {
            source,
            target,
            kind,
        });
    }
}

pub fn match_tables(source: &Projection, target: &Projection, threshold: f64) -> Vec<TableMatch> {
    let source_tables = &source.database.tables;
    let target_tables = &target.database.tables;
    let mut pairing = Pairing {
        source_used: vec![false; source_tables.len()],
        target_used: vec![false; target_tables.len()],
        matches: Vec::new(),
    };

    for (i, table) in source_tables.iter().enumerate() {
        let entities = source.entity_types_of(&table.name);
        if entities.is_empty() {
            continue;
        }
        let candidate = target_tables.iter().enumerate().position(|(j, t)| {
            !pairing.target_used[j]
                && target
                    .entity_types_of(&t.name)
                    .iter()
                    .any(|e| entities.contains(e))
        });
        if let Some(j) = candidate {
            debug!(
                "Paired {} with {} by entity type",
                table.name, target_tables[j].name
            );
            pairing.pair(i, j, MatchKind::Entity);
        }
    }

    for (i, table) in source_tables.iter().enumerate() {
        if pairing.source_used[i] {
            continue;
        }
        let candidate = target_tables
            .iter()
            .enumerate()
            .position(|(j, t)| !pairing.target_used[j] && t.name == table.name);
        if let Some(j) = candidate {
            debug!("Paired {} by name", table.name);
            pairing.pair(i, j, MatchKind::Name);
        }
    }

    for (i, table) in source_tables.iter().enumerate() {
        if pairing.source_used[i] {
            continue;
        }
        let properties = source.properties_of(&table.name);
        let mut best: Option<(usize, f64)> = None;
        for (j, candidate) in target_tables.iter().enumerate() {
            if pairing.target_used[j] {
                continue;
            }
            let ratio = overlap_ratio(&properties, &target.properties_of(&candidate.name));
            if ratio < threshold {
                continue;
            }
            // Strictly better only, so ties keep the earlier target.
            if best.is_none_or(|(_, best_ratio)| ratio > best_ratio) {
                best = Some((j, ratio));
            }
        }
        if let Some((j, ratio)) = best {
            debug!(
                "Paired {} with {} by property overlap ({:.2})",
                table.name, target_tables[j].name, ratio
            );
            pairing.pair(i, j, MatchKind::Fuzzy);
        }
    }

    let mut matches = pairing.matches;
    matches.sort_by_key(|m| m.source);
    matches
}

/// Share of properties two tables have in common, relative to the larger
/// of the two. A source property counts when a target property has the
/// same name or, failing that, the same column.
pub fn overlap_ratio(source: &[PropertyMapping], target: &[PropertyMapping]) -> f64 {
    let larger = source.len().max(target.len());
    if larger == 0 {
        return 0.0;
    }
    let mut used = vec![false; target.len()];
    let mut shared = 0usize;
    for property in source {
        let found = target
            .iter()
            .enumerate()
            .position(|(j, t)| !used[j] && t.property == property.property)
            .or_else(|| {
                target
                    .iter()
                    .enumerate()
                    .position(|(j, t)| !used[j] && t.column == property.column)
            });
        if let Some(j) = found {
            used[j] = true;
            shared += 1;
        }
    }
    shared as f64 / larger as f64
}

/// Source column name to target column name for one table pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pairs: Vec<(String, String)>,
}

impl ColumnMap {
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(s, _)| s == source)
            .map(|(_, t)| t.as_str())
    }

    pub fn source_of(&self, target: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, t)| t == target)
            .map(|(s, _)| s.as_str())
    }

    /// Translates a column list, or `None` if any column has no partner.
    pub fn map_all(&self, columns: &[String]) -> Option<Vec<String>> {
        columns
            .iter()
            .map(|c| self.target_of(c).map(str::to_string))
            .collect()
    }

    fn link(&mut self, source: &Table, target: &Table, from: &str, to: &str) {
        if source.has_column(from)
            && target.has_column(to)
            && self.target_of(from).is_none()
            && self.source_of(to).is_none()
        {
            self.pairs.push((from.to_string(), to.to_string()));
        }
    }
}

pub fn match_columns(
    source: &Table,
    source_properties: &[PropertyMapping],
    target: &Table,
    target_properties: &[PropertyMapping],
) -> ColumnMap {
    let mut map = ColumnMap::default();

    for property in source_properties {
        if let Some(other) = target_properties
            .iter()
            .find(|t| t.entity == property.entity && t.property == property.property)
        {
            map.link(source, target, &property.column, &other.column);
        }
    }
    for property in source_properties {
        if map.target_of(&property.column).is_some() {
            continue;
        }
        if let Some(other) = target_properties
            .iter()
            .find(|t| t.property == property.property && map.source_of(&t.column).is_none())
        {
            map.link(source, target, &property.column, &other.column);
        }
    }
    for column in &source.columns {
        if map.target_of(&column.name).is_none() {
            map.link(source, target, &column.name, &column.name);
        }
    }

    map.pairs.sort_by_key(|(s, _)| {
        source
            .columns
            .iter()
            .position(|c| &c.name == s)
            .unwrap_or(usize::MAX)
    });
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, Database, Mapping, ObjectName, TableMapping};
    use crate::model::ClrType;

    fn props(names: &[&str]) -> Vec<PropertyMapping> {
        names
            .iter()
            .map(|n| PropertyMapping {
                entity: "E".to_string(),
                property: n.to_string(),
                column: n.to_string(),
            })
            .collect()
    }

    fn table(name: &str, columns: &[&str]) -> Table {
        let mut table = Table::new(ObjectName::from(name));
        for column in columns {
            table.add_column(Column::new(column, ClrType::Int32)).unwrap();
        }
        table
    }

    #[test]
    fn test_overlap_ratio_uses_larger_side() {
        let two = props(&["Id", "P1"]);
        let three = props(&["Id", "P1", "P2"]);
        assert!((overlap_ratio(&two, &three) - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(overlap_ratio(&[], &[]), 0.0);
    }

    #[test]
    fn test_four_of_five_reaches_threshold() {
        let source = props(&["Id", "A", "B", "C", "D"]);
        let target = props(&["Id", "A", "B", "C", "E"]);
        assert!(overlap_ratio(&source, &target) >= crate::constants::FUZZY_MATCH_THRESHOLD);
    }

    #[test]
    fn test_fuzzy_ties_prefer_first_target() {
        let source = Projection::from_database(Database {
            tables: vec![table("Old", &["Id", "A", "B", "C", "D"])],
            sequences: vec![],
        });
        let target = Projection::from_database(Database {
            tables: vec![
                table("First", &["Id", "A", "B", "C", "D"]),
                table("Second", &["Id", "A", "B", "C", "D"]),
            ],
            sequences: vec![],
        });
        let matches = match_tables(&source, &target, 0.8);
        assert_eq!(
            matches,
            vec![TableMatch {
                source: 0,
                target: 0,
                kind: MatchKind::Fuzzy
            }]
        );
    }

    #[test]
    fn test_entity_identity_beats_names() {
        let database = |a: &str, b: &str| Database {
            tables: vec![table(a, &["Id"]), table(b, &["Id"])],
            sequences: vec![],
        };
        let mapping = |a: &str, b: &str| Mapping {
            tables: vec![
                TableMapping {
                    table: ObjectName::from(a),
                    entity_types: vec!["A".to_string()],
                    properties: vec![],
                },
                TableMapping {
                    table: ObjectName::from(b),
                    entity_types: vec!["B".to_string()],
                    properties: vec![],
                },
            ],
        };
        let source = Projection {
            database: database("T0", "T1"),
            mapping: mapping("T0", "T1"),
        };
        let target = Projection {
            database: database("T0", "T1"),
            mapping: mapping("T1", "T0"),
        };
        let matches = match_tables(&source, &target, 0.8);
        assert_eq!(matches[0].target, 1);
        assert_eq!(matches[1].target, 0);
        assert!(matches.iter().all(|m| m.kind == MatchKind::Entity));
    }

    #[test]
    fn test_property_identity_beats_column_name() {
        let source = table("T", &["Id", "C0"]);
        let target = table("T", &["Id", "Renamed"]);
        let source_props = vec![
            PropertyMapping {
                entity: "A".to_string(),
                property: "Id".to_string(),
                column: "Id".to_string(),
            },
            PropertyMapping {
                entity: "A".to_string(),
                property: "P0".to_string(),
                column: "C0".to_string(),
            },
        ];
        let mut target_props = source_props.clone();
        target_props[1].column = "Renamed".to_string();

        let map = match_columns(&source, &source_props, &target, &target_props);
        assert_eq!(map.target_of("C0"), Some("Renamed"));
        assert_eq!(map.target_of("Id"), Some("Id"));
        assert_eq!(map.map_all(&["Id".to_string(), "C0".to_string()]).unwrap(), vec!["Id", "Renamed"]);
    }

    #[test]
    fn test_column_name_fallback() {
        let source = table("T", &["Id", "Name"]);
        let target = table("T", &["Id", "Name"]);
        let map = match_columns(&source, &props(&["Id", "Title"]), &target, &props(&["Id"]));
        assert_eq!(map.target_of("Name"), Some("Name"));
        assert_eq!(map.map_all(&["Missing".to_string()]), None);
    }
}
