use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use once_cell::sync::Lazy;
use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphBuilder, NodeId, WayId};

/// Road classes that become routable edges. Footpaths, cycleways and service
/// roads are read but contribute nothing to the graph.
static ALLOWED_HIGHWAY_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "motorway",
        "trunk",
        "primary",
        "secondary",
        "tertiary",
        "unclassified",
        "residential",
        "living_street",
        "motorway_link",
        "trunk_link",
        "primary_link",
        "secondary_link",
        "tertiary_link",
    ])
});

const REQUIRED_TABLES: [(&str, &[&str]); 5] = [
    ("nodes", &["id", "lon", "lat"]),
    ("node_tags", &["node_id", "k", "v"]),
    ("ways", &["id"]),
    ("way_nodes", &["way_id", "node_id", "seq"]),
    ("way_tags", &["way_id", "k", "v"]),
];

/// `true` when a `highway=<kind>` way should become part of the road graph.
pub fn is_routable_highway(kind: &str) -> bool {
    ALLOWED_HIGHWAY_TYPES.contains(kind)
}

#[derive(Debug, Default)]
struct WayTags {
    highway: Option<String>,
    name: Option<String>,
}

/// Load a map extract from SQLite and build the road graph.
///
/// Elements are fed through [`GraphBuilder`] in the order a streaming parser
/// would produce them: nodes with their name tags first, then ways. Ways with
/// a routable `highway` tag add an edge for each consecutive member pair and
/// mark every member as connected.
pub fn load_map(db_path: &Path) -> Result<Graph> {
    if !db_path.is_file() {
        return Err(Error::DatasetNotFound {
            path: db_path.to_path_buf(),
        });
    }
    let connection = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    verify_schema(&connection)?;
    debug!(path = %db_path.display(), "loading map extract");

    let mut builder = GraphBuilder::new();
    load_nodes(&connection, &mut builder)?;
    load_locations(&connection, &mut builder)?;

    let tags = load_way_tags(&connection)?;
    let members = load_way_members(&connection)?;

    let mut rejected_ways = 0usize;
    for (way_id, nodes) in &members {
        let Some(way_tags) = tags.get(way_id) else {
            rejected_ways += 1;
            continue;
        };
        if !way_tags.highway.as_deref().is_some_and(is_routable_highway) {
            rejected_ways += 1;
            continue;
        }
        let name = way_tags.name.as_deref().unwrap_or("");
        for pair in nodes.windows(2) {
            builder.add_edge(*way_id, name, pair[0], pair[1]);
            builder.add_connected_node_id(pair[0]);
            builder.add_connected_node_id(pair[1]);
        }
    }

    debug!(
        ways = members.len(),
        rejected_ways, "filtered ways by highway classification"
    );

    Ok(builder.build())
}

fn verify_schema(connection: &Connection) -> Result<()> {
    for (table, columns) in REQUIRED_TABLES {
        if !table_exists(connection, table)? || !table_has_columns(connection, table, columns)? {
            warn!(table, "map extract is missing a required table or column");
            return Err(Error::UnsupportedSchema);
        }
    }
    Ok(())
}

fn load_nodes(connection: &Connection, builder: &mut GraphBuilder) -> Result<()> {
    let mut stmt = connection.prepare("SELECT id, lon, lat FROM nodes")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, NodeId>(0)?,
            row.get::<_, f64>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;
    for row in rows {
        let (id, lon, lat) = row?;
        builder.add_node(id, lon, lat);
    }
    Ok(())
}

fn load_locations(connection: &Connection, builder: &mut GraphBuilder) -> Result<()> {
    let mut stmt =
        connection.prepare("SELECT node_id, v FROM node_tags WHERE k = 'name' ORDER BY node_id")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, NodeId>(0)?, row.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (node_id, name) = row?;
        builder.add_location(node_id, &name);
    }
    Ok(())
}

fn load_way_tags(connection: &Connection) -> Result<HashMap<WayId, WayTags>> {
    let mut stmt = connection
        .prepare("SELECT way_id, k, v FROM way_tags WHERE k IN ('highway', 'name')")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, WayId>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut tags: HashMap<WayId, WayTags> = HashMap::new();
    for row in rows {
        let (way_id, key, value) = row?;
        let entry = tags.entry(way_id).or_default();
        match key.as_str() {
            "highway" => entry.highway = Some(value),
            "name" => entry.name = Some(value),
            _ => {}
        }
    }
    Ok(tags)
}

fn load_way_members(connection: &Connection) -> Result<BTreeMap<WayId, Vec<NodeId>>> {
    let mut stmt = connection.prepare(
        "SELECT w.id, wn.node_id FROM ways w \
         JOIN way_nodes wn ON wn.way_id = w.id \
         ORDER BY w.id, wn.seq",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, WayId>(0)?, row.get::<_, NodeId>(1)?))
    })?;

    let mut members: BTreeMap<WayId, Vec<NodeId>> = BTreeMap::new();
    for row in rows {
        let (way_id, node_id) = row?;
        members.entry(way_id).or_default().push(node_id);
    }
    Ok(members)
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn table_has_columns(connection: &Connection, table: &str, required: &[&str]) -> Result<bool> {
    let pragma = format!("PRAGMA table_info('{table}')");
    let mut stmt = connection.prepare(&pragma)?;
    let mut rows = stmt.query([])?;

    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        columns.push(name);
    }

    Ok(required.iter().all(|required| {
        columns
            .iter()
            .any(|column| column.eq_ignore_ascii_case(required))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highway_filter_matches_road_classes() {
        assert!(is_routable_highway("residential"));
        assert!(is_routable_highway("secondary_link"));
        assert!(!is_routable_highway("footway"));
        assert!(!is_routable_highway("service"));
        assert!(!is_routable_highway("Residential"));
    }

    #[test]
    fn missing_tables_are_unsupported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("empty.db");
        let connection = Connection::open(&path).expect("open");
        connection
            .execute_batch("CREATE TABLE nodes (id INTEGER, lon REAL, lat REAL);")
            .expect("create");
        drop(connection);

        let err = load_map(&path).expect_err("schema incomplete");
        assert!(matches!(err, Error::UnsupportedSchema));
    }
}
