use rusqlite::{params, Connection, OptionalExtension};

use crate::types::{Funko, StoreError};

use super::Storage;

/// SQLite backend. One row per record keyed by (owner, id); a separate
/// `owners` table tracks namespaces so an owner can exist with zero records.
#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

fn db_get(conn: &Connection, owner: &str, id: u32) -> rusqlite::Result<Option<Funko>> {
    conn.query_row(
        "SELECT id, nombre, descripcion, tipo, genero, franquicia, numero, \
         exclusivo, caracteristicas_especiales, valor_mercado \
         FROM funkos WHERE owner = ?1 AND id = ?2",
        params![owner, id],
        map_funko_row,
    )
    .optional()
}

fn db_list_all(conn: &Connection, owner: &str) -> rusqlite::Result<Vec<Funko>> {
    let mut stmt = conn.prepare(
        "SELECT id, nombre, descripcion, tipo, genero, franquicia, numero, \
         exclusivo, caracteristicas_especiales, valor_mercado \
         FROM funkos WHERE owner = ?1 ORDER BY id",
    )?;
    let mapped = stmt
        .query_map(params![owner], map_funko_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn map_funko_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Funko> {
    let exclusive_int: i64 = row.get(7)?;
    Ok(Funko {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        genre: row.get(4)?,
        franchise: row.get(5)?,
        number: row.get(6)?,
        is_exclusive: exclusive_int != 0,
        special_features: row.get(8)?,
        market_value: row.get(9)?,
    })
}

impl SqliteStorage {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    pub fn init(&self) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS owners (
                name TEXT PRIMARY KEY
            );
            CREATE TABLE IF NOT EXISTS funkos (
                owner TEXT NOT NULL,
                id INTEGER NOT NULL,
                nombre TEXT NOT NULL,
                descripcion TEXT NOT NULL,
                tipo TEXT NOT NULL,
                genero TEXT NOT NULL,
                franquicia TEXT NOT NULL,
                numero INTEGER NOT NULL,
                exclusivo INTEGER NOT NULL,
                caracteristicas_especiales TEXT NOT NULL,
                valor_mercado REAL NOT NULL,
                PRIMARY KEY (owner, id)
            );
            "#,
        )?;
        Ok(())
    }

    pub fn reset_all(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Storage for SqliteStorage {
    fn owner_exists(&self, owner: &str) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM owners WHERE name = ?1",
                params![owner],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn create_owner(&self, owner: &str) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT OR IGNORE INTO owners (name) VALUES (?1)",
            params![owner],
        )?;
        Ok(())
    }

    fn exists(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM funkos WHERE owner = ?1 AND id = ?2",
                params![owner, id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn put(&self, owner: &str, funko: &Funko) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO funkos (owner, id, nombre, descripcion, tipo, genero, \
             franquicia, numero, exclusivo, caracteristicas_especiales, valor_mercado) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
             ON CONFLICT(owner, id) DO UPDATE SET \
             nombre = excluded.nombre, descripcion = excluded.descripcion, \
             tipo = excluded.tipo, genero = excluded.genero, \
             franquicia = excluded.franquicia, numero = excluded.numero, \
             exclusivo = excluded.exclusivo, \
             caracteristicas_especiales = excluded.caracteristicas_especiales, \
             valor_mercado = excluded.valor_mercado",
            params![
                owner,
                funko.id,
                funko.name,
                funko.description,
                funko.category,
                funko.genre,
                funko.franchise,
                funko.number,
                funko.is_exclusive as i64,
                funko.special_features,
                funko.market_value,
            ],
        )?;
        Ok(())
    }

    fn get(&self, owner: &str, id: u32) -> Result<Option<Funko>, StoreError> {
        let conn = self.open()?;
        Ok(db_get(&conn, owner, id)?)
    }

    fn delete(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let changed = conn.execute(
            "DELETE FROM funkos WHERE owner = ?1 AND id = ?2",
            params![owner, id],
        )?;
        Ok(changed > 0)
    }

    fn list_all(&self, owner: &str) -> Result<Vec<Funko>, StoreError> {
        let conn = self.open()?;
        Ok(db_list_all(&conn, owner)?)
    }
}
