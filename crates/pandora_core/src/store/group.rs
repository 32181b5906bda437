//! Group handle: one node of the storage tree.

use super::{AttrValue, Storage};
use crate::error::{PandoraError, PandoraResult};
use rusqlite::{params, OptionalExtension};

/// Handle to one storage node.
///
/// Two groups are equal when they belong to the same open file and point at
/// the same node.
#[derive(Debug, Clone)]
pub struct Group {
    storage: Storage,
    node_id: i64,
    name: String,
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id && self.storage.same_file(&other.storage)
    }
}

impl Eq for Group {}

impl Group {
    pub(crate) fn new(storage: Storage, node_id: i64, name: String) -> Self {
        Self {
            storage,
            node_id,
            name,
        }
    }

    /// Node name within its parent group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File this group belongs to.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Opens the child group `name`, creating it when `create` is set.
    ///
    /// # Errors
    /// - `NotFound` when the child is missing and `create` is false.
    pub fn open_group(&self, name: &str, create: bool) -> PandoraResult<Group> {
        if let Some(node_id) = self.child_id(name)? {
            return Ok(Group::new(self.storage.clone(), node_id, name.to_string()));
        }
        if !create {
            return Err(PandoraError::not_found("group", name));
        }

        self.storage.conn().execute(
            "INSERT INTO nodes (parent_id, name) VALUES (?1, ?2);",
            params![self.node_id, name],
        )?;
        let node_id = self.storage.conn().last_insert_rowid();
        Ok(Group::new(self.storage.clone(), node_id, name.to_string()))
    }

    /// Whether a child group called `name` exists.
    pub fn has_group(&self, name: &str) -> PandoraResult<bool> {
        let exists: i64 = self.storage.conn().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM nodes WHERE parent_id = ?1 AND name = ?2
            );",
            params![self.node_id, name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    /// Whether any child object called `name` exists.
    ///
    /// Groups are the only object kind this store materializes, so this is
    /// the same check as [`Group::has_group`].
    pub fn has_object(&self, name: &str) -> PandoraResult<bool> {
        self.has_group(name)
    }

    /// Number of direct children.
    pub fn object_count(&self) -> PandoraResult<usize> {
        let count: i64 = self.storage.conn().query_row(
            "SELECT COUNT(*) FROM nodes WHERE parent_id = ?1;",
            [self.node_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Name of the child at `index` in name order.
    ///
    /// # Errors
    /// - `OutOfBounds` when `index >= object_count()`.
    pub fn object_name(&self, index: usize) -> PandoraResult<String> {
        let name: Option<String> = self
            .storage
            .conn()
            .query_row(
                "SELECT name
                 FROM nodes
                 WHERE parent_id = ?1
                 ORDER BY name ASC
                 LIMIT 1 OFFSET ?2;",
                params![self.node_id, index as i64],
                |row| row.get(0),
            )
            .optional()?;

        match name {
            Some(name) => Ok(name),
            None => Err(PandoraError::OutOfBounds {
                kind: "object",
                index,
                count: self.object_count()?,
            }),
        }
    }

    /// Names of all direct children in enumeration order.
    pub fn object_names(&self) -> PandoraResult<Vec<String>> {
        let mut stmt = self.storage.conn().prepare(
            "SELECT name
             FROM nodes
             WHERE parent_id = ?1
             ORDER BY name ASC;",
        )?;
        let mut rows = stmt.query([self.node_id])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }
        Ok(names)
    }

    /// Removes the child group `name` and everything below it.
    ///
    /// Returns `false` when no such child exists.
    pub fn remove_group(&self, name: &str) -> PandoraResult<bool> {
        let changed = self.storage.conn().execute(
            "DELETE FROM nodes WHERE parent_id = ?1 AND name = ?2;",
            params![self.node_id, name],
        )?;
        Ok(changed > 0)
    }

    pub fn has_attr(&self, name: &str) -> PandoraResult<bool> {
        let exists: i64 = self.storage.conn().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM attributes WHERE node_id = ?1 AND name = ?2
            );",
            params![self.node_id, name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    /// Reads attribute `name`, `None` when unset.
    pub fn attr(&self, name: &str) -> PandoraResult<Option<AttrValue>> {
        let raw: Option<String> = self
            .storage
            .conn()
            .query_row(
                "SELECT value FROM attributes WHERE node_id = ?1 AND name = ?2;",
                params![self.node_id, name],
                |row| row.get(0),
            )
            .optional()?;
        raw.as_deref().map(AttrValue::decode).transpose()
    }

    /// Writes attribute `name`, replacing any previous value.
    pub fn set_attr(&self, name: &str, value: impl Into<AttrValue>) -> PandoraResult<()> {
        let encoded = value.into().encode()?;
        self.storage.conn().execute(
            "INSERT INTO attributes (node_id, name, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(node_id, name) DO UPDATE SET value = excluded.value;",
            params![self.node_id, name, encoded],
        )?;
        Ok(())
    }

    /// Deletes attribute `name`; returns whether it was set.
    pub fn remove_attr(&self, name: &str) -> PandoraResult<bool> {
        let changed = self.storage.conn().execute(
            "DELETE FROM attributes WHERE node_id = ?1 AND name = ?2;",
            params![self.node_id, name],
        )?;
        Ok(changed > 0)
    }

    pub fn text_attr(&self, name: &str) -> PandoraResult<Option<String>> {
        match self.attr(name)? {
            None => Ok(None),
            Some(AttrValue::Text(value)) => Ok(Some(value)),
            Some(other) => Err(self.kind_mismatch(name, &other, "text")),
        }
    }

    pub fn text_list_attr(&self, name: &str) -> PandoraResult<Option<Vec<String>>> {
        match self.attr(name)? {
            None => Ok(None),
            Some(AttrValue::TextList(value)) => Ok(Some(value)),
            Some(other) => Err(self.kind_mismatch(name, &other, "text_list")),
        }
    }

    pub fn int_attr(&self, name: &str) -> PandoraResult<Option<i64>> {
        match self.attr(name)? {
            None => Ok(None),
            Some(AttrValue::Int(value)) => Ok(Some(value)),
            Some(other) => Err(self.kind_mismatch(name, &other, "int")),
        }
    }

    pub fn float_list_attr(&self, name: &str) -> PandoraResult<Option<Vec<f64>>> {
        match self.attr(name)? {
            None => Ok(None),
            Some(AttrValue::FloatList(value)) => Ok(Some(value)),
            Some(other) => Err(self.kind_mismatch(name, &other, "float_list")),
        }
    }

    fn kind_mismatch(&self, name: &str, found: &AttrValue, expected: &str) -> PandoraError {
        PandoraError::InvalidData(format!(
            "attribute `{name}` on `{}` is {}, expected {expected}",
            self.name,
            found.kind_name()
        ))
    }

    fn child_id(&self, name: &str) -> PandoraResult<Option<i64>> {
        let node_id = self
            .storage
            .conn()
            .query_row(
                "SELECT node_id FROM nodes WHERE parent_id = ?1 AND name = ?2;",
                params![self.node_id, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(node_id)
    }
}
