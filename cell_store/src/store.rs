use std::fs;
use std::path::{Path, PathBuf};

use mmap_vec::{StringTable, Vector, VectorOfVectors};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::types::{CellId, CellRecord, ExprEntry, GeneId, MetaPair, StringId, INVALID_STRING};

fn string_table_paths(dir: &Path, name: &str) -> (PathBuf, PathBuf, PathBuf) {
    let base = dir.join(name);
    (
        base.join("buckets.bin"),
        base.join("arena_toc.bin"),
        base.join("arena_data.bin"),
    )
}

fn jagged_paths(dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    let base = dir.join(name);
    (base.join("toc.bin"), base.join("data.bin"))
}

fn create_string_table(dir: &Path, name: &str, capacity: usize) -> Result<StringTable<StringId>> {
    fs::create_dir_all(dir.join(name)).map_err(|e| mmap_vec::Error::Io {
        path: dir.join(name),
        source: e,
    })?;
    let (b, t, d) = string_table_paths(dir, name);
    Ok(StringTable::create_new(b, t, d, capacity)?)
}

fn open_string_table(dir: &Path, name: &str, writable: bool) -> Result<StringTable<StringId>> {
    let (b, t, d) = string_table_paths(dir, name);
    Ok(StringTable::access_existing(b, t, d, writable)?)
}

/// The persistent, memory-mapped entity store: genes, cells, per-cell
/// meta-data, and per-cell sparse expression counts.
///
/// Single-writer, multi-reader: only one thread at a time may call a
/// mutating method (`add_gene`, `add_cell`, `set_cell_meta_data`).
pub struct EntityStore {
    dir: PathBuf,
    writable: bool,

    gene_names: StringTable<StringId>,
    cells: Vector<CellRecord>,
    cell_names: StringTable<StringId>,
    cell_meta_data: VectorOfVectors<MetaPair, u32>,
    cell_meta_names: StringTable<StringId>,
    cell_meta_values: StringTable<StringId>,
    cell_meta_usage: Vector<u32>,
    cell_expression: VectorOfVectors<ExprEntry, u32>,
}

impl EntityStore {
    pub fn create_new(dir: impl AsRef<Path>, config: StoreConfig) -> Result<EntityStore> {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() {
            return Err(Error::AlreadyExists(dir.display().to_string()));
        }
        fs::create_dir_all(&dir).map_err(|e| mmap_vec::Error::Io {
            path: dir.clone(),
            source: e,
        })?;

        let gene_names = create_string_table(&dir, "GeneNames", config.gene_capacity)?;
        let cells = Vector::<CellRecord>::create_new(dir.join("Cells.bin"), 0, 1024)?;
        let cell_names = create_string_table(&dir, "CellNames", config.cell_capacity)?;
        let (meta_toc, meta_data) = jagged_paths(&dir, "CellMetaData");
        fs::create_dir_all(dir.join("CellMetaData")).map_err(|e| mmap_vec::Error::Io {
            path: dir.join("CellMetaData"),
            source: e,
        })?;
        let cell_meta_data = VectorOfVectors::<MetaPair, u32>::create_new(meta_toc, meta_data, 1024, 4096)?;
        let cell_meta_names = create_string_table(&dir, "CellMetaDataNames", config.cell_meta_data_name_capacity)?;
        let cell_meta_values = create_string_table(&dir, "CellMetaDataValues", config.cell_meta_data_value_capacity)?;
        let cell_meta_usage = Vector::<u32>::create_new(dir.join("CellMetaDataNamesUsageCount.bin"), 0, 64)?;
        let (expr_toc, expr_data) = jagged_paths(&dir, "CellExpressionCounts");
        fs::create_dir_all(dir.join("CellExpressionCounts")).map_err(|e| mmap_vec::Error::Io {
            path: dir.join("CellExpressionCounts"),
            source: e,
        })?;
        let cell_expression = VectorOfVectors::<ExprEntry, u32>::create_new(expr_toc, expr_data, 1024, 8192)?;

        info!(dir = %dir.display(), "created entity store");
        Ok(EntityStore {
            dir,
            writable: true,
            gene_names,
            cells,
            cell_names,
            cell_meta_data,
            cell_meta_names,
            cell_meta_values,
            cell_meta_usage,
            cell_expression,
        })
    }

    pub fn open_existing(dir: impl AsRef<Path>, writable: bool) -> Result<EntityStore> {
        let dir = dir.as_ref().to_path_buf();
        let gene_names = open_string_table(&dir, "GeneNames", writable)?;
        let cells = Vector::<CellRecord>::access_existing(dir.join("Cells.bin"), writable)?;
        let cell_names = open_string_table(&dir, "CellNames", writable)?;
        let (meta_toc, meta_data) = jagged_paths(&dir, "CellMetaData");
        let cell_meta_data = VectorOfVectors::<MetaPair, u32>::access_existing(meta_toc, meta_data, writable)?;
        let cell_meta_names = open_string_table(&dir, "CellMetaDataNames", writable)?;
        let cell_meta_values = open_string_table(&dir, "CellMetaDataValues", writable)?;
        let cell_meta_usage = Vector::<u32>::access_existing(dir.join("CellMetaDataNamesUsageCount.bin"), writable)?;
        let (expr_toc, expr_data) = jagged_paths(&dir, "CellExpressionCounts");
        let cell_expression = VectorOfVectors::<ExprEntry, u32>::access_existing(expr_toc, expr_data, writable)?;

        if cells.len() != cell_names.len()
            || cells.len() != cell_meta_data.outer_count()
            || cells.len() != cell_expression.outer_count()
        {
            return Err(mmap_vec::Error::Corrupt {
                path: dir.clone(),
                reason: "cell container sizes disagree".to_string(),
            }
            .into());
        }

        Ok(EntityStore {
            dir,
            writable,
            gene_names,
            cells,
            cell_names,
            cell_meta_data,
            cell_meta_names,
            cell_meta_values,
            cell_meta_usage,
            cell_expression,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn close(self) -> Result<()> {
        self.gene_names.sync_to_disk()?;
        self.cells.sync_to_disk()?;
        self.cell_names.sync_to_disk()?;
        self.cell_meta_data.sync_to_disk()?;
        self.cell_meta_names.sync_to_disk()?;
        self.cell_meta_values.sync_to_disk()?;
        self.cell_meta_usage.sync_to_disk()?;
        self.cell_expression.sync_to_disk()?;
        Ok(())
    }

    // ---- Genes ----------------------------------------------------------

    pub fn n_genes(&self) -> usize {
        self.gene_names.len()
    }

    pub fn gene_id(&self, name: &str) -> Option<GeneId> {
        let id = self.gene_names.get(name);
        if id == INVALID_STRING {
            None
        } else {
            Some(id)
        }
    }

    pub fn gene_name(&self, id: GeneId) -> String {
        self.gene_names.name_of(id)
    }

    pub fn all_gene_ids(&self) -> Vec<GeneId> {
        (0..self.n_genes() as u32).collect()
    }

    /// Register a gene if it is not already known. Idempotent: re-adding an
    /// existing gene returns `Ok((id, false))`, never an error.
    pub fn add_gene(&mut self, name: &str) -> Result<(GeneId, bool)> {
        let existing = self.gene_id(name);
        if let Some(id) = existing {
            return Ok((id, false));
        }
        let id = self.gene_names.get_or_insert(name)?;
        debug!(gene = name, id, "registered gene");
        Ok((id, true))
    }

    // ---- Cells ------------------------------------------------------------

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_id(&self, name: &str) -> Option<CellId> {
        let id = self.cell_names.get(name);
        if id == INVALID_STRING {
            None
        } else {
            Some(id)
        }
    }

    pub fn cell_name(&self, id: CellId) -> String {
        self.cell_names.name_of(id)
    }

    pub fn all_cell_ids(&self) -> Vec<CellId> {
        (0..self.n_cells() as u32).collect()
    }

    pub fn cell_record(&self, id: CellId) -> CellRecord {
        self.cells.get(id as usize)
    }

    pub fn expression(&self, id: CellId) -> &[ExprEntry] {
        self.cell_expression.row(id as usize)
    }

    pub fn meta_data(&self, id: CellId) -> Vec<(String, String)> {
        self.cell_meta_data
            .row(id as usize)
            .iter()
            .map(|p| (self.cell_meta_names.name_of(p.name_id), self.cell_meta_values.name_of(p.value_id)))
            .collect()
    }

    pub fn get_cell_meta_data(&self, id: CellId, name: &str) -> Option<String> {
        let name_id = self.cell_meta_names.get(name);
        if name_id == INVALID_STRING {
            return None;
        }
        self.cell_meta_data
            .row(id as usize)
            .iter()
            .find(|p| p.name_id == name_id)
            .map(|p| self.cell_meta_values.name_of(p.value_id))
    }

    fn intern_meta_name(&mut self, name: &str) -> Result<StringId> {
        let before = self.cell_meta_names.len();
        let id = self.cell_meta_names.get_or_insert(name)?;
        if self.cell_meta_names.len() > before {
            self.cell_meta_usage.push_back(1)?;
        } else {
            let c = self.cell_meta_usage.get(id as usize);
            self.cell_meta_usage.set(id as usize, c + 1);
        }
        Ok(id)
    }

    /// Add a cell. `meta_data` must contain a `"CellName"` entry (it need
    /// not be first; it is promoted to index 0). `counts` are (gene name,
    /// count) pairs; unseen genes are auto-registered, zero counts are
    /// dropped, negative counts are rejected, and duplicate genes within one
    /// cell are rejected.
    pub fn add_cell(&mut self, meta_data: &[(String, String)], counts: &[(String, f32)]) -> Result<CellId> {
        if !self.writable {
            return Err(Error::InvalidInput("store is read-only".to_string()));
        }
        let cell_name_pos = meta_data
            .iter()
            .position(|(n, _)| n == "CellName")
            .ok_or_else(|| Error::InvalidInput("missing CellName meta-data entry".to_string()))?;
        let cell_name = meta_data[cell_name_pos].1.clone();
        if self.cell_id(&cell_name).is_some() {
            return Err(Error::InvalidInput(format!("duplicate cell name {cell_name}")));
        }

        let mut entries = Vec::with_capacity(counts.len());
        for (gene_name, count) in counts {
            if *count < 0.0 {
                return Err(Error::InvalidInput(format!("negative count for gene {gene_name}")));
            }
            if *count == 0.0 {
                continue;
            }
            let (gene_id, _) = self.add_gene(gene_name)?;
            entries.push(ExprEntry { gene: gene_id, count: *count });
        }
        entries.sort_by_key(|e| e.gene);
        for w in entries.windows(2) {
            if w[0].gene == w[1].gene {
                return Err(Error::InvalidInput(format!("duplicate gene {} in cell {cell_name}", w[0].gene)));
            }
        }
        let record = CellRecord::from_counts(&entries);

        let cell_id = self.cell_names.get_or_insert(&cell_name)?;
        self.cells.push_back(record)?;

        self.cell_expression.append_empty_row()?;
        for e in &entries {
            self.cell_expression.append_to_last_row(*e)?;
        }

        self.cell_meta_data.append_empty_row()?;
        // CellName goes first regardless of its position in the input.
        let ordered = std::iter::once(&meta_data[cell_name_pos])
            .chain(meta_data.iter().enumerate().filter(|(i, _)| *i != cell_name_pos).map(|(_, kv)| kv));
        for (name, value) in ordered {
            let name_id = self.intern_meta_name(name)?;
            let value_id = self.cell_meta_values.get_or_insert(value)?;
            self.cell_meta_data.append_to_last_row(MetaPair { name_id, value_id })?;
        }

        debug!(cell = %cell_name, id = cell_id, n_genes = entries.len(), "added cell");
        Ok(cell_id)
    }

    /// Update an existing (cell, name) meta-data pair in place, or append a
    /// new one. Appending to any row but the most recently added one cannot
    /// be expressed as an append in the underlying jagged container, so it
    /// is implemented as a full rebuild of `CellMetaData`; this is correct
    /// but O(total meta-data size), and is not meant to be called in a tight
    /// per-cell ingestion loop (use `add_cell`'s ordered meta-data list for
    /// that).
    pub fn set_cell_meta_data(&mut self, cell: CellId, name: &str, value: &str) -> Result<()> {
        if cell as usize >= self.n_cells() {
            return Err(Error::NotFound(format!("cell id {cell}")));
        }
        let value_id = self.cell_meta_values.get_or_insert(value)?;
        if let Some(existing_name_id) = {
            let id = self.cell_meta_names.get(name);
            if id == INVALID_STRING {
                None
            } else {
                Some(id)
            }
        } {
            let row = self.cell_meta_data.row_mut(cell as usize);
            if let Some(pair) = row.iter_mut().find(|p| p.name_id == existing_name_id) {
                pair.value_id = value_id;
                self.cell_meta_data.sync_to_disk()?;
                return Ok(());
            }
        }
        let name_id = self.intern_meta_name(name)?;
        self.rebuild_meta_data_with_extra(cell, MetaPair { name_id, value_id })
    }

    fn rebuild_meta_data_with_extra(&mut self, cell: CellId, extra: MetaPair) -> Result<()> {
        let n = self.n_cells();
        let mut rows: Vec<Vec<MetaPair>> = Vec::with_capacity(n);
        for i in 0..n {
            rows.push(self.cell_meta_data.row(i).to_vec());
        }
        rows[cell as usize].push(extra);

        let toc_path = self.dir.join("CellMetaData").join("toc.bin");
        let data_path = self.dir.join("CellMetaData").join("data.bin");
        let lengths: Vec<usize> = rows.iter().map(|r| r.len()).collect();

        Vector::<u32>::remove(&toc_path).ok();
        Vector::<MetaPair>::remove(&data_path).ok();
        let mut rebuilt = VectorOfVectors::<MetaPair, u32>::build_from_row_lengths(
            &toc_path,
            &data_path,
            &lengths,
            MetaPair { name_id: 0, value_id: 0 },
        )?;
        for (i, row) in rows.iter().enumerate() {
            rebuilt.row_mut(i).copy_from_slice(row);
        }
        rebuilt.sync_to_disk()?;
        self.cell_meta_data = rebuilt;
        warn!(cell, "rebuilt CellMetaData to append a new field outside the last row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, cell_name: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), cell_name.to_string()), (name.to_string(), "x".to_string())]
    }

    #[test]
    fn add_cell_sorts_counts_computes_sums_and_auto_registers_genes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        let counts = vec![
            ("C".to_string(), 3.0),
            ("A".to_string(), 1.0),
            ("B".to_string(), 2.0),
        ];
        let cell_id = store
            .add_cell(&[("CellName".to_string(), "c1".to_string())], &counts)
            .unwrap();
        assert_eq!(store.n_genes(), 3);
        assert_eq!(store.n_cells(), 1);
        let expr = store.expression(cell_id);
        let genes: Vec<String> = expr.iter().map(|e| store.gene_name(e.gene)).collect();
        assert_eq!(genes, vec!["A", "B", "C"]);
        let rec = store.cell_record(cell_id);
        assert_eq!(rec.sum1, 6.0);
        assert_eq!(rec.sum2, 1.0 + 4.0 + 9.0);
    }

    #[test]
    fn add_cell_requires_cell_name_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        let err = store.add_cell(&[("Other".to_string(), "v".to_string())], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        store.add_cell(&meta("batch", "dup"), &[]).unwrap();
        let err = store.add_cell(&meta("batch", "dup"), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn add_cell_rejects_negative_counts_and_drops_zero_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        let err = store
            .add_cell(&meta("batch", "a"), &[("G".to_string(), -1.0)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let cell_id = store
            .add_cell(&meta("batch", "b"), &[("G".to_string(), 0.0), ("H".to_string(), 5.0)])
            .unwrap();
        assert_eq!(store.expression(cell_id).len(), 1);
    }

    #[test]
    fn set_cell_meta_data_updates_in_place_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        let a = store.add_cell(&meta("batch", "a"), &[]).unwrap();
        store.add_cell(&meta("batch", "b"), &[]).unwrap();

        store.set_cell_meta_data(a, "batch", "v2").unwrap();
        assert_eq!(store.get_cell_meta_data(a, "batch").unwrap(), "v2");

        store.set_cell_meta_data(a, "cluster", "7").unwrap();
        assert_eq!(store.get_cell_meta_data(a, "cluster").unwrap(), "7");
        // CellName stays first even after a rebuild.
        assert_eq!(store.meta_data(a)[0].0, "CellName");
    }

    #[test]
    fn reopen_preserves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        let a;
        {
            let mut store = EntityStore::create_new(&path, StoreConfig::default()).unwrap();
            a = store
                .add_cell(&meta("batch", "a"), &[("G1".to_string(), 2.0)])
                .unwrap();
            store.close().unwrap();
        }
        let store2 = EntityStore::open_existing(&path, false).unwrap();
        assert_eq!(store2.n_cells(), 1);
        assert_eq!(store2.cell_name(a), "a");
        assert_eq!(store2.expression(a)[0].count, 2.0);
    }
}
