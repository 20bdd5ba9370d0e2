//! Named, persisted gene-set and cell-set algebra. Set-existence and
//! lookup failures are reported as `Ok(false)`/diagnostics rather than
//! `Err`, per the error-propagation split documented for this component:
//! these are user-driven queries, not structural or I/O failures.

mod error;
mod sets;

pub use error::{Error, Result};
pub use info_content::Normalization;

use std::fs;
use std::path::{Path, PathBuf};

use cell_store::{CellId, EntityStore, GeneId};
use rand::{Rng, SeedableRng};
use rand_mt::Mt19937GenRand64;
use regex::Regex;
use tracing::warn;

use sets::{difference_sorted, full_match, intersect_sorted, merge_sorted_unique, read_ids, write_ids};

const CELL_SETS_DIR: &str = "CellSets";

pub struct SetAlgebra<'a> {
    store: &'a EntityStore,
    dir: PathBuf,
}

impl<'a> SetAlgebra<'a> {
    pub fn new(store: &'a EntityStore) -> SetAlgebra<'a> {
        SetAlgebra {
            store,
            dir: store.dir().to_path_buf(),
        }
    }

    fn gene_set_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("GeneSet-{name}-GlobalIds"))
    }

    fn cell_set_dir(&self) -> PathBuf {
        self.dir.join(CELL_SETS_DIR)
    }

    fn cell_set_path(&self, name: &str) -> PathBuf {
        self.cell_set_dir().join(name)
    }

    pub fn gene_set_exists(&self, name: &str) -> bool {
        self.gene_set_path(name).exists()
    }

    pub fn cell_set_exists(&self, name: &str) -> bool {
        self.cell_set_path(name).exists()
    }

    /// Gene-set names discovered by scanning the store directory for
    /// `GeneSet-<name>-GlobalIds` files.
    pub fn list_gene_sets(&self) -> Vec<String> {
        let pattern = Regex::new(r"^GeneSet-(.+)-GlobalIds$").expect("static pattern is valid");
        let mut names = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                if let Some(file_name) = entry.file_name().to_str() {
                    if let Some(caps) = pattern.captures(file_name) {
                        names.push(caps[1].to_string());
                    }
                }
            }
        }
        names.sort();
        names
    }

    pub fn list_cell_sets(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = fs::read_dir(self.cell_set_dir()) {
            for entry in entries.flatten() {
                if let Some(file_name) = entry.file_name().to_str() {
                    names.push(file_name.to_string());
                }
            }
        }
        names.sort();
        names
    }

    pub fn load_gene_set(&self, name: &str) -> Result<Vec<GeneId>> {
        Ok(read_ids(self.gene_set_path(name))?)
    }

    pub fn load_cell_set(&self, name: &str) -> Result<Vec<CellId>> {
        Ok(read_ids(self.cell_set_path(name))?)
    }

    // ---- Gene-sets ---------------------------------------------------

    /// Select genes whose name fully matches `pattern`.
    pub fn create_gene_set_by_regex(&self, name: &str, pattern: &str) -> Result<bool> {
        if self.gene_set_exists(name) {
            warn!(name, "gene-set already exists");
            return Ok(false);
        }
        let re = Regex::new(pattern).map_err(|e| Error::InvalidInput(format!("bad regex: {e}")))?;
        let ids: Vec<GeneId> = self
            .store
            .all_gene_ids()
            .into_iter()
            .filter(|&g| full_match(&re, &self.store.gene_name(g)))
            .collect();
        write_ids(self.gene_set_path(name), &ids)?;
        Ok(true)
    }

    /// Select genes from an explicit name list. Unknown names are ignored
    /// and counted; empty strings are ignored and counted separately.
    /// Returns `None` (no diagnostic, just `Ok(false)` to the caller) if the
    /// name already exists.
    pub fn create_gene_set_by_names(&self, name: &str, names: &[String]) -> Result<Option<(usize, usize)>> {
        if self.gene_set_exists(name) {
            warn!(name, "gene-set already exists");
            return Ok(None);
        }
        let mut ignored = 0;
        let mut empty = 0;
        let mut ids = Vec::new();
        for n in names {
            if n.is_empty() {
                empty += 1;
                continue;
            }
            match self.store.gene_id(n) {
                Some(id) => ids.push(id),
                None => ignored += 1,
            }
        }
        ids.sort_unstable();
        ids.dedup();
        write_ids(self.gene_set_path(name), &ids)?;
        Ok(Some((ignored, empty)))
    }

    fn combine_gene_sets(
        &self,
        out: &str,
        a: &str,
        b: &str,
        op: impl Fn(&[u32], &[u32]) -> Vec<u32>,
    ) -> Result<bool> {
        if self.gene_set_exists(out) {
            warn!(out, "gene-set already exists");
            return Ok(false);
        }
        if !self.gene_set_exists(a) {
            warn!(set = a, "gene-set not found");
            return Ok(false);
        }
        if !self.gene_set_exists(b) {
            warn!(set = b, "gene-set not found");
            return Ok(false);
        }
        let va = self.load_gene_set(a)?;
        let vb = self.load_gene_set(b)?;
        write_ids(self.gene_set_path(out), &op(&va, &vb))?;
        Ok(true)
    }

    pub fn union_gene_sets(&self, out: &str, a: &str, b: &str) -> Result<bool> {
        self.combine_gene_sets(out, a, b, merge_sorted_unique)
    }

    pub fn intersect_gene_sets(&self, out: &str, a: &str, b: &str) -> Result<bool> {
        self.combine_gene_sets(out, a, b, intersect_sorted)
    }

    pub fn difference_gene_sets(&self, out: &str, a: &str, b: &str) -> Result<bool> {
        self.combine_gene_sets(out, a, b, difference_sorted)
    }

    pub fn create_gene_set_by_info_content(
        &self,
        out: &str,
        gene_set: &str,
        cell_set: &str,
        norm: Normalization,
        threshold: f64,
    ) -> Result<bool> {
        if self.gene_set_exists(out) {
            warn!(out, "gene-set already exists");
            return Ok(false);
        }
        if !self.gene_set_exists(gene_set) {
            warn!(set = gene_set, "gene-set not found");
            return Ok(false);
        }
        if !self.cell_set_exists(cell_set) {
            warn!(set = cell_set, "cell-set not found");
            return Ok(false);
        }
        let g = self.load_gene_set(gene_set)?;
        let c = self.load_cell_set(cell_set)?;
        let selected = info_content::select_by_threshold(self.store, &g, &c, norm, threshold);
        write_ids(self.gene_set_path(out), &selected)?;
        Ok(true)
    }

    // ---- Cell-sets -----------------------------------------------------

    fn ensure_cell_sets_dir(&self) -> Result<()> {
        fs::create_dir_all(self.cell_set_dir()).map_err(|e| mmap_vec::Error::Io {
            path: self.cell_set_dir(),
            source: e,
        })?;
        Ok(())
    }

    pub fn create_cell_set_by_names(&self, name: &str, names: &[String]) -> Result<Option<(usize, usize)>> {
        if self.cell_set_exists(name) {
            warn!(name, "cell-set already exists");
            return Ok(None);
        }
        let mut ignored = 0;
        let mut empty = 0;
        let mut ids = Vec::new();
        for n in names {
            if n.is_empty() {
                empty += 1;
                continue;
            }
            match self.store.cell_id(n) {
                Some(id) => ids.push(id),
                None => ignored += 1,
            }
        }
        ids.sort_unstable();
        ids.dedup();
        self.ensure_cell_sets_dir()?;
        write_ids(self.cell_set_path(name), &ids)?;
        Ok(Some((ignored, empty)))
    }

    /// Select cells that have a meta-data pair `(field, v)` with `v` fully
    /// matching `pattern`.
    pub fn create_cell_set_by_meta_regex(&self, name: &str, field: &str, pattern: &str) -> Result<bool> {
        if self.cell_set_exists(name) {
            warn!(name, "cell-set already exists");
            return Ok(false);
        }
        let re = Regex::new(pattern).map_err(|e| Error::InvalidInput(format!("bad regex: {e}")))?;
        let ids: Vec<CellId> = self
            .store
            .all_cell_ids()
            .into_iter()
            .filter(|&c| {
                self.store
                    .get_cell_meta_data(c, field)
                    .map(|v| full_match(&re, &v))
                    .unwrap_or(false)
            })
            .collect();
        self.ensure_cell_sets_dir()?;
        write_ids(self.cell_set_path(name), &ids)?;
        Ok(true)
    }

    fn combine_cell_sets(
        &self,
        out: &str,
        a: &str,
        b: &str,
        op: impl Fn(&[u32], &[u32]) -> Vec<u32>,
    ) -> Result<bool> {
        if self.cell_set_exists(out) {
            warn!(out, "cell-set already exists");
            return Ok(false);
        }
        if !self.cell_set_exists(a) {
            warn!(set = a, "cell-set not found");
            return Ok(false);
        }
        if !self.cell_set_exists(b) {
            warn!(set = b, "cell-set not found");
            return Ok(false);
        }
        let va = self.load_cell_set(a)?;
        let vb = self.load_cell_set(b)?;
        self.ensure_cell_sets_dir()?;
        write_ids(self.cell_set_path(out), &op(&va, &vb))?;
        Ok(true)
    }

    pub fn union_cell_sets(&self, out: &str, a: &str, b: &str) -> Result<bool> {
        self.combine_cell_sets(out, a, b, merge_sorted_unique)
    }

    pub fn intersect_cell_sets(&self, out: &str, a: &str, b: &str) -> Result<bool> {
        self.combine_cell_sets(out, a, b, intersect_sorted)
    }

    pub fn difference_cell_sets(&self, out: &str, a: &str, b: &str) -> Result<bool> {
        self.combine_cell_sets(out, a, b, difference_sorted)
    }

    /// Include each element of `input` independently with probability `p`,
    /// via a Mersenne Twister seeded by `seed`, iterating `input` in
    /// ascending `CellId` order for reproducibility.
    pub fn downsample_cell_set(&self, out: &str, input: &str, p: f64, seed: u64) -> Result<bool> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::InvalidInput(format!("probability {p} outside [0,1]")));
        }
        if self.cell_set_exists(out) {
            warn!(out, "cell-set already exists");
            return Ok(false);
        }
        if !self.cell_set_exists(input) {
            warn!(set = input, "cell-set not found");
            return Ok(false);
        }
        let source = self.load_cell_set(input)?;
        let mut rng = Mt19937GenRand64::seed_from_u64(seed);
        let sampled: Vec<CellId> = source.into_iter().filter(|_| rng.gen::<f64>() < p).collect();
        self.ensure_cell_sets_dir()?;
        write_ids(self.cell_set_path(out), &sampled)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_store::StoreConfig;

    fn meta(name: &str, batch: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), name.to_string()), ("batch".to_string(), batch.to_string())]
    }

    fn build_store(dir: &Path) -> EntityStore {
        let mut store = EntityStore::create_new(dir.join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a", "ctrl"), &[("ACTB".into(), 1.0), ("GAPDH".into(), 2.0)]).unwrap();
        store.add_cell(&meta("b", "treated"), &[("ACTB".into(), 1.0)]).unwrap();
        store.add_cell(&meta("c", "ctrl"), &[("GATA1".into(), 1.0)]).unwrap();
        store
    }

    #[test]
    fn regex_select_is_a_full_match() {
        let dir = tempfile::tempdir().unwrap();
        let store = build_store(dir.path());
        let sa = SetAlgebra::new(&store);
        sa.create_gene_set_by_regex("act_genes", "ACT.*").unwrap();
        let ids = sa.load_gene_set("act_genes").unwrap();
        assert_eq!(ids, vec![store.gene_id("ACTB").unwrap()]);
    }

    #[test]
    fn union_is_commutative_and_difference_plus_intersect_is_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = build_store(dir.path());
        let sa = SetAlgebra::new(&store);
        sa.create_gene_set_by_names("a", &["ACTB".to_string(), "GAPDH".to_string()]).unwrap();
        sa.create_gene_set_by_names("b", &["GAPDH".to_string(), "GATA1".to_string()]).unwrap();
        sa.union_gene_sets("u1", "a", "b").unwrap();
        sa.union_gene_sets("u2", "b", "a").unwrap();
        assert_eq!(sa.load_gene_set("u1").unwrap(), sa.load_gene_set("u2").unwrap());

        sa.intersect_gene_sets("i", "a", "b").unwrap();
        sa.difference_gene_sets("d", "a", "b").unwrap();
        let mut recombined = sa.load_gene_set("i").unwrap();
        recombined.extend(sa.load_gene_set("d").unwrap());
        recombined.sort();
        assert_eq!(recombined, sa.load_gene_set("a").unwrap());
    }

    #[test]
    fn meta_regex_select_matches_on_full_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = build_store(dir.path());
        let sa = SetAlgebra::new(&store);
        sa.create_cell_set_by_meta_regex("ctrls", "batch", "ctrl").unwrap();
        let ids = sa.load_cell_set("ctrls").unwrap();
        assert_eq!(ids, vec![store.cell_id("a").unwrap(), store.cell_id("c").unwrap()]);
    }

    #[test]
    fn downsample_p_one_is_identity_p_zero_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = build_store(dir.path());
        let sa = SetAlgebra::new(&store);
        sa.create_cell_set_by_names("all", &["a".to_string(), "b".to_string(), "c".to_string()]).unwrap();
        sa.downsample_cell_set("keep_all", "all", 1.0, 1).unwrap();
        assert_eq!(sa.load_cell_set("keep_all").unwrap(), sa.load_cell_set("all").unwrap());
        sa.downsample_cell_set("keep_none", "all", 0.0, 1).unwrap();
        assert!(sa.load_cell_set("keep_none").unwrap().is_empty());
    }

    #[test]
    fn downsample_rejects_probability_outside_unit_interval() {
        let dir = tempfile::tempdir().unwrap();
        let store = build_store(dir.path());
        let sa = SetAlgebra::new(&store);
        sa.create_cell_set_by_names("all", &["a".to_string()]).unwrap();
        let err = sa.downsample_cell_set("x", "all", 1.5, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn creating_over_an_existing_name_reports_false_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = build_store(dir.path());
        let sa = SetAlgebra::new(&store);
        sa.create_gene_set_by_regex("g", ".*").unwrap();
        let created_again = sa.create_gene_set_by_regex("g", ".*").unwrap();
        assert!(!created_again);
    }
}
