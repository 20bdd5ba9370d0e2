/// Capacity contract for the interning tables and fixed-size containers.
/// `StringTable` capacity is fixed at creation and overflow is undefined
/// behavior -- callers must size for at least 2x the number of distinct
/// entries they expect.
#[derive(Clone, Copy, Debug)]
pub struct StoreConfig {
    pub gene_capacity: usize,
    pub cell_capacity: usize,
    pub cell_meta_data_name_capacity: usize,
    pub cell_meta_data_value_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            gene_capacity: 1 << 16,
            cell_capacity: 1 << 20,
            cell_meta_data_name_capacity: 1 << 10,
            cell_meta_data_value_capacity: 1 << 16,
        }
    }
}
