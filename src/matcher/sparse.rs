// Compressed sparse row storage for the n-gram vector space

/// Row-major sparse matrix. Row `i` owns `indices[indptr[i]..indptr[i + 1]]`
/// and the matching slice of `data`.
#[derive(Debug, Clone, Default)]
pub struct SparseMatrix {
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f64>,
    n_cols: usize,
}

impl SparseMatrix {
    /// Assemble from per-row `(column, value)` entries. Entries keep the order
    /// they are given in.
    pub fn from_rows(rows: Vec<Vec<(u32, f64)>>, n_cols: usize) -> Self {
        let nnz = rows.iter().map(|r| r.len()).sum();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);

        indptr.push(0);
        for row in rows {
            for (col, value) in row {
                debug_assert!((col as usize) < n_cols);
                indices.push(col);
                data.push(value);
            }
            indptr.push(indices.len());
        }

        Self { indptr, indices, data, n_cols }
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Stored non-zero entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn row(&self, i: usize) -> (&[u32], &[f64]) {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        (&self.indices[start..end], &self.data[start..end])
    }

    /// Column-major view of the same matrix, returned as the rows of the
    /// transpose. Within each new row, entries are ordered by original row.
    pub fn transpose(&self) -> SparseMatrix {
        let mut counts = vec![0usize; self.n_cols];
        for &col in &self.indices {
            counts[col as usize] += 1;
        }

        let mut indptr = Vec::with_capacity(self.n_cols + 1);
        indptr.push(0);
        for count in &counts {
            let last = indptr[indptr.len() - 1];
            indptr.push(last + count);
        }

        let mut next = indptr[..self.n_cols].to_vec();
        let mut indices = vec![0u32; self.nnz()];
        let mut data = vec![0f64; self.nnz()];

        for row in 0..self.n_rows() {
            let (cols, values) = self.row(row);
            for (&col, &value) in cols.iter().zip(values) {
                let slot = next[col as usize];
                indices[slot] = row as u32;
                data[slot] = value;
                next[col as usize] += 1;
            }
        }

        SparseMatrix {
            indptr,
            indices,
            data,
            n_cols: self.n_rows(),
        }
    }
}
