//! Dense GF(2) matrices
//!
//! Row-major matrices over the binary field, bit-packed into 64-bit words:
//! addition is XOR and multiplication is AND-then-XOR, so products reduce to
//! word-level row XORs. Shape always travels with the buffer; ownership is
//! exclusive and copies are explicit.

use std::fmt;

use thiserror::Error;

const WORD_BITS: usize = 64;

/// GF(2) matrix error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Gf2Error {
    /// Row reduction found a pivot column with no usable row.
    #[error("the matrix is singular")]
    Singular,
    /// A matrix text file did not follow the `rows cols` + bit-rows schema.
    #[error("malformed matrix text: {0}")]
    Malformed(String),
}

/// Dense bit-packed GF(2) matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMatrix {
    rows: usize,
    cols: usize,
    /// Words per row.
    stride: usize,
    data: Vec<u64>,
}

impl BinaryMatrix {
    /// All-zero matrix. Dimensions must be positive.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be positive");
        let stride = (cols + WORD_BITS - 1) / WORD_BITS;
        Self {
            rows,
            cols,
            stride,
            data: vec![0; rows * stride],
        }
    }

    /// The n x n identity.
    pub fn identity(n: usize) -> Self {
        let mut out = Self::zeros(n, n);
        for i in 0..n {
            out.set(i, i, 1);
        }
        out
    }

    /// Unpack a row-major bit stream, MSB-first within each byte.
    ///
    /// `bits` must hold at least `rows * cols` bits; surplus bits are
    /// ignored.
    pub fn from_bits(rows: usize, cols: usize, bits: &[u8]) -> Self {
        assert!(
            bits.len() * 8 >= rows * cols,
            "bit stream too short for a {rows} x {cols} matrix"
        );
        let mut out = Self::zeros(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let idx = row * cols + col;
                let bit = (bits[idx / 8] >> (7 - idx % 8)) & 1;
                if bit == 1 {
                    out.set(row, col, 1);
                }
            }
        }
        out
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        ((self.data[row * self.stride + col / WORD_BITS] >> (col % WORD_BITS)) & 1) as u8
    }

    pub fn set(&mut self, row: usize, col: usize, bit: u8) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        let word = &mut self.data[row * self.stride + col / WORD_BITS];
        let mask = 1u64 << (col % WORD_BITS);
        if bit & 1 == 1 {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Elementwise sum over GF(2), i.e. XOR.
    pub fn add(&self, rhs: &Self) -> Self {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "matrix shapes must match"
        );
        let mut out = self.clone();
        for (w, r) in out.data.iter_mut().zip(&rhs.data) {
            *w ^= r;
        }
        out
    }

    /// Matrix product over GF(2).
    ///
    /// Every set bit a_ik folds row k of `rhs` into row i of the result
    /// with a word-level XOR.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.cols, rhs.rows, "inner dimensions must agree");
        let mut out = Self::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                if self.get(i, k) == 1 {
                    out.xor_row_from(i, rhs, k);
                }
            }
        }
        out
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.get(row, col) == 1 {
                    out.set(col, row, 1);
                }
            }
        }
        out
    }

    /// Swap two columns in the top `top_rows` rows.
    pub fn swap_columns(&mut self, first: usize, second: usize, top_rows: usize) {
        assert!(top_rows <= self.rows);
        for row in 0..top_rows {
            let a = self.get(row, first);
            let b = self.get(row, second);
            self.set(row, first, b);
            self.set(row, second, a);
        }
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) {
        if first == second {
            return;
        }
        for w in 0..self.stride {
            self.data.swap(first * self.stride + w, second * self.stride + w);
        }
    }

    /// Greedy column permutation toward `[A | I_r]`, r being the row count.
    ///
    /// Scans columns left to right; a column equal to a unit vector e_j is
    /// swapped into column `(cols - r) + j`. Stops once r unit columns have
    /// been placed and returns the number placed. Fewer than r unit columns
    /// in the input leaves the matrix only partially systematic; callers
    /// that need the full identity block follow up with [`Self::rref`].
    pub fn make_systematic(&mut self) -> usize {
        assert!(self.rows <= self.cols, "more rows than columns");
        let r = self.rows;
        let k = self.cols - r;
        let mut placed = 0;
        for i in 0..self.cols {
            if let Some(position) = self.unit_column(i) {
                self.swap_columns(i, k + position, self.rows);
                placed += 1;
            }
            if placed == r {
                break;
            }
        }
        placed
    }

    /// Mirror of [`Self::make_systematic`] placing the identity in the
    /// first r columns, the `[I | P]` layout generator matrices use.
    pub fn make_systematic_front(&mut self) -> usize {
        let r = self.rows;
        let mut placed = 0;
        for i in 0..self.cols {
            if let Some(position) = self.unit_column(i) {
                self.swap_columns(i, position, self.rows);
                placed += 1;
            }
            if placed == r {
                break;
            }
        }
        placed
    }

    /// Position of the single 1 in column `col`, if the column is a unit
    /// vector.
    fn unit_column(&self, col: usize) -> Option<usize> {
        let mut ones = 0;
        let mut position = 0;
        for row in 0..self.rows {
            if self.get(row, col) == 1 {
                position = row;
                ones += 1;
            }
        }
        (ones == 1).then_some(position)
    }

    /// Reduced row echelon form with pivots in the rightmost `rows` columns.
    ///
    /// For each target column the pivot row is swapped in from below when
    /// needed, then XORed out of every other row (forward and back
    /// substitution). On success the rightmost `rows` columns form the
    /// identity.
    pub fn rref(&mut self) -> Result<(), Gf2Error> {
        assert!(self.rows <= self.cols, "more rows than columns");
        let mut row = 0;
        for col in self.cols - self.rows..self.cols {
            if self.get(row, col) == 0 {
                let pivot = (row + 1..self.rows).find(|&below| self.get(below, col) == 1);
                match pivot {
                    Some(below) => self.swap_rows(row, below),
                    None => return Err(Gf2Error::Singular),
                }
            }
            for other in 0..self.rows {
                if other != row && self.get(other, col) == 1 {
                    self.xor_rows(other, row);
                }
            }
            row += 1;
        }
        Ok(())
    }

    /// Horizontal concatenation `[self | rhs]`.
    pub fn hstack(&self, rhs: &Self) -> Self {
        assert_eq!(self.rows, rhs.rows, "row counts must match for hstack");
        let mut out = Self::zeros(self.rows, self.cols + rhs.cols);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.set(row, col, self.get(row, col));
            }
            for col in 0..rhs.cols {
                out.set(row, self.cols + col, rhs.get(row, col));
            }
        }
        out
    }

    /// Vertical concatenation, `self` on top of `below`.
    pub fn vstack(&self, below: &Self) -> Self {
        assert_eq!(self.cols, below.cols, "column counts must match for vstack");
        let mut out = Self::zeros(self.rows + below.rows, self.cols);
        out.data[..self.data.len()].copy_from_slice(&self.data);
        out.data[self.data.len()..].copy_from_slice(&below.data);
        out
    }

    /// Total Hamming weight.
    pub fn weight(&self) -> usize {
        self.data.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn row_weight(&self, row: usize) -> usize {
        assert!(row < self.rows);
        self.data[row * self.stride..(row + 1) * self.stride]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// Stable plain-text form: a `rows cols` header line, then one line of
    /// space-separated 0/1 entries per row.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols * 2 + 1) * (self.rows + 1));
        out.push_str(&format!("{} {}\n", self.rows, self.cols));
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    out.push(' ');
                }
                out.push(if self.get(row, col) == 1 { '1' } else { '0' });
            }
            out.push('\n');
        }
        out
    }

    /// Parse the [`Self::to_text`] form, rejecting anything that does not
    /// round-trip exactly.
    pub fn from_text(text: &str) -> Result<Self, Gf2Error> {
        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| Gf2Error::Malformed("empty file".into()))?;
        let mut dims = header.split_whitespace();
        let rows = parse_dim(dims.next(), "row count")?;
        let cols = parse_dim(dims.next(), "column count")?;
        if dims.next().is_some() {
            return Err(Gf2Error::Malformed("trailing tokens in header".into()));
        }

        let mut out = Self::zeros(rows, cols);
        for row in 0..rows {
            let line = lines.next().ok_or_else(|| {
                Gf2Error::Malformed(format!("expected {rows} rows, found {row}"))
            })?;
            let mut entries = line.split_whitespace();
            for col in 0..cols {
                match entries.next() {
                    Some("0") => {}
                    Some("1") => out.set(row, col, 1),
                    Some(token) => {
                        return Err(Gf2Error::Malformed(format!(
                            "entry ({row}, {col}) is {token:?}, expected 0 or 1"
                        )))
                    }
                    None => {
                        return Err(Gf2Error::Malformed(format!(
                            "row {row} has fewer than {cols} entries"
                        )))
                    }
                }
            }
            if entries.next().is_some() {
                return Err(Gf2Error::Malformed(format!(
                    "row {row} has more than {cols} entries"
                )));
            }
        }
        if lines.any(|line| !line.trim().is_empty()) {
            return Err(Gf2Error::Malformed("trailing data after matrix".into()));
        }
        Ok(out)
    }

    /// dst_row ^= src_row, within this matrix.
    fn xor_rows(&mut self, dst: usize, src: usize) {
        for w in 0..self.stride {
            let v = self.data[src * self.stride + w];
            self.data[dst * self.stride + w] ^= v;
        }
    }

    /// dst_row ^= row `src` of `other`. Strides match because the column
    /// counts do.
    fn xor_row_from(&mut self, dst: usize, other: &Self, src: usize) {
        debug_assert_eq!(self.cols, other.cols);
        for w in 0..self.stride {
            self.data[dst * self.stride + w] ^= other.data[src * other.stride + w];
        }
    }
}

fn parse_dim(token: Option<&str>, what: &str) -> Result<usize, Gf2Error> {
    let token = token.ok_or_else(|| Gf2Error::Malformed(format!("missing {what}")))?;
    let value: usize = token
        .parse()
        .map_err(|_| Gf2Error::Malformed(format!("{what} is {token:?}, expected an integer")))?;
    if value == 0 {
        return Err(Gf2Error::Malformed(format!("{what} must be positive")));
    }
    Ok(value)
}

impl fmt::Display for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<{} x {} matrix>", self.rows, self.cols)?;
        for row in 0..self.rows {
            write!(f, "[ ")?;
            for col in 0..self.cols {
                write!(f, "{} ", self.get(row, col))?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
