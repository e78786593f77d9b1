//! GF(2) linear-algebra primitives
//!
//! Dense bit-packed binary matrices and the operations the signature scheme
//! builds on: products, transposition, systematic-form column permutations
//! and reduced row echelon form.

pub mod gf2;
