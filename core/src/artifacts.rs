//! Output artifacts: hash, signature and public key files, plus the
//! human-readable report
//!
//! The cache (see [`crate::matgen`]) is advisory; the files here are not.
//! A signing run writes them, a verification run reads them back, and a
//! corrupt read is a hard error rather than a miss.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gf2_primitives::gf2::BinaryMatrix;

use crate::error::{Error, Result};
use crate::signer::SignOutput;
use crate::verifier::{Verdict, Verification};

pub const HASH_FILE: &str = "hash.txt";
pub const SIGNATURE_FILE: &str = "signature.txt";
pub const PUBLIC_KEY_FILE: &str = "public_key.txt";
pub const REPORT_FILE: &str = "output.txt";

/// Load a matrix file and validate its shape.
pub fn load_matrix_file(path: &Path, rows: usize, cols: usize) -> Result<BinaryMatrix> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let matrix = BinaryMatrix::from_text(&text).map_err(|e| Error::CorruptMatrix {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    if matrix.rows() != rows || matrix.cols() != cols {
        return Err(Error::CorruptMatrix {
            path: path.to_path_buf(),
            detail: format!(
                "expected {rows} x {cols}, found {} x {}",
                matrix.rows(),
                matrix.cols()
            ),
        });
    }
    Ok(matrix)
}

/// Write a matrix file in the stable text form.
pub fn save_matrix_file(path: &Path, matrix: &BinaryMatrix) -> Result<()> {
    fs::write(path, matrix.to_text()).map_err(|e| Error::io(path, e))
}

/// The signing/verification output directory.
pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))
    }

    /// Write hash.txt, signature.txt and public_key.txt after a sign.
    pub fn write_sign_artifacts(&self, output: &SignOutput) -> Result<()> {
        self.ensure()?;
        save_matrix_file(&self.path(HASH_FILE), &output.digest)?;
        save_matrix_file(&self.path(SIGNATURE_FILE), &output.signature)?;
        save_matrix_file(&self.path(PUBLIC_KEY_FILE), &output.public_key)
    }

    /// Load the public key written at signing time.
    pub fn load_public_key(&self, rows: usize, cols: usize) -> Result<BinaryMatrix> {
        load_matrix_file(&self.path(PUBLIC_KEY_FILE), rows, cols)
    }

    /// Load the signature written at signing time.
    pub fn load_signature(&self, cols: usize) -> Result<BinaryMatrix> {
        load_matrix_file(&self.path(SIGNATURE_FILE), 1, cols)
    }

    /// Open (and truncate) the report file.
    pub fn report(&self) -> Result<Report> {
        self.ensure()?;
        let path = self.path(REPORT_FILE);
        let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Report {
            path,
            writer: BufWriter::new(file),
        })
    }
}

/// Line-oriented report of an operation: labelled matrix dumps in the
/// bracketed-row format and a final `Verified:` line.
pub struct Report {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Report {
    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}").map_err(|e| Error::io(&self.path, e))
    }

    /// Dump a matrix under a heading.
    pub fn matrix(&mut self, label: &str, matrix: &BinaryMatrix) -> Result<()> {
        writeln!(self.writer, "\n{label}:\n\n{matrix}").map_err(|e| Error::io(&self.path, e))
    }

    /// Record both syndrome sides and the verdict.
    pub fn verification(&mut self, v: &Verification) -> Result<()> {
        self.matrix("LHS", &v.lhs)?;
        self.matrix("RHS", &v.rhs)?;
        let text = match v.verdict {
            Verdict::Accept => "True",
            Verdict::Reject => "False",
        };
        writeln!(self.writer, "\nVerified: {text}").map_err(|e| Error::io(&self.path, e))
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        let m = BinaryMatrix::identity(4);
        save_matrix_file(&path, &m).unwrap();
        assert_eq!(load_matrix_file(&path, 4, 4).unwrap(), m);
    }

    #[test]
    fn test_shape_mismatch_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        save_matrix_file(&path, &BinaryMatrix::identity(4)).unwrap();
        assert!(matches!(
            load_matrix_file(&path, 3, 4),
            Err(Error::CorruptMatrix { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        assert!(matches!(
            load_matrix_file(&path, 1, 1),
            Err(Error::Io { .. })
        ));
    }
}
