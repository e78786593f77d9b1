//! End-to-end exercises of the scheme against real cache and output
//! directories

use std::fs;

use syndra_core::artifacts::{OutputDir, HASH_FILE, PUBLIC_KEY_FILE, SIGNATURE_FILE};
use syndra_core::digest::message_digest;
use syndra_core::{
    generate_keys, sign, verify, CodeParams, Error, GenOptions, MatrixCache, SchemeParams, Verdict,
};
use tempfile::TempDir;
use utils::rng::secure_rng;

fn seeded() -> GenOptions {
    GenOptions {
        use_seed: true,
        regenerate: false,
    }
}

#[test]
fn sign_then_verify_accepts() {
    let cache_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"A", &params, &keys.h_a, &keys.g1, &keys.g2);
    assert_eq!(out.signature.cols(), 14);
    assert_eq!(out.digest.get(0, 0), 1);
    assert_eq!(out.digest.row_weight(0), 1);

    let digest = message_digest(b"A", 3);
    let v = verify(&digest, &out.signature, &out.public_key, &keys.h_a);
    assert_eq!(v.verdict, Verdict::Accept);
}

#[test]
fn empty_message_round_trips() {
    let cache_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"", &params, &keys.h_a, &keys.g1, &keys.g2);
    assert_eq!(out.signature.weight(), 0);

    let v = verify(&out.digest, &out.signature, &out.public_key, &keys.h_a);
    assert_eq!(v.verdict, Verdict::Accept);
}

#[test]
fn tampered_signature_rejects() {
    let cache_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"A", &params, &keys.h_a, &keys.g1, &keys.g2);

    // every bit whose H_A column is nonzero must flip the verdict
    let mut covered = 0;
    for j in 0..out.signature.cols() {
        if (0..keys.h_a.rows()).all(|i| keys.h_a.get(i, j) == 0) {
            continue;
        }
        covered += 1;
        let mut tampered = out.signature.clone();
        tampered.set(0, j, tampered.get(0, j) ^ 1);
        let v = verify(&out.digest, &tampered, &out.public_key, &keys.h_a);
        assert_eq!(v.verdict, Verdict::Reject, "flipping bit {j} was accepted");
    }
    assert!(covered > 0);
}

#[test]
fn seeded_keygen_reproduces_and_fresh_cache_does_not() {
    let cache_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();

    let first = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();
    let second = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();
    assert_eq!(first.h_a, second.h_a);
    assert_eq!(first.g1, second.g1);
    assert_eq!(first.g2, second.g2);

    // a wiped cache means fresh seeds
    let fresh_dir = TempDir::new().unwrap();
    let fresh_cache = MatrixCache::new(fresh_dir.path());
    let third = generate_keys(&params, &fresh_cache, seeded(), &mut rng).unwrap();
    assert_ne!(first.seeds.h_a.unwrap(), third.seeds.h_a.unwrap());
}

#[test]
fn coerced_parameters_still_round_trip() {
    // entered with G1 k = 4, G2 k = 3: the second dimension is coerced
    let c1 = CodeParams { n: 9, k: 4, d: 3 };
    let c2 = CodeParams { n: 8, k: 3, d: 2 };
    let params = SchemeParams::from_inner(c1, c2).unwrap();
    assert_eq!(params.c2.k, 4);

    let cache_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"coerced", &params, &keys.h_a, &keys.g1, &keys.g2);
    let v = verify(&out.digest, &out.signature, &out.public_key, &keys.h_a);
    assert_eq!(v.verdict, Verdict::Accept);
}

#[test]
fn corrupt_public_key_file_is_an_error_not_a_reject() {
    let cache_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let output = OutputDir::new(out_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"A", &params, &keys.h_a, &keys.g1, &keys.g2);
    output.write_sign_artifacts(&out).unwrap();

    // chop the tail off the stored public key
    let pk_path = output.path(PUBLIC_KEY_FILE);
    let bytes = fs::read(&pk_path).unwrap();
    fs::write(&pk_path, &bytes[..bytes.len() - 4]).unwrap();

    let r = params.c_a.redundancy() as usize;
    let k = params.c_a.k as usize;
    let err = output.load_public_key(r, k).unwrap_err();
    assert!(matches!(err, Error::CorruptMatrix { .. }));
}

#[test]
fn sign_artifacts_are_written_and_reload() {
    let cache_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let output = OutputDir::new(out_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"persist me", &params, &keys.h_a, &keys.g1, &keys.g2);
    output.write_sign_artifacts(&out).unwrap();

    assert!(output.path(HASH_FILE).exists());
    assert!(output.path(SIGNATURE_FILE).exists());

    let n_a = params.c_a.n as usize;
    let r = params.c_a.redundancy() as usize;
    let k = params.c_a.k as usize;
    let signature = output.load_signature(n_a).unwrap();
    let public_key = output.load_public_key(r, k).unwrap();
    assert_eq!(signature, out.signature);
    assert_eq!(public_key, out.public_key);

    // the reloaded artifacts verify on their own
    let digest = message_digest(b"persist me", k);
    let v = verify(&digest, &signature, &public_key, &keys.h_a);
    assert_eq!(v.verdict, Verdict::Accept);
}

#[test]
fn report_records_the_verdict() {
    let cache_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let cache = MatrixCache::new(cache_dir.path());
    let output = OutputDir::new(out_dir.path());
    let params = SchemeParams::from_bch(3, 1).unwrap();
    let mut rng = secure_rng();
    let keys = generate_keys(&params, &cache, seeded(), &mut rng).unwrap();

    let out = sign(b"A", &params, &keys.h_a, &keys.g1, &keys.g2);
    let v = verify(&out.digest, &out.signature, &out.public_key, &keys.h_a);

    let mut report = output.report().unwrap();
    report.matrix("Hash", &out.digest.transpose()).unwrap();
    report.verification(&v).unwrap();
    report.finish().unwrap();

    let text = fs::read_to_string(output.path("output.txt")).unwrap();
    assert!(text.contains("LHS:"));
    assert!(text.contains("RHS:"));
    assert!(text.contains("Verified: True"));
}
